//! Held keys and modifier state across keyboard calls.

use super::keymap::KeyDef;
use crate::types::Modifiers;

/// A key currently held down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PressedKey {
    pub key_def: KeyDef,
    /// Whether its keydown was not prevented
    pub unprevented: bool,
    /// Release automatically when the call that pressed it ends
    pub auto_release: bool,
}

/// Keyboard state of a session.
///
/// Invariant: every held modifier key has its flag set in `modifiers`.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    pressed: Vec<PressedKey>,
    modifiers: Modifiers,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Held keys in press order.
    pub fn pressed(&self) -> &[PressedKey] {
        &self.pressed
    }

    pub fn is_pressed(&self, key_def: &KeyDef) -> bool {
        self.pressed.iter().any(|p| same_key(&p.key_def, key_def))
    }

    /// Update modifier flags ahead of a keydown, so the event reports
    /// the modifier as active.
    pub(crate) fn pre_keydown(&mut self, key_def: &KeyDef) {
        if let Some(flag) = Modifiers::for_modifier_key(&key_def.key) {
            self.modifiers.insert(flag);
        }
        if let Some(flag) = Modifiers::for_lock_key(&key_def.key) {
            self.modifiers.toggle(flag);
        }
    }

    pub(crate) fn add_pressed(&mut self, pressed: PressedKey) {
        self.pressed.push(pressed);
    }

    /// Forget a held key. Its modifier flag clears unless another held
    /// key carries the same key value.
    pub(crate) fn remove_pressed(&mut self, key_def: &KeyDef) -> Option<PressedKey> {
        let index = self.pressed.iter().position(|p| same_key(&p.key_def, key_def))?;
        let removed = self.pressed.remove(index);
        if let Some(flag) = Modifiers::for_modifier_key(&key_def.key) {
            if !self.pressed.iter().any(|p| p.key_def.key == key_def.key) {
                self.modifiers.remove(flag);
            }
        }
        Some(removed)
    }

    /// Held key definitions marked for auto-release, latest first.
    pub(crate) fn auto_release_keys(&self) -> Vec<KeyDef> {
        self.pressed
            .iter()
            .rev()
            .filter(|p| p.auto_release)
            .map(|p| p.key_def.clone())
            .collect()
    }

    /// All held key definitions, latest first.
    pub(crate) fn held_keys(&self) -> Vec<KeyDef> {
        self.pressed.iter().rev().map(|p| p.key_def.clone()).collect()
    }
}

/// Keys are the same physical key when both value and code match.
fn same_key(a: &KeyDef, b: &KeyDef) -> bool {
    a.key == b.key && a.code == b.code
}
