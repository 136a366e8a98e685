//! Keyboard State Machine - keydown/keypress/keyup sequences
//!
//! Turns parsed keyboard actions into steps and runs each step against the
//! session's keyboard state. Events target the active element, or `<body>`
//! when nothing is focused.
//!
//! - keydown: modifier flags update before dispatch so the event reports
//!   them. A key that is already held does not fire a second keydown unless
//!   the press is a repeat.
//! - keypress: single-character keys and Enter, when the keydown was not
//!   prevented and neither Control nor Alt is held.
//! - keyup: always fires; its default action is skipped when the keydown
//!   was prevented.
//! - Repeats are full keydown/keypress cycles flagged `repeat`. Modifier
//!   and lock keys never repeat.
//!
//! # API
//!
//! - `keydown(session, key_def, repeat, auto_release)` / `keyup(session, key_def)`
//! - `keyboard_action(session, action)` - Run one parsed action inline
//! - `release_keys(session, all)` - Release held keys, latest first

pub mod keymap;
mod state;

pub use keymap::{KeyDef, KeyMap};
pub use state::{KeyboardState, PressedKey};

use tracing::debug;

use crate::descriptor::KeyboardAction;
use crate::event::{dispatch, dispatch_with, EventInit, EventType};
use crate::session::{Session, Step};

// =============================================================================
// STEPS
// =============================================================================

/// One discrete keyboard step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyStep {
    Down {
        key_def: KeyDef,
        /// Auto-repeat of a held key
        repeat: bool,
        auto_release: bool,
    },
    Up(KeyDef),
}

/// Steps for a list of actions, with pauses between actions and between
/// repeated keydowns.
pub(crate) fn expand(actions: &[KeyboardAction]) -> Vec<Step> {
    let mut steps = Vec::new();
    for (i, action) in actions.iter().enumerate() {
        if i > 0 {
            steps.push(Step::Pause);
        }
        steps.extend(action_steps(action));
    }
    steps
}

fn action_steps(action: &KeyboardAction) -> Vec<Step> {
    let key_def = &action.key_def;
    if action.release_previous {
        return vec![Step::Key(KeyStep::Up(key_def.clone()))];
    }
    let downs = if key_def.is_modifier { 1 } else { action.repeat.max(1) };
    let auto_release = key_def.is_legacy_alias && !action.release_self;
    let mut steps = Vec::new();
    for i in 0..downs {
        if i > 0 {
            steps.push(Step::Pause);
        }
        steps.push(Step::Key(KeyStep::Down {
            key_def: key_def.clone(),
            repeat: i > 0,
            auto_release,
        }));
    }
    if action.release_self {
        steps.push(Step::Key(KeyStep::Up(key_def.clone())));
    }
    steps
}

pub(crate) fn run_step(session: &mut Session, step: &KeyStep) {
    match step {
        KeyStep::Down {
            key_def,
            repeat,
            auto_release,
        } => keydown(session, key_def, *repeat, *auto_release),
        KeyStep::Up(key_def) => keyup(session, key_def),
    }
}

/// Run one parsed action without pauses.
pub fn keyboard_action(session: &mut Session, action: &KeyboardAction) {
    for step in action_steps(action) {
        if let Step::Key(step) = step {
            run_step(session, &step);
        }
    }
}

// =============================================================================
// KEYDOWN / KEYUP
// =============================================================================

fn key_init(key_def: &KeyDef) -> EventInit {
    EventInit {
        key: Some(key_def.key.clone()),
        code: Some(key_def.code.clone()),
        location: Some(key_def.location),
        ..EventInit::default()
    }
}

/// Press a key: keydown, then keypress when it produces one.
pub fn keydown(session: &mut Session, key_def: &KeyDef, repeat: bool, auto_release: bool) {
    let held = session.keyboard_state().is_pressed(key_def);
    if held && !repeat {
        debug!(key = %key_def, "key already held, ignoring press");
        return;
    }

    session.keyboard_state_mut().pre_keydown(key_def);
    let target = session.document().active_element();
    let init = EventInit {
        repeat: Some(repeat),
        ..key_init(key_def)
    };
    let unprevented = dispatch(session, target, EventType::Keydown, init);

    if !held {
        session.keyboard_state_mut().add_pressed(PressedKey {
            key_def: key_def.clone(),
            unprevented,
            auto_release,
        });
    }

    let modifiers = session.keyboard_state().modifiers();
    if unprevented && key_def.is_printable() && !modifiers.ctrl() && !modifiers.alt() {
        let char_code = if key_def.key == "Enter" {
            13
        } else {
            key_def.key.chars().next().map_or(0, u32::from)
        };
        let target = session.document().active_element();
        let init = EventInit {
            char_code: Some(char_code),
            repeat: Some(repeat),
            ..key_init(key_def)
        };
        dispatch(session, target, EventType::Keypress, init);
    }
}

/// Release a key. The default action is skipped if its keydown was
/// prevented.
pub fn keyup(session: &mut Session, key_def: &KeyDef) {
    let released = session.keyboard_state_mut().remove_pressed(key_def);
    let unprevented = released.is_none_or(|p| p.unprevented);
    let target = session.document().active_element();
    dispatch_with(session, target, EventType::Keyup, key_init(key_def), unprevented);
}

/// Release held keys in reverse press order: only those marked for
/// auto-release, or all of them.
pub fn release_keys(session: &mut Session, all: bool) {
    let keys = if all {
        session.keyboard_state().held_keys()
    } else {
        session.keyboard_state().auto_release_keys()
    };
    for key_def in keys {
        keyup(session, &key_def);
    }
}

// =============================================================================
// TESTS
// =============================================================================
