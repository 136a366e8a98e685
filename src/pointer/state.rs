//! Pointer devices, pressed buttons and click counting.

use std::time::Duration;

use tokio::time::Instant;

use super::keymap::PointerKey;
use crate::dom::NodeId;
use crate::state::selection::SelectionAnchor;
use crate::types::{Buttons, Coords, MouseButton, PointerType};

/// Where a pointer is. Every part is optional while unresolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub target: Option<NodeId>,
    pub coords: Option<Coords>,
    /// Char offset into the target's text, for caret placement
    pub offset: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PressedButton {
    pub key: PointerKey,
    pub down_target: NodeId,
}

/// One pointing device.
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    pub name: String,
    pub pointer_id: u32,
    pub pointer_type: PointerType,
    pub is_primary: bool,
    pub position: PointerPosition,
    pub(crate) pressed: Vec<PressedButton>,
    /// `pointerdown` was prevented for the current press
    pub(crate) prevented: bool,
}

impl Device {
    fn new(name: &str, pointer_id: u32, pointer_type: PointerType, is_primary: bool) -> Self {
        Self {
            name: name.to_string(),
            pointer_id,
            pointer_type,
            is_primary,
            position: PointerPosition::default(),
            pressed: Vec::new(),
            prevented: false,
        }
    }

    pub fn buttons(&self) -> Buttons {
        self.pressed
            .iter()
            .fold(Buttons::NONE, |acc, p| acc | p.key.button.flag())
    }

    pub fn is_down(&self) -> bool {
        !self.pressed.is_empty()
    }

    pub fn is_pressed(&self, key: &PointerKey) -> bool {
        self.pressed.iter().any(|p| p.key == *key)
    }
}

/// Click streak of the mouse, counted per button.
#[derive(Clone, Debug, Default)]
struct ClickState {
    button: Option<MouseButton>,
    /// Clicks completed in the streak
    count: u32,
    /// Count the pending press will complete to
    pending: Option<u32>,
    last: Option<Instant>,
}

/// Pointer state of a session.
#[derive(Clone, Debug)]
pub struct PointerState {
    /// The mouse is always first
    devices: Vec<Device>,
    next_pointer_id: u32,
    click: ClickState,
    /// Mouse-level press targets, for click target resolution
    mouse_down: Vec<(MouseButton, NodeId)>,
    selecting: Option<SelectionAnchor>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            devices: vec![Device::new("mouse", 1, PointerType::Mouse, true)],
            next_pointer_id: 2,
            click: ClickState::default(),
            mouse_down: Vec::new(),
            selecting: None,
        }
    }
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    pub(crate) fn device_mut(&mut self, name: &str) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.name == name)
    }

    /// Device for `key`, allocated on first use. Touch points and the pen
    /// get fresh pointer ids; a touch point is primary while no other touch
    /// is active.
    pub(crate) fn ensure_device(&mut self, key: &PointerKey) -> &mut Device {
        let name = key.pointer_name();
        if let Some(index) = self.devices.iter().position(|d| d.name == name) {
            return &mut self.devices[index];
        }
        let is_primary = match key.pointer_type {
            PointerType::Touch => !self.devices.iter().any(|d| d.pointer_type == PointerType::Touch),
            _ => true,
        };
        let id = self.next_pointer_id;
        self.next_pointer_id += 1;
        self.devices.push(Device::new(&name, id, key.pointer_type, is_primary));
        let last = self.devices.len() - 1;
        &mut self.devices[last]
    }

    /// Drop a released touch point.
    pub(crate) fn remove_device(&mut self, name: &str) {
        self.devices.retain(|d| d.name == "mouse" || d.name != name);
    }

    pub fn mouse(&self) -> &Device {
        &self.devices[0]
    }

    pub fn mouse_position(&self) -> &PointerPosition {
        &self.mouse().position
    }

    pub(crate) fn mouse_mut(&mut self) -> &mut Device {
        &mut self.devices[0]
    }

    /// Buttons held across all devices.
    pub fn buttons(&self) -> Buttons {
        self.devices.iter().fold(Buttons::NONE, |acc, d| acc | d.buttons())
    }

    // -------------------------------------------------------------------------
    // Mouse press targets
    // -------------------------------------------------------------------------

    pub(crate) fn set_mouse_down_target(&mut self, button: MouseButton, target: NodeId) {
        self.mouse_down.retain(|(b, _)| *b != button);
        self.mouse_down.push((button, target));
    }

    pub(crate) fn take_mouse_down_target(&mut self, button: MouseButton) -> Option<NodeId> {
        let index = self.mouse_down.iter().position(|(b, _)| *b == button)?;
        Some(self.mouse_down.remove(index).1)
    }

    // -------------------------------------------------------------------------
    // Click counting
    // -------------------------------------------------------------------------

    /// Click count reported by `mousedown`.
    ///
    /// A press with another button, or after `timeout` has elapsed since
    /// the last click, starts a new streak.
    pub(crate) fn click_count_on_down(&mut self, button: MouseButton, timeout: Option<Duration>) -> u32 {
        let expired = match (timeout, self.click.last) {
            (Some(timeout), Some(last)) => last.elapsed() > timeout,
            _ => false,
        };
        if expired || self.click.button != Some(button) {
            self.click = ClickState {
                button: Some(button),
                ..ClickState::default()
            };
        }
        let count = self.click.count + 1;
        self.click.pending = Some(count);
        count
    }

    /// Click count reported by `mouseup`, if the press was counted.
    pub(crate) fn click_count_on_up(&self, button: MouseButton) -> Option<u32> {
        if self.click.button != Some(button) {
            return None;
        }
        self.click.pending
    }

    /// Complete the pending press into a click.
    pub(crate) fn register_click(&mut self, button: MouseButton) -> Option<u32> {
        if self.click.button != Some(button) {
            return None;
        }
        let count = self.click.pending.take()?;
        self.click.count = count;
        self.click.last = Some(Instant::now());
        Some(count)
    }

    /// End the click streak. A press still held completes into a click of
    /// its own.
    pub fn reset_click_count(&mut self) {
        self.click.count = 0;
        self.click.last = None;
    }

    // -------------------------------------------------------------------------
    // Mouse selection
    // -------------------------------------------------------------------------

    pub fn selecting(&self) -> Option<SelectionAnchor> {
        self.selecting
    }

    pub(crate) fn set_selecting(&mut self, anchor: Option<SelectionAnchor>) {
        self.selecting = anchor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::keymap::PointerMap;

    fn key(name: &str) -> PointerKey {
        PointerMap::default().get(name).cloned().unwrap()
    }

    #[test]
    fn test_device_allocation() {
        let mut state = PointerState::new();
        assert_eq!(state.mouse().pointer_id, 1);
        assert_eq!(state.ensure_device(&key("MouseRight")).pointer_id, 1);

        let a = state.ensure_device(&key("TouchA")).pointer_id;
        let b_primary = state.ensure_device(&key("TouchB")).is_primary;
        assert_eq!(a, 2);
        assert!(!b_primary);
        assert_eq!(state.ensure_device(&key("TouchA")).pointer_id, 2);

        state.remove_device("TouchA");
        state.remove_device("mouse");
        assert!(state.device("TouchA").is_none());
        assert!(state.device("mouse").is_some());
        assert_eq!(state.ensure_device(&key("PenA")).pointer_id, 4);
    }

    #[test]
    fn test_click_streak() {
        let mut state = PointerState::new();
        assert_eq!(state.click_count_on_down(MouseButton::Primary, None), 1);
        assert_eq!(state.click_count_on_up(MouseButton::Primary), Some(1));
        assert_eq!(state.register_click(MouseButton::Primary), Some(1));
        assert_eq!(state.click_count_on_down(MouseButton::Primary, None), 2);
        assert_eq!(state.register_click(MouseButton::Primary), Some(2));

        // Another button starts over
        assert_eq!(state.click_count_on_down(MouseButton::Secondary, None), 1);
        state.reset_click_count();
        assert_eq!(state.click_count_on_down(MouseButton::Secondary, None), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_streak_expires() {
        let mut state = PointerState::new();
        let timeout = Some(Duration::from_millis(500));
        state.click_count_on_down(MouseButton::Primary, timeout);
        state.register_click(MouseButton::Primary);
        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(state.click_count_on_down(MouseButton::Primary, timeout), 1);
    }
}
