//! Default actions performed by the browser for trusted events.
//!
//! Each behavior inspects the event before it is dispatched and returns a
//! follow-up that runs only if no listener called `prevent_default`.

mod clipboard;
mod keyboard;
mod mouse;

use super::dispatch::BehaviorRegistry;
use super::types::EventType;

/// Registry with every standard behavior installed.
pub(crate) fn standard() -> BehaviorRegistry {
    let mut registry = BehaviorRegistry::empty();
    registry.register(EventType::Click, mouse::click);
    registry.register(EventType::Mousedown, mouse::mousedown);
    registry.register(EventType::Reset, mouse::reset);
    registry.register(EventType::Keydown, keyboard::keydown);
    registry.register(EventType::Keypress, keyboard::keypress);
    registry.register(EventType::Keyup, keyboard::keyup);
    registry.register(EventType::Cut, clipboard::cut);
    registry.register(EventType::Paste, clipboard::paste);
    registry
}
