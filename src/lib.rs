//! # spark-user-event
//!
//! Simulated user interaction for tests: typing, pointer gestures, focus
//! changes and clipboard operations against an in-process DOM tree, with
//! the event order and side effects of a real browser.
//!
//! ## Architecture
//!
//! Every top-level call compiles its input into a flat list of steps and
//! runs them against a [`Session`], which carries the keyboard and pointer
//! state of one simulated user across calls:
//! ```text
//! descriptor string → parsed actions → steps → state machines → dispatch → behaviors
//! ```
//!
//! Events go through one pipeline ([`event::dispatch`]). Default actions
//! (typing into a field, toggling a checkbox, submitting a form) are
//! behaviors looked up by event type and run only when no listener
//! prevented the event. Form controls keep a UI mirror of what the user
//! sees next to their real value ([`state::ui`]).
//!
//! ## Modules
//!
//! - [`descriptor`] - `{Key}` / `[Code]` / `[MouseLeft]` descriptor grammar
//! - [`keyboard`] - Keyboard state machine and key map
//! - [`pointer`] - Pointer state machine, devices and click counting
//! - [`event`] - Event types, dispatch pipeline, default behaviors
//! - [`edit`] - Value and contenteditable editing primitives
//! - [`state`] - UI mirror, focus and selection helpers
//! - [`dom`] - The host document model
//! - [`session`] - Options, config, step interpreter and session API
//! - [`clipboard`] - Clipboard trait and in-memory clipboard

pub mod clipboard;
pub mod descriptor;
pub mod dom;
pub mod edit;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod pointer;
pub mod session;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use clipboard::{Clipboard, MemoryClipboard};

pub use descriptor::{parse_keyboard, parse_pointer, KeyboardAction, PointerKeyAction};

pub use dom::{Document, DomPosition, DomRange, InputKind, NodeId};

pub use event::{dispatch, Event, EventInit, EventType, InputType};

pub use edit::input;

pub use keyboard::{keyboard_action, keydown, keyup, KeyDef, KeyMap, KeyboardState};

pub use pointer::{pointer_action, PointerInput, PointerKey, PointerMap, PointerState, PointerStep};

pub use session::{
    create_config, Config, Options, PointerEventsCheck, Session, Step, System, TypeOptions,
};

pub use state::ui::{
    clear_initial_value, get_ui_selection, get_ui_value, has_pending_ui_value, prepare_document,
    set_ui_selection, set_ui_value, UiSelection,
};
