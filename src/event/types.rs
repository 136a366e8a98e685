//! Event types, event objects and caller-supplied init records.
//!
//! `EventType` is a closed enumeration; its index addresses the behavior
//! table so the pipeline never performs stringly-typed lookups.

use std::fmt;

use crate::dom::NodeId;
use crate::types::{Buttons, Coords, Modifiers, PointerType};

// =============================================================================
// EVENT TYPE
// =============================================================================

/// Every event type the engine can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Keydown,
    Keypress,
    Keyup,
    Beforeinput,
    Input,
    Change,
    Select,
    Focus,
    Blur,
    Focusin,
    Focusout,
    Pointerover,
    Pointerenter,
    Pointerdown,
    Pointermove,
    Pointerup,
    Pointercancel,
    Pointerout,
    Pointerleave,
    Mouseover,
    Mouseenter,
    Mousedown,
    Mousemove,
    Mouseup,
    Mouseout,
    Mouseleave,
    Click,
    Auxclick,
    Dblclick,
    Contextmenu,
    Copy,
    Cut,
    Paste,
    Submit,
    Reset,
}

/// Constructor family of an event type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventCategory {
    Keyboard,
    Mouse,
    Pointer,
    Input,
    Focus,
    Clipboard,
    Generic,
}

impl EventType {
    pub const COUNT: usize = 35;

    pub const ALL: [EventType; Self::COUNT] = [
        Self::Keydown,
        Self::Keypress,
        Self::Keyup,
        Self::Beforeinput,
        Self::Input,
        Self::Change,
        Self::Select,
        Self::Focus,
        Self::Blur,
        Self::Focusin,
        Self::Focusout,
        Self::Pointerover,
        Self::Pointerenter,
        Self::Pointerdown,
        Self::Pointermove,
        Self::Pointerup,
        Self::Pointercancel,
        Self::Pointerout,
        Self::Pointerleave,
        Self::Mouseover,
        Self::Mouseenter,
        Self::Mousedown,
        Self::Mousemove,
        Self::Mouseup,
        Self::Mouseout,
        Self::Mouseleave,
        Self::Click,
        Self::Auxclick,
        Self::Dblclick,
        Self::Contextmenu,
        Self::Copy,
        Self::Cut,
        Self::Paste,
        Self::Submit,
        Self::Reset,
    ];

    /// Position in [`EventType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// DOM event name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Keydown => "keydown",
            Self::Keypress => "keypress",
            Self::Keyup => "keyup",
            Self::Beforeinput => "beforeinput",
            Self::Input => "input",
            Self::Change => "change",
            Self::Select => "select",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Focusin => "focusin",
            Self::Focusout => "focusout",
            Self::Pointerover => "pointerover",
            Self::Pointerenter => "pointerenter",
            Self::Pointerdown => "pointerdown",
            Self::Pointermove => "pointermove",
            Self::Pointerup => "pointerup",
            Self::Pointercancel => "pointercancel",
            Self::Pointerout => "pointerout",
            Self::Pointerleave => "pointerleave",
            Self::Mouseover => "mouseover",
            Self::Mouseenter => "mouseenter",
            Self::Mousedown => "mousedown",
            Self::Mousemove => "mousemove",
            Self::Mouseup => "mouseup",
            Self::Mouseout => "mouseout",
            Self::Mouseleave => "mouseleave",
            Self::Click => "click",
            Self::Auxclick => "auxclick",
            Self::Dblclick => "dblclick",
            Self::Contextmenu => "contextmenu",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste => "paste",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }

    /// Look up an event type by its DOM name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.name() == name)
    }

    pub fn category(self) -> EventCategory {
        match self {
            Self::Keydown | Self::Keypress | Self::Keyup => EventCategory::Keyboard,
            Self::Beforeinput | Self::Input => EventCategory::Input,
            Self::Focus | Self::Blur | Self::Focusin | Self::Focusout => EventCategory::Focus,
            Self::Pointerover
            | Self::Pointerenter
            | Self::Pointerdown
            | Self::Pointermove
            | Self::Pointerup
            | Self::Pointercancel
            | Self::Pointerout
            | Self::Pointerleave => EventCategory::Pointer,
            Self::Mouseover
            | Self::Mouseenter
            | Self::Mousedown
            | Self::Mousemove
            | Self::Mouseup
            | Self::Mouseout
            | Self::Mouseleave
            | Self::Click
            | Self::Auxclick
            | Self::Dblclick
            | Self::Contextmenu => EventCategory::Mouse,
            Self::Copy | Self::Cut | Self::Paste => EventCategory::Clipboard,
            Self::Change | Self::Select | Self::Submit | Self::Reset => EventCategory::Generic,
        }
    }

    pub fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::Focus
                | Self::Blur
                | Self::Pointerenter
                | Self::Pointerleave
                | Self::Mouseenter
                | Self::Mouseleave
        )
    }

    pub fn cancelable(self) -> bool {
        !matches!(
            self,
            Self::Input
                | Self::Change
                | Self::Select
                | Self::Focus
                | Self::Blur
                | Self::Focusin
                | Self::Focusout
                | Self::Pointerenter
                | Self::Pointerleave
                | Self::Pointercancel
                | Self::Mouseenter
                | Self::Mouseleave
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// INPUT TYPE
// =============================================================================

/// `InputEvent.inputType` values produced by the editing primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputType {
    InsertText,
    InsertLineBreak,
    InsertParagraph,
    InsertFromPaste,
    InsertReplacementText,
    DeleteContentBackward,
    DeleteContentForward,
    DeleteByCut,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsertText => "insertText",
            Self::InsertLineBreak => "insertLineBreak",
            Self::InsertParagraph => "insertParagraph",
            Self::InsertFromPaste => "insertFromPaste",
            Self::InsertReplacementText => "insertReplacementText",
            Self::DeleteContentBackward => "deleteContentBackward",
            Self::DeleteContentForward => "deleteContentForward",
            Self::DeleteByCut => "deleteByCut",
        }
    }

    /// Delete types remove content without inserting.
    pub fn is_delete(self) -> bool {
        matches!(
            self,
            Self::DeleteContentBackward | Self::DeleteContentForward | Self::DeleteByCut
        )
    }
}

// =============================================================================
// EVENT DETAIL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyboardDetail {
    pub key: String,
    pub code: String,
    pub location: u8,
    pub repeat: bool,
    pub modifiers: Modifiers,
    /// Only set on `keypress`
    pub char_code: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MouseDetail {
    pub button: i16,
    pub buttons: Buttons,
    pub coords: Coords,
    /// Click count
    pub detail: u32,
    pub modifiers: Modifiers,
    pub related_target: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerDetail {
    pub mouse: MouseDetail,
    pub pointer_id: u32,
    pub pointer_type: PointerType,
    pub is_primary: bool,
}

impl Default for PointerDetail {
    fn default() -> Self {
        Self {
            mouse: MouseDetail::default(),
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            is_primary: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputDetail {
    pub input_type: Option<InputType>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FocusDetail {
    pub related_target: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipboardDetail {
    /// Plain-text payload of `clipboardData`
    pub data: Option<String>,
}

/// Category-specific event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    None,
    Keyboard(KeyboardDetail),
    Mouse(MouseDetail),
    Pointer(PointerDetail),
    Input(InputDetail),
    Focus(FocusDetail),
    Clipboard(ClipboardDetail),
}

impl EventDetail {
    /// Empty payload of the right shape for an event type.
    pub fn for_type(event_type: EventType) -> Self {
        match event_type.category() {
            EventCategory::Keyboard => Self::Keyboard(KeyboardDetail::default()),
            EventCategory::Mouse => Self::Mouse(MouseDetail::default()),
            EventCategory::Pointer => Self::Pointer(PointerDetail::default()),
            EventCategory::Input => Self::Input(InputDetail::default()),
            EventCategory::Focus => Self::Focus(FocusDetail::default()),
            EventCategory::Clipboard => Self::Clipboard(ClipboardDetail::default()),
            EventCategory::Generic => Self::None,
        }
    }
}

// =============================================================================
// EVENT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A dispatched event as seen by listeners.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    pub detail: EventDetail,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create an event with default flags and an empty payload.
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self::with_detail(event_type, target, EventDetail::for_type(event_type))
    }

    pub fn with_detail(event_type: EventType, target: NodeId, detail: EventDetail) -> Self {
        Self {
            event_type,
            target,
            current_target: None,
            phase: EventPhase::None,
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            detail,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Cancel the default action. No effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub fn keyboard(&self) -> Option<&KeyboardDetail> {
        match &self.detail {
            EventDetail::Keyboard(detail) => Some(detail),
            _ => None,
        }
    }

    /// Mouse payload, also for pointer events.
    pub fn mouse(&self) -> Option<&MouseDetail> {
        match &self.detail {
            EventDetail::Mouse(detail) => Some(detail),
            EventDetail::Pointer(detail) => Some(&detail.mouse),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<&PointerDetail> {
        match &self.detail {
            EventDetail::Pointer(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn input(&self) -> Option<&InputDetail> {
        match &self.detail {
            EventDetail::Input(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn focus(&self) -> Option<&FocusDetail> {
        match &self.detail {
            EventDetail::Focus(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn clipboard(&self) -> Option<&ClipboardDetail> {
        match &self.detail {
            EventDetail::Clipboard(detail) => Some(detail),
            _ => None,
        }
    }

    /// `KeyboardEvent.key`, if this is a keyboard event.
    pub fn key(&self) -> Option<&str> {
        self.keyboard().map(|k| k.key.as_str())
    }

    /// Modifier state carried by keyboard, mouse and pointer events.
    pub fn modifiers(&self) -> Modifiers {
        match &self.detail {
            EventDetail::Keyboard(detail) => detail.modifiers,
            EventDetail::Mouse(detail) => detail.modifiers,
            EventDetail::Pointer(detail) => detail.mouse.modifiers,
            _ => Modifiers::empty(),
        }
    }
}

// =============================================================================
// EVENT INIT
// =============================================================================

/// Caller-supplied overrides merged over the computed defaults.
///
/// Fields that do not apply to the event's category are ignored.
#[derive(Debug, Clone, Default)]
pub struct EventInit {
    pub bubbles: Option<bool>,
    pub cancelable: Option<bool>,
    pub modifiers: Option<Modifiers>,
    // keyboard
    pub key: Option<String>,
    pub code: Option<String>,
    pub location: Option<u8>,
    pub repeat: Option<bool>,
    pub char_code: Option<u32>,
    // mouse / pointer
    pub button: Option<i16>,
    pub buttons: Option<Buttons>,
    pub coords: Option<Coords>,
    pub detail: Option<u32>,
    pub related_target: Option<NodeId>,
    pub pointer_id: Option<u32>,
    pub pointer_type: Option<PointerType>,
    pub is_primary: Option<bool>,
    // input
    pub input_type: Option<InputType>,
    pub data: Option<String>,
    // clipboard
    pub clipboard_data: Option<String>,
}

impl EventInit {
    pub fn input(input_type: InputType, data: Option<String>) -> Self {
        Self {
            input_type: Some(input_type),
            data,
            ..Self::default()
        }
    }

    pub fn related(target: Option<NodeId>) -> Self {
        Self {
            related_target: target,
            ..Self::default()
        }
    }

    /// Apply these overrides onto an event.
    pub(crate) fn apply(&self, event: &mut Event) {
        if let Some(bubbles) = self.bubbles {
            event.bubbles = bubbles;
        }
        if let Some(cancelable) = self.cancelable {
            event.cancelable = cancelable;
        }
        match &mut event.detail {
            EventDetail::Keyboard(k) => {
                if let Some(key) = &self.key {
                    k.key = key.clone();
                }
                if let Some(code) = &self.code {
                    k.code = code.clone();
                }
                if let Some(location) = self.location {
                    k.location = location;
                }
                if let Some(repeat) = self.repeat {
                    k.repeat = repeat;
                }
                if let Some(char_code) = self.char_code {
                    k.char_code = char_code;
                }
                if let Some(modifiers) = self.modifiers {
                    k.modifiers = modifiers;
                }
            }
            EventDetail::Mouse(m) => self.apply_mouse(m),
            EventDetail::Pointer(p) => {
                self.apply_mouse(&mut p.mouse);
                if let Some(id) = self.pointer_id {
                    p.pointer_id = id;
                }
                if let Some(pointer_type) = self.pointer_type {
                    p.pointer_type = pointer_type;
                }
                if let Some(primary) = self.is_primary {
                    p.is_primary = primary;
                }
            }
            EventDetail::Input(i) => {
                if self.input_type.is_some() {
                    i.input_type = self.input_type;
                }
                if self.data.is_some() {
                    i.data = self.data.clone();
                }
            }
            EventDetail::Focus(f) => {
                if self.related_target.is_some() {
                    f.related_target = self.related_target;
                }
            }
            EventDetail::Clipboard(c) => {
                if self.clipboard_data.is_some() {
                    c.data = self.clipboard_data.clone();
                }
            }
            EventDetail::None => {}
        }
    }

    fn apply_mouse(&self, m: &mut MouseDetail) {
        if let Some(button) = self.button {
            m.button = button;
        }
        if let Some(buttons) = self.buttons {
            m.buttons = buttons;
        }
        if let Some(coords) = self.coords {
            m.coords = coords;
        }
        if let Some(detail) = self.detail {
            m.detail = detail;
        }
        if self.related_target.is_some() {
            m.related_target = self.related_target;
        }
        if let Some(modifiers) = self.modifiers {
            m.modifiers = modifiers;
        }
    }
}
