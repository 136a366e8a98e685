//! Core shared types for spark-user-event.
//!
//! Modifier and button bitflags, pointer kinds and coordinates used by the
//! keyboard and pointer state machines as well as by the event pipeline.

use std::fmt;

// =============================================================================
// Modifiers (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Modifier and lock key state as reported on keyboard and mouse events.
    ///
    /// Combine with bitwise OR: `Modifiers::CONTROL | Modifiers::SHIFT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const NONE = 0;
        const ALT = 1 << 0;
        const ALT_GRAPH = 1 << 1;
        const CONTROL = 1 << 2;
        const FN = 1 << 3;
        const META = 1 << 4;
        const SHIFT = 1 << 5;
        const SYMBOL = 1 << 6;
        const CAPS_LOCK = 1 << 7;
        const FN_LOCK = 1 << 8;
        const NUM_LOCK = 1 << 9;
        const SCROLL_LOCK = 1 << 10;
        const SYMBOL_LOCK = 1 << 11;
    }
}

impl Modifiers {
    /// Flag for a held modifier key value (`"Shift"`, `"Control"`, ...).
    pub fn for_modifier_key(key: &str) -> Option<Self> {
        match key {
            "Alt" => Some(Self::ALT),
            "AltGraph" => Some(Self::ALT_GRAPH),
            "Control" => Some(Self::CONTROL),
            "Fn" => Some(Self::FN),
            "Meta" => Some(Self::META),
            "Shift" => Some(Self::SHIFT),
            "Symbol" => Some(Self::SYMBOL),
            _ => None,
        }
    }

    /// Flag for a lock key value (`"CapsLock"`, ...). Lock keys toggle.
    pub fn for_lock_key(key: &str) -> Option<Self> {
        match key {
            "CapsLock" => Some(Self::CAPS_LOCK),
            "FnLock" => Some(Self::FN_LOCK),
            "NumLock" => Some(Self::NUM_LOCK),
            "ScrollLock" => Some(Self::SCROLL_LOCK),
            "SymbolLock" => Some(Self::SYMBOL_LOCK),
            _ => None,
        }
    }

    pub fn ctrl(&self) -> bool {
        self.contains(Self::CONTROL)
    }

    pub fn alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn meta(&self) -> bool {
        self.contains(Self::META)
    }
}

// =============================================================================
// Buttons (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Pressed button mask, as in `MouseEvent.buttons`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const NONE = 0;
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const AUXILIARY = 1 << 2;
        const BACK = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

// =============================================================================
// Mouse Button
// =============================================================================

/// A single logical button, as in `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
    Back,
    Forward,
}

impl MouseButton {
    /// Value of `MouseEvent.button` for this button.
    pub fn index(self) -> i16 {
        match self {
            Self::Primary => 0,
            Self::Auxiliary => 1,
            Self::Secondary => 2,
            Self::Back => 3,
            Self::Forward => 4,
        }
    }

    /// Bit in `MouseEvent.buttons` for this button.
    pub fn flag(self) -> Buttons {
        match self {
            Self::Primary => Buttons::PRIMARY,
            Self::Auxiliary => Buttons::AUXILIARY,
            Self::Secondary => Buttons::SECONDARY,
            Self::Back => Buttons::BACK,
            Self::Forward => Buttons::FORWARD,
        }
    }
}

// =============================================================================
// Pointer Type
// =============================================================================

/// Kind of pointing device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Pen => "pen",
            Self::Touch => "touch",
        }
    }
}

impl fmt::Display for PointerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Coords
// =============================================================================

/// Client coordinates of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

impl Coords {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
