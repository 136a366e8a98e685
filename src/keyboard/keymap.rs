//! Key Map - static key definitions
//!
//! Resolves descriptor names to `KeyboardEvent.key` / `KeyboardEvent.code`
//! pairs. Lookups by key value return the first matching entry, so the
//! table lists left-hand modifiers before their right-hand twins.

use std::fmt;

/// `KeyboardEvent.location` values.
pub const LOCATION_STANDARD: u8 = 0;
pub const LOCATION_LEFT: u8 = 1;
pub const LOCATION_RIGHT: u8 = 2;

/// One physical key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyDef {
    /// `KeyboardEvent.key`
    pub key: String,
    /// `KeyboardEvent.code`
    pub code: String,
    pub location: u8,
    /// Modifier or lock key: never repeats, updates modifier state
    pub is_modifier: bool,
    /// Came from a legacy lowercase alias such as `{ctrl}`
    pub is_legacy_alias: bool,
}

impl KeyDef {
    fn new(key: &str, code: &str) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            location: LOCATION_STANDARD,
            is_modifier: false,
            is_legacy_alias: false,
        }
    }

    fn modifier(key: &str, code: &str, location: u8) -> Self {
        Self {
            location,
            is_modifier: true,
            ..Self::new(key, code)
        }
    }

    /// A key value with no known physical key.
    pub fn unknown_code(key: &str) -> Self {
        Self::new(key, "Unknown")
    }

    /// A physical key with no known key value.
    pub fn unknown_key(code: &str) -> Self {
        Self::new("Unknown", code)
    }

    /// Whether pressing this key can produce a `keypress`.
    pub fn is_printable(&self) -> bool {
        self.key.chars().count() == 1 || self.key == "Enter"
    }
}

impl fmt::Display for KeyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.code)
    }
}

/// Lookup table of key definitions.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyMap {
    defs: Vec<KeyDef>,
}

impl KeyMap {
    pub fn new(defs: Vec<KeyDef>) -> Self {
        Self { defs }
    }

    pub fn by_key(&self, key: &str) -> Option<&KeyDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    pub fn by_code(&self, code: &str) -> Option<&KeyDef> {
        self.defs.iter().find(|d| d.code == code)
    }

    /// Definition for a key value, `Unknown` code when not in the table.
    pub fn resolve_key(&self, key: &str) -> KeyDef {
        self.by_key(key).cloned().unwrap_or_else(|| KeyDef::unknown_code(key))
    }

    /// Definition for a physical code, `Unknown` key when not in the table.
    pub fn resolve_code(&self, code: &str) -> KeyDef {
        self.by_code(code).cloned().unwrap_or_else(|| KeyDef::unknown_key(code))
    }

    /// Resolve a legacy lowercase modifier alias (`ctrl`, `shift`, `alt`,
    /// `meta`) to its left-hand modifier key.
    pub fn legacy_alias(&self, name: &str) -> Option<KeyDef> {
        let key = match name {
            "ctrl" => "Control",
            "shift" => "Shift",
            "alt" => "Alt",
            "meta" => "Meta",
            _ => return None,
        };
        let mut def = self.resolve_key(key);
        def.is_legacy_alias = true;
        Some(def)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for KeyMap {
    /// US keyboard layout.
    fn default() -> Self {
        Self::new(default_defs())
    }
}

// =============================================================================
// DEFAULT LAYOUT
// =============================================================================

const SHIFTED_DIGITS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

const PUNCTUATION: [(char, char, &str); 11] = [
    (',', '<', "Comma"),
    ('.', '>', "Period"),
    ('/', '?', "Slash"),
    (';', ':', "Semicolon"),
    ('\'', '"', "Quote"),
    ('[', '{', "BracketLeft"),
    (']', '}', "BracketRight"),
    ('\\', '|', "Backslash"),
    ('`', '~', "Backquote"),
    ('-', '_', "Minus"),
    ('=', '+', "Equal"),
];

const NAMED: [(&str, &str); 16] = [
    ("ArrowDown", "ArrowDown"),
    ("ArrowLeft", "ArrowLeft"),
    ("ArrowRight", "ArrowRight"),
    ("ArrowUp", "ArrowUp"),
    ("Backspace", "Backspace"),
    ("ContextMenu", "ContextMenu"),
    ("Delete", "Delete"),
    ("End", "End"),
    ("Enter", "Enter"),
    ("Escape", "Escape"),
    ("Home", "Home"),
    ("Insert", "Insert"),
    ("PageDown", "PageDown"),
    ("PageUp", "PageUp"),
    ("Tab", "Tab"),
    ("Pause", "Pause"),
];

fn default_defs() -> Vec<KeyDef> {
    let mut defs = Vec::new();

    for c in 'a'..='z' {
        let code = format!("Key{}", c.to_ascii_uppercase());
        defs.push(KeyDef::new(&c.to_string(), &code));
    }
    for c in 'A'..='Z' {
        defs.push(KeyDef::new(&c.to_string(), &format!("Key{c}")));
    }
    for (digit, shifted) in ('0'..='9').zip(SHIFTED_DIGITS) {
        let code = format!("Digit{digit}");
        defs.push(KeyDef::new(&digit.to_string(), &code));
        defs.push(KeyDef::new(&shifted.to_string(), &code));
    }
    defs.push(KeyDef::new(" ", "Space"));
    for (plain, shifted, code) in PUNCTUATION {
        defs.push(KeyDef::new(&plain.to_string(), code));
        defs.push(KeyDef::new(&shifted.to_string(), code));
    }

    for key in ["Alt", "Control", "Meta", "Shift"] {
        defs.push(KeyDef::modifier(key, &format!("{key}Left"), LOCATION_LEFT));
        defs.push(KeyDef::modifier(key, &format!("{key}Right"), LOCATION_RIGHT));
    }
    defs.push(KeyDef::modifier("AltGraph", "AltRight", LOCATION_RIGHT));
    for key in ["CapsLock", "NumLock", "ScrollLock"] {
        defs.push(KeyDef::modifier(key, key, LOCATION_STANDARD));
    }

    for (key, code) in NAMED {
        defs.push(KeyDef::new(key, code));
    }
    for n in 1..=12 {
        let name = format!("F{n}");
        defs.push(KeyDef::new(&name, &name));
    }
    defs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup() {
        let map = KeyMap::default();
        assert_eq!(map.resolve_key("a").code, "KeyA");
        assert_eq!(map.resolve_key("A").code, "KeyA");
        assert_eq!(map.resolve_key("!").code, "Digit1");
        assert_eq!(map.resolve_key(" ").code, "Space");
        assert_eq!(map.resolve_code("KeyA").key, "a");
        assert_eq!(map.resolve_code("F5").key, "F5");
    }

    #[test]
    fn test_modifiers_prefer_left() {
        let map = KeyMap::default();
        let shift = map.resolve_key("Shift");
        assert_eq!(shift.code, "ShiftLeft");
        assert_eq!(shift.location, LOCATION_LEFT);
        assert!(shift.is_modifier);
        assert_eq!(map.resolve_code("ShiftRight").location, LOCATION_RIGHT);
        assert!(map.resolve_key("CapsLock").is_modifier);
    }

    #[test]
    fn test_unknown_names() {
        let map = KeyMap::default();
        assert_eq!(map.resolve_key("Foo"), KeyDef::unknown_code("Foo"));
        let by_code = map.resolve_code("Foo");
        assert_eq!((by_code.key.as_str(), by_code.code.as_str()), ("Unknown", "Foo"));
    }

    #[test]
    fn test_legacy_alias() {
        let map = KeyMap::default();
        let ctrl = map.legacy_alias("ctrl").unwrap();
        assert_eq!(ctrl.key, "Control");
        assert!(ctrl.is_legacy_alias && ctrl.is_modifier);
        assert!(map.legacy_alias("Control").is_none());
    }

    #[test]
    fn test_printable() {
        let map = KeyMap::default();
        assert!(map.resolve_key("a").is_printable());
        assert!(map.resolve_key("Enter").is_printable());
        assert!(!map.resolve_key("Tab").is_printable());
        assert!(!map.resolve_code("Foo").is_printable());
    }
}
