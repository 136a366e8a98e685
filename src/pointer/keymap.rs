//! Pointer key map: descriptor names for buttons and touch points.

use crate::types::{MouseButton, PointerType};

/// A button on a pointing device, named in `[...]` descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerKey {
    pub name: String,
    pub pointer_type: PointerType,
    pub button: MouseButton,
}

impl PointerKey {
    pub fn new(name: &str, pointer_type: PointerType, button: MouseButton) -> Self {
        Self {
            name: name.to_string(),
            pointer_type,
            button,
        }
    }

    /// Name of the device pressing this key.
    ///
    /// All mouse buttons share one mouse and the pen is a single device;
    /// every touch key is its own touch point.
    pub fn pointer_name(&self) -> String {
        match self.pointer_type {
            PointerType::Mouse => "mouse".to_string(),
            PointerType::Pen => "pen".to_string(),
            PointerType::Touch => self.name.clone(),
        }
    }
}

/// Lookup table of pointer keys.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerMap {
    keys: Vec<PointerKey>,
}

impl PointerMap {
    pub fn new(keys: Vec<PointerKey>) -> Self {
        Self { keys }
    }

    pub fn get(&self, name: &str) -> Option<&PointerKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    pub fn keys(&self) -> &[PointerKey] {
        &self.keys
    }
}

impl Default for PointerMap {
    fn default() -> Self {
        Self::new(vec![
            PointerKey::new("MouseLeft", PointerType::Mouse, MouseButton::Primary),
            PointerKey::new("MouseRight", PointerType::Mouse, MouseButton::Secondary),
            PointerKey::new("MouseMiddle", PointerType::Mouse, MouseButton::Auxiliary),
            PointerKey::new("MouseBack", PointerType::Mouse, MouseButton::Back),
            PointerKey::new("MouseForward", PointerType::Mouse, MouseButton::Forward),
            PointerKey::new("TouchA", PointerType::Touch, MouseButton::Primary),
            PointerKey::new("TouchB", PointerType::Touch, MouseButton::Primary),
            PointerKey::new("TouchC", PointerType::Touch, MouseButton::Primary),
            PointerKey::new("PenA", PointerType::Pen, MouseButton::Primary),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_names() {
        let map = PointerMap::default();
        let name = |key: &str| map.get(key).map(PointerKey::pointer_name);
        assert_eq!(name("MouseLeft").as_deref(), Some("mouse"));
        assert_eq!(name("MouseRight").as_deref(), Some("mouse"));
        assert_eq!(name("TouchB").as_deref(), Some("TouchB"));
        assert_eq!(name("PenA").as_deref(), Some("pen"));
        assert_eq!(name("Nope"), None);
    }
}
