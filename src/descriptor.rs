//! Descriptor Parser - key and button description strings
//!
//! Turns strings like `"{Control>}a[ArrowLeft]{/Control}"` into actions.
//!
//! # Grammar
//!
//! - A plain character is a tap of the key producing it.
//! - `{Name}` names a key value, `[Name]` a physical key code.
//! - `{{` and `[[` are literal `{` and `[` characters.
//! - Inside brackets: `[/]Name[>[count][/]]`. A leading `/` releases a
//!   held key. `>` keeps the key pressed, repeating it `count` times; a
//!   trailing `/` after `>` releases it once the repeats are done.
//! - `{` accepts a word or a single character other than `}`, `>` or `/`;
//!   `{\c}` escapes any single character. `[` accepts a word only.
//!
//! Pointer descriptors use only `[Name]`, without repeat counts.
//!
//! Every parsed action prints back as its canonical descriptor, and the
//! canonical form parses to the same action.
//!
//! # Example
//!
//! ```ignore
//! let actions = parse_keyboard("{Shift>}ab{/Shift}", &KeyMap::default())?;
//! assert_eq!(actions.len(), 4);
//! assert_eq!(canonical(&actions), "{Shift>}ab{/Shift}");
//! ```

use std::fmt;

use crate::error::{Error, Result};
use crate::keyboard::keymap::{KeyDef, KeyMap};
use crate::pointer::keymap::{PointerKey, PointerMap};

// =============================================================================
// ACTIONS
// =============================================================================

/// How an action was written, kept for printing it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Descriptor {
    /// Plain character
    Char(char),
    /// `{Name}`
    Key(String),
    /// `[Name]`
    Code(String),
}

/// One step of a keyboard descriptor string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardAction {
    pub key_def: KeyDef,
    pub descriptor: Descriptor,
    /// Release a held key instead of pressing
    pub release_previous: bool,
    /// Release after pressing; `false` keeps the key held
    pub release_self: bool,
    /// Number of keydown cycles
    pub repeat: u32,
}

/// One step of a pointer descriptor string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerKeyAction {
    pub key: PointerKey,
    pub release_previous: bool,
    pub release_self: bool,
}

impl fmt::Display for KeyboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, name, close) = match &self.descriptor {
            Descriptor::Char(c) => {
                let plain = self.repeat == 1 && !self.release_previous && self.release_self;
                if plain {
                    return match c {
                        '{' => f.write_str("{{"),
                        '[' => f.write_str("[["),
                        c => write!(f, "{c}"),
                    };
                }
                ('{', escape_key_name(&c.to_string()), '}')
            }
            Descriptor::Key(name) => ('{', escape_key_name(name), '}'),
            Descriptor::Code(name) => ('[', name.clone(), ']'),
        };
        write!(f, "{open}")?;
        if self.release_previous {
            write!(f, "/")?;
        }
        write!(f, "{name}")?;
        let default_release = !self.key_def.is_legacy_alias;
        if self.repeat != 1 || self.release_self != default_release {
            write!(f, ">")?;
            if self.repeat != 1 {
                write!(f, "{}", self.repeat)?;
            }
            if self.release_self {
                write!(f, "/")?;
            }
        }
        write!(f, "{close}")
    }
}

impl fmt::Display for PointerKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if self.release_previous {
            write!(f, "/")?;
        }
        write!(f, "{}", self.key.name)?;
        if !self.release_self {
            write!(f, ">")?;
        }
        write!(f, "]")
    }
}

/// Canonical descriptor string for a list of actions.
pub fn canonical<T: fmt::Display>(actions: &[T]) -> String {
    actions.iter().map(ToString::to_string).collect()
}

/// Names that need `{\c}` escaping inside braces.
fn escape_key_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if matches!(c, '}' | '>' | '/' | '\\' | '{') => format!("\\{c}"),
        _ => name.to_string(),
    }
}

// =============================================================================
// TOKENIZER
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Keyboard,
    Pointer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Curly,
    Square,
}

impl Bracket {
    fn close(self) -> char {
        match self {
            Self::Curly => '}',
            Self::Square => ']',
        }
    }
}

/// A raw descriptor before key lookup.
struct Token {
    bracket: Option<Bracket>,
    name: String,
    release_previous: bool,
    /// `Some` when `>` was present
    repeat: Option<u32>,
    /// Trailing `/` after `>`
    release_slash: bool,
}

struct Scanner<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, expected: &str) -> Error {
        let found = self.peek().map(String::from).unwrap_or_default();
        Error::parse(
            format!("Expected {expected} but found \"{found}\" in \"{}\"", self.text),
            self.pos,
        )
    }

    fn next_token(&mut self, context: Context) -> Result<Token> {
        let Some(first) = self.peek() else {
            return Err(self.error("descriptor"));
        };
        let bracket = match (first, context) {
            ('{', Context::Keyboard) => Some(Bracket::Curly),
            ('[', _) => Some(Bracket::Square),
            _ => None,
        };

        let Some(bracket) = bracket else {
            if context == Context::Pointer {
                return Err(self.error("\"[\""));
            }
            self.pos += 1;
            return Ok(Token::plain(first));
        };

        // `{{` and `[[` are literal brackets
        if context == Context::Keyboard && self.peek_at(1) == Some(first) {
            self.pos += 2;
            return Ok(Token::plain(first));
        }
        self.pos += 1;
        self.read_tag(bracket, context)
    }

    fn read_tag(&mut self, bracket: Bracket, context: Context) -> Result<Token> {
        let release_previous = self.peek() == Some('/');
        if release_previous {
            self.pos += 1;
        }

        let name = self.read_name(bracket)?;

        let mut repeat = None;
        let mut release_slash = false;
        let mut digits_seen = false;
        if self.peek() == Some('>') {
            self.pos += 1;
            repeat = Some(1);
            if context == Context::Keyboard {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                if self.pos > start {
                    digits_seen = true;
                    let digits: String = self.chars[start..self.pos].iter().collect();
                    let count: u32 = digits.parse().map_err(|_| {
                        Error::parse(
                            format!("Expected repeat count but found \"{digits}\" in \"{}\"", self.text),
                            start,
                        )
                    })?;
                    repeat = Some(count.max(1));
                }
            }
            if self.peek() == Some('/') {
                self.pos += 1;
                release_slash = true;
            }
        }

        if self.peek() != Some(bracket.close()) {
            let mut expected = Vec::new();
            if repeat.is_none() {
                expected.push("repeat modifier".to_string());
            } else {
                if context == Context::Keyboard && !digits_seen && !release_slash {
                    expected.push("repeat count".to_string());
                }
                if !release_slash {
                    expected.push("release modifier".to_string());
                }
            }
            expected.push(format!("\"{}\"", bracket.close()));
            return Err(self.error(&expected.join(" or ")));
        }
        self.pos += 1;

        Ok(Token {
            bracket: Some(bracket),
            name,
            release_previous,
            repeat,
            release_slash,
        })
    }

    fn read_name(&mut self, bracket: Bracket) -> Result<String> {
        if bracket == Bracket::Curly && self.peek() == Some('\\') {
            if let Some(escaped) = self.peek_at(1) {
                self.pos += 2;
                return Ok(escaped.to_string());
            }
            self.pos += 1;
            return Err(self.error("key descriptor"));
        }

        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        if self.pos > start {
            return Ok(self.chars[start..self.pos].iter().collect());
        }
        match (bracket, self.peek()) {
            (Bracket::Curly, Some(c)) if !matches!(c, '}' | '>' | '/') => {
                self.pos += 1;
                Ok(c.to_string())
            }
            _ => Err(self.error("key descriptor")),
        }
    }
}

impl Token {
    fn plain(c: char) -> Self {
        Self {
            bracket: None,
            name: c.to_string(),
            release_previous: false,
            repeat: None,
            release_slash: false,
        }
    }

    /// `release_self` given the default for keys written without `>`.
    fn release_self(&self, default: bool) -> bool {
        match self.repeat {
            Some(_) => self.release_slash,
            None => default,
        }
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a keyboard descriptor string.
pub fn parse_keyboard(text: &str, key_map: &KeyMap) -> Result<Vec<KeyboardAction>> {
    let mut scanner = Scanner::new(text);
    let mut actions = Vec::new();
    while !scanner.at_end() {
        let token = scanner.next_token(Context::Keyboard)?;
        let (key_def, descriptor) = match token.bracket {
            None => {
                let c = token.name.chars().next().unwrap_or_default();
                (key_map.resolve_key(&token.name), Descriptor::Char(c))
            }
            Some(Bracket::Curly) => {
                let def = key_map
                    .legacy_alias(&token.name)
                    .unwrap_or_else(|| key_map.resolve_key(&token.name));
                (def, Descriptor::Key(token.name.clone()))
            }
            Some(Bracket::Square) => (key_map.resolve_code(&token.name), Descriptor::Code(token.name.clone())),
        };
        let release_self = token.release_self(!key_def.is_legacy_alias);
        actions.push(KeyboardAction {
            release_previous: token.release_previous,
            release_self,
            repeat: token.repeat.unwrap_or(1),
            key_def,
            descriptor,
        });
    }
    Ok(actions)
}

/// Parse a pointer descriptor string. Unknown button names are errors.
pub fn parse_pointer(text: &str, pointer_map: &PointerMap) -> Result<Vec<PointerKeyAction>> {
    let mut scanner = Scanner::new(text);
    let mut actions = Vec::new();
    while !scanner.at_end() {
        let start = scanner.pos;
        let token = scanner.next_token(Context::Pointer)?;
        let key = pointer_map.get(&token.name).cloned().ok_or_else(|| {
            Error::parse(
                format!("Unknown pointer key \"{}\" in \"{text}\"", token.name),
                start,
            )
        })?;
        actions.push(PointerKeyAction {
            key,
            release_previous: token.release_previous,
            release_self: token.release_self(true),
        });
    }
    Ok(actions)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keys(text: &str) -> Vec<KeyboardAction> {
        parse_keyboard(text, &KeyMap::default()).unwrap()
    }

    fn error_of(text: &str) -> (String, usize) {
        match parse_keyboard(text, &KeyMap::default()) {
            Err(Error::Parse { message, position }) => (message, position),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_characters() {
        let actions = keys("ab");
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].key_def.code, "KeyA");
        assert!(actions[0].release_self);
        assert_eq!(actions[0].repeat, 1);
        assert_eq!(actions[1].descriptor, Descriptor::Char('b'));
    }

    #[test]
    fn test_bracket_forms() {
        let actions = keys("{Shift>}[KeyA]{/Shift}");
        assert_eq!(actions[0].key_def.key, "Shift");
        assert!(!actions[0].release_self);
        assert_eq!(actions[1].key_def.key, "a");
        assert_eq!(actions[1].descriptor, Descriptor::Code("KeyA".into()));
        assert!(actions[2].release_previous);
    }

    #[test]
    fn test_repeat_and_release() {
        let held = keys("{a>3}");
        assert_eq!((held[0].repeat, held[0].release_self), (3, false));
        let tapped = keys("{a>3/}");
        assert_eq!((tapped[0].repeat, tapped[0].release_self), (3, true));
        let zero = keys("{a>0}");
        assert_eq!(zero[0].repeat, 1);
    }

    #[test]
    fn test_escaped_brackets() {
        let actions = keys("{{a[[");
        let chars: Vec<_> = actions.iter().map(|a| a.key_def.key.as_str()).collect();
        assert_eq!(chars, vec!["{", "a", "["]);
        assert_eq!(keys("{\\}}")[0].key_def.key, "}");
        assert_eq!(keys("{[}")[0].key_def.key, "[");
    }

    #[test]
    fn test_unknown_keys_keep_literal() {
        let by_key = keys("{Foo}");
        assert_eq!((by_key[0].key_def.key.as_str(), by_key[0].key_def.code.as_str()), ("Foo", "Unknown"));
        let by_code = keys("[Bar]");
        assert_eq!((by_code[0].key_def.key.as_str(), by_code[0].key_def.code.as_str()), ("Unknown", "Bar"));
    }

    #[test]
    fn test_legacy_alias_defaults_to_held() {
        let actions = keys("{ctrl}a{/ctrl}");
        assert_eq!(actions[0].key_def.key, "Control");
        assert!(actions[0].key_def.is_legacy_alias);
        assert!(!actions[0].release_self);
        assert!(actions[2].release_previous);
    }

    #[test]
    fn test_errors() {
        let (message, position) = error_of("a{}");
        assert_eq!(message, "Expected key descriptor but found \"}\" in \"a{}\"");
        assert_eq!(position, 2);

        let (message, _) = error_of("{a");
        assert_eq!(message, "Expected repeat modifier or \"}\" but found \"\" in \"{a\"");

        let (message, position) = error_of("{a/}");
        assert!(message.starts_with("Expected repeat modifier or \"}\" but found \"/\""));
        assert_eq!(position, 2);

        let (message, _) = error_of("{a>x}");
        assert!(message.starts_with("Expected repeat count or release modifier or \"}\" but found \"x\""));

        let (message, _) = error_of("[ab-c]");
        assert!(message.contains("found \"-\""));

        let (message, _) = error_of("{a>99999999999}");
        assert!(message.starts_with("Expected repeat count"));
    }

    #[test]
    fn test_pointer_descriptors() {
        let map = PointerMap::default();
        let actions = parse_pointer("[MouseLeft][TouchA>][/TouchA]", &map).unwrap();
        assert_eq!(actions.len(), 3);
        assert!(actions[0].release_self);
        assert!(!actions[1].release_self);
        assert!(actions[2].release_previous);
        assert_eq!(canonical(&actions), "[MouseLeft][TouchA>][/TouchA]");

        assert!(parse_pointer("a", &map).is_err());
        assert!(parse_pointer("[MouseLeft>2]", &map).is_err());
        assert!(parse_pointer("[Nope]", &map).is_err());
    }

    #[test]
    fn test_canonical_form() {
        let text = "a{{[[{Shift>}{a>2}{b>3/}{ctrl}{/ctrl}[KeyX]{\\>}";
        assert_eq!(canonical(&keys(text)), text);
        assert_eq!(canonical(&keys("{a>1/}{Enter}")), "{a}{Enter}");
        assert_eq!(canonical(&keys("{ctrl>/}")), "{ctrl>/}");
    }

    fn fragment() -> impl Strategy<Value = String> {
        let names = prop::sample::select(vec![
            "a", "Z", "Shift", "Control", "Enter", "ctrl", "shift", "Foo", "[", "é", "}", "\\",
        ]);
        let codes = prop::sample::select(vec!["KeyA", "ShiftLeft", "Space", "Bar"]);
        let suffix = prop::sample::select(vec!["", ">", ">/", ">2", ">5/"]);
        prop_oneof![
            prop::sample::select(vec!["a", "b", " ", "{{", "[[", "}", "]", "é", "!"]).prop_map(String::from),
            (any::<bool>(), names, suffix.clone()).prop_map(|(release, name, suffix)| {
                let name = if matches!(name, "}" | "\\") { format!("\\{name}") } else { name.to_string() };
                format!("{{{}{name}{suffix}}}", if release { "/" } else { "" })
            }),
            (any::<bool>(), codes, suffix).prop_map(|(release, code, suffix)| {
                format!("[{}{code}{suffix}]", if release { "/" } else { "" })
            }),
        ]
    }

    proptest! {
        #[test]
        fn test_canonical_reparses_equal(parts in prop::collection::vec(fragment(), 0..12)) {
            let text: String = parts.concat();
            let map = KeyMap::default();
            let actions = parse_keyboard(&text, &map).unwrap();
            let printed = canonical(&actions);
            let reparsed = parse_keyboard(&printed, &map).unwrap();
            prop_assert_eq!(reparsed, actions);
        }
    }
}
