//! Clipboard Module - Text copy/paste support
//!
//! The session reads and writes the system clipboard through the
//! [`Clipboard`] trait, so hosts can plug in their own. [`MemoryClipboard`]
//! is the in-process buffer `Session::setup` installs by default.
//!
//! Clones of a `MemoryClipboard` share one buffer, so a test can keep a
//! handle and inspect what the session copied.
//!
//! # Example
//!
//! ```ignore
//! use spark_user_event::clipboard::{Clipboard, MemoryClipboard};
//!
//! let clipboard = MemoryClipboard::new();
//! let session = Session::setup(&doc, Options::default())
//!     .with_clipboard(clipboard.clone());
//!
//! session.copy()?;
//! assert_eq!(clipboard.read_text(), Some("Selected".to_string()));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Clipboard Trait
// =============================================================================

/// Plain-text clipboard the session copies to and pastes from.
pub trait Clipboard {
    /// Current text, or `None` when the clipboard is empty.
    fn read_text(&self) -> Option<String>;

    fn write_text(&self, text: &str);
}

// =============================================================================
// Memory Clipboard
// =============================================================================

/// In-process clipboard buffer.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    buffer: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard holding `text`.
    pub fn with_text(text: &str) -> Self {
        let clipboard = Self::new();
        clipboard.write_text(text);
        clipboard
    }

    pub fn clear(&self) {
        *self.buffer.borrow_mut() = None;
    }

    pub fn has_content(&self) -> bool {
        self.buffer.borrow().is_some()
    }

    /// Content length in chars.
    pub fn content_length(&self) -> usize {
        self.buffer
            .borrow()
            .as_ref()
            .map(|s| s.chars().count())
            .unwrap_or(0)
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&self) -> Option<String> {
        self.buffer.borrow().clone()
    }

    /// Empty strings are ignored (clipboard not modified).
    fn write_text(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        *self.buffer.borrow_mut() = Some(text.to_string());
    }
}

impl fmt::Debug for MemoryClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryClipboard")
            .field("content_length", &self.content_length())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.read_text().is_none());
        assert!(!clipboard.has_content());

        clipboard.write_text("Hello");
        assert_eq!(clipboard.read_text(), Some("Hello".to_string()));
        assert_eq!(clipboard.content_length(), 5);

        // Reading is non-destructive
        assert_eq!(clipboard.read_text(), Some("Hello".to_string()));
    }

    #[test]
    fn test_write_empty_ignored() {
        let clipboard = MemoryClipboard::with_text("Something");
        clipboard.write_text("");
        assert_eq!(clipboard.read_text(), Some("Something".to_string()));
    }

    #[test]
    fn test_clones_share_buffer() {
        let clipboard = MemoryClipboard::new();
        let handle = clipboard.clone();
        clipboard.write_text("shared");
        assert_eq!(handle.read_text(), Some("shared".to_string()));

        handle.clear();
        assert!(!clipboard.has_content());
        assert_eq!(clipboard.content_length(), 0);
    }

    #[test]
    fn test_unicode_length_in_chars() {
        let clipboard = MemoryClipboard::with_text("Hello 世界 🚀");
        assert_eq!(clipboard.content_length(), 10);
    }
}
