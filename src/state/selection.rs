//! Selection helpers shared by keyboard, pointer and clipboard handling.
//!
//! All offsets are char offsets into the UI value of a form control or the
//! text content of an editing region. Form controls keep their selection in
//! the UI mirror; everything else uses the document selection.

use crate::dom::{Document, DomRange, NodeId};
use crate::state::ui::{get_ui_selection, get_ui_value, set_ui_selection, UiSelection};

/// Where a mouse selection started, for extending it while dragging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionAnchor {
    /// Form control or editing region the selection lives in
    pub element: NodeId,
    pub anchor: usize,
}

// =============================================================================
// WORD AND LINE BOUNDARIES
// =============================================================================

#[derive(PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Other,
}

fn class_of(c: char) -> CharClass {
    if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}

/// Range a double click at `pos` selects: the run of word characters or
/// whitespace around it, or a single other character.
pub fn word_range(text: &str, pos: usize) -> (usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    let pos = pos.min(chars.len());

    // Run ending at pos
    let mut start = pos;
    if start > 0 {
        let class = class_of(chars[start - 1]);
        if class == CharClass::Other {
            start -= 1;
        } else {
            while start > 0 && class_of(chars[start - 1]) == class {
                start -= 1;
            }
        }
    }

    // Run starting at pos
    let mut end = pos;
    if end < chars.len() {
        let class = class_of(chars[end]);
        if class == CharClass::Other {
            end += 1;
        } else {
            while end < chars.len() && class_of(chars[end]) == class {
                end += 1;
            }
        }
    }
    (start, end)
}

/// Range a triple click at `pos` selects: the line around it.
pub fn line_range(text: &str, pos: usize) -> (usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    let pos = pos.min(chars.len());
    let is_break = |c: &char| *c == '\n' || *c == '\r';
    let start = chars[..pos].iter().rposition(is_break).map_or(0, |i| i + 1);
    let end = chars[pos..].iter().position(is_break).map_or(chars.len(), |i| pos + i);
    (start, end)
}

/// Selection produced by the `count`-th click at `offset`.
///
/// Counts cycle: 1 places a caret, 2 selects a word, 3 selects a line.
pub fn click_selection(text: &str, offset: Option<usize>, count: u32) -> (usize, usize) {
    let len = text.chars().count();
    let pos = offset.unwrap_or(len).min(len);
    if count % 3 == 1 || len == 0 {
        return (pos, pos);
    }
    if count % 3 == 2 {
        word_range(text, pos)
    } else {
        line_range(text, pos)
    }
}

// =============================================================================
// SELECTION OPERATIONS
// =============================================================================

/// Element whose selection `target` edits: itself for form controls,
/// the editing host or the element for everything else.
fn selection_owner(doc: &Document, target: NodeId) -> NodeId {
    if doc.is_value_control(target) {
        return target;
    }
    doc.editing_host(target).unwrap_or(target)
}

/// Collapse the selection of `target` to `offset`.
pub fn set_caret(doc: &Document, target: NodeId, offset: usize) {
    let owner = selection_owner(doc, target);
    set_ui_selection(doc, owner, offset, offset);
}

/// Arrow-key caret movement. A non-collapsed selection collapses to the
/// side the arrow points to.
pub fn move_selection(doc: &Document, target: NodeId, direction: isize) {
    let owner = selection_owner(doc, target);
    let selection = get_ui_selection(doc, owner);
    let at = if !selection.is_collapsed() {
        if direction < 0 { selection.start() } else { selection.end() }
    } else {
        let len = get_ui_value(doc, owner).chars().count();
        selection
            .focus
            .saturating_add_signed(direction)
            .min(len)
    };
    set_ui_selection(doc, owner, at, at);
}

pub fn select_all(doc: &Document, target: NodeId) {
    let owner = selection_owner(doc, target);
    let len = get_ui_value(doc, owner).chars().count();
    set_ui_selection(doc, owner, 0, len);
}

pub fn is_all_selected(doc: &Document, target: NodeId) -> bool {
    let owner = selection_owner(doc, target);
    let len = get_ui_value(doc, owner).chars().count();
    let selection = get_ui_selection(doc, owner);
    selection.start() == 0 && selection.end() == len
}

/// Text currently selected in or around `target`, if any.
///
/// Form controls report their UI selection; anything else reports the
/// document selection.
pub fn selected_text(doc: &Document, target: NodeId) -> Option<String> {
    let text = if doc.is_value_control(target) {
        let selection = get_ui_selection(doc, target);
        slice(&get_ui_value(doc, target), selection)
    } else {
        let range = doc.selection()?;
        let scope = doc.common_ancestor(range.anchor.node, range.focus.node)?;
        let selection = UiSelection::new(
            doc.text_offset(scope, range.anchor),
            doc.text_offset(scope, range.focus),
        );
        slice(&doc.text_content(scope), selection)
    };
    (!text.is_empty()).then_some(text)
}

fn slice(text: &str, selection: UiSelection) -> String {
    text.chars()
        .skip(selection.start())
        .take(selection.end() - selection.start())
        .collect()
}

// =============================================================================
// MOUSE SELECTION
// =============================================================================

/// Place the selection for a primary-button press on `target`.
pub fn set_selection_per_mouse_down(
    doc: &Document,
    target: NodeId,
    count: u32,
    offset: Option<usize>,
) -> Option<SelectionAnchor> {
    let owner = selection_owner(doc, target);
    if !doc.is_value_control(owner) && doc.text_nodes(owner).is_empty() {
        doc.set_selection(Some(DomRange::collapsed(doc.position_at_offset(owner, 0))));
        return None;
    }
    let text = get_ui_value(doc, owner);
    let (start, end) = click_selection(&text, offset, count);
    set_ui_selection(doc, owner, start, end);
    Some(SelectionAnchor {
        element: owner,
        anchor: start,
    })
}

/// Extend a mouse selection to `offset` while the button is held.
pub fn modify_selection_per_mouse(doc: &Document, anchor: SelectionAnchor, target: NodeId, offset: Option<usize>) {
    if selection_owner(doc, target) != anchor.element {
        return;
    }
    let len = get_ui_value(doc, anchor.element).chars().count();
    let focus = offset.unwrap_or(len).min(len);
    set_ui_selection(doc, anchor.element, anchor.anchor, focus);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomPosition;

    fn input_with(value: &str) -> (Document, NodeId) {
        let doc = Document::new();
        let input = doc.create_element_with("input", &[("value", value)]);
        doc.append_child(doc.body(), input);
        (doc, input)
    }

    #[test]
    fn test_word_range() {
        assert_eq!(word_range("hello world", 2), (0, 5));
        assert_eq!(word_range("hello world", 5), (0, 6));
        assert_eq!(word_range("hello world", 11), (6, 11));
        assert_eq!(word_range("a, b", 1), (0, 2));
        assert_eq!(word_range("", 0), (0, 0));
    }

    #[test]
    fn test_line_range() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_range(text, 5), (4, 7));
        assert_eq!(line_range(text, 0), (0, 3));
        assert_eq!(line_range(text, 13), (8, 13));
    }

    #[test]
    fn test_click_selection_cycles() {
        assert_eq!(click_selection("ab cd", Some(1), 1), (1, 1));
        assert_eq!(click_selection("ab cd", None, 1), (5, 5));
        assert_eq!(click_selection("ab cd", Some(1), 2), (0, 2));
        assert_eq!(click_selection("ab cd", Some(1), 3), (0, 5));
        assert_eq!(click_selection("ab cd", Some(1), 4), (1, 1));
    }

    #[test]
    fn test_move_selection() {
        let (doc, input) = input_with("abc");
        set_caret(&doc, input, 1);
        move_selection(&doc, input, 1);
        assert_eq!(get_ui_selection(&doc, input), UiSelection::caret(2));
        move_selection(&doc, input, 5);
        assert_eq!(get_ui_selection(&doc, input), UiSelection::caret(3));

        set_ui_selection(&doc, input, 1, 3);
        move_selection(&doc, input, -1);
        assert_eq!(get_ui_selection(&doc, input), UiSelection::caret(1));
    }

    #[test]
    fn test_select_all_and_selected_text() {
        let (doc, input) = input_with("copy me");
        assert_eq!(selected_text(&doc, input), None);
        select_all(&doc, input);
        assert!(is_all_selected(&doc, input));
        assert_eq!(selected_text(&doc, input).as_deref(), Some("copy me"));
    }

    #[test]
    fn test_document_selected_text() {
        let doc = Document::new();
        let p = doc.create_element("p");
        doc.append_child(doc.body(), p);
        let first = doc.create_text("Hello ");
        let second = doc.create_text("world");
        doc.append_child(p, first);
        doc.append_child(p, second);
        doc.set_selection(Some(DomRange {
            anchor: DomPosition::new(first, 3),
            focus: DomPosition::new(second, 2),
        }));
        assert_eq!(selected_text(&doc, doc.body()).as_deref(), Some("lo wo"));
    }

    #[test]
    fn test_mouse_selection_drag() {
        let (doc, input) = input_with("drag here");
        let anchor = set_selection_per_mouse_down(&doc, input, 1, Some(2));
        assert_eq!(anchor, Some(SelectionAnchor { element: input, anchor: 2 }));
        if let Some(anchor) = anchor {
            modify_selection_per_mouse(&doc, anchor, input, Some(6));
        }
        assert_eq!(get_ui_selection(&doc, input), UiSelection::new(2, 6));
    }
}
