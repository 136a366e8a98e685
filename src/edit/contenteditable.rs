//! Editing inside contenteditable regions.
//!
//! The region's text is treated as one flat string across its text nodes.
//! Deleted ranges are cut out of every text node they overlap, inserted
//! text goes into the node holding the range start, and element nodes are
//! left in place even when they end up empty.

use tracing::trace;

use crate::dom::{Document, NodeId};
use crate::event::{dispatch, EventInit, EventType, InputType};
use crate::session::Session;
use crate::state::ui::{set_ui_selection, UiSelection};

use super::event_data;

/// Edit the text content of an editing host.
pub(super) fn edit_contenteditable(
    session: &mut Session,
    host: NodeId,
    selection: UiSelection,
    data: &str,
    input_type: InputType,
) {
    let doc = session.document().clone();
    let len = doc.text_content(host).chars().count();
    let (start, end) = deleted_range(selection, len, input_type);
    if start == end && data.is_empty() {
        return;
    }

    let caret = replace_text_range(&doc, host, start, end, data);
    set_ui_selection(&doc, host, caret, caret);
    trace!(host = %host, start, end, caret, "contenteditable edit");

    let init = EventInit::input(input_type, event_data(data, input_type));
    dispatch(session, host, EventType::Input, init);
}

/// Flat range an edit removes. Collapsed deletes take one char.
fn deleted_range(selection: UiSelection, len: usize, input_type: InputType) -> (usize, usize) {
    let start = selection.start().min(len);
    let end = selection.end().min(len);
    if start != end {
        return (start, end);
    }
    match input_type {
        InputType::DeleteContentBackward => (start.saturating_sub(1), start),
        InputType::DeleteContentForward => (start, (start + 1).min(len)),
        _ => (start, end),
    }
}

/// Replace the flat char range `start..end` of `host` with `data`.
///
/// Returns the caret offset right after the inserted text.
pub(crate) fn replace_text_range(doc: &Document, host: NodeId, start: usize, end: usize, data: &str) -> usize {
    let texts = doc.text_nodes(host);
    let mut inserted = data.is_empty();
    let mut consumed = 0;

    for node in &texts {
        let text: Vec<char> = doc.text(*node).unwrap_or_default().chars().collect();
        let node_start = consumed;
        let node_end = consumed + text.len();
        consumed = node_end;

        let holds_start = !inserted && (node_start..=node_end).contains(&start);
        let overlaps = start < node_end && end > node_start;
        if !holds_start && !overlaps {
            continue;
        }

        let cut_from = start.clamp(node_start, node_end) - node_start;
        let cut_to = end.clamp(node_start, node_end) - node_start;
        let mut updated: String = text[..cut_from].iter().collect();
        if holds_start {
            updated.push_str(data);
            inserted = true;
        }
        updated.extend(&text[cut_to..]);
        doc.set_text(*node, &updated);
    }

    if !inserted {
        let node = doc.create_text(data);
        doc.append_child(host, node);
    }
    doc.normalize(host);
    start + data.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(parts: &[&str]) -> (Document, NodeId) {
        let doc = Document::new();
        let host = doc.create_element_with("div", &[("contenteditable", "")]);
        doc.append_child(doc.body(), host);
        for part in parts {
            let span = doc.create_element("span");
            doc.append_child(host, span);
            let text = doc.create_text(part);
            doc.append_child(span, text);
        }
        (doc, host)
    }

    #[test]
    fn test_insert_into_start_node() {
        let (doc, host) = region(&["ab", "cd"]);
        let caret = replace_text_range(&doc, host, 2, 2, "X");
        assert_eq!(doc.text_content(host), "abXcd");
        assert_eq!(caret, 3);
        let first_span = doc.children(host)[0];
        assert_eq!(doc.text_content(first_span), "abX");
    }

    #[test]
    fn test_delete_across_nodes() {
        let (doc, host) = region(&["abc", "def"]);
        let caret = replace_text_range(&doc, host, 1, 5, "");
        assert_eq!(doc.text_content(host), "af");
        assert_eq!(caret, 1);
        // Elements stay even when emptied of text
        assert_eq!(doc.children(host).len(), 2);
    }

    #[test]
    fn test_insert_into_empty_region() {
        let (doc, host) = region(&[]);
        let caret = replace_text_range(&doc, host, 0, 0, "new");
        assert_eq!(doc.text_content(host), "new");
        assert_eq!(caret, 3);
    }

    #[test]
    fn test_collapsed_delete_range() {
        assert_eq!(deleted_range(UiSelection::caret(2), 4, InputType::DeleteContentBackward), (1, 2));
        assert_eq!(deleted_range(UiSelection::caret(4), 4, InputType::DeleteContentForward), (4, 4));
        assert_eq!(deleted_range(UiSelection::new(3, 1), 4, InputType::InsertText), (1, 3));
    }
}
