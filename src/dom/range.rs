//! Document selection and text-offset mapping.
//!
//! Positions inside text nodes count chars; positions on elements count
//! child nodes, as DOM ranges do. Editing contenteditable regions works on
//! flat text offsets relative to an editing host, so this module converts
//! between the two.

use super::{Document, NodeId};

/// A boundary point: `(node, offset)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The document selection. `anchor` is where it started, `focus` where
/// it ends; either may come first in tree order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomRange {
    pub anchor: DomPosition,
    pub focus: DomPosition,
}

impl DomRange {
    pub fn collapsed(at: DomPosition) -> Self {
        Self { anchor: at, focus: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

impl Document {
    pub fn selection(&self) -> Option<DomRange> {
        let range = self.inner.tree.borrow().selection?;
        (self.is_alive(range.anchor.node) && self.is_alive(range.focus.node)).then_some(range)
    }

    pub fn set_selection(&self, range: Option<DomRange>) {
        self.inner.tree.borrow_mut().selection = range;
    }

    /// Text nodes below `host` in tree order.
    pub fn text_nodes(&self, host: NodeId) -> Vec<NodeId> {
        if self.is_text(host) {
            return vec![host];
        }
        self.descendants(host)
            .into_iter()
            .filter(|n| self.is_text(*n))
            .collect()
    }

    /// Flat char offset of a boundary point within `host`'s text content.
    ///
    /// Points outside `host` clamp to its start or end.
    pub fn text_offset(&self, host: NodeId, position: DomPosition) -> usize {
        if !self.contains(host, position.node) {
            return 0;
        }
        let mut offset = 0;
        if self.is_text(position.node) {
            for text in self.text_nodes(host) {
                if text == position.node {
                    let len = self.text(text).map(|t| t.chars().count()).unwrap_or(0);
                    return offset + position.offset.min(len);
                }
                offset += self.text(text).map(|t| t.chars().count()).unwrap_or(0);
            }
            return offset;
        }

        // Element boundary: count text in children before `offset`.
        let children = self.children(position.node);
        let before = children.get(position.offset).copied();
        for text in self.text_nodes(host) {
            if let Some(boundary) = before {
                if self.contains(boundary, text) || self.precedes(boundary, text) {
                    break;
                }
            } else if !self.contains(position.node, text) && self.precedes(position.node, text) {
                break;
            }
            offset += self.text(text).map(|t| t.chars().count()).unwrap_or(0);
        }
        offset
    }

    /// Boundary point at a flat char offset within `host`.
    ///
    /// Prefers the end of a text node over the start of the next one.
    pub fn position_at_offset(&self, host: NodeId, offset: usize) -> DomPosition {
        let texts = self.text_nodes(host);
        let mut consumed = 0;
        for text in &texts {
            let len = self.text(*text).map(|t| t.chars().count()).unwrap_or(0);
            if offset <= consumed + len {
                return DomPosition::new(*text, offset - consumed);
            }
            consumed += len;
        }
        match texts.last() {
            Some(last) => DomPosition::new(*last, self.text(*last).map(|t| t.chars().count()).unwrap_or(0)),
            None => DomPosition::new(host, 0),
        }
    }

    /// Tree order: does `a` start before `b`?
    pub(crate) fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let root = self.root();
        for node in self.descendants(root) {
            if node == a {
                return true;
            }
            if node == b {
                return false;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editable() -> (Document, NodeId, NodeId, NodeId) {
        // <div><b>ab</b>cd</div>
        let doc = Document::new();
        let host = doc.create_element_with("div", &[("contenteditable", "")]);
        doc.append_child(doc.body(), host);
        let bold = doc.create_element("b");
        doc.append_child(host, bold);
        let first = doc.create_text("ab");
        doc.append_child(bold, first);
        let second = doc.create_text("cd");
        doc.append_child(host, second);
        (doc, host, first, second)
    }

    #[test]
    fn test_text_offset_in_text_nodes() {
        let (doc, host, first, second) = editable();
        assert_eq!(doc.text_offset(host, DomPosition::new(first, 1)), 1);
        assert_eq!(doc.text_offset(host, DomPosition::new(second, 0)), 2);
        assert_eq!(doc.text_offset(host, DomPosition::new(second, 9)), 4);
    }

    #[test]
    fn test_text_offset_on_elements() {
        let (doc, host, _, _) = editable();
        assert_eq!(doc.text_offset(host, DomPosition::new(host, 0)), 0);
        assert_eq!(doc.text_offset(host, DomPosition::new(host, 1)), 2);
        assert_eq!(doc.text_offset(host, DomPosition::new(host, 2)), 4);
    }

    #[test]
    fn test_position_at_offset() {
        let (doc, host, first, second) = editable();
        assert_eq!(doc.position_at_offset(host, 0), DomPosition::new(first, 0));
        assert_eq!(doc.position_at_offset(host, 2), DomPosition::new(first, 2));
        assert_eq!(doc.position_at_offset(host, 3), DomPosition::new(second, 1));
        assert_eq!(doc.position_at_offset(host, 10), DomPosition::new(second, 2));

        let empty = doc.create_element("p");
        assert_eq!(doc.position_at_offset(empty, 3), DomPosition::new(empty, 0));
    }

    #[test]
    fn test_selection_drops_dead_nodes() {
        let (doc, _, first, _) = editable();
        doc.set_selection(Some(DomRange::collapsed(DomPosition::new(first, 1))));
        assert!(doc.selection().is_some());
        doc.destroy(first);
        assert!(doc.selection().is_none());
    }
}
