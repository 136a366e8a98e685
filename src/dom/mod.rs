//! Host document model.
//!
//! A small arena-backed DOM standing in for the host environment: element
//! and text nodes, attributes, inline style, form-control state, a document
//! selection, the active element and event listeners with capture / target /
//! bubble propagation.
//!
//! `Document` is a cheap handle (`Rc`) so listeners can receive it and
//! mutate the tree while an event is being dispatched. Borrows of the inner
//! state never outlive a single method call.
//!
//! # Example
//!
//! ```ignore
//! let doc = Document::new();
//! let input = doc.create_element_with("input", &[("maxlength", "2")]);
//! doc.append_child(doc.body(), input);
//! doc.add_event_listener(input, EventType::Input, |doc, _event| {
//!     println!("value: {}", doc.value(input));
//! });
//! ```

mod form;
mod range;

use std::cell::{Cell, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::event::{Event, EventPhase, EventType};
use crate::state::ui::UiTable;

pub use form::InputKind;
pub use range::{DomPosition, DomRange};

// =============================================================================
// NODE IDENTITY
// =============================================================================

/// Generational handle to a node.
///
/// A destroyed node's slot may be reused; the generation makes stale
/// handles compare unequal to the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub style: HashMap<String, String>,
    /// Dirty value; `None` while the value still follows its default
    pub value: Option<String>,
    /// Dirty checkedness
    pub checked: Option<bool>,
    pub selection: Option<(usize, usize)>,
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

// =============================================================================
// TREE
// =============================================================================

struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    body: NodeId,
    selection: Option<DomRange>,
    style_generation: u64,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
            body: NodeId { index: 0, generation: 0 },
            selection: None,
            style_generation: 0,
        };
        tree.root = tree.allocate(NodeData::Document);
        tree.body = tree.allocate(NodeData::Element(ElementData {
            tag: "body".to_string(),
            ..ElementData::default()
        }));
        let (root, body) = (tree.root, tree.body);
        tree.attach(root, body, None);
        tree
    }

    /// Reuse a freed slot or grow the arena.
    fn allocate(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            data,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId { index, generation: 0 }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.get(id).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        self.detach(child);
        let Some(p) = self.get_mut(parent) else { return };
        let at = before
            .and_then(|b| p.children.iter().position(|c| *c == b))
            .unwrap_or(p.children.len());
        p.children.insert(at, child);
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Free a node and its whole subtree.
    fn release(&mut self, id: NodeId) {
        let children = self.get(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.release(child);
        }
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.node.take().is_some() {
                self.free.push(id.index);
            }
        }
    }

    fn preorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.get(id) {
            for child in &node.children {
                out.push(*child);
                self.preorder(*child, out);
            }
        }
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

/// Event listener callback. Receives the document handle and the event.
pub type Listener = Rc<dyn Fn(&Document, &mut Event)>;

/// Handle returned by listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

struct ListenerEntry {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    capture: bool,
    callback: Listener,
}

// =============================================================================
// DOCUMENT
// =============================================================================

struct Inner {
    tree: RefCell<Tree>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener: Cell<usize>,
    active: Cell<Option<NodeId>>,
    ui: RefCell<UiTable>,
}

/// Shared handle to a document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<Inner>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.inner.tree.borrow().slots.len())
            .field("active", &self.inner.active.get())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Document {
    /// Create an empty document with a `<body>`.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                tree: RefCell::new(Tree::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                active: Cell::new(None),
                ui: RefCell::new(UiTable::default()),
            }),
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.inner.tree.borrow().root
    }

    pub fn body(&self) -> NodeId {
        self.inner.tree.borrow().body
    }

    pub(crate) fn ui(&self) -> RefMut<'_, UiTable> {
        self.inner.ui.borrow_mut()
    }

    // -------------------------------------------------------------------------
    // Node creation
    // -------------------------------------------------------------------------

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner
            .tree
            .borrow_mut()
            .allocate(NodeData::Element(ElementData {
                tag: tag.to_ascii_lowercase(),
                ..ElementData::default()
            }))
    }

    /// Create an element with attributes.
    pub fn create_element_with(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(id, name, value);
        }
        id
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.inner
            .tree
            .borrow_mut()
            .allocate(NodeData::Text(text.to_string()))
    }

    // -------------------------------------------------------------------------
    // Tree mutation
    // -------------------------------------------------------------------------

    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.inner.tree.borrow_mut().attach(parent, child, None);
    }

    /// Insert `child` before `reference`, or append when `reference` is `None`.
    pub fn insert_before(&self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.inner.tree.borrow_mut().attach(parent, child, reference);
    }

    /// Detach a node from its parent. The node stays alive.
    pub fn remove_child(&self, node: NodeId) {
        self.inner.tree.borrow_mut().detach(node);
        self.forget_if_active(node);
    }

    /// Detach and free a node and its subtree. Handles to it go stale.
    pub fn destroy(&self, node: NodeId) {
        self.forget_if_active(node);
        let mut tree = self.inner.tree.borrow_mut();
        tree.detach(node);
        tree.release(node);
    }

    fn forget_if_active(&self, node: NodeId) {
        if let Some(active) = self.inner.active.get() {
            if self.contains(node, active) {
                self.inner.active.set(None);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Tree queries
    // -------------------------------------------------------------------------

    /// Whether the handle still refers to a live node.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.inner.tree.borrow().get(node).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.tree.borrow().get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .tree
            .borrow()
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Index of `node` within its parent's children.
    pub fn child_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|c| *c == node)
    }

    /// Descendants in tree order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.inner.tree.borrow().preorder(node, &mut out);
        out
    }

    /// `node` followed by its ancestors up to the document node.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let tree = self.inner.tree.borrow();
        let mut out = Vec::new();
        let mut current = tree.get(node).map(|_| node);
        while let Some(id) = current {
            out.push(id);
            current = tree.get(id).and_then(|n| n.parent);
        }
        out
    }

    /// Inclusive containment check.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Nearest inclusive common ancestor.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let chain_b = self.ancestors(b);
        self.ancestors(a).into_iter().find(|n| chain_b.contains(n))
    }

    /// Whether the node hangs off the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.ancestors(node).last() == Some(&self.root())
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(
            self.inner.tree.borrow().get(node).map(|n| &n.data),
            Some(NodeData::Element(_))
        )
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(
            self.inner.tree.borrow().get(node).map(|n| &n.data),
            Some(NodeData::Text(_))
        )
    }

    /// Lowercase tag name; empty for non-elements.
    pub fn tag_name(&self, node: NodeId) -> String {
        self.with_element(node, |e| e.tag.clone()).unwrap_or_default()
    }

    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.with_element(node, |e| e.tag == tag).unwrap_or(false)
    }

    /// Closest inclusive ancestor matching `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        self.ancestors(node).into_iter().find(|n| pred(*n))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root();
        self.descendants(root)
            .into_iter()
            .find(|n| self.attribute(*n, "id").as_deref() == Some(id))
    }

    pub(crate) fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        match self.inner.tree.borrow().get(node).map(|n| &n.data) {
            Some(NodeData::Element(e)) => Some(f(e)),
            _ => None,
        }
    }

    pub(crate) fn with_element_mut<R>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        match self.inner.tree.borrow_mut().get_mut(node).map(|n| &mut n.data) {
            Some(NodeData::Element(e)) => Some(f(e)),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_element(node, |e| {
            e.attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        })
        .flatten()
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        self.with_element_mut(node, |e| {
            match e.attrs.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => e.attrs.push((name.clone(), value.to_string())),
            }
            if name == "style" {
                e.style = parse_style(value);
            }
        });
        if name == "style" {
            self.inner.tree.borrow_mut().style_generation += 1;
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.with_element_mut(node, |e| e.attrs.retain(|(n, _)| n != name));
    }

    // -------------------------------------------------------------------------
    // Style
    // -------------------------------------------------------------------------

    /// Set an inline style property.
    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.with_element_mut(node, |e| {
            e.style.insert(property.to_string(), value.trim().to_string());
        });
        self.inner.tree.borrow_mut().style_generation += 1;
    }

    /// Computed value of a property. Only inline declarations are known;
    /// inheritance is resolved by callers walking the ancestor chain.
    pub fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_element(node, |e| e.style.get(property).cloned())
            .flatten()
    }

    /// Bumped on every style change; lets callers cache style lookups.
    pub fn style_generation(&self) -> u64 {
        self.inner.tree.borrow().style_generation
    }

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------

    /// Data of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        match self.inner.tree.borrow().get(node).map(|n| &n.data) {
            Some(NodeData::Text(t)) => Some(t.clone()),
            _ => None,
        }
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        if let Some(n) = self.inner.tree.borrow_mut().get_mut(node) {
            if let NodeData::Text(t) = &mut n.data {
                *t = text.to_string();
            }
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text;
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&self, node: NodeId, text: &str) {
        for child in self.children(node) {
            self.destroy(child);
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(node, t);
        }
    }

    /// Merge adjacent text nodes and drop empty ones below `node`.
    pub fn normalize(&self, node: NodeId) {
        let mut previous_text: Option<NodeId> = None;
        for child in self.children(node) {
            match self.text(child) {
                Some(text) if text.is_empty() => self.destroy(child),
                Some(text) => match previous_text {
                    Some(prev) => {
                        let merged = self.text(prev).unwrap_or_default() + &text;
                        self.set_text(prev, &merged);
                        self.destroy(child);
                    }
                    None => previous_text = Some(child),
                },
                None => {
                    previous_text = None;
                    self.normalize(child);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// The focused element, or `<body>` when nothing is focused.
    pub fn active_element(&self) -> NodeId {
        self.focused().unwrap_or_else(|| self.body())
    }

    /// The focused element, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.inner.active.get().filter(|n| self.is_alive(*n))
    }

    pub(crate) fn set_focused(&self, node: Option<NodeId>) {
        self.inner.active.set(node);
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a bubble/target phase listener.
    pub fn add_event_listener<F>(&self, node: NodeId, event_type: EventType, listener: F) -> ListenerId
    where
        F: Fn(&Document, &mut Event) + 'static,
    {
        self.register(node, event_type, false, Rc::new(listener))
    }

    /// Register a capture phase listener.
    pub fn add_capture_listener<F>(&self, node: NodeId, event_type: EventType, listener: F) -> ListenerId
    where
        F: Fn(&Document, &mut Event) + 'static,
    {
        self.register(node, event_type, true, Rc::new(listener))
    }

    fn register(&self, node: NodeId, event_type: EventType, capture: bool, callback: Listener) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            node,
            event_type,
            capture,
            callback,
        });
        id
    }

    pub fn remove_event_listener(&self, id: ListenerId) {
        self.inner.listeners.borrow_mut().retain(|l| l.id != id);
    }

    fn listeners_for(&self, node: NodeId, event_type: EventType, capture: Option<bool>) -> Vec<Listener> {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.node == node && l.event_type == event_type)
            .filter(|l| capture.is_none_or(|c| l.capture == c))
            .map(|l| l.callback.clone())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Propagate an event through capture, target and bubble phases.
    ///
    /// This is the host's own dispatch; it runs listeners only. Default
    /// actions belong to the caller. Returns `false` if a listener called
    /// `prevent_default`.
    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        let path = self.ancestors(event.target);
        let Some((&target, parents)) = path.split_first() else {
            return !event.default_prevented();
        };

        event.phase = EventPhase::Capturing;
        for &node in parents.iter().rev() {
            if event.propagation_stopped() {
                break;
            }
            self.invoke(node, event, Some(true));
        }

        if !event.propagation_stopped() {
            event.phase = EventPhase::AtTarget;
            self.invoke(target, event, None);
        }

        if event.bubbles {
            event.phase = EventPhase::Bubbling;
            for &node in parents {
                if event.propagation_stopped() {
                    break;
                }
                self.invoke(node, event, Some(false));
            }
        }

        event.phase = EventPhase::None;
        event.current_target = None;
        !event.default_prevented()
    }

    fn invoke(&self, node: NodeId, event: &mut Event, capture: Option<bool>) {
        let callbacks = self.listeners_for(node, event.event_type, capture);
        event.current_target = Some(node);
        for callback in callbacks {
            callback(self, event);
            if event.immediate_propagation_stopped() {
                break;
            }
        }
    }
}

/// Parse a `style` attribute into property/value pairs.
fn parse_style(text: &str) -> HashMap<String, String> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
        })
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(doc: &Document, node: NodeId, ty: EventType, log: &Rc<RefCell<Vec<String>>>, label: &str) {
        let log = log.clone();
        let label = label.to_string();
        doc.add_event_listener(node, ty, move |_, _| log.borrow_mut().push(label.clone()));
    }

    #[test]
    fn test_tree_building() {
        let doc = Document::new();
        let div = doc.create_element("DIV");
        let span = doc.create_element("span");
        doc.append_child(doc.body(), div);
        doc.append_child(div, span);

        assert_eq!(doc.tag_name(div), "div");
        assert_eq!(doc.parent(span), Some(div));
        assert_eq!(doc.ancestors(span), vec![span, div, doc.body(), doc.root()]);
        assert!(doc.contains(div, span));
        assert!(!doc.contains(span, div));
        assert!(doc.is_connected(span));
    }

    #[test]
    fn test_destroy_invalidates_handles() {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div);
        doc.destroy(div);
        assert!(!doc.is_alive(div));

        // The slot is reused with a new generation
        let other = doc.create_element("p");
        assert_ne!(other, div);
        assert!(doc.is_alive(other));
        assert!(!doc.is_alive(div));
    }

    #[test]
    fn test_common_ancestor() {
        let doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let c = doc.create_element("div");
        doc.append_child(doc.body(), a);
        doc.append_child(a, b);
        doc.append_child(a, c);
        assert_eq!(doc.common_ancestor(b, c), Some(a));
        assert_eq!(doc.common_ancestor(b, a), Some(a));
        assert_eq!(doc.common_ancestor(b, b), Some(b));
    }

    #[test]
    fn test_text_content_and_normalize() {
        let doc = Document::new();
        let p = doc.create_element("p");
        doc.append_child(doc.body(), p);
        for text in ["ab", "", "cd"] {
            let t = doc.create_text(text);
            doc.append_child(p, t);
        }
        assert_eq!(doc.text_content(p), "abcd");
        doc.normalize(p);
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "abcd");
    }

    #[test]
    fn test_style_attribute() {
        let doc = Document::new();
        let div = doc.create_element_with("div", &[("style", "pointer-events: none; color: red")]);
        assert_eq!(doc.computed_style(div, "pointer-events").as_deref(), Some("none"));
        assert_eq!(doc.computed_style(div, "color").as_deref(), Some("red"));
        let generation = doc.style_generation();
        doc.set_style(div, "pointer-events", "auto");
        assert!(doc.style_generation() > generation);
    }

    #[test]
    fn test_propagation_order() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("button");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);

        let log = Rc::new(RefCell::new(Vec::new()));
        let capture_log = log.clone();
        doc.add_capture_listener(outer, EventType::Click, move |_, _| {
            capture_log.borrow_mut().push("outer-capture".to_string())
        });
        record(&doc, inner, EventType::Click, &log, "inner");
        record(&doc, outer, EventType::Click, &log, "outer");
        record(&doc, doc.root(), EventType::Click, &log, "document");

        let mut event = Event::new(EventType::Click, inner);
        assert!(doc.dispatch_event(&mut event));
        assert_eq!(*log.borrow(), vec!["outer-capture", "inner", "outer", "document"]);
    }

    #[test]
    fn test_non_bubbling_and_stop_propagation() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);

        let log = Rc::new(RefCell::new(Vec::new()));
        record(&doc, outer, EventType::Mouseenter, &log, "outer-enter");
        let mut enter = Event::new(EventType::Mouseenter, inner);
        doc.dispatch_event(&mut enter);
        assert!(log.borrow().is_empty());

        doc.add_event_listener(inner, EventType::Click, |_, e| e.stop_propagation());
        record(&doc, outer, EventType::Click, &log, "outer-click");
        let mut click = Event::new(EventType::Click, inner);
        doc.dispatch_event(&mut click);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_prevent_default_and_listener_removal() {
        let doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button);
        let id = doc.add_event_listener(button, EventType::Click, |_, e| e.prevent_default());

        let mut click = Event::new(EventType::Click, button);
        assert!(!doc.dispatch_event(&mut click));

        doc.remove_event_listener(id);
        let mut click = Event::new(EventType::Click, button);
        assert!(doc.dispatch_event(&mut click));

        // Non-cancelable events ignore prevent_default
        doc.add_event_listener(button, EventType::Input, |_, e| e.prevent_default());
        let mut input = Event::new(EventType::Input, button);
        assert!(doc.dispatch_event(&mut input));
    }

    #[test]
    fn test_listener_can_mutate_document() {
        let doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button);
        doc.add_event_listener(button, EventType::Click, |doc, e| {
            doc.set_attribute(e.target, "data-clicked", "yes");
        });
        let mut click = Event::new(EventType::Click, button);
        doc.dispatch_event(&mut click);
        assert_eq!(doc.attribute(button, "data-clicked").as_deref(), Some("yes"));
    }
}
