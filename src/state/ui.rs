//! UI-State Mirror - what the control shows before the host reacts
//!
//! A side table keyed by node handle records, per element, the value and
//! selection as the user would see them. Typing into `<input type=number>`
//! may show `1e-` while the element's real value is still the last valid
//! number; the mirror keeps both.
//!
//! Every write goes to the mirror first and then to the real property.
//! When host code assigns the real value directly, the next read notices
//! the divergence and resynchronizes from the element, dropping the tracked
//! selection the way a script assignment collapses it.
//!
//! # API
//!
//! - `prepare_document(doc)` - Install focus/blur tracking (idempotent)
//! - `get_ui_value(doc, el)` / `set_ui_value(doc, el, value)`
//! - `get_ui_selection(doc, el)` / `set_ui_selection(doc, el, anchor, focus)`
//! - `clear_initial_value(doc, el)` - Suppress the change-on-blur check
//!
//! # Example
//!
//! ```ignore
//! prepare_document(&doc);
//! set_ui_value(&doc, input, "1e-");
//! assert_eq!(get_ui_value(&doc, input), "1e-");
//! assert_eq!(doc.value(input), "1"); // last valid value
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::dom::{Document, DomPosition, DomRange, InputKind, NodeId};
use crate::event::{Event, EventType};

// =============================================================================
// TYPES
// =============================================================================

/// A selection as offsets into the UI value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UiSelection {
    pub anchor: usize,
    pub focus: usize,
}

impl UiSelection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(at: usize) -> Self {
        Self::new(at, at)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

#[derive(Debug, Default, Clone)]
struct UiRecord {
    /// Value shown in the UI, when it differs from what the element reports
    value: Option<String>,
    /// Real value right after our last write
    committed: Option<String>,
    selection: Option<UiSelection>,
    /// Native selection right after our last selection write
    native_selection: Option<(usize, usize)>,
    /// UI value when the element gained focus
    initial: Option<String>,
}

/// Side table holding one record per tracked element.
#[derive(Debug, Default)]
pub struct UiTable {
    records: HashMap<NodeId, UiRecord>,
    prepared: bool,
}

impl UiTable {
    /// Number of tracked elements.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// DOCUMENT PREPARATION
// =============================================================================

/// Install mirror bookkeeping on a document. Safe to call repeatedly.
///
/// Capture listeners on the document node record the value at focus time
/// and fire `change` on blur when the UI value moved away from it.
pub fn prepare_document(doc: &Document) {
    {
        let mut table = doc.ui();
        if table.prepared {
            return;
        }
        table.prepared = true;
    }

    let root = doc.root();
    doc.add_capture_listener(root, EventType::Focus, |doc, event| {
        let el = event.target;
        if !doc.is_value_control(el) {
            return;
        }
        let value = get_ui_value(doc, el);
        record_mut(doc, el, |r| r.initial = Some(value));
    });

    doc.add_capture_listener(root, EventType::Blur, |doc, event| {
        let el = event.target;
        if !doc.is_value_control(el) {
            return;
        }
        let current = get_ui_value(doc, el);
        let Some(initial) = take_initial(doc, el) else {
            return;
        };
        if current != initial {
            trace!(target = %el, "value changed while focused, firing change");
            let mut change = Event::new(EventType::Change, el);
            doc.dispatch_event(&mut change);
        }
    });
}

fn record_mut<R>(doc: &Document, el: NodeId, f: impl FnOnce(&mut UiRecord) -> R) -> R {
    let mut table = doc.ui();
    if table.records.len() > 64 {
        table.records.retain(|node, _| doc.is_alive(*node));
    }
    f(table.records.entry(el).or_default())
}

fn take_initial(doc: &Document, el: NodeId) -> Option<String> {
    doc.ui().records.get_mut(&el).and_then(|r| r.initial.take())
}

/// Drop the focus-time value so blur does not fire `change`.
pub fn clear_initial_value(doc: &Document, el: NodeId) {
    if let Some(record) = doc.ui().records.get_mut(&el) {
        record.initial = None;
    }
}

/// Detect a host-side value assignment and resynchronize.
fn resync(doc: &Document, el: NodeId) {
    let real = doc.value(el);
    let native = doc.selection_range(el);
    let mut table = doc.ui();
    let Some(record) = table.records.get_mut(&el) else {
        return;
    };
    if record.committed.as_ref().is_some_and(|c| *c != real) {
        trace!(target = %el, "real value changed outside the mirror");
        record.value = None;
        record.committed = None;
        record.selection = None;
        record.native_selection = None;
        if record.initial.is_some() {
            record.initial = Some(real);
        }
    } else if record.native_selection.is_some() && record.native_selection != native {
        record.selection = None;
        record.native_selection = None;
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// The value as displayed. Text content for contenteditable regions.
pub fn get_ui_value(doc: &Document, el: NodeId) -> String {
    if !doc.is_value_control(el) {
        return doc.text_content(el);
    }
    resync(doc, el);
    let stored = doc.ui().records.get(&el).and_then(|r| r.value.clone());
    stored.unwrap_or_else(|| doc.value(el))
}

/// Update the mirror, then the real value.
///
/// Number, date and time fields keep their last valid value while the
/// mirror holds an incomplete one. Other kinds commit the sanitized value.
pub fn set_ui_value(doc: &Document, el: NodeId, value: &str) {
    let rejects = doc.input_kind(el).is_some_and(InputKind::rejects_invalid);
    if !rejects || doc.accepts_value(el, value) {
        doc.set_value(el, value);
    }
    let committed = doc.value(el);
    let native = doc.selection_range(el);
    record_mut(doc, el, |r| {
        r.value = Some(value.to_string());
        r.committed = Some(committed);
        r.native_selection = native;
    });
}

/// Whether the mirror holds a value different from the real one.
pub fn has_pending_ui_value(doc: &Document, el: NodeId) -> bool {
    get_ui_value(doc, el) != doc.value(el)
}

// =============================================================================
// SELECTION
// =============================================================================

/// The selection as displayed.
///
/// Falls back to the native selection, then to a caret at the end. For
/// contenteditable regions the document selection is converted to offsets
/// in the editing host.
pub fn get_ui_selection(doc: &Document, el: NodeId) -> UiSelection {
    if !doc.is_value_control(el) {
        return document_selection_in(doc, el)
            .unwrap_or_else(|| UiSelection::caret(doc.text_content(el).chars().count()));
    }
    resync(doc, el);
    let len = get_ui_value(doc, el).chars().count();
    let tracked = doc.ui().records.get(&el).and_then(|r| r.selection);
    let selection = tracked
        .or_else(|| doc.selection_range(el).map(|(s, e)| UiSelection::new(s, e)))
        .unwrap_or(UiSelection::caret(len));
    UiSelection::new(selection.anchor.min(len), selection.focus.min(len))
}

/// Set the displayed selection and mirror it to the native selection.
pub fn set_ui_selection(doc: &Document, el: NodeId, anchor: usize, focus: usize) {
    if !doc.is_value_control(el) {
        let host = doc.editing_host(el).unwrap_or(el);
        let range = DomRange {
            anchor: doc.position_at_offset(host, anchor),
            focus: doc.position_at_offset(host, focus),
        };
        doc.set_selection(Some(range));
        return;
    }
    let len = get_ui_value(doc, el).chars().count();
    let selection = UiSelection::new(anchor.min(len), focus.min(len));
    doc.set_selection_range(el, selection.start(), selection.end());
    let native = doc.selection_range(el);
    record_mut(doc, el, |r| {
        r.selection = Some(selection);
        r.native_selection = native;
    });
}

/// The document selection as offsets within `el`, if it lies inside.
fn document_selection_in(doc: &Document, el: NodeId) -> Option<UiSelection> {
    let range = doc.selection()?;
    let inside = |p: DomPosition| doc.contains(el, p.node);
    if !inside(range.anchor) || !inside(range.focus) {
        return None;
    }
    Some(UiSelection::new(
        doc.text_offset(el, range.anchor),
        doc.text_offset(el, range.focus),
    ))
}

// =============================================================================
// TESTS
// =============================================================================
