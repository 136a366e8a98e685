//! Focus System - Moving focus the way a user does
//!
//! Focus changes dispatch `blur`/`focusout` on the element losing focus and
//! `focus`/`focusin` on the one gaining it, through the session pipeline.
//! Sequential navigation (Tab / Shift+Tab) walks focusable elements ordered
//! by tab index, wrapping around at either end.
//!
//! # Example
//!
//! ```ignore
//! use spark_user_event::state::focus;
//!
//! focus::focus_element(&mut session, input);
//! let next = focus::next_focusable(session.document(), Some(input), true);
//! ```

use tracing::debug;

use crate::dom::{Document, DomRange, NodeId};
use crate::event::{dispatch, EventInit, EventType};
use crate::session::Session;

// =============================================================================
// FOCUS CHANGES
// =============================================================================

/// Focus the closest focusable inclusive ancestor of `element`.
///
/// Without one, the current focus is dropped and `<body>` becomes active.
pub fn focus_element(session: &mut Session, element: NodeId) {
    let doc = session.document().clone();
    let target = doc.closest(element, |n| doc.is_focusable(n));
    let previous = doc.focused();
    if target == previous {
        return;
    }
    debug!(from = ?previous, to = ?target, "focus change");

    if let Some(old) = previous {
        dispatch(session, old, EventType::Blur, EventInit::related(target));
        dispatch(session, old, EventType::Focusout, EventInit::related(target));
    }
    doc.set_focused(target);
    if let Some(new) = target {
        dispatch(session, new, EventType::Focus, EventInit::related(previous));
        dispatch(session, new, EventType::Focusin, EventInit::related(previous));
        update_selection_on_focus(&doc, new);
    }
}

/// Remove focus from `element` if it has it.
pub fn blur_element(session: &mut Session, element: NodeId) {
    let doc = session.document().clone();
    if doc.focused() != Some(element) {
        return;
    }
    dispatch(session, element, EventType::Blur, EventInit::default());
    dispatch(session, element, EventType::Focusout, EventInit::default());
    doc.set_focused(None);
}

/// An editing host gaining focus gets a caret at its start unless the
/// selection already lies inside it.
fn update_selection_on_focus(doc: &Document, element: NodeId) {
    if doc.is_value_control(element) || doc.editing_host(element) != Some(element) {
        return;
    }
    let inside = doc
        .selection()
        .is_some_and(|r| doc.contains(element, r.anchor.node) && doc.contains(element, r.focus.node));
    if !inside {
        doc.set_selection(Some(DomRange::collapsed(doc.position_at_offset(element, 0))));
    }
}

// =============================================================================
// SEQUENTIAL NAVIGATION
// =============================================================================

/// Focusable elements in sequential navigation order.
///
/// Positive tab indices come first in ascending order, then tab index 0 in
/// tree order. Negative tab indices are skipped.
pub fn focusable_elements(doc: &Document) -> Vec<NodeId> {
    let mut result: Vec<(i32, NodeId)> = doc
        .descendants(doc.root())
        .into_iter()
        .filter(|n| doc.is_focusable(*n))
        .map(|n| (doc.tab_index(n), n))
        .filter(|(tab, _)| *tab >= 0)
        .collect();

    // Stable: equal tab indices keep tree order
    result.sort_by_key(|(tab, _)| if *tab == 0 { i32::MAX } else { *tab });
    result.into_iter().map(|(_, n)| n).collect()
}

/// The element Tab (or Shift+Tab) moves to from `from`, wrapping around.
pub fn next_focusable(doc: &Document, from: Option<NodeId>, forward: bool) -> Option<NodeId> {
    let focusables = focusable_elements(doc);
    if focusables.is_empty() {
        return None;
    }
    let current = from.and_then(|f| focusables.iter().position(|n| *n == f));
    let len = focusables.len();
    let next = match current {
        None if forward => 0,
        None => len - 1,
        Some(pos) if forward => (pos + 1) % len,
        Some(pos) => (pos + len - 1) % len,
    };
    Some(focusables[next])
}

// =============================================================================
// TESTS
// =============================================================================
