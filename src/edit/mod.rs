//! Editing Primitives - Value and selection mutation
//!
//! `input` is the single entry point for every edit a user makes: typing,
//! deleting, pasting, cutting. It resolves the range being edited from the
//! UI selection, fires `beforeinput`, and hands off to the form-control or
//! contenteditable editor, each of which fires `input` once the change is
//! applied.
//!
//! # API
//!
//! - `input(session, element, data, input_type)` - Apply one edit
//! - `calculate_new_value(value, data, selection, input_type)` - Pure splice
//! - `is_valid_number_input(value)` - Whether a number field shows `value`
//! - `build_time_value(value)` - Digit grouping for time fields

mod contenteditable;
mod value;

use tracing::debug;

use crate::dom::{InputKind, NodeId};
use crate::event::{dispatch, EventInit, EventType, InputType};
use crate::session::Session;
use crate::state::ui::{get_ui_selection, UiSelection};

pub use value::{build_time_value, calculate_new_value, is_valid_number_input, EditResult};

/// Where an edit applies.
enum InputRange {
    /// Form control: offsets into its UI value
    Control(UiSelection),
    /// Contenteditable: offsets into the editing host's text content
    Editable { host: NodeId, selection: UiSelection },
}

/// Apply an edit of `input_type` with `data` at the current selection.
///
/// Non-editable elements are ignored. A prevented `beforeinput` cancels the
/// edit; date and time fields get no `beforeinput` at all.
pub fn input(session: &mut Session, element: NodeId, data: &str, input_type: InputType) {
    let Some(range) = input_range(session, element) else {
        debug!(target = %element, "input ignored on non-editable element");
        return;
    };
    let doc = session.document().clone();
    let event_target = match &range {
        InputRange::Control(_) => element,
        InputRange::Editable { host, .. } => *host,
    };

    let date_or_time = doc.input_kind(element).is_some_and(InputKind::is_date_or_time);
    if !date_or_time {
        let init = EventInit::input(input_type, event_data(data, input_type));
        if !dispatch(session, event_target, EventType::Beforeinput, init) {
            return;
        }
    }

    match range {
        InputRange::Control(selection) => {
            value::edit_input_element(session, element, selection, data, input_type)
        }
        InputRange::Editable { host, selection } => {
            contenteditable::edit_contenteditable(session, host, selection, data, input_type)
        }
    }
}

fn input_range(session: &Session, element: NodeId) -> Option<InputRange> {
    let doc = session.document();
    if doc.is_editable_input(element) {
        return Some(InputRange::Control(get_ui_selection(doc, element)));
    }
    let host = doc.editing_host(element)?;
    Some(InputRange::Editable {
        host,
        selection: get_ui_selection(doc, host),
    })
}

/// `InputEvent.data`: absent for deletions.
pub(crate) fn event_data(data: &str, input_type: InputType) -> Option<String> {
    if input_type.is_delete() && data.is_empty() {
        None
    } else {
        Some(data.to_string())
    }
}
