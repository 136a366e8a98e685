use crate::edit::input;
use crate::event::{Event, FollowUp, InputType};
use crate::session::Session;

/// Cutting from an editable element removes the selection.
pub(super) fn cut(event: &Event, session: &Session) -> Option<FollowUp> {
    let target = event.target;
    if !session.document().is_editable(target) {
        return None;
    }
    Some(Box::new(move |session: &mut Session| {
        input(session, target, "", InputType::DeleteByCut);
    }))
}

/// Pasting into an editable element inserts the clipboard text.
pub(super) fn paste(event: &Event, session: &Session) -> Option<FollowUp> {
    let target = event.target;
    if !session.document().is_editable(target) {
        return None;
    }
    let data = event.clipboard()?.data.clone().filter(|d| !d.is_empty())?;
    Some(Box::new(move |session: &mut Session| {
        input(session, target, &data, InputType::InsertFromPaste);
    }))
}
