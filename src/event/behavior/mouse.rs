use crate::dom::{InputKind, NodeId};
use crate::event::{dispatch, Event, EventInit, EventType, FollowUp};
use crate::session::Session;
use crate::state::focus::focus_element;
use crate::state::selection::set_selection_per_mouse_down;
use crate::types::MouseButton;

const CLICK_CONTEXT: [&str; 5] = ["button", "input", "label", "select", "textarea"];

// =============================================================================
// CLICK
// =============================================================================

/// Activation behavior: labels forward to their control, checkboxes and
/// radios toggle, submit and reset buttons act on their form.
pub(super) fn click(event: &Event, session: &Session) -> Option<FollowUp> {
    let doc = session.document();
    let target = event.target;
    let context = doc.closest(target, |n| CLICK_CONTEXT.contains(&doc.tag_name(n).as_str()))?;

    if doc.is_tag(context, "label") {
        let control = doc.labeled_control(context)?;
        let init = forwarded_click(event);
        return Some(Box::new(move |session: &mut Session| {
            if session.document().is_focusable(control) {
                focus_element(session, control);
            }
            dispatch(session, control, EventType::Click, init);
        }));
    }

    if doc.is_disabled(context) {
        return None;
    }

    match doc.input_kind(context) {
        Some(InputKind::Checkbox) => {
            let checked = doc.checked(context);
            Some(Box::new(move |session: &mut Session| {
                session.document().set_checked(context, !checked);
                fire_input_and_change(session, context);
            }))
        }
        Some(InputKind::Radio) if !doc.checked(context) => {
            Some(Box::new(move |session: &mut Session| {
                session.document().set_checked(context, true);
                fire_input_and_change(session, context);
            }))
        }
        _ if doc.is_submit_button(context) => {
            let form = doc.form_owner(context)?;
            Some(Box::new(move |session: &mut Session| {
                dispatch(session, form, EventType::Submit, EventInit::default());
            }))
        }
        _ if doc.is_reset_button(context) => {
            let form = doc.form_owner(context)?;
            Some(Box::new(move |session: &mut Session| {
                dispatch(session, form, EventType::Reset, EventInit::default());
            }))
        }
        _ => None,
    }
}

fn fire_input_and_change(session: &mut Session, target: NodeId) {
    dispatch(session, target, EventType::Input, EventInit::default());
    dispatch(session, target, EventType::Change, EventInit::default());
}

/// Init for the click a label forwards to its control.
fn forwarded_click(event: &Event) -> EventInit {
    let mouse = event.mouse().cloned().unwrap_or_default();
    EventInit {
        button: Some(mouse.button),
        buttons: Some(mouse.buttons),
        coords: Some(mouse.coords),
        detail: Some(mouse.detail),
        modifiers: Some(mouse.modifiers),
        ..EventInit::default()
    }
}

/// A form restores its controls after an unprevented `reset`.
pub(super) fn reset(event: &Event, session: &Session) -> Option<FollowUp> {
    let form = event.target;
    if !session.document().is_tag(form, "form") {
        return None;
    }
    Some(Box::new(move |session: &mut Session| {
        session.document().reset_form(form);
    }))
}

// =============================================================================
// MOUSEDOWN
// =============================================================================

/// Pressing moves focus to the closest focusable ancestor; the primary
/// button also places the selection according to the click count.
pub(super) fn mousedown(event: &Event, session: &Session) -> Option<FollowUp> {
    let mouse = event.mouse()?;
    let target = event.target;
    let primary = mouse.button == MouseButton::Primary.index();
    let count = mouse.detail.max(1);
    let offset = session.pointer_state().mouse_position().offset;
    Some(Box::new(move |session: &mut Session| {
        focus_element(session, target);
        if primary {
            let anchor = set_selection_per_mouse_down(session.document(), target, count, offset);
            session.pointer_state_mut().set_selecting(anchor);
        }
    }))
}
