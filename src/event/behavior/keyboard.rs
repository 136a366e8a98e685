use crate::dom::{InputKind, NodeId};
use crate::edit::input;
use crate::event::{dispatch, Event, EventInit, EventType, FollowUp, InputType};
use crate::session::Session;
use crate::state::focus::{focus_element, next_focusable};
use crate::state::selection::{move_selection, set_caret};
use crate::state::ui::get_ui_value;

/// Input types activated by Enter.
const CLICK_ON_ENTER: [InputKind; 6] = [
    InputKind::Button,
    InputKind::Color,
    InputKind::File,
    InputKind::Image,
    InputKind::Reset,
    InputKind::Submit,
];

/// Input types submitting a form with a single field on Enter.
const SUBMIT_SINGLE_ON_ENTER: [InputKind; 6] = [
    InputKind::Email,
    InputKind::Password,
    InputKind::Search,
    InputKind::Tel,
    InputKind::Text,
    InputKind::Url,
];

// =============================================================================
// KEYDOWN
// =============================================================================

/// Navigation and deletion keys.
pub(super) fn keydown(event: &Event, session: &Session) -> Option<FollowUp> {
    let doc = session.document();
    let target = event.target;
    let key = event.key()?.to_string();

    match key.as_str() {
        "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" => {
            let backwards = matches!(key.as_str(), "ArrowLeft" | "ArrowUp");
            if doc.is_input_of(target, InputKind::Radio) {
                return Some(Box::new(move |session: &mut Session| {
                    walk_radio(session, target, backwards);
                }));
            }
            if matches!(key.as_str(), "ArrowUp" | "ArrowDown") {
                return None;
            }
            let direction = if backwards { -1 } else { 1 };
            Some(Box::new(move |session: &mut Session| {
                move_selection(session.document(), target, direction);
            }))
        }
        "Backspace" | "Delete" if doc.is_editable(target) => {
            let input_type = if key == "Backspace" {
                InputType::DeleteContentBackward
            } else {
                InputType::DeleteContentForward
            };
            Some(Box::new(move |session: &mut Session| {
                input(session, target, "", input_type);
            }))
        }
        "Home" | "End" if doc.is_value_control(target) || doc.is_content_editable(target) => {
            let to_end = key == "End";
            Some(Box::new(move |session: &mut Session| {
                caret_to_edge(session, target, to_end);
            }))
        }
        "PageUp" | "PageDown" if doc.is_value_control(target) => {
            let to_end = key == "PageDown";
            Some(Box::new(move |session: &mut Session| {
                caret_to_edge(session, target, to_end);
            }))
        }
        "Tab" => {
            let forward = !event.modifiers().shift();
            Some(Box::new(move |session: &mut Session| {
                let doc = session.document().clone();
                let destination = next_focusable(&doc, doc.focused(), forward).unwrap_or_else(|| doc.body());
                focus_element(session, destination);
            }))
        }
        _ => None,
    }
}

fn caret_to_edge(session: &mut Session, target: NodeId, to_end: bool) {
    let doc = session.document();
    let at = if to_end {
        get_ui_value(doc, target).chars().count()
    } else {
        0
    };
    set_caret(doc, target, at);
}

/// Arrow keys on a radio check the next enabled radio of its group.
fn walk_radio(session: &mut Session, radio: NodeId, backwards: bool) {
    let doc = session.document().clone();
    let group = doc.radio_group(radio);
    let Some(start) = group.iter().position(|r| *r == radio) else {
        return;
    };
    let len = group.len();
    for step in 1..len {
        let index = if backwards {
            (start + len - step) % len
        } else {
            (start + step) % len
        };
        let candidate = group[index];
        if doc.is_disabled(candidate) {
            continue;
        }
        focus_element(session, candidate);
        dispatch(session, candidate, EventType::Click, EventInit::default());
        return;
    }
}

// =============================================================================
// KEYPRESS
// =============================================================================

/// Text insertion, and Enter's activation and implicit submission.
pub(super) fn keypress(event: &Event, session: &Session) -> Option<FollowUp> {
    let doc = session.document();
    let target = event.target;
    let key = event.key()?.to_string();

    if key == "Enter" {
        let activates = doc.is_tag(target, "button")
            || doc.input_kind(target).is_some_and(|k| CLICK_ON_ENTER.contains(&k))
            || (doc.is_tag(target, "a") && doc.has_attribute(target, "href"));
        if activates {
            return Some(Box::new(move |session: &mut Session| {
                dispatch(session, target, EventType::Click, EventInit::default());
            }));
        }
        if let Some(kind) = doc.input_kind(target) {
            let form = doc.form_owner(target)?;
            let controls = doc.form_controls(form);
            if let Some(submit) = controls.iter().copied().find(|c| doc.is_submit_button(*c)) {
                return Some(Box::new(move |session: &mut Session| {
                    dispatch(session, submit, EventType::Click, EventInit::default());
                }));
            }
            let inputs = controls.iter().filter(|c| doc.is_tag(**c, "input")).count();
            if SUBMIT_SINGLE_ON_ENTER.contains(&kind) && inputs == 1 {
                return Some(Box::new(move |session: &mut Session| {
                    dispatch(session, form, EventType::Submit, EventInit::default());
                }));
            }
            return None;
        }
    }

    if !doc.is_editable(target) {
        return None;
    }
    let (data, input_type) = if key == "Enter" {
        let paragraph = doc.is_content_editable(target) && !event.modifiers().shift();
        let input_type = if paragraph {
            InputType::InsertParagraph
        } else {
            InputType::InsertLineBreak
        };
        ("\n".to_string(), input_type)
    } else {
        (key, InputType::InsertText)
    };
    Some(Box::new(move |session: &mut Session| {
        input(session, target, &data, input_type);
    }))
}

// =============================================================================
// KEYUP
// =============================================================================

/// Space releases activate buttons, checkboxes and radios.
pub(super) fn keyup(event: &Event, session: &Session) -> Option<FollowUp> {
    let doc = session.document();
    let target = event.target;
    if event.key()? != " " {
        return None;
    }
    let clickable = doc.is_tag(target, "button") || doc.input_kind(target).is_some_and(InputKind::is_clickable);
    if !clickable {
        return None;
    }
    Some(Box::new(move |session: &mut Session| {
        dispatch(session, target, EventType::Click, EventInit::default());
    }))
}

#[cfg(test)]
mod tests {
    use crate::dom::{Document, NodeId};
    use crate::event::EventType;
    use crate::session::{Options, Session};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> (Document, Session) {
        let doc = Document::new();
        let session = Session::setup(&doc, Options::default());
        (doc, session)
    }

    fn count(doc: &Document, node: NodeId, ty: EventType) -> Rc<Cell<u32>> {
        let counter = Rc::new(Cell::new(0));
        let sink = counter.clone();
        doc.add_event_listener(node, ty, move |_, _| sink.set(sink.get() + 1));
        counter
    }

    #[test]
    fn test_tab_cycles_focus() {
        let (doc, mut session) = setup();
        let a = doc.create_element("input");
        let b = doc.create_element("button");
        let c = doc.create_element_with("div", &[("tabindex", "1")]);
        for node in [a, b, c] {
            doc.append_child(doc.body(), node);
        }
        session.keyboard_sync("{Tab}").unwrap();
        assert_eq!(doc.active_element(), c);
        session.keyboard_sync("{Tab}").unwrap();
        assert_eq!(doc.active_element(), a);
        session.keyboard_sync("{Shift>}{Tab}{/Shift}").unwrap();
        assert_eq!(doc.active_element(), c);
    }

    #[test]
    fn test_enter_submits_single_input_form() {
        let (doc, mut session) = setup();
        let form = doc.create_element("form");
        doc.append_child(doc.body(), form);
        let input = doc.create_element("input");
        doc.append_child(form, input);
        let submits = count(&doc, form, EventType::Submit);

        session.focus(input);
        session.keyboard_sync("{Enter}").unwrap();
        assert_eq!(submits.get(), 1);
        assert_eq!(doc.value(input), "");
    }

    #[test]
    fn test_enter_clicks_submit_button() {
        let (doc, mut session) = setup();
        let form = doc.create_element("form");
        doc.append_child(doc.body(), form);
        let first = doc.create_element("input");
        let second = doc.create_element("input");
        let button = doc.create_element("button");
        for node in [first, second, button] {
            doc.append_child(form, node);
        }
        let clicks = count(&doc, button, EventType::Click);
        let submits = count(&doc, form, EventType::Submit);

        session.focus(first);
        session.keyboard_sync("{Enter}").unwrap();
        assert_eq!(clicks.get(), 1);
        assert_eq!(submits.get(), 1);
    }

    #[test]
    fn test_space_activates_checkbox() {
        let (doc, mut session) = setup();
        let checkbox = doc.create_element_with("input", &[("type", "checkbox")]);
        doc.append_child(doc.body(), checkbox);
        session.focus(checkbox);
        session.keyboard_sync(" ").unwrap();
        assert!(doc.checked(checkbox));
    }

    #[test]
    fn test_prevented_keydown_skips_keyup_activation() {
        let (doc, mut session) = setup();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button);
        doc.add_event_listener(button, EventType::Keydown, |_, e| e.prevent_default());
        let clicks = count(&doc, button, EventType::Click);
        session.focus(button);
        session.keyboard_sync(" ").unwrap();
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_arrows_walk_radio_group() {
        let (doc, mut session) = setup();
        let a = doc.create_element_with("input", &[("type", "radio"), ("name", "g"), ("checked", "")]);
        let b = doc.create_element_with("input", &[("type", "radio"), ("name", "g"), ("disabled", "")]);
        let c = doc.create_element_with("input", &[("type", "radio"), ("name", "g")]);
        for node in [a, b, c] {
            doc.append_child(doc.body(), node);
        }
        session.focus(a);
        session.keyboard_sync("{ArrowDown}").unwrap();
        assert!(doc.checked(c));
        assert_eq!(doc.active_element(), c);
        session.keyboard_sync("{ArrowUp}").unwrap();
        assert!(doc.checked(a));
    }

    #[test]
    fn test_arrow_and_home_move_caret() {
        let (doc, mut session) = setup();
        let input = doc.create_element_with("input", &[("value", "abcd")]);
        doc.append_child(doc.body(), input);
        session.focus(input);
        session.keyboard_sync("{Home}{ArrowRight}X").unwrap();
        assert_eq!(doc.value(input), "aXbcd");
        session.keyboard_sync("{End}{Backspace}").unwrap();
        assert_eq!(doc.value(input), "aXbc");
        session.keyboard_sync("{Home}{Delete}").unwrap();
        assert_eq!(doc.value(input), "Xbc");
    }
}
