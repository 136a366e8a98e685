//! Pointer State Machine - hover, press, release and click sequences
//!
//! Each pointer input either presses/releases buttons named in a `[...]`
//! descriptor string, optionally at a new position, or moves a pointer.
//!
//! Moving fires the browser's transition cascade: `out` and `leave` on the
//! branch being left (innermost first), `over` and `enter` on the branch
//! being entered (outermost first), then `move`. Pointer events fire before
//! their mouse compatibility events.
//!
//! Pressing fires `pointerdown` when the device goes from no buttons to
//! some, followed by `mousedown` (and `contextmenu` for the secondary
//! button) unless the pointerdown was prevented or the target is disabled.
//! Releasing the last button fires `pointerup`, `mouseup` and a click on
//! the nearest common ancestor of the press and release targets, with a
//! `dblclick` when the click completes a pair.
//!
//! Touch points appear on press (`pointerover`/`pointerenter`), leave on
//! release (`pointerout`/`pointerleave`) and only then emit their mouse
//! compatibility events.
//!
//! # Example
//!
//! ```ignore
//! session.pointer_sync([
//!     PointerInput::keys("[MouseLeft]").target(button),
//!     PointerInput::move_to(other),
//! ])?;
//! ```

pub mod keymap;
mod state;

pub use keymap::{PointerKey, PointerMap};
pub use state::{Device, PointerPosition, PointerState};

use std::time::Duration;

use tracing::debug;

use crate::descriptor::parse_pointer;
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::event::{dispatch, EventInit, EventType};
use crate::session::{PointerEventsCheck, Session, Step};
use crate::state::selection::modify_selection_per_mouse;
use crate::types::{Buttons, Coords, MouseButton, PointerType};
use state::PressedButton;

// =============================================================================
// INPUTS AND STEPS
// =============================================================================

/// One entry of a `pointer` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Buttons to press/release; `None` makes this a move
    pub keys: Option<String>,
    pub target: Option<NodeId>,
    pub coords: Option<Coords>,
    pub offset: Option<usize>,
    /// Device to move; defaults to the mouse
    pub pointer_name: Option<String>,
}

impl PointerInput {
    pub fn keys(keys: &str) -> Self {
        Self {
            keys: Some(keys.to_string()),
            ..Self::default()
        }
    }

    /// Move the mouse onto `target`.
    pub fn move_to(target: NodeId) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn coords(mut self, x: f64, y: f64) -> Self {
        self.coords = Some(Coords::new(x, y));
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn pointer_name(mut self, name: &str) -> Self {
        self.pointer_name = Some(name.to_string());
        self
    }

    fn position(&self) -> PointerPosition {
        PointerPosition {
            target: self.target,
            coords: self.coords,
            offset: self.offset,
        }
    }
}

impl From<&str> for PointerInput {
    fn from(keys: &str) -> Self {
        Self::keys(keys)
    }
}

impl From<NodeId> for PointerInput {
    fn from(target: NodeId) -> Self {
        Self::move_to(target)
    }
}

/// One discrete pointer step. Positions resolve against the device's
/// previous position when the step runs.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerStep {
    Press { key: PointerKey, position: PointerPosition },
    Release { key: PointerKey, position: PointerPosition },
    Move { pointer_name: String, position: PointerPosition },
}

/// Steps for a list of inputs, with a pause between pointer actions.
pub(crate) fn expand(inputs: &[PointerInput], pointer_map: &PointerMap) -> Result<Vec<Step>> {
    let mut actions: Vec<Vec<PointerStep>> = Vec::new();
    for input in inputs {
        let position = input.position();
        let Some(keys) = &input.keys else {
            actions.push(vec![PointerStep::Move {
                pointer_name: input.pointer_name.clone().unwrap_or_else(|| "mouse".to_string()),
                position,
            }]);
            continue;
        };
        for action in parse_pointer(keys, pointer_map)? {
            let mut steps = Vec::new();
            if !action.release_previous {
                steps.push(PointerStep::Press {
                    key: action.key.clone(),
                    position: position.clone(),
                });
            }
            if action.release_previous || action.release_self {
                steps.push(PointerStep::Release {
                    key: action.key,
                    position: position.clone(),
                });
            }
            actions.push(steps);
        }
    }

    let mut steps = Vec::new();
    for (i, action) in actions.into_iter().enumerate() {
        if i > 0 {
            steps.push(Step::Pause);
        }
        steps.extend(action.into_iter().map(Step::Pointer));
    }
    Ok(steps)
}

/// Run one pointer step.
pub fn pointer_action(session: &mut Session, step: &PointerStep) -> Result<()> {
    match step {
        PointerStep::Press { key, position } => press(session, key, position),
        PointerStep::Release { key, position } => release(session, key, position),
        PointerStep::Move { pointer_name, position } => {
            if session.pointer_state().device(pointer_name).is_none() {
                return Err(Error::UnsupportedOperation(format!(
                    "Pointer \"{pointer_name}\" is not active. Press a button on it first."
                )));
            }
            let position = resolve_position(session, pointer_name, position)?;
            check_target(session, &position)?;
            move_to(session, pointer_name, position);
            Ok(())
        }
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// Fill in the parts of `raw` left out, from the device's last position.
fn resolve_position(session: &Session, name: &str, raw: &PointerPosition) -> Result<PointerPosition> {
    let previous = session
        .pointer_state()
        .device(name)
        .map(|d| d.position.clone())
        .unwrap_or_default();
    let target = raw.target.or(previous.target).ok_or_else(|| {
        Error::UnsupportedOperation("This pointer has no previous position. Provide a target.".to_string())
    })?;
    let same_target = previous.target == Some(target);
    Ok(PointerPosition {
        target: Some(target),
        coords: raw.coords.or(if same_target { previous.coords } else { None }),
        offset: raw.offset.or(if same_target { previous.offset } else { None }),
    })
}

fn check_target(session: &mut Session, position: &PointerPosition) -> Result<()> {
    match position.target {
        Some(target) => check_pointer_events(session, target),
        None => Ok(()),
    }
}

/// Move to `position`, firing the hover cascade unless hovering is skipped.
fn reposition(session: &mut Session, name: &str, position: PointerPosition) {
    if session.config().options.skip_hover {
        if let Some(device) = session.pointer_state_mut().device_mut(name) {
            device.position = position;
        }
        return;
    }
    move_to(session, name, position);
}

// =============================================================================
// POINTER EVENTS CHECK
// =============================================================================

/// Fail when `pointer-events: none` applies to `target`.
///
/// Passing checks are remembered per target: for the current API call
/// (`EachApiCall`) or until any inline style changes (`EachTarget`).
pub(crate) fn check_pointer_events(session: &mut Session, target: NodeId) -> Result<()> {
    let level = session.config().options.pointer_events_check;
    if level == PointerEventsCheck::Never {
        return Ok(());
    }
    let doc = session.document().clone();
    let generation = doc.style_generation();
    let call = session.call_id();
    let cached = session.pointer_checks().get(&target).copied();
    let hit = match (level, cached) {
        (PointerEventsCheck::EachApiCall, Some((checked_call, _))) => checked_call == call,
        (PointerEventsCheck::EachTarget, Some((_, checked_generation))) => checked_generation == generation,
        _ => false,
    };
    if hit {
        return Ok(());
    }
    if let Some(message) = pointer_events_violation(&doc, target) {
        return Err(Error::PointerEvents(message));
    }
    session.pointer_checks().insert(target, (call, generation));
    Ok(())
}

/// Error message when the nearest declared `pointer-events` is `none`.
fn pointer_events_violation(doc: &Document, target: NodeId) -> Option<String> {
    let (declaring, value) = doc
        .ancestors(target)
        .into_iter()
        .find_map(|n| doc.computed_style(n, "pointer-events").map(|v| (n, v)))?;
    if value.trim() != "none" {
        return None;
    }
    Some(if declaring == target {
        "Unable to perform pointer interaction as the element has `pointer-events: none`".to_string()
    } else {
        format!(
            "Unable to perform pointer interaction as the element inherits `pointer-events: none` from <{}>",
            doc.tag_name(declaring)
        )
    })
}

// =============================================================================
// HOVER TRANSITIONS
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Family {
    Pointer,
    Mouse,
}

impl Family {
    fn out(self) -> EventType {
        match self {
            Self::Pointer => EventType::Pointerout,
            Self::Mouse => EventType::Mouseout,
        }
    }

    fn leave(self) -> EventType {
        match self {
            Self::Pointer => EventType::Pointerleave,
            Self::Mouse => EventType::Mouseleave,
        }
    }

    fn over(self) -> EventType {
        match self {
            Self::Pointer => EventType::Pointerover,
            Self::Mouse => EventType::Mouseover,
        }
    }

    fn enter(self) -> EventType {
        match self {
            Self::Pointer => EventType::Pointerenter,
            Self::Mouse => EventType::Mouseenter,
        }
    }

    fn moved(self) -> EventType {
        match self {
            Self::Pointer => EventType::Pointermove,
            Self::Mouse => EventType::Mousemove,
        }
    }
}

/// Branches left and entered when hovering from `prev` to `next`.
struct Transition {
    prev: Option<NodeId>,
    next: Option<NodeId>,
    /// Innermost first
    leave: Vec<NodeId>,
    /// Outermost first
    enter: Vec<NodeId>,
}

/// Inclusive element ancestors, without the document node.
fn element_chain(doc: &Document, node: NodeId) -> Vec<NodeId> {
    doc.ancestors(node)
        .into_iter()
        .filter(|n| *n != doc.root())
        .collect()
}

impl Transition {
    fn between(doc: &Document, prev: Option<NodeId>, next: Option<NodeId>) -> Self {
        let prev = prev.filter(|p| doc.is_alive(*p));
        if prev == next {
            return Self {
                prev,
                next,
                leave: Vec::new(),
                enter: Vec::new(),
            };
        }
        let prev_chain = prev.map(|p| element_chain(doc, p)).unwrap_or_default();
        let next_chain = next.map(|n| element_chain(doc, n)).unwrap_or_default();
        let leave = prev_chain.iter().copied().filter(|n| !next_chain.contains(n)).collect();
        let enter = next_chain
            .iter()
            .rev()
            .copied()
            .filter(|n| !prev_chain.contains(n))
            .collect();
        Self { prev, next, leave, enter }
    }

    fn changed(&self) -> bool {
        self.prev != self.next
    }

    fn fire_leave(&self, session: &mut Session, family: Family, init: &EventInit) {
        let Some(prev) = self.prev.filter(|_| self.changed()) else {
            return;
        };
        let init = EventInit {
            related_target: self.next,
            ..init.clone()
        };
        dispatch(session, prev, family.out(), init.clone());
        for node in &self.leave {
            dispatch(session, *node, family.leave(), init.clone());
        }
    }

    fn fire_enter(&self, session: &mut Session, family: Family, init: &EventInit) {
        let Some(next) = self.next.filter(|_| self.changed()) else {
            return;
        };
        let init = EventInit {
            related_target: self.prev,
            ..init.clone()
        };
        dispatch(session, next, family.over(), init.clone());
        for node in &self.enter {
            dispatch(session, *node, family.enter(), init.clone());
        }
    }
}

fn pointer_init(device: &Device, button: i16) -> EventInit {
    EventInit {
        pointer_id: Some(device.pointer_id),
        pointer_type: Some(device.pointer_type),
        is_primary: Some(device.is_primary),
        coords: Some(device.position.coords.unwrap_or_default()),
        button: Some(button),
        ..EventInit::default()
    }
}

fn mouse_init(position: &PointerPosition, button: i16, detail: u32) -> EventInit {
    EventInit {
        coords: Some(position.coords.unwrap_or_default()),
        button: Some(button),
        detail: Some(detail),
        ..EventInit::default()
    }
}

fn device_snapshot(session: &Session, name: &str) -> Option<Device> {
    session.pointer_state().device(name).cloned()
}

/// Move a device and fire the hover cascade.
fn move_to(session: &mut Session, name: &str, position: PointerPosition) {
    let Some(device) = device_snapshot(session, name) else {
        return;
    };
    if device.position == position {
        return;
    }
    let previous = device.position.clone();
    if let Some(d) = session.pointer_state_mut().device_mut(name) {
        d.position = position.clone();
    }
    let Some(device) = device_snapshot(session, name) else {
        return;
    };
    debug!(pointer = name, from = ?previous.target, to = ?position.target, "pointer move");

    let doc = session.document().clone();
    let transition = Transition::between(&doc, previous.target, position.target);
    let compat = device.pointer_type != PointerType::Touch && !(device.prevented && device.is_down());
    let pointer = pointer_init(&device, -1);
    let mouse = mouse_init(&position, 0, 0);

    transition.fire_leave(session, Family::Pointer, &pointer);
    if compat {
        transition.fire_leave(session, Family::Mouse, &mouse);
    }
    transition.fire_enter(session, Family::Pointer, &pointer);
    if compat {
        transition.fire_enter(session, Family::Mouse, &mouse);
    }
    let Some(target) = position.target else {
        return;
    };
    dispatch(session, target, Family::Pointer.moved(), pointer);
    if !compat {
        return;
    }
    dispatch(session, target, Family::Mouse.moved(), mouse);
    session.pointer_state_mut().reset_click_count();

    if device.buttons().contains(Buttons::PRIMARY) {
        if let Some(anchor) = session.pointer_state().selecting() {
            modify_selection_per_mouse(&doc, anchor, target, position.offset);
        }
    }
}

/// Mouse-only move used by touch compatibility events.
fn move_mouse_compat(session: &mut Session, position: &PointerPosition) {
    let previous = session.pointer_state().mouse_position().clone();
    if previous == *position {
        return;
    }
    session.pointer_state_mut().mouse_mut().position = position.clone();
    let doc = session.document().clone();
    let transition = Transition::between(&doc, previous.target, position.target);
    let init = mouse_init(position, 0, 0);
    transition.fire_leave(session, Family::Mouse, &init);
    transition.fire_enter(session, Family::Mouse, &init);
    if let Some(target) = position.target {
        dispatch(session, target, EventType::Mousemove, init);
    }
    session.pointer_state_mut().reset_click_count();
}

// =============================================================================
// PRESS / RELEASE
// =============================================================================

fn press(session: &mut Session, key: &PointerKey, raw: &PointerPosition) -> Result<()> {
    let name = key.pointer_name();
    let is_new = session.pointer_state().device(&name).is_none();
    let position = resolve_position(session, &name, raw)?;
    check_target(session, &position)?;
    let Some(target) = position.target else {
        return Ok(());
    };
    if session.pointer_state().device(&name).is_some_and(|d| d.is_pressed(key)) {
        debug!(key = %key.name, "pointer key already pressed");
        return Ok(());
    }

    session.pointer_state_mut().ensure_device(key);
    if key.pointer_type == PointerType::Touch && is_new {
        touch_appear(session, &name, position.clone());
    } else {
        reposition(session, &name, position.clone());
    }

    let was_down = {
        let state = session.pointer_state_mut();
        let Some(device) = state.device_mut(&name) else {
            return Ok(());
        };
        let was_down = device.is_down();
        device.pressed.push(PressedButton {
            key: key.clone(),
            down_target: target,
        });
        was_down
    };
    if was_down {
        return Ok(());
    }

    let Some(device) = device_snapshot(session, &name) else {
        return Ok(());
    };
    let unprevented = dispatch(
        session,
        target,
        EventType::Pointerdown,
        pointer_init(&device, key.button.index()),
    );
    if let Some(device) = session.pointer_state_mut().device_mut(&name) {
        device.prevented = !unprevented;
    }
    if key.pointer_type != PointerType::Touch && unprevented {
        mouse_down(session, key.button, &position);
    }
    Ok(())
}

fn release(session: &mut Session, key: &PointerKey, raw: &PointerPosition) -> Result<()> {
    let name = key.pointer_name();
    if !session.pointer_state().device(&name).is_some_and(|d| d.is_pressed(key)) {
        debug!(key = %key.name, "pointer key not pressed");
        return Ok(());
    }
    let position = resolve_position(session, &name, raw)?;
    check_target(session, &position)?;
    let Some(target) = position.target else {
        return Ok(());
    };
    reposition(session, &name, position.clone());

    let Some(device) = session.pointer_state_mut().device_mut(&name) else {
        return Ok(());
    };
    device.pressed.retain(|p| p.key != *key);
    if device.is_down() {
        return Ok(());
    }
    let device = device.clone();

    dispatch(
        session,
        target,
        EventType::Pointerup,
        pointer_init(&device, key.button.index()),
    );

    if device.pointer_type == PointerType::Touch {
        let doc = session.document().clone();
        let transition = Transition::between(&doc, Some(target), None);
        transition.fire_leave(session, Family::Pointer, &pointer_init(&device, -1));
        session.pointer_state_mut().remove_device(&name);
        if !device.prevented {
            move_mouse_compat(session, &position);
            mouse_down(session, key.button, &position);
            mouse_up(session, key.button, &position);
        }
        return Ok(());
    }

    if !device.prevented {
        mouse_up(session, key.button, &position);
    }
    Ok(())
}

/// A touch point appearing over its target.
fn touch_appear(session: &mut Session, name: &str, position: PointerPosition) {
    if let Some(device) = session.pointer_state_mut().device_mut(name) {
        device.position = position.clone();
    }
    let Some(device) = device_snapshot(session, name) else {
        return;
    };
    let doc = session.document().clone();
    let transition = Transition::between(&doc, None, position.target);
    transition.fire_enter(session, Family::Pointer, &pointer_init(&device, -1));
}

// =============================================================================
// MOUSE COMPATIBILITY EVENTS
// =============================================================================

fn mouse_down(session: &mut Session, button: MouseButton, position: &PointerPosition) {
    let Some(target) = position.target else {
        return;
    };
    let timeout = session.config().options.click_timeout.map(Duration::from_millis);
    let count = session.pointer_state_mut().click_count_on_down(button, timeout);
    session.pointer_state_mut().set_mouse_down_target(button, target);
    if session.document().is_disabled(target) {
        return;
    }
    dispatch(session, target, EventType::Mousedown, mouse_init(position, button.index(), count));
    if button == MouseButton::Secondary {
        dispatch(session, target, EventType::Contextmenu, mouse_init(position, button.index(), 0));
    }
}

fn mouse_up(session: &mut Session, button: MouseButton, position: &PointerPosition) {
    let Some(target) = position.target else {
        return;
    };
    let down_target = session.pointer_state_mut().take_mouse_down_target(button);
    let doc = session.document().clone();
    if doc.is_disabled(target) {
        return;
    }
    let detail = session.pointer_state().click_count_on_up(button).unwrap_or(0);
    dispatch(session, target, EventType::Mouseup, mouse_init(position, button.index(), detail));
    session.pointer_state_mut().set_selecting(None);

    let Some(click_target) = down_target.and_then(|down| doc.common_ancestor(down, target)) else {
        return;
    };
    let Some(count) = session.pointer_state_mut().register_click(button) else {
        return;
    };
    let init = mouse_init(position, button.index(), count);
    if button != MouseButton::Primary {
        dispatch(session, click_target, EventType::Auxclick, init);
        return;
    }
    dispatch(session, click_target, EventType::Click, init.clone());
    if count == 2 {
        dispatch(session, click_target, EventType::Dblclick, init);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Options;
    use crate::state::ui::{get_ui_selection, UiSelection};
    use std::cell::RefCell;
    use std::rc::Rc;

    const ALL: [EventType; 18] = [
        EventType::Pointerover,
        EventType::Pointerenter,
        EventType::Pointerdown,
        EventType::Pointermove,
        EventType::Pointerup,
        EventType::Pointerout,
        EventType::Pointerleave,
        EventType::Mouseover,
        EventType::Mouseenter,
        EventType::Mousedown,
        EventType::Mousemove,
        EventType::Mouseup,
        EventType::Mouseout,
        EventType::Mouseleave,
        EventType::Click,
        EventType::Auxclick,
        EventType::Dblclick,
        EventType::Contextmenu,
    ];

    struct Fixture {
        doc: Document,
        session: Session,
        log: Rc<RefCell<Vec<String>>>,
    }

    fn setup(options: Options) -> Fixture {
        let doc = Document::new();
        let session = Session::setup(&doc, options);
        Fixture {
            doc,
            session,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    impl Fixture {
        fn element(&self, parent: NodeId, tag: &str, id: &str) -> NodeId {
            let node = self.doc.create_element_with(tag, &[("id", id)]);
            self.doc.append_child(parent, node);
            for ty in ALL {
                let sink = self.log.clone();
                let id = id.to_string();
                self.doc.add_event_listener(node, ty, move |_, e| {
                    if e.target == e.current_target.unwrap_or(e.target) {
                        sink.borrow_mut().push(format!("{}:{id}", e.event_type));
                    }
                });
            }
            node
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.borrow_mut())
        }
    }

    #[test]
    fn test_hover_cascade_through_common_ancestor() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let outer = f.element(body, "div", "outer");
        let left = f.element(outer, "span", "left");
        let right = f.element(outer, "span", "right");

        f.session.pointer_sync([PointerInput::move_to(left)]).unwrap();
        assert_eq!(
            f.take(),
            vec!["pointerover:left", "pointerenter:outer", "pointerenter:left", "mouseover:left",
                 "mouseenter:outer", "mouseenter:left", "pointermove:left", "mousemove:left"]
        );

        f.session.pointer_sync([PointerInput::move_to(right)]).unwrap();
        assert_eq!(
            f.take(),
            vec!["pointerout:left", "pointerleave:left", "mouseout:left", "mouseleave:left",
                 "pointerover:right", "pointerenter:right", "mouseover:right", "mouseenter:right",
                 "pointermove:right", "mousemove:right"]
        );

        // Same position: nothing
        f.session.pointer_sync([PointerInput::move_to(right)]).unwrap();
        assert!(f.take().is_empty());
    }

    #[test]
    fn test_click_sequence() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let button = f.element(body, "button", "b");
        f.session.pointer_sync([PointerInput::move_to(button)]).unwrap();
        f.take();

        f.session.pointer_sync(["[MouseLeft]"]).unwrap();
        assert_eq!(f.take(), vec!["pointerdown:b", "mousedown:b", "pointerup:b", "mouseup:b", "click:b"]);
        assert_eq!(f.doc.active_element(), button);
    }

    #[test]
    fn test_double_click_in_one_call() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let button = f.element(body, "button", "b");
        let details = Rc::new(RefCell::new(Vec::new()));
        let sink = details.clone();
        f.doc.add_event_listener(button, EventType::Click, move |_, e| {
            sink.borrow_mut().push(e.mouse().map_or(0, |m| m.detail))
        });

        f.session
            .pointer_sync([PointerInput::keys("[MouseLeft][MouseLeft]").target(button)])
            .unwrap();
        let log = f.take();
        assert_eq!(log.iter().filter(|e| *e == "click:b").count(), 2);
        assert_eq!(log.iter().filter(|e| *e == "dblclick:b").count(), 1);
        assert_eq!(*details.borrow(), vec![1, 2]);

        // Counts start over with the next call
        f.session.pointer_sync(["[MouseLeft]"]).unwrap();
        assert!(!f.take().contains(&"dblclick:b".to_string()));
    }

    #[test]
    fn test_click_on_common_ancestor() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let outer = f.element(body, "div", "outer");
        let a = f.element(outer, "span", "a");
        let b = f.element(outer, "span", "b");
        f.session
            .pointer_sync([
                PointerInput::keys("[MouseLeft>]").target(a),
                PointerInput::keys("[/MouseLeft]").target(b),
            ])
            .unwrap();
        let log = f.take();
        assert!(log.contains(&"click:outer".to_string()));
        assert!(!log.contains(&"click:a".to_string()));
    }

    #[test]
    fn test_secondary_button() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        f.session.pointer_sync([PointerInput::keys("[MouseRight]").target(div)]).unwrap();
        let log = f.take();
        let tail: Vec<_> = log.iter().skip_while(|e| *e != "pointerdown:d").cloned().collect();
        assert_eq!(
            tail,
            vec!["pointerdown:d", "mousedown:d", "contextmenu:d", "pointerup:d", "mouseup:d", "auxclick:d"]
        );
    }

    #[test]
    fn test_second_button_does_not_refire_down() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        f.session
            .pointer_sync([PointerInput::keys("[MouseLeft>][MouseRight>]").target(div)])
            .unwrap();
        let log = f.take();
        assert_eq!(log.iter().filter(|e| e.starts_with("pointerdown")).count(), 1);
        assert_eq!(log.iter().filter(|e| e.starts_with("mousedown")).count(), 1);
        assert_eq!(f.session.pointer_state().buttons(), Buttons::PRIMARY | Buttons::SECONDARY);

        f.session.pointer_sync(["[/MouseRight]"]).unwrap();
        assert!(f.take().is_empty());
        f.session.pointer_sync(["[/MouseLeft]"]).unwrap();
        assert_eq!(f.take(), vec!["pointerup:d", "mouseup:d", "click:d"]);
    }

    #[test]
    fn test_prevented_pointerdown_skips_mouse_events() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        f.doc.add_event_listener(div, EventType::Pointerdown, |_, e| e.prevent_default());
        f.session.pointer_sync([PointerInput::keys("[MouseLeft]").target(div)]).unwrap();
        let log = f.take();
        assert!(log.contains(&"pointerup:d".to_string()));
        assert!(!log.iter().any(|e| e.starts_with("mousedown") || e.starts_with("mouseup") || e.starts_with("click")));
    }

    #[test]
    fn test_disabled_target_gets_no_mouse_events() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let button = f.element(body, "button", "b");
        f.doc.set_attribute(button, "disabled", "");
        f.session.pointer_sync([PointerInput::keys("[MouseLeft]").target(button)]).unwrap();
        let log = f.take();
        assert!(log.contains(&"pointerdown:b".to_string()));
        assert!(!log.iter().any(|e| e.starts_with("mousedown") || e.starts_with("click")));
    }

    #[test]
    fn test_touch_sequence() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        f.session.pointer_sync([PointerInput::keys("[TouchA]").target(div)]).unwrap();
        assert_eq!(
            f.take(),
            vec!["pointerover:d", "pointerenter:d", "pointerdown:d", "pointerup:d", "pointerout:d",
                 "pointerleave:d", "mouseover:d", "mouseenter:d", "mousemove:d", "mousedown:d",
                 "mouseup:d", "click:d"]
        );
        assert!(f.session.pointer_state().device("TouchA").is_none());
    }

    #[test]
    fn test_touch_ids() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        let ids = Rc::new(RefCell::new(Vec::new()));
        let sink = ids.clone();
        f.doc.add_event_listener(div, EventType::Pointerdown, move |_, e| {
            let p = e.pointer().cloned().unwrap_or_default();
            sink.borrow_mut().push((p.pointer_id, p.is_primary))
        });
        f.session
            .pointer_sync([PointerInput::keys("[TouchA>][TouchB>]").target(div)])
            .unwrap();
        assert_eq!(*ids.borrow(), vec![(2, true), (3, false)]);
    }

    #[test]
    fn test_move_requires_target() {
        let mut f = setup(Options::default());
        let err = f.session.pointer_sync(["[MouseLeft]"]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
        let err = f
            .session
            .pointer_sync([PointerInput::default().pointer_name("TouchA")])
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
    }

    #[test]
    fn test_pointer_events_none() {
        let mut f = setup(Options::default());
        let body = f.doc.body();
        let parent = f.element(body, "section", "p");
        let child = f.element(parent, "span", "c");
        f.doc.set_style(parent, "pointer-events", "none");

        let err = f.session.pointer_sync([PointerInput::keys("[MouseLeft]").target(child)]).unwrap_err();
        assert_eq!(
            err,
            Error::PointerEvents(
                "Unable to perform pointer interaction as the element inherits `pointer-events: none` from <section>"
                    .into()
            )
        );
        let err = f.session.pointer_sync([PointerInput::move_to(parent)]).unwrap_err();
        assert!(err.to_string().contains("has `pointer-events: none`"));

        f.doc.set_style(child, "pointer-events", "auto");
        assert!(f.session.pointer_sync([PointerInput::move_to(child)]).is_ok());
    }

    #[test]
    fn test_pointer_events_check_never() {
        let mut f = setup(Options {
            pointer_events_check: PointerEventsCheck::Never,
            ..Options::default()
        });
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        f.doc.set_style(div, "pointer-events", "none");
        assert!(f.session.pointer_sync([PointerInput::keys("[MouseLeft]").target(div)]).is_ok());
    }

    #[test]
    fn test_each_target_caches_until_style_changes() {
        let mut f = setup(Options {
            pointer_events_check: PointerEventsCheck::EachTarget,
            ..Options::default()
        });
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        assert!(f.session.pointer_sync([PointerInput::move_to(div)]).is_ok());
        f.doc.set_style(div, "pointer-events", "none");
        assert!(f.session.pointer_sync(["[MouseLeft]"]).is_err());
    }

    #[test]
    fn test_skip_hover() {
        let mut f = setup(Options {
            skip_hover: true,
            ..Options::default()
        });
        let body = f.doc.body();
        let div = f.element(body, "div", "d");
        f.session.pointer_sync([PointerInput::keys("[MouseLeft]").target(div)]).unwrap();
        assert_eq!(f.take(), vec!["pointerdown:d", "mousedown:d", "pointerup:d", "mouseup:d", "click:d"]);
    }

    #[test]
    fn test_drag_selects_text() {
        let mut f = setup(Options::default());
        let input = f.doc.create_element_with("input", &[("value", "hello world")]);
        f.doc.append_child(f.doc.body(), input);
        f.session
            .pointer_sync([
                PointerInput::keys("[MouseLeft>]").target(input).offset(2),
                PointerInput::move_to(input).offset(7),
                PointerInput::keys("[/MouseLeft]"),
            ])
            .unwrap();
        assert_eq!(get_ui_selection(&f.doc, input), UiSelection::new(2, 7));
    }
}
