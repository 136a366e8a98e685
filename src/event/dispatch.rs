//! Event Dispatch Pipeline
//!
//! `dispatch` builds a native-shaped event, merges the defaults derived from
//! session state (modifier flags, pressed buttons) with the caller's init,
//! resolves the default behavior for the event type, routes the host
//! dispatch through the optional event wrapper and finally runs the
//! behavior's follow-up unless a listener prevented the default.
//!
//! The behavior is resolved *before* listeners run, so it sees the state the
//! user acted on, not what listeners changed it to.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::types::{Event, EventDetail, EventInit, EventType};
use crate::dom::NodeId;
use crate::session::Session;

// =============================================================================
// TYPES
// =============================================================================

/// Deferred default action, run after the event completes.
pub type FollowUp = Box<dyn FnOnce(&mut Session)>;

/// Default behavior for an event type.
///
/// Inspects the event and session before dispatch and returns the action to
/// perform afterwards, or `None` when the event has no default action here.
pub type Behavior = fn(&Event, &Session) -> Option<FollowUp>;

/// Hook every host dispatch is routed through, for instrumentation that
/// must observe or batch DOM updates (act()-style wrappers).
pub type EventWrapper = Rc<dyn Fn(&mut dyn FnMut())>;

// =============================================================================
// BEHAVIOR REGISTRY
// =============================================================================

/// Static table from event type to behavior, indexed by `EventType::index`.
#[derive(Clone)]
pub struct BehaviorRegistry {
    table: [Option<Behavior>; EventType::COUNT],
}

impl BehaviorRegistry {
    /// A registry with no behaviors at all.
    pub fn empty() -> Self {
        Self {
            table: [None; EventType::COUNT],
        }
    }

    pub fn register(&mut self, event_type: EventType, behavior: Behavior) {
        self.table[event_type.index()] = Some(behavior);
    }

    pub fn unregister(&mut self, event_type: EventType) {
        self.table[event_type.index()] = None;
    }

    pub fn get(&self, event_type: EventType) -> Option<Behavior> {
        self.table[event_type.index()]
    }
}

impl Default for BehaviorRegistry {
    /// The standard browser default actions.
    fn default() -> Self {
        super::behavior::standard()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<&str> = EventType::ALL
            .iter()
            .filter(|ty| self.table[ty.index()].is_some())
            .map(|ty| ty.name())
            .collect();
        f.debug_struct("BehaviorRegistry")
            .field("registered", &registered)
            .finish()
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Fire an event at `target`. Returns `false` if the default was prevented.
pub fn dispatch(session: &mut Session, target: NodeId, event_type: EventType, init: EventInit) -> bool {
    dispatch_with(session, target, event_type, init, true)
}

/// Dispatch, optionally without running the registered behavior.
pub(crate) fn dispatch_with(
    session: &mut Session,
    target: NodeId,
    event_type: EventType,
    init: EventInit,
    run_behavior: bool,
) -> bool {
    let mut event = build_event(session, target, event_type);
    init.apply(&mut event);

    let follow_up = if run_behavior {
        session
            .config()
            .behaviors
            .get(event_type)
            .and_then(|behavior| behavior(&event, session))
    } else {
        None
    };

    let document = session.document().clone();
    let wrapper = session.config().event_wrapper.clone();
    let mut fire = || {
        document.dispatch_event(&mut event);
    };
    match wrapper {
        Some(wrap) => wrap(&mut fire),
        None => fire(),
    }

    let unprevented = !event.default_prevented();
    trace!(
        event = %event_type,
        target = %target,
        unprevented,
        behavior = follow_up.is_some(),
        "dispatch"
    );

    if unprevented {
        if let Some(follow_up) = follow_up {
            follow_up(session);
        }
    }
    unprevented
}

/// Event with defaults taken from the session's keyboard and pointer state.
fn build_event(session: &Session, target: NodeId, event_type: EventType) -> Event {
    let mut event = Event::new(event_type, target);
    let modifiers = session.keyboard_state().modifiers();
    let buttons = session.pointer_state().buttons();
    match &mut event.detail {
        EventDetail::Keyboard(detail) => detail.modifiers = modifiers,
        EventDetail::Mouse(detail) => {
            detail.modifiers = modifiers;
            detail.buttons = buttons;
        }
        EventDetail::Pointer(detail) => {
            detail.mouse.modifiers = modifiers;
            detail.mouse.buttons = buttons;
        }
        _ => {}
    }
    event
}

// =============================================================================
// TESTS
// =============================================================================
