//! Event Module - Synthetic event construction and dispatch
//!
//! - **types** - Closed event-type enumeration, event objects, init records
//! - **dispatch** - The pipeline: defaults, behavior lookup, wrapper, follow-up
//! - **behavior** - Default actions per event type (click, keydown, ...)

mod behavior;
mod dispatch;
mod types;

pub use dispatch::{dispatch, Behavior, BehaviorRegistry, EventWrapper, FollowUp};
pub(crate) use dispatch::dispatch_with;
pub use types::*;
