// Copyright 2025 Cowboy AI, LLC.

//! Projection layer: reducers and the state builder
//!
//! Reducers are pure `(state, event) -> state` functions registered per event
//! kind. They mechanically apply the event's declared fact; every game rule
//! already ran in whichever producer emitted the event.

pub mod competition;
pub mod core;
pub mod financial;
pub mod operational;
pub mod social;
pub mod staffing;
pub mod state_builder;
pub mod time;
pub mod vendor;

pub use state_builder::StateBuilder;

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainError;
use crate::events::GameEvent;

/// Register every built-in reducer.
///
/// Each active event kind gets exactly one reducer; a kind left out of this
/// wiring fails the fold fatally the first time it is encountered.
pub fn register_default_reducers(registry: &mut ProjectionRegistry) {
    core::register(registry);
    time::register(registry);
    financial::register(registry);
    operational::register(registry);
    staffing::register(registry);
    social::register(registry);
    vendor::register(registry);
    competition::register(registry);
}

/// A reducer was handed an event of the wrong kind; that is a wiring bug.
pub(crate) fn unexpected(event: &GameEvent, expected: &str) -> DomainError {
    DomainError::InvariantViolation(format!(
        "{expected} reducer received {} event",
        event.kind()
    ))
}
