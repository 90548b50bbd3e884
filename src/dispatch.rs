// Copyright 2025 Cowboy AI, LLC.

//! Registry-based dispatch for commands and projections
//!
//! Both registries are open for extension: adding a command or event kind
//! means registering one more entry, with no change to the engine, the state
//! builder, or any other kind's handler.

use crate::commands::Command;
use crate::errors::{DomainError, DomainResult};
use crate::events::{EventDraft, GameEvent};
use crate::state::AgentState;
use std::collections::HashMap;

/// A pure command validator and event emitter.
///
/// The contract: read the state, validate preconditions, and either return
/// the full list of event drafts or a typed error with nothing emitted.
/// Handlers never perform I/O and never mint envelope ids; the engine seals
/// drafts after the handler returns.
pub trait CommandHandler: Send + Sync {
    /// Validate `command` against `state` and produce event drafts
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>>;
}

/// Maps command kinds to their handler.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a command kind, replacing any previous one.
    ///
    /// Each kind has at most one handler; the latest registration wins.
    pub fn register(&mut self, kind: impl Into<String>, handler: Box<dyn CommandHandler>) {
        self.handlers.insert(kind.into(), handler);
    }

    /// Route a command to its handler.
    ///
    /// The registry never inspects state or payload beyond the kind tag.
    pub fn execute(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let handler = self
            .handlers
            .get(&command.command_kind)
            .ok_or_else(|| DomainError::UnknownCommand(command.command_kind.clone()))?;
        handler.handle(state, command)
    }

    /// Whether a kind has a registered handler
    pub fn is_registered(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// All registered command kinds, sorted
    pub fn registered_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.handlers.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("kinds", &self.registered_kinds())
            .finish()
    }
}

/// A pure state updater: `(state, event) -> state`.
///
/// Reducers mechanically apply the event's declared fact; game rules live in
/// the producers.
pub type ReducerFn = fn(AgentState, &GameEvent) -> DomainResult<AgentState>;

/// Maps event kinds to their reducer.
#[derive(Default)]
pub struct ProjectionRegistry {
    reducers: HashMap<String, ReducerFn>,
}

impl ProjectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            reducers: HashMap::new(),
        }
    }

    /// Register a reducer for an event kind, replacing any previous one
    pub fn register(&mut self, kind: impl Into<String>, reducer: ReducerFn) {
        self.reducers.insert(kind.into(), reducer);
    }

    /// Apply an event to the state.
    ///
    /// A missing reducer is a fatal invariant violation, never a per-caller
    /// error: every active event kind must have exactly one reducer.
    pub fn apply(&self, state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
        let kind = event.kind();
        let reducer = self
            .reducers
            .get(kind)
            .ok_or_else(|| DomainError::UnknownEvent(kind.to_string()))?;
        reducer(state, event)
    }

    /// Whether a kind has a registered reducer
    pub fn is_registered(&self, kind: &str) -> bool {
        self.reducers.contains_key(kind)
    }

    /// All registered event kinds, sorted
    pub fn registered_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.reducers.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

impl std::fmt::Debug for ProjectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionRegistry")
            .field("kinds", &self.registered_kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AgentRetired, EventPayload};

    struct RetireHandler;

    impl CommandHandler for RetireHandler {
        fn handle(
            &self,
            _state: &AgentState,
            _command: &Command,
        ) -> DomainResult<Vec<EventDraft>> {
            Ok(vec![EventDraft::own(EventPayload::AgentRetired(
                AgentRetired {
                    reason: "test".to_string(),
                },
            ))])
        }
    }

    fn retired_reducer(mut state: AgentState, _event: &GameEvent) -> DomainResult<AgentState> {
        state.private_notes.push("retired".to_string());
        Ok(state)
    }

    #[test]
    fn test_command_dispatch_routes_by_kind() {
        let mut registry = CommandRegistry::new();
        registry.register("RETIRE", Box::new(RetireHandler));

        let state = AgentState::zero("P001");
        let command = Command {
            command_kind: "RETIRE".to_string(),
            agent_id: "P001".to_string(),
            payload: serde_json::json!({}),
        };
        let drafts = registry.execute(&state, &command).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].payload.kind(), "AgentRetired");
    }

    #[test]
    fn test_unknown_command_is_reported_to_caller() {
        let registry = CommandRegistry::new();
        let state = AgentState::zero("P001");
        let command = Command {
            command_kind: "NOT_A_THING".to_string(),
            agent_id: "P001".to_string(),
            payload: serde_json::json!({}),
        };
        let err = registry.execute(&state, &command).unwrap_err();
        assert!(matches!(err, DomainError::UnknownCommand(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_projection_apply_and_missing_reducer() {
        let mut registry = ProjectionRegistry::new();
        registry.register("AgentRetired", retired_reducer);

        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::AgentRetired(AgentRetired {
                reason: "done".to_string(),
            }),
        );
        let state = registry.apply(AgentState::zero("P001"), &event).unwrap();
        assert_eq!(state.private_notes, vec!["retired".to_string()]);

        // A registry without the kind must fail fatally
        let empty = ProjectionRegistry::new();
        let err = empty.apply(AgentState::zero("P001"), &event).unwrap_err();
        assert!(matches!(err, DomainError::UnknownEvent(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_latest_registration_wins() {
        fn noop(state: AgentState, _event: &GameEvent) -> DomainResult<AgentState> {
            Ok(state)
        }
        let mut registry = ProjectionRegistry::new();
        registry.register("AgentRetired", retired_reducer);
        registry.register("AgentRetired", noop);
        assert_eq!(registry.registered_kinds().len(), 1);

        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::AgentRetired(AgentRetired {
                reason: "done".to_string(),
            }),
        );
        let state = registry.apply(AgentState::zero("P001"), &event).unwrap();
        assert!(state.private_notes.is_empty());
    }
}
