// Copyright 2025 Cowboy AI, LLC.

//! State reconstruction from the event log
//!
//! The fold is the only way to obtain current state: start from the zero
//! state and apply the agent's events strictly in log order. Skipping or
//! reordering events is forbidden.

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::GameEvent;
use crate::state::AgentState;

/// Reconstructs agent snapshots by folding ordered event streams through the
/// projection registry.
#[derive(Debug)]
pub struct StateBuilder<'a> {
    registry: &'a ProjectionRegistry,
}

impl<'a> StateBuilder<'a> {
    /// Create a builder over a projection registry
    pub fn new(registry: &'a ProjectionRegistry) -> Self {
        Self { registry }
    }

    /// Fold `events` into a snapshot for `agent_id`.
    ///
    /// Events belonging to other agents are skipped; an optional `until`
    /// bound of `(week, day)` reconstructs the state as of that point in
    /// time. An event kind without a reducer fails the whole fold.
    pub fn build(
        &self,
        agent_id: &str,
        events: &[GameEvent],
        until: Option<(u32, u8)>,
    ) -> DomainResult<AgentState> {
        let mut state = AgentState::zero(agent_id);
        for event in events {
            if event.agent_id != agent_id {
                continue;
            }
            if let Some((week, day)) = until {
                if (event.week, event.day) > (week, day) {
                    continue;
                }
            }
            state = self.registry.apply(state, event)?;
        }
        Ok(state)
    }
}
