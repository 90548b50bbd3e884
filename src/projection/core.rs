// Copyright 2025 Cowboy AI, LLC.

//! Lifecycle reducers

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::AgentState;

/// Wire the lifecycle reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("AgentCreated", agent_created);
    registry.register("AgentRetired", agent_retired);
}

/// Grant the agent its starting balance sheet
pub fn agent_created(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::AgentCreated(e) = &event.payload else {
        return Err(unexpected(event, "AgentCreated"));
    };
    state.cash_balance = e.starting_cash;
    state.line_of_credit_limit = e.starting_credit_limit;
    state.credit_rating = e.starting_credit_rating;
    Ok(state)
}

/// Retirement is terminal; the marker itself is the record
pub fn agent_retired(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::AgentRetired(_) = &event.payload else {
        return Err(unexpected(event, "AgentRetired"));
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AgentCreated;

    #[test]
    fn test_agent_created_sets_opening_balance() {
        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::AgentCreated(AgentCreated {
                starting_cash: 10_000.0,
                starting_credit_limit: 5_000.0,
                starting_credit_rating: 50,
            }),
        );
        let state = agent_created(AgentState::zero("P001"), &event).unwrap();
        assert_eq!(state.cash_balance, 10_000.0);
        assert_eq!(state.line_of_credit_limit, 5_000.0);
        assert_eq!(state.credit_rating, 50);
    }

    #[test]
    fn test_wrong_kind_is_invariant_violation() {
        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::AgentRetired(crate::events::AgentRetired {
                reason: "x".to_string(),
            }),
        );
        assert!(agent_created(AgentState::zero("P001"), &event).is_err());
    }
}
