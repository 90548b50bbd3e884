// Copyright 2025 Cowboy AI, LLC.

//! Competition and inter-agent reducers

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::{AgentState, Alliance};

/// Wire the competition reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("AllianceFormed", alliance_formed);
    registry.register("AllianceBreached", alliance_breached);
    registry.register("BuyoutProposed", buyout_proposed);
    registry.register("BuyoutOfferReceived", buyout_offer_received);
    registry.register("BuyoutAccepted", buyout_accepted);
    registry.register("AgentAcquired", agent_acquired);
    registry.register("CompetitorPriceChanged", competitor_price_changed);
    registry.register("CompetitorExitedMarket", competitor_exited_market);
    registry.register("CommunicationSent", communication_sent);
    registry.register("CommunicationReceived", communication_received);
}

/// Record the alliance on this stream's side
pub fn alliance_formed(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::AllianceFormed(e) = &event.payload else {
        return Err(unexpected(event, "AllianceFormed"));
    };
    state.active_alliances.push(Alliance {
        alliance_id: e.alliance_id.clone(),
        partner_agent_id: e.partner_agent_id.clone(),
        kind: e.kind,
        start_week: event.week,
    });
    Ok(state)
}

/// Terminate the alliance; the penalty moves via FundsTransferred
pub fn alliance_breached(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::AllianceBreached(e) = &event.payload else {
        return Err(unexpected(event, "AllianceBreached"));
    };
    state
        .active_alliances
        .retain(|a| a.alliance_id != e.alliance_id);
    Ok(state)
}

/// The proposal record stands alone; the fee moves via FundsTransferred
pub fn buyout_proposed(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::BuyoutProposed(_) = &event.payload else {
        return Err(unexpected(event, "BuyoutProposed"));
    };
    Ok(state)
}

/// The mirror record is the target's notification; no state change
pub fn buyout_offer_received(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::BuyoutOfferReceived(_) = &event.payload else {
        return Err(unexpected(event, "BuyoutOfferReceived"));
    };
    Ok(state)
}

/// Acceptance is recorded; settlement cash moves via FundsTransferred
pub fn buyout_accepted(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::BuyoutAccepted(_) = &event.payload else {
        return Err(unexpected(event, "BuyoutAccepted"));
    };
    Ok(state)
}

/// Acquisition marker; asset transfer arrives as its own events
pub fn agent_acquired(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::AgentAcquired(_) = &event.payload else {
        return Err(unexpected(event, "AgentAcquired"));
    };
    Ok(state)
}

/// Track the competitor's latest price for the affected market
pub fn competitor_price_changed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::CompetitorPriceChanged(e) = &event.payload else {
        return Err(unexpected(event, "CompetitorPriceChanged"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location
            .observed_competitor_prices
            .insert(e.service, e.new_price);
    }
    Ok(state)
}

/// Exit marker; no direct state change
pub fn competitor_exited_market(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::CompetitorExitedMarket(_) = &event.payload else {
        return Err(unexpected(event, "CompetitorExitedMarket"));
    };
    Ok(state)
}

/// The sent message is the record
pub fn communication_sent(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::CommunicationSent(_) = &event.payload else {
        return Err(unexpected(event, "CommunicationSent"));
    };
    Ok(state)
}

/// The received message is the record
pub fn communication_received(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::CommunicationReceived(_) = &event.payload else {
        return Err(unexpected(event, "CommunicationReceived"));
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AllianceBreached, AllianceFormed, CompetitorPriceChanged};
    use crate::state::{AllianceKind, LocationState, ServiceKind};

    #[test]
    fn test_alliance_lifecycle() {
        let state = AgentState::zero("P001");
        let formed = GameEvent::seal(
            "P001",
            2,
            0,
            None,
            EventPayload::AllianceFormed(AllianceFormed {
                alliance_id: "A1".to_string(),
                partner_agent_id: "P002".to_string(),
                kind: AllianceKind::Formal,
                duration_weeks: 52,
                penalties_on_breach: 2_000.0,
            }),
        );
        let state = alliance_formed(state, &formed).unwrap();
        assert_eq!(state.active_alliances.len(), 1);
        assert_eq!(state.active_alliances[0].start_week, 2);

        let breached = GameEvent::seal(
            "P001",
            10,
            0,
            None,
            EventPayload::AllianceBreached(AllianceBreached {
                alliance_id: "A1".to_string(),
                penalty_amount: 2_000.0,
            }),
        );
        let state = alliance_breached(state, &breached).unwrap();
        assert!(state.active_alliances.is_empty());
    }

    #[test]
    fn test_competitor_price_is_observed() {
        let mut state = AgentState::zero("P001");
        state
            .locations
            .insert("LOC_001".to_string(), LocationState::new("LOC_001", "Z", 1_000.0));
        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::CompetitorPriceChanged(CompetitorPriceChanged {
                competitor_id: "NPC_SUDS".to_string(),
                location_id: "LOC_001".to_string(),
                service: ServiceKind::StandardWash,
                new_price: 3.25,
            }),
        );
        let state = competitor_price_changed(state, &event).unwrap();
        assert_eq!(
            state.locations["LOC_001"].observed_competitor_prices[&ServiceKind::StandardWash],
            3.25
        );
    }
}
