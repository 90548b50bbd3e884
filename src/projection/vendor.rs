// Copyright 2025 Cowboy AI, LLC.

//! Vendor relationship reducers

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::{AgentState, LocationState, NegotiationOutcome, VendorRelationship};

/// Wire the vendor reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("VendorTierPromoted", vendor_tier_promoted);
    registry.register("VendorTierDemoted", vendor_tier_demoted);
    registry.register("VendorPriceFluctuated", vendor_price_fluctuated);
    registry.register("VendorNegotiationInitiated", vendor_negotiation_initiated);
    registry.register("VendorNegotiationResult", vendor_negotiation_result);
    registry.register("VendorTermsUpdated", vendor_terms_updated);
    registry.register("ExclusiveContractSigned", exclusive_contract_signed);
    registry.register("ExclusiveContractCancelled", exclusive_contract_cancelled);
    registry.register("DeliveryDisruptionStarted", delivery_disruption_started);
    registry.register("DeliveryDisruptionEnded", delivery_disruption_ended);
}

fn relationship<'a>(
    location: &'a mut LocationState,
    vendor_id: &str,
) -> &'a mut VendorRelationship {
    location
        .vendor_relationships
        .entry(vendor_id.to_string())
        .or_insert_with(|| VendorRelationship::new(vendor_id))
}

/// Apply the declared tier across every location knowing the vendor
pub fn vendor_tier_promoted(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::VendorTierPromoted(e) = &event.payload else {
        return Err(unexpected(event, "VendorTierPromoted"));
    };
    for location in state.locations.values_mut() {
        if let Some(rel) = location.vendor_relationships.get_mut(&e.vendor_id) {
            rel.tier = e.new_tier.clamp(1, 4);
            rel.weeks_at_tier = 0;
        }
    }
    Ok(state)
}

/// Apply the declared tier across every location knowing the vendor
pub fn vendor_tier_demoted(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::VendorTierDemoted(e) = &event.payload else {
        return Err(unexpected(event, "VendorTierDemoted"));
    };
    for location in state.locations.values_mut() {
        if let Some(rel) = location.vendor_relationships.get_mut(&e.vendor_id) {
            rel.tier = e.new_tier.clamp(1, 4);
            rel.weeks_at_tier = 0;
        }
    }
    Ok(state)
}

/// Apply the declared unit price across every location knowing the vendor
pub fn vendor_price_fluctuated(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::VendorPriceFluctuated(e) = &event.payload else {
        return Err(unexpected(event, "VendorPriceFluctuated"));
    };
    for location in state.locations.values_mut() {
        if let Some(rel) = location.vendor_relationships.get_mut(&e.vendor_id) {
            rel.current_unit_price = e.new_price_per_unit;
        }
    }
    Ok(state)
}

/// Opening a negotiation introduces the vendor to the location
pub fn vendor_negotiation_initiated(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::VendorNegotiationInitiated(e) = &event.payload else {
        return Err(unexpected(event, "VendorNegotiationInitiated"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        relationship(location, &e.vendor_id);
    }
    Ok(state)
}

/// A granted discount lowers the unit price multiplier
pub fn vendor_negotiation_result(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::VendorNegotiationResult(e) = &event.payload else {
        return Err(unexpected(event, "VendorNegotiationResult"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        let rel = relationship(location, &e.vendor_id);
        if e.outcome != NegotiationOutcome::Rejected && e.granted_discount > 0.0 {
            rel.current_unit_price = (1.0 - e.granted_discount).max(0.1);
        }
    }
    Ok(state)
}

/// The terms record stands alone; structural changes have their own events
pub fn vendor_terms_updated(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::VendorTermsUpdated(_) = &event.payload else {
        return Err(unexpected(event, "VendorTermsUpdated"));
    };
    Ok(state)
}

/// Mark the relationship exclusive until the declared week
pub fn exclusive_contract_signed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::ExclusiveContractSigned(e) = &event.payload else {
        return Err(unexpected(event, "ExclusiveContractSigned"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        let rel = relationship(location, &e.vendor_id);
        rel.exclusive_contract = true;
        rel.exclusive_until_week = Some(event.week + e.duration_weeks);
    }
    Ok(state)
}

/// Release the exclusivity flag
pub fn exclusive_contract_cancelled(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::ExclusiveContractCancelled(e) = &event.payload else {
        return Err(unexpected(event, "ExclusiveContractCancelled"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        if let Some(rel) = location.vendor_relationships.get_mut(&e.vendor_id) {
            rel.exclusive_contract = false;
            rel.exclusive_until_week = None;
        }
    }
    Ok(state)
}

/// Flag the vendor as disrupted everywhere
pub fn delivery_disruption_started(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::DeliveryDisruptionStarted(e) = &event.payload else {
        return Err(unexpected(event, "DeliveryDisruptionStarted"));
    };
    for location in state.locations.values_mut() {
        if let Some(rel) = location.vendor_relationships.get_mut(&e.vendor_id) {
            rel.disrupted = true;
        }
    }
    Ok(state)
}

/// Clear the disruption flag everywhere
pub fn delivery_disruption_ended(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::DeliveryDisruptionEnded(e) = &event.payload else {
        return Err(unexpected(event, "DeliveryDisruptionEnded"));
    };
    for location in state.locations.values_mut() {
        if let Some(rel) = location.vendor_relationships.get_mut(&e.vendor_id) {
            rel.disrupted = false;
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{
        ExclusiveContractSigned, VendorNegotiationInitiated, VendorNegotiationResult,
    };

    fn state_with_location() -> AgentState {
        let mut state = AgentState::zero("P001");
        state
            .locations
            .insert("LOC_001".to_string(), LocationState::new("LOC_001", "Z", 1_000.0));
        state
    }

    #[test]
    fn test_negotiation_introduces_vendor_then_discount_applies() {
        let state = state_with_location();
        let initiated = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::VendorNegotiationInitiated(VendorNegotiationInitiated {
                location_id: "LOC_001".to_string(),
                vendor_id: "CLEANCO".to_string(),
                requested_discount: 0.1,
                proposal: "volume deal".to_string(),
            }),
        );
        let state = vendor_negotiation_initiated(state, &initiated).unwrap();
        assert!(state.locations["LOC_001"]
            .vendor_relationships
            .contains_key("CLEANCO"));

        let result = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::VendorNegotiationResult(VendorNegotiationResult {
                location_id: "LOC_001".to_string(),
                vendor_id: "CLEANCO".to_string(),
                outcome: NegotiationOutcome::Accepted,
                granted_discount: 0.1,
                reason: "strong payment record".to_string(),
            }),
        );
        let state = vendor_negotiation_result(state, &result).unwrap();
        let rel = &state.locations["LOC_001"].vendor_relationships["CLEANCO"];
        assert!((rel.current_unit_price - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_exclusive_contract_sets_window() {
        let state = state_with_location();
        let event = GameEvent::seal(
            "P001",
            4,
            0,
            None,
            EventPayload::ExclusiveContractSigned(ExclusiveContractSigned {
                location_id: "LOC_001".to_string(),
                vendor_id: "CLEANCO".to_string(),
                duration_weeks: 12,
                volume_commitment_loads: 5_000,
            }),
        );
        let state = exclusive_contract_signed(state, &event).unwrap();
        let rel = &state.locations["LOC_001"].vendor_relationships["CLEANCO"];
        assert!(rel.exclusive_contract);
        assert_eq!(rel.exclusive_until_week, Some(16));
    }
}
