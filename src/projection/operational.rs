// Copyright 2025 Cowboy AI, LLC.

//! Operational reducers: equipment, supplies, premises, locations

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::{AgentState, LocationListing, LocationState, MachineState, MachineStatus, SupplyKind};

/// Wire the operational reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("EquipmentPurchased", equipment_purchased);
    registry.register("EquipmentSold", equipment_sold);
    registry.register("EquipmentRepaired", equipment_repaired);
    registry.register("PremisesCleaned", premises_cleaned);
    registry.register("SuppliesAcquired", supplies_acquired);
    registry.register("StockoutStarted", stockout_started);
    registry.register("StockoutEnded", stockout_ended);
    registry.register("LocationOpened", location_opened);
    registry.register("LocationClosed", location_closed);
    registry.register("LocationListingAdded", location_listing_added);
    registry.register("LocationListingRemoved", location_listing_removed);
}

/// Install a factory-fresh machine
pub fn equipment_purchased(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::EquipmentPurchased(e) = &event.payload else {
        return Err(unexpected(event, "EquipmentPurchased"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.equipment.insert(
            e.machine_id.clone(),
            MachineState {
                machine_id: e.machine_id.clone(),
                kind: e.machine_kind,
                status: MachineStatus::Operational,
                condition: 100.0,
                loads_processed_since_service: 0,
                last_maintenance_week: event.week,
            },
        );
    }
    Ok(state)
}

/// Remove a sold machine
pub fn equipment_sold(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::EquipmentSold(e) = &event.payload else {
        return Err(unexpected(event, "EquipmentSold"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.equipment.remove(&e.machine_id);
    }
    Ok(state)
}

/// Restore a serviced machine to the declared condition
pub fn equipment_repaired(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::EquipmentRepaired(e) = &event.payload else {
        return Err(unexpected(event, "EquipmentRepaired"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        if let Some(machine) = location.equipment.get_mut(&e.machine_id) {
            machine.condition = e.new_condition.clamp(0.0, 100.0);
            machine.status = MachineStatus::Operational;
            machine.loads_processed_since_service = 0;
            machine.last_maintenance_week = event.week;
        }
    }
    Ok(state)
}

/// Set cleanliness to the declared post-cleaning level
pub fn premises_cleaned(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::PremisesCleaned(e) = &event.payload else {
        return Err(unexpected(event, "PremisesCleaned"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.cleanliness = e.new_cleanliness.clamp(0.0, 100.0);
    }
    Ok(state)
}

/// Add delivered supplies into inventory
pub fn supplies_acquired(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::SuppliesAcquired(e) = &event.payload else {
        return Err(unexpected(event, "SuppliesAcquired"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        match e.supply {
            SupplyKind::Detergent => location.inventory_detergent += e.quantity_loads,
            SupplyKind::Softener => location.inventory_softener += e.quantity_loads,
        }
    }
    Ok(state)
}

/// The stockout marker is the record; inventory already reads zero
pub fn stockout_started(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::StockoutStarted(_) = &event.payload else {
        return Err(unexpected(event, "StockoutStarted"));
    };
    Ok(state)
}

/// Recovery marker; the restock itself arrives as SuppliesAcquired
pub fn stockout_ended(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::StockoutEnded(_) = &event.payload else {
        return Err(unexpected(event, "StockoutEnded"));
    };
    Ok(state)
}

/// Create the location with baseline pricing and inventory
pub fn location_opened(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::LocationOpened(e) = &event.payload else {
        return Err(unexpected(event, "LocationOpened"));
    };
    state.locations.insert(
        e.location_id.clone(),
        LocationState::new(e.location_id.clone(), e.zone.clone(), e.monthly_rent),
    );
    Ok(state)
}

/// Remove a closed location
pub fn location_closed(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::LocationClosed(e) = &event.payload else {
        return Err(unexpected(event, "LocationClosed"));
    };
    state.locations.remove(&e.location_id);
    Ok(state)
}

/// Record an available storefront
pub fn location_listing_added(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::LocationListingAdded(e) = &event.payload else {
        return Err(unexpected(event, "LocationListingAdded"));
    };
    state.available_listings.insert(
        e.listing_id.clone(),
        LocationListing {
            listing_id: e.listing_id.clone(),
            zone: e.zone.clone(),
            monthly_rent: e.monthly_rent,
            setup_cost: e.setup_cost,
            description: e.description.clone(),
        },
    );
    Ok(state)
}

/// Withdraw a storefront listing
pub fn location_listing_removed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::LocationListingRemoved(e) = &event.payload else {
        return Err(unexpected(event, "LocationListingRemoved"));
    };
    state.available_listings.remove(&e.listing_id);
    Ok(state)
}
