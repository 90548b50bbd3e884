// Copyright 2025 Cowboy AI, LLC.

//! Staffing reducers

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::{AgentState, StaffMember};

/// Wire the staffing reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("StaffHired", staff_hired);
    registry.register("StaffFired", staff_fired);
    registry.register("StaffQuit", staff_quit);
    registry.register("WageAdjusted", wage_adjusted);
    registry.register("BenefitImplemented", benefit_implemented);
    registry.register("StaffMoraleChanged", staff_morale_changed);
}

/// Add the new hire to the location roster
pub fn staff_hired(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::StaffHired(e) = &event.payload else {
        return Err(unexpected(event, "StaffHired"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.staff.insert(
            e.staff_id.clone(),
            StaffMember {
                staff_id: e.staff_id.clone(),
                name: e.staff_name.clone(),
                role: e.role,
                hourly_rate: e.hourly_rate,
                morale: 70.0,
                tenure_weeks: 0,
                hired_week: event.week,
            },
        );
    }
    Ok(state)
}

/// Remove a terminated employee
pub fn staff_fired(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::StaffFired(e) = &event.payload else {
        return Err(unexpected(event, "StaffFired"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.staff.remove(&e.staff_id);
    }
    Ok(state)
}

/// Remove a resigned employee
pub fn staff_quit(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::StaffQuit(e) = &event.payload else {
        return Err(unexpected(event, "StaffQuit"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.staff.remove(&e.staff_id);
    }
    Ok(state)
}

/// Apply the declared new wage
pub fn wage_adjusted(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::WageAdjusted(e) = &event.payload else {
        return Err(unexpected(event, "WageAdjusted"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        if let Some(staff) = location.staff.get_mut(&e.staff_id) {
            staff.hourly_rate = e.new_rate;
        }
    }
    Ok(state)
}

/// The benefit record stands alone; morale moves via StaffMoraleChanged
pub fn benefit_implemented(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::BenefitImplemented(_) = &event.payload else {
        return Err(unexpected(event, "BenefitImplemented"));
    };
    Ok(state)
}

/// Apply the declared morale level
pub fn staff_morale_changed(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::StaffMoraleChanged(e) = &event.payload else {
        return Err(unexpected(event, "StaffMoraleChanged"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        if let Some(staff) = location.staff.get_mut(&e.staff_id) {
            staff.morale = e.new_morale.clamp(0.0, 100.0);
        }
    }
    Ok(state)
}
