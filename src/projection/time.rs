// Copyright 2025 Cowboy AI, LLC.

//! Time-cycle reducers (daily/weekly/monthly)

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::AgentState;

/// Wire the time-cycle reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("TimeAdvanced", time_advanced);
    registry.register("DailyRevenueProcessed", daily_revenue_processed);
    registry.register("WeeklyFixedCostsBilled", weekly_fixed_costs_billed);
    registry.register("InterestAccrued", interest_accrued);
    registry.register("TaxLiabilityCalculated", tax_liability_calculated);
    registry.register("MachineWearUpdated", machine_wear_updated);
    registry.register("MachineStatusChanged", machine_status_changed);
}

/// Move the calendar; a week rollover resets weekly accumulators and ages
/// tenure counters.
pub fn time_advanced(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::TimeAdvanced(e) = &event.payload else {
        return Err(unexpected(event, "TimeAdvanced"));
    };
    let week_rolled = e.new_week > state.current_week;
    state.current_week = e.new_week;
    state.current_day = e.new_day;
    if week_rolled {
        state.market_share_loads = 0.0;
        for location in state.locations.values_mut() {
            location.accumulated_revenue_week = 0.0;
            location.accumulated_cogs_week = 0.0;
            for staff in location.staff.values_mut() {
                staff.tenure_weeks += 1;
            }
            for rel in location.vendor_relationships.values_mut() {
                rel.weeks_at_tier += 1;
            }
        }
    }
    Ok(state)
}

/// Book a day of operations: weekly accumulators, inventory draw-down,
/// cleanliness. Cash moves only via the paired `FundsTransferred(REVENUE)`.
pub fn daily_revenue_processed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::DailyRevenueProcessed(e) = &event.payload else {
        return Err(unexpected(event, "DailyRevenueProcessed"));
    };
    state.market_share_loads += e.loads_processed as f64;
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.accumulated_revenue_week += e.revenue_generated;
        location.accumulated_cogs_week += e.utility_cost + e.supplies_cost;
        location.inventory_detergent =
            (location.inventory_detergent - e.loads_processed as i64).max(0);
        location.inventory_softener =
            (location.inventory_softener - (e.loads_processed as i64) / 2).max(0);
        location.cleanliness = e.cleanliness_after.clamp(0.0, 100.0);
    }
    Ok(state)
}

/// Book the week's fixed costs against the location's COGS accumulator
pub fn weekly_fixed_costs_billed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::WeeklyFixedCostsBilled(e) = &event.payload else {
        return Err(unexpected(event, "WeeklyFixedCostsBilled"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.accumulated_cogs_week += e.rent_cost + e.utilities_cost + e.staff_wages;
    }
    Ok(state)
}

/// Accrue interest onto the loan's balance and the debt total
pub fn interest_accrued(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::InterestAccrued(e) = &event.payload else {
        return Err(unexpected(event, "InterestAccrued"));
    };
    if let Some(loan) = state.loans.iter_mut().find(|l| l.loan_id == e.loan_id) {
        loan.outstanding += e.interest_amount;
        state.total_debt_owed += e.interest_amount;
        if loan.kind == crate::state::LoanKind::Loc {
            state.line_of_credit_balance += e.interest_amount;
        }
    }
    Ok(state)
}

/// Accrue the computed liability
pub fn tax_liability_calculated(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::TaxLiabilityCalculated(e) = &event.payload else {
        return Err(unexpected(event, "TaxLiabilityCalculated"));
    };
    state.current_tax_liability += e.tax_amount;
    Ok(state)
}

/// Apply declared wear; status changes arrive as their own events
pub fn machine_wear_updated(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::MachineWearUpdated(e) = &event.payload else {
        return Err(unexpected(event, "MachineWearUpdated"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        if let Some(machine) = location.equipment.get_mut(&e.machine_id) {
            machine.condition = e.new_condition.clamp(0.0, 100.0);
            machine.loads_processed_since_service = e.loads_processed_since_service;
        }
    }
    Ok(state)
}

/// Apply the declared status verbatim
pub fn machine_status_changed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::MachineStatusChanged(e) = &event.payload else {
        return Err(unexpected(event, "MachineStatusChanged"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        if let Some(machine) = location.equipment.get_mut(&e.machine_id) {
            machine.status = e.new_status;
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{
        DailyRevenueProcessed, MachineStatusChanged, MachineWearUpdated, TimeAdvanced,
    };
    use crate::state::{LocationState, MachineKind, MachineState, MachineStatus};

    fn state_with_location() -> AgentState {
        let mut state = AgentState::zero("P001");
        let mut location = LocationState::new("LOC_001", "DOWNTOWN", 1_200.0);
        location.equipment.insert(
            "M1".to_string(),
            MachineState {
                machine_id: "M1".to_string(),
                kind: MachineKind::Washer,
                status: MachineStatus::Operational,
                condition: 50.0,
                loads_processed_since_service: 100,
                last_maintenance_week: 0,
            },
        );
        state.locations.insert("LOC_001".to_string(), location);
        state
    }

    #[test]
    fn test_time_advance_rolls_week_and_resets_accumulators() {
        let mut state = state_with_location();
        state.current_week = 0;
        state.current_day = 6;
        state
            .locations
            .get_mut("LOC_001")
            .unwrap()
            .accumulated_revenue_week = 500.0;

        let event = GameEvent::seal(
            "P001",
            1,
            0,
            None,
            EventPayload::TimeAdvanced(TimeAdvanced {
                new_week: 1,
                new_day: 0,
            }),
        );
        let state = time_advanced(state, &event).unwrap();
        assert_eq!(state.current_week, 1);
        assert_eq!(state.current_day, 0);
        assert_eq!(
            state.locations["LOC_001"].accumulated_revenue_week,
            0.0
        );
    }

    #[test]
    fn test_daily_revenue_draws_inventory_but_not_cash() {
        let state = state_with_location();
        let cash_before = state.cash_balance;
        let event = GameEvent::seal(
            "P001",
            0,
            1,
            None,
            EventPayload::DailyRevenueProcessed(DailyRevenueProcessed {
                location_id: "LOC_001".to_string(),
                loads_processed: 20,
                revenue_generated: 70.0,
                utility_cost: 5.0,
                supplies_cost: 10.0,
                cleanliness_after: 79.2,
            }),
        );
        let state = daily_revenue_processed(state, &event).unwrap();
        assert_eq!(state.cash_balance, cash_before);
        let location = &state.locations["LOC_001"];
        assert_eq!(location.accumulated_revenue_week, 70.0);
        assert_eq!(location.inventory_detergent, 980);
        assert_eq!(location.inventory_softener, 490);
        assert!((location.cleanliness - 79.2).abs() < 1e-9);
        assert_eq!(state.market_share_loads, 20.0);
    }

    #[test]
    fn test_wear_clamps_condition_and_leaves_status() {
        let state = state_with_location();
        let event = GameEvent::seal(
            "P001",
            0,
            1,
            None,
            EventPayload::MachineWearUpdated(MachineWearUpdated {
                location_id: "LOC_001".to_string(),
                machine_id: "M1".to_string(),
                wear_amount: 60.0,
                new_condition: -10.0,
                loads_processed_since_service: 120,
            }),
        );
        let state = machine_wear_updated(state, &event).unwrap();
        let machine = &state.locations["LOC_001"].equipment["M1"];
        assert_eq!(machine.condition, 0.0);
        assert_eq!(machine.status, MachineStatus::Operational);
    }

    #[test]
    fn test_status_change_applies_declared_status() {
        let state = state_with_location();
        let event = GameEvent::seal(
            "P001",
            0,
            1,
            None,
            EventPayload::MachineStatusChanged(MachineStatusChanged {
                location_id: "LOC_001".to_string(),
                machine_id: "M1".to_string(),
                new_status: MachineStatus::Broken,
                reason: "condition depleted".to_string(),
            }),
        );
        let state = machine_status_changed(state, &event).unwrap();
        assert_eq!(
            state.locations["LOC_001"].equipment["M1"].status,
            MachineStatus::Broken
        );
    }
}
