// Copyright 2025 Cowboy AI, LLC.

//! Staffing command handlers

use crate::commands::{
    AdjustStaffWagePayload, Command, FireStaffPayload, HireStaffPayload, ProvideBenefitsPayload,
};
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    BenefitImplemented, EventDraft, EventPayload, FundsTransferred, StaffFired, StaffHired,
    StaffMoraleChanged, WageAdjusted,
};
use crate::state::{AgentState, LocationState, TransferKind};
use uuid::Uuid;

/// Morale hit taken by remaining staff when a colleague is fired
const FIRING_MORALE_HIT: f64 = 5.0;
/// Morale gained from a raise
const RAISE_MORALE_GAIN: f64 = 5.0;
/// Morale gained from a new benefit program
const BENEFIT_MORALE_GAIN: f64 = 10.0;

fn location<'a>(state: &'a AgentState, location_id: &str) -> DomainResult<&'a LocationState> {
    state
        .locations
        .get(location_id)
        .ok_or_else(|| DomainError::LocationNotFound(location_id.to_string()))
}

fn expense(amount: f64, description: String) -> EventDraft {
    EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
        amount,
        kind: TransferKind::Expense,
        description,
    }))
}

/// `HIRE_STAFF`: add an employee at or above the statutory wage floor
pub struct HireStaffHandler {
    /// Statutory minimum hourly wage
    pub minimum_wage: f64,
}

impl CommandHandler for HireStaffHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: HireStaffPayload = command.parse_payload()?;

        location(state, &payload.location_id)?;
        if payload.name.is_empty() {
            return Err(DomainError::InvalidState(
                "staff name is required".to_string(),
            ));
        }
        if payload.hourly_rate < self.minimum_wage {
            return Err(DomainError::InvalidState(format!(
                "hourly rate {:.2} is below the statutory minimum {:.2}",
                payload.hourly_rate, self.minimum_wage
            )));
        }
        if payload.hiring_bonus < 0.0 {
            return Err(DomainError::InvalidState(
                "hiring bonus cannot be negative".to_string(),
            ));
        }
        if !state.can_afford(payload.hiring_bonus) {
            return Err(DomainError::InsufficientFunds {
                required: payload.hiring_bonus,
                available: state.available_funds(),
            });
        }

        let mut drafts = vec![EventDraft::own(EventPayload::StaffHired(StaffHired {
            location_id: payload.location_id.clone(),
            staff_id: Uuid::new_v4().to_string(),
            staff_name: payload.name.clone(),
            role: payload.role,
            hourly_rate: payload.hourly_rate,
        }))];
        if payload.hiring_bonus > 0.0 {
            drafts.push(expense(
                payload.hiring_bonus,
                format!("Hiring bonus for {}", payload.name),
            ));
        }
        Ok(drafts)
    }
}

/// `FIRE_STAFF`: terminate an employee; the rest of the roster notices
pub struct FireStaffHandler;

impl CommandHandler for FireStaffHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: FireStaffPayload = command.parse_payload()?;

        let loc = location(state, &payload.location_id)?;
        if !loc.staff.contains_key(&payload.staff_id) {
            return Err(DomainError::StaffNotFound(payload.staff_id));
        }
        if payload.severance_cost < 0.0 {
            return Err(DomainError::InvalidState(
                "severance cannot be negative".to_string(),
            ));
        }
        if !state.can_afford(payload.severance_cost) {
            return Err(DomainError::InsufficientFunds {
                required: payload.severance_cost,
                available: state.available_funds(),
            });
        }

        let mut drafts = vec![EventDraft::own(EventPayload::StaffFired(StaffFired {
            location_id: payload.location_id.clone(),
            staff_id: payload.staff_id.clone(),
            reason: payload.reason.clone(),
            severance_cost: payload.severance_cost,
        }))];
        if payload.severance_cost > 0.0 {
            drafts.push(expense(
                payload.severance_cost,
                format!("Severance payment for {}", payload.staff_id),
            ));
        }
        for staff in loc.staff.values() {
            if staff.staff_id == payload.staff_id {
                continue;
            }
            drafts.push(EventDraft::own(EventPayload::StaffMoraleChanged(
                StaffMoraleChanged {
                    location_id: payload.location_id.clone(),
                    staff_id: staff.staff_id.clone(),
                    delta: -FIRING_MORALE_HIT,
                    new_morale: (staff.morale - FIRING_MORALE_HIT).clamp(0.0, 100.0),
                },
            )));
        }
        Ok(drafts)
    }
}

/// `ADJUST_STAFF_WAGE`: change an employee's hourly rate
pub struct AdjustStaffWageHandler;

impl CommandHandler for AdjustStaffWageHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: AdjustStaffWagePayload = command.parse_payload()?;

        let loc = location(state, &payload.location_id)?;
        let staff = loc
            .staff
            .get(&payload.staff_id)
            .ok_or_else(|| DomainError::StaffNotFound(payload.staff_id.clone()))?;
        if payload.new_hourly_rate <= 0.0 {
            return Err(DomainError::InvalidState(
                "hourly rate must be positive".to_string(),
            ));
        }

        let mut drafts = vec![EventDraft::own(EventPayload::WageAdjusted(WageAdjusted {
            location_id: payload.location_id.clone(),
            staff_id: payload.staff_id.clone(),
            old_rate: staff.hourly_rate,
            new_rate: payload.new_hourly_rate,
        }))];
        if payload.new_hourly_rate > staff.hourly_rate {
            drafts.push(EventDraft::own(EventPayload::StaffMoraleChanged(
                StaffMoraleChanged {
                    location_id: payload.location_id.clone(),
                    staff_id: payload.staff_id.clone(),
                    delta: RAISE_MORALE_GAIN,
                    new_morale: (staff.morale + RAISE_MORALE_GAIN).clamp(0.0, 100.0),
                },
            )));
        }
        Ok(drafts)
    }
}

/// `PROVIDE_BENEFITS`: fund a benefit program for a location's staff
pub struct ProvideBenefitsHandler;

impl CommandHandler for ProvideBenefitsHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: ProvideBenefitsPayload = command.parse_payload()?;

        let loc = location(state, &payload.location_id)?;
        if loc.staff.is_empty() {
            return Err(DomainError::InvalidState(
                "location has no staff to cover".to_string(),
            ));
        }
        if payload.annual_cost_per_employee <= 0.0 {
            return Err(DomainError::InvalidState(
                "annual cost must be positive".to_string(),
            ));
        }
        let employee_count = loc.staff.len() as u32;
        let total = payload.annual_cost_per_employee * employee_count as f64;
        if !state.can_afford(total) {
            return Err(DomainError::InsufficientFunds {
                required: total,
                available: state.available_funds(),
            });
        }

        let mut drafts = vec![
            EventDraft::own(EventPayload::BenefitImplemented(BenefitImplemented {
                location_id: payload.location_id.clone(),
                benefit: payload.benefit,
                annual_cost_per_employee: payload.annual_cost_per_employee,
                employee_count,
            })),
            expense(
                total,
                format!(
                    "Benefit implementation: {:?} at {}",
                    payload.benefit, payload.location_id
                ),
            ),
        ];
        for staff in loc.staff.values() {
            drafts.push(EventDraft::own(EventPayload::StaffMoraleChanged(
                StaffMoraleChanged {
                    location_id: payload.location_id.clone(),
                    staff_id: staff.staff_id.clone(),
                    delta: BENEFIT_MORALE_GAIN,
                    new_morale: (staff.morale + BENEFIT_MORALE_GAIN).clamp(0.0, 100.0),
                },
            )));
        }
        Ok(drafts)
    }
}
