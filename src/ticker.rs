// Copyright 2025 Cowboy AI, LLC.

//! Autonomous simulation ticker
//!
//! Generates the engine-driven facts of elapsed time: daily revenue and
//! machine wear, weekly fixed costs, scandal decay and fine settlement,
//! monthly interest and tax. The ticker is a generator from (state, days)
//! to an event list; it performs no I/O and never appends. It folds its own
//! output through the projection registry as it goes so later days see the
//! effects of earlier ones.

use crate::config::EngineConfig;
use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{
    DailyRevenueProcessed, EventPayload, FinePaid, FundsTransferred, GameEvent, InterestAccrued,
    MachineStatusChanged, MachineWearUpdated, ScandalMarkerDecayed, StockoutStarted,
    TaxLiabilityCalculated, TimeAdvanced, WeeklyFixedCostsBilled,
};
use crate::state::{
    AgentState, FineStatus, LocationState, MachineStatus, ServiceKind, SupplyKind, TransferKind,
};
use uuid::Uuid;

/// Condition at or below which a machine breaks down
pub const BROKEN_THRESHOLD: f64 = 10.0;

/// Average weeks per month, for prorating monthly rent
const WEEKS_PER_MONTH: f64 = 4.33;

/// Loads one operational machine can attract per day at baseline
const LOADS_PER_MACHINE: f64 = 8.0;

/// Share of daily loads going to each billed service
const SERVICE_SHARES: [(ServiceKind, f64); 3] = [
    (ServiceKind::StandardWash, 0.60),
    (ServiceKind::PremiumWash, 0.15),
    (ServiceKind::Dry, 0.25),
];

/// Daily cleanliness drift; staffed locations keep up better
const DAILY_CLEANLINESS_DRIFT: f64 = 0.8;

/// Generates autonomous events for the daily/weekly/monthly cycle.
#[derive(Debug, Clone)]
pub struct AutonomousTicker {
    config: EngineConfig,
}

impl AutonomousTicker {
    /// Create a ticker over the engine configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Generate every event implied by advancing `days` from `state`.
    ///
    /// Events for day `d` always precede events for day `d+1`. The supplied
    /// registry is used to fold generated events into a private working
    /// copy of the state; the caller's state is untouched.
    pub fn generate(
        &self,
        state: &AgentState,
        days: u32,
        reducers: &ProjectionRegistry,
        correlation_id: Option<Uuid>,
    ) -> DomainResult<Vec<GameEvent>> {
        let mut state = state.clone();
        let mut events = Vec::new();
        // Net cash flow observed during this tick, for the monthly tax base
        let mut month_net_income = 0.0;

        let mut emit = |state: &mut AgentState,
                        events: &mut Vec<GameEvent>,
                        week: u32,
                        day: u8,
                        payload: EventPayload|
         -> DomainResult<()> {
            let event = GameEvent::seal(state.agent_id.clone(), week, day, correlation_id, payload);
            *state = reducers.apply(std::mem::replace(state, AgentState::zero("")), &event)?;
            events.push(event);
            Ok(())
        };

        for _ in 0..days {
            let mut week = state.current_week;
            let mut day = state.current_day + 1;
            let week_rolled = day >= 7;
            if week_rolled {
                day = 0;
                week += 1;
            }

            emit(
                &mut state,
                &mut events,
                week,
                day,
                EventPayload::TimeAdvanced(TimeAdvanced {
                    new_week: week,
                    new_day: day,
                }),
            )?;

            // Daily operations per location
            let location_ids: Vec<String> = state.locations.keys().cloned().collect();
            let mut loads_today: Vec<(String, u32)> = Vec::new();
            for location_id in &location_ids {
                let Some(location) = state.locations.get(location_id) else {
                    continue;
                };
                let day_plan = self.plan_day(&state, location, week);
                let Some(plan) = day_plan else { continue };
                loads_today.push((location_id.clone(), plan.loads));

                emit(
                    &mut state,
                    &mut events,
                    week,
                    day,
                    EventPayload::DailyRevenueProcessed(DailyRevenueProcessed {
                        location_id: location_id.clone(),
                        loads_processed: plan.loads,
                        revenue_generated: plan.revenue,
                        utility_cost: plan.utility_cost,
                        supplies_cost: plan.supplies_cost,
                        cleanliness_after: plan.cleanliness_after,
                    }),
                )?;

                let net = plan.revenue - plan.utility_cost - plan.supplies_cost;
                month_net_income += net;
                let (amount, kind) = if net >= 0.0 {
                    (net, TransferKind::Revenue)
                } else {
                    (-net, TransferKind::Expense)
                };
                emit(
                    &mut state,
                    &mut events,
                    week,
                    day,
                    EventPayload::FundsTransferred(FundsTransferred {
                        amount,
                        kind,
                        description: format!("Daily takings at {location_id}"),
                    }),
                )?;

                if plan.detergent_ran_out {
                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::StockoutStarted(StockoutStarted {
                            location_id: location_id.clone(),
                            supply: SupplyKind::Detergent,
                        }),
                    )?;
                }
            }

            // Machine wear follows the day's operations
            for location_id in &location_ids {
                let Some(location) = state.locations.get(location_id) else {
                    continue;
                };
                let operational = location.operational_machine_count() as u32;
                if operational == 0 {
                    continue;
                }
                let day_loads = loads_today
                    .iter()
                    .find(|(id, _)| id == location_id)
                    .map(|(_, loads)| *loads)
                    .unwrap_or(0);
                let per_machine_loads = day_loads / operational;

                let machine_ids: Vec<String> = location
                    .equipment
                    .values()
                    .filter(|m| m.status == MachineStatus::Operational)
                    .map(|m| m.machine_id.clone())
                    .collect();
                for machine_id in machine_ids {
                    let Some(machine) = state
                        .locations
                        .get(location_id)
                        .and_then(|l| l.equipment.get(&machine_id))
                    else {
                        continue;
                    };
                    let usage_factor =
                        1.0 + machine.loads_processed_since_service as f64 / 1_000.0;
                    let wear = machine.kind.base_daily_wear() * usage_factor;
                    let old_condition = machine.condition;
                    let new_condition = (old_condition - wear).clamp(0.0, 100.0);
                    let loads_since = machine.loads_processed_since_service + per_machine_loads;

                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::MachineWearUpdated(MachineWearUpdated {
                            location_id: location_id.clone(),
                            machine_id: machine_id.clone(),
                            wear_amount: wear,
                            new_condition,
                            loads_processed_since_service: loads_since,
                        }),
                    )?;

                    if old_condition > BROKEN_THRESHOLD && new_condition <= BROKEN_THRESHOLD {
                        emit(
                            &mut state,
                            &mut events,
                            week,
                            day,
                            EventPayload::MachineStatusChanged(MachineStatusChanged {
                                location_id: location_id.clone(),
                                machine_id,
                                new_status: MachineStatus::Broken,
                                reason: "condition depleted".to_string(),
                            }),
                        )?;
                    }
                }
            }

            if week_rolled {
                // Weekly fixed costs per location
                for location_id in &location_ids {
                    let Some(location) = state.locations.get(location_id) else {
                        continue;
                    };
                    let rent_cost = location.monthly_rent / WEEKS_PER_MONTH;
                    let utilities_cost = self.config.weekly_insurance + self.config.weekly_overhead;
                    let staff_wages = location.weekly_wage_bill();
                    let total = rent_cost + utilities_cost + staff_wages;
                    month_net_income -= total;

                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::WeeklyFixedCostsBilled(WeeklyFixedCostsBilled {
                            location_id: location_id.clone(),
                            rent_cost,
                            utilities_cost,
                            staff_wages,
                        }),
                    )?;
                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::FundsTransferred(FundsTransferred {
                            amount: total,
                            kind: TransferKind::Expense,
                            description: format!("Weekly fixed costs at {location_id}"),
                        }),
                    )?;
                }

                // Scandal markers decay once a week
                let decays: Vec<(String, f64, f64)> = state
                    .active_scandals
                    .iter()
                    .map(|s| {
                        (
                            s.scandal_id.clone(),
                            s.decay_rate,
                            (s.severity - s.decay_rate).max(0.0),
                        )
                    })
                    .collect();
                for (scandal_id, decay_amount, remaining) in decays {
                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::ScandalMarkerDecayed(ScandalMarkerDecayed {
                            scandal_id,
                            decay_amount,
                            remaining_severity: remaining,
                        }),
                    )?;
                }

                // Fines past due are collected
                let due: Vec<(String, f64)> = state
                    .pending_fines
                    .iter()
                    .filter(|f| f.status == FineStatus::Open && f.due_week <= week)
                    .map(|f| (f.fine_id.clone(), f.amount))
                    .collect();
                for (fine_id, amount) in due {
                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::FinePaid(FinePaid {
                            fine_id: fine_id.clone(),
                            amount,
                        }),
                    )?;
                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::FundsTransferred(FundsTransferred {
                            amount,
                            kind: TransferKind::Fine,
                            description: format!("Fine {fine_id} collected"),
                        }),
                    )?;
                }

                // Month boundary: interest accrual and tax assessment
                if week % 4 == 0 {
                    let accruals: Vec<(String, f64, f64)> = state
                        .loans
                        .iter()
                        .map(|l| {
                            (
                                l.loan_id.clone(),
                                l.outstanding,
                                l.outstanding * l.interest_rate / 12.0,
                            )
                        })
                        .collect();
                    for (loan_id, outstanding, interest) in accruals {
                        emit(
                            &mut state,
                            &mut events,
                            week,
                            day,
                            EventPayload::InterestAccrued(InterestAccrued {
                                loan_id,
                                outstanding_balance: outstanding,
                                interest_amount: interest,
                            }),
                        )?;
                    }

                    let taxable_income = month_net_income.max(0.0);
                    emit(
                        &mut state,
                        &mut events,
                        week,
                        day,
                        EventPayload::TaxLiabilityCalculated(TaxLiabilityCalculated {
                            taxable_income,
                            tax_rate: self.config.tax_rate,
                            tax_amount: taxable_income * self.config.tax_rate,
                        }),
                    )?;
                    month_net_income = 0.0;
                }
            }
        }

        Ok(events)
    }

    /// Deterministic plan for one location-day; `None` when nothing happened
    fn plan_day(&self, state: &AgentState, location: &LocationState, week: u32) -> Option<DayPlan> {
        let operational = location.operational_machine_count() as f64;
        if operational == 0.0 {
            return None;
        }

        let marketing = if week < location.marketing_expires_week {
            location.marketing_boost
        } else {
            0.0
        };
        let base_loads = operational
            * LOADS_PER_MACHINE
            * (0.5 + location.cleanliness / 200.0)
            * (1.0 + marketing);
        let loyalty_multiplier =
            1.0 + (state.customer_loyalty_members.min(500) as f64) / 1_000.0;
        let scandal_penalty = 1.0 - 0.5 * state.total_scandal_severity().min(1.0);
        let own_price = location
            .active_pricing
            .get(&ServiceKind::StandardWash)
            .copied()
            .unwrap_or(3.50);
        let competitiveness = location
            .observed_competitor_prices
            .get(&ServiceKind::StandardWash)
            .map(|competitor| (competitor / own_price).clamp(0.5, 1.5))
            .unwrap_or(1.0);

        let mut loads =
            (base_loads * loyalty_multiplier * scandal_penalty * competitiveness).floor();
        // A detergent stockout turns half the customers away
        let stocked_out = location.inventory_detergent == 0;
        if stocked_out {
            loads = (loads / 2.0).floor();
        }
        let loads = loads.max(0.0) as u32;
        if loads == 0 {
            return None;
        }

        let revenue: f64 = SERVICE_SHARES
            .iter()
            .map(|(service, share)| {
                let price = location.active_pricing.get(service).copied().unwrap_or(0.0);
                loads as f64 * share * price
            })
            .sum();

        let supplied_loads = (loads as i64).min(location.inventory_detergent).max(0);
        let supplies_cost = supplied_loads as f64 * self.config.supplies_cost_per_load;
        let utility_cost = loads as f64 * self.config.utility_cost_per_load;

        let drift = if location.staff.is_empty() {
            DAILY_CLEANLINESS_DRIFT
        } else {
            DAILY_CLEANLINESS_DRIFT / 2.0
        };
        let cleanliness_after = (location.cleanliness - drift).clamp(0.0, 100.0);

        let detergent_ran_out =
            location.inventory_detergent > 0 && location.inventory_detergent <= loads as i64;

        Some(DayPlan {
            loads,
            revenue,
            utility_cost,
            supplies_cost,
            cleanliness_after,
            detergent_ran_out,
        })
    }
}

struct DayPlan {
    loads: u32,
    revenue: f64,
    utility_cost: f64,
    supplies_cost: f64,
    cleanliness_after: f64,
    detergent_ran_out: bool,
}
