// Copyright 2025 Cowboy AI, LLC.

//! Time-driven events emitted by the autonomous ticker

use crate::state::MachineStatus;
use serde::{Deserialize, Serialize};

/// The simulation clock moved forward one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAdvanced {
    /// Week after the advance
    pub new_week: u32,
    /// Day within the week after the advance (0-6)
    pub new_day: u8,
}

/// A location finished a day of operations.
///
/// Informational for cash: the paired `FundsTransferred(REVENUE)` carries the
/// net take so the balance is only moved once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenueProcessed {
    /// Location that operated
    pub location_id: String,
    /// Loads processed during the day
    pub loads_processed: u32,
    /// Gross revenue for the day
    pub revenue_generated: f64,
    /// Utility cost for the day
    pub utility_cost: f64,
    /// Supplies consumed, priced for the day
    pub supplies_cost: f64,
    /// Cleanliness after the day's traffic
    pub cleanliness_after: f64,
}

/// Weekly fixed costs fell due: rent, utilities overhead, and staff wages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyFixedCostsBilled {
    /// Location billed
    pub location_id: String,
    /// Weekly portion of rent
    pub rent_cost: f64,
    /// Insurance and overhead
    pub utilities_cost: f64,
    /// Wage bill for the week
    pub staff_wages: f64,
}

/// Monthly interest accrued onto one outstanding loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestAccrued {
    /// The loan accruing interest
    pub loan_id: String,
    /// Balance before accrual
    pub outstanding_balance: f64,
    /// Interest added to the balance
    pub interest_amount: f64,
}

/// Monthly tax liability was computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLiabilityCalculated {
    /// Net income the tax was computed on
    pub taxable_income: f64,
    /// Rate applied
    pub tax_rate: f64,
    /// Liability added
    pub tax_amount: f64,
}

/// A machine wore down from the day's usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineWearUpdated {
    /// Location of the machine
    pub location_id: String,
    /// Machine id
    pub machine_id: String,
    /// Condition removed by the wear
    pub wear_amount: f64,
    /// Condition after wear, already clamped to [0, 100]
    pub new_condition: f64,
    /// Loads processed since the last service, after the day
    pub loads_processed_since_service: u32,
}

/// A machine's operational status changed.
///
/// The reducer applies `new_status` verbatim; the rule that decided the
/// change lives with whichever producer emitted the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineStatusChanged {
    /// Location of the machine
    pub location_id: String,
    /// Machine id
    pub machine_id: String,
    /// Status declared by the producer
    pub new_status: MachineStatus,
    /// Why the status changed
    pub reason: String,
}
