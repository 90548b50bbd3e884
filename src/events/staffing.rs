// Copyright 2025 Cowboy AI, LLC.

//! Staffing events

use crate::state::{BenefitKind, StaffRole};
use serde::{Deserialize, Serialize};

/// An employee was hired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffHired {
    /// Location the hire works at
    pub location_id: String,
    /// Fresh staff id
    pub staff_id: String,
    /// Display name
    pub staff_name: String,
    /// Role
    pub role: StaffRole,
    /// Agreed hourly wage
    pub hourly_rate: f64,
}

/// An employee was terminated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffFired {
    /// Location the employee worked at
    pub location_id: String,
    /// Staff id
    pub staff_id: String,
    /// Stated reason
    pub reason: String,
    /// Severance paid
    pub severance_cost: f64,
}

/// An employee resigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffQuit {
    /// Location the employee worked at
    pub location_id: String,
    /// Staff id
    pub staff_id: String,
    /// Stated reason
    pub reason: String,
}

/// An employee's wage changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageAdjusted {
    /// Location of the employee
    pub location_id: String,
    /// Staff id
    pub staff_id: String,
    /// Previous rate
    pub old_rate: f64,
    /// New rate
    pub new_rate: f64,
}

/// A benefit program went into effect at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitImplemented {
    /// Location covered
    pub location_id: String,
    /// Program kind
    pub benefit: BenefitKind,
    /// Annual cost per covered employee
    pub annual_cost_per_employee: f64,
    /// Employees covered at implementation
    pub employee_count: u32,
}

/// An employee's morale moved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMoraleChanged {
    /// Location of the employee
    pub location_id: String,
    /// Staff id
    pub staff_id: String,
    /// Morale delta applied
    pub delta: f64,
    /// Morale after the change, clamped to [0, 100]
    pub new_morale: f64,
}
