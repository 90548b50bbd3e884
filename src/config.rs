// Copyright 2025 Cowboy AI, LLC.

//! Engine configuration
//!
//! Economic constants that hosts may tune. Defaults reproduce the balance
//! of the reference simulation.

use serde::{Deserialize, Serialize};

/// Tunable constants shared by handlers, the ticker, and the regulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cash granted to a freshly created agent
    pub starting_cash: f64,

    /// Line-of-credit ceiling for a freshly created agent
    pub starting_credit_limit: f64,

    /// Credit rating for a freshly created agent (0-100)
    pub starting_credit_rating: u8,

    /// Identifier of the starter location seeded by `create_agent`
    pub starting_location_id: String,

    /// Zone label of the starter location
    pub starting_zone: String,

    /// Monthly rent of the starter location
    pub starting_monthly_rent: f64,

    /// Statutory minimum hourly wage; hiring or adjusting below this is a
    /// labor violation
    pub minimum_wage: f64,

    /// Estimated all-in cost of servicing one load, used by the regulator's
    /// predatory-pricing check
    pub cost_per_load: f64,

    /// Fraction of `cost_per_load` below which a price is predatory
    pub predatory_margin: f64,

    /// Fine issued for a predatory-pricing finding
    pub predatory_fine: f64,

    /// Fine issued for a labor violation
    pub labor_fine: f64,

    /// Flat corporate tax rate applied to monthly net income
    pub tax_rate: f64,

    /// Weekly insurance cost per location
    pub weekly_insurance: f64,

    /// Weekly miscellaneous fixed costs per location
    pub weekly_overhead: f64,

    /// Supplies cost per processed load
    pub supplies_cost_per_load: f64,

    /// Utility cost per processed load
    pub utility_cost_per_load: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_cash: 10_000.0,
            starting_credit_limit: 5_000.0,
            starting_credit_rating: 50,
            starting_location_id: "LOC_001".to_string(),
            starting_zone: "DOWNTOWN".to_string(),
            starting_monthly_rent: 1_200.0,
            minimum_wage: 7.25,
            cost_per_load: 0.75,
            predatory_margin: 0.8,
            predatory_fine: 500.0,
            labor_fine: 1_500.0,
            tax_rate: 0.21,
            weekly_insurance: 150.0,
            weekly_overhead: 50.0,
            supplies_cost_per_load: 0.50,
            utility_cost_per_load: 0.25,
        }
    }
}

impl EngineConfig {
    /// Price below which a service is considered predatory
    pub fn predatory_threshold(&self) -> f64 {
        self.cost_per_load * self.predatory_margin
    }
}
