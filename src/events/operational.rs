// Copyright 2025 Cowboy AI, LLC.

//! Operational events: equipment, supplies, premises, locations

use crate::state::{MachineKind, MaintenanceKind, SupplyKind};
use serde::{Deserialize, Serialize};

/// A machine was purchased and installed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPurchased {
    /// Location the machine was installed at
    pub location_id: String,
    /// Fresh machine id
    pub machine_id: String,
    /// Equipment kind
    pub machine_kind: MachineKind,
    /// Price paid for this unit
    pub purchase_price: f64,
}

/// A machine was sold off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSold {
    /// Location the machine was removed from
    pub location_id: String,
    /// Machine id
    pub machine_id: String,
    /// Sale proceeds
    pub sale_price: f64,
}

/// A machine was serviced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRepaired {
    /// Location of the machine
    pub location_id: String,
    /// Machine id
    pub machine_id: String,
    /// Service tier performed
    pub maintenance_kind: MaintenanceKind,
    /// Cost of the service
    pub maintenance_cost: f64,
    /// Condition after the service
    pub new_condition: f64,
}

/// The premises were professionally cleaned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremisesCleaned {
    /// Location cleaned
    pub location_id: String,
    /// Cleaning cost
    pub cost: f64,
    /// Cleanliness after the cleaning
    pub new_cleanliness: f64,
}

/// Supplies were delivered into inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppliesAcquired {
    /// Receiving location
    pub location_id: String,
    /// Supply class
    pub supply: SupplyKind,
    /// Loads worth delivered
    pub quantity_loads: i64,
    /// Total cost
    pub cost: f64,
}

/// A supply class ran out at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutStarted {
    /// Affected location
    pub location_id: String,
    /// Depleted supply class
    pub supply: SupplyKind,
}

/// A depleted supply class was restocked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutEnded {
    /// Affected location
    pub location_id: String,
    /// Restocked supply class
    pub supply: SupplyKind,
}

/// A new location opened for business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOpened {
    /// Fresh location id
    pub location_id: String,
    /// Zone label
    pub zone: String,
    /// Monthly rent
    pub monthly_rent: f64,
    /// One-time setup investment
    pub initial_investment: f64,
}

/// A location closed permanently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationClosed {
    /// Closed location
    pub location_id: String,
    /// Why it closed
    pub reason: String,
}

/// A storefront listing became available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationListingAdded {
    /// Listing id
    pub listing_id: String,
    /// Zone label
    pub zone: String,
    /// Monthly rent if opened
    pub monthly_rent: f64,
    /// One-time setup cost
    pub setup_cost: f64,
    /// Listing copy
    pub description: String,
}

/// A storefront listing was withdrawn or consumed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationListingRemoved {
    /// Listing id
    pub listing_id: String,
}
