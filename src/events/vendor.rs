// Copyright 2025 Cowboy AI, LLC.

//! Vendor relationship events

use crate::state::{DisruptionKind, NegotiationOutcome};
use serde::{Deserialize, Serialize};

/// A vendor relationship moved up a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTierPromoted {
    /// Vendor promoted
    pub vendor_id: String,
    /// New tier
    pub new_tier: u8,
    /// Why the tier moved
    pub reason: String,
}

/// A vendor relationship dropped a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTierDemoted {
    /// Vendor demoted
    pub vendor_id: String,
    /// New tier
    pub new_tier: u8,
    /// Why the tier moved
    pub reason: String,
}

/// Market conditions moved a vendor's unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorPriceFluctuated {
    /// Vendor affected
    pub vendor_id: String,
    /// Previous unit price multiplier
    pub old_price_per_unit: f64,
    /// New unit price multiplier
    pub new_price_per_unit: f64,
}

/// A negotiation was opened with a vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorNegotiationInitiated {
    /// Location negotiating
    pub location_id: String,
    /// Vendor approached
    pub vendor_id: String,
    /// Requested discount fraction
    pub requested_discount: f64,
    /// The pitch
    pub proposal: String,
}

/// A negotiation concluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorNegotiationResult {
    /// Location that negotiated
    pub location_id: String,
    /// Vendor that responded
    pub vendor_id: String,
    /// Accept / counter / reject
    pub outcome: NegotiationOutcome,
    /// Discount actually granted (zero on rejection)
    pub granted_discount: f64,
    /// Vendor's stated reasoning
    pub reason: String,
}

/// Vendor terms changed outside a negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTermsUpdated {
    /// Location affected
    pub location_id: String,
    /// Vendor whose terms changed
    pub vendor_id: String,
    /// What changed
    pub change_description: String,
    /// Week the change takes effect
    pub effective_week: u32,
}

/// An exclusive supply contract was signed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveContractSigned {
    /// Location bound by the contract
    pub location_id: String,
    /// Exclusive vendor
    pub vendor_id: String,
    /// Contract duration in weeks
    pub duration_weeks: u32,
    /// Committed volume in loads
    pub volume_commitment_loads: i64,
}

/// An exclusive contract was cancelled early
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveContractCancelled {
    /// Location released
    pub location_id: String,
    /// Vendor released
    pub vendor_id: String,
    /// Early-termination penalty paid
    pub penalty_amount: f64,
    /// Stated reason
    pub reason: String,
}

/// A vendor's deliveries became disrupted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDisruptionStarted {
    /// Vendor affected
    pub vendor_id: String,
    /// Disruption class
    pub disruption: DisruptionKind,
    /// Impact summary
    pub impact_description: String,
}

/// A vendor's deliveries recovered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDisruptionEnded {
    /// Vendor recovered
    pub vendor_id: String,
}
