// Copyright 2025 Cowboy AI, LLC.

//! Financial events: cash movement, debt, pricing, marketing, tax

use crate::state::{CampaignKind, LoanKind, ServiceKind, TransferKind};
use serde::{Deserialize, Serialize};

/// Cash moved in or out of the agent's balance.
///
/// `amount` is always positive; `kind` determines the direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsTransferred {
    /// Positive amount moved
    pub amount: f64,
    /// Transfer class; credits for REVENUE/LOAN/REFUND, debits otherwise
    pub kind: TransferKind,
    /// Human-readable description of the movement
    pub description: String,
}

/// A loan was disbursed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTaken {
    /// Loan id
    pub loan_id: String,
    /// Loan product
    pub kind: LoanKind,
    /// Principal disbursed
    pub principal: f64,
    /// Annual interest rate fixed at origination
    pub interest_rate: f64,
    /// Term in weeks; zero means revolving
    pub term_weeks: u32,
}

/// A debt payment was applied to a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPaymentProcessed {
    /// Loan paid against
    pub loan_id: String,
    /// Total payment amount
    pub amount_paid: f64,
    /// Portion applied to principal
    pub principal_reduction: f64,
    /// Portion applied to interest
    pub interest_paid: f64,
    /// Outstanding balance after the payment
    pub remaining_balance: f64,
}

/// A loan went into default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultRecorded {
    /// Defaulted loan
    pub loan_id: String,
    /// Balance at default
    pub amount_owed: f64,
    /// Penalty added on top
    pub penalty_amount: f64,
}

/// A service price changed at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSet {
    /// Location repriced
    pub location_id: String,
    /// Service repriced
    pub service: ServiceKind,
    /// New price
    pub new_price: f64,
}

/// A marketing campaign went live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingBoostApplied {
    /// Location promoted
    pub location_id: String,
    /// Campaign channel
    pub campaign_kind: CampaignKind,
    /// Campaign spend
    pub marketing_cost: f64,
    /// Customer attraction boost, as a fraction
    pub attraction_boost: f64,
    /// Weeks the boost lasts
    pub duration_weeks: u32,
}

/// The applicable tax rate changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracketAdjusted {
    /// New flat rate
    pub new_tax_rate: f64,
    /// Why the bracket moved
    pub reason: String,
}
