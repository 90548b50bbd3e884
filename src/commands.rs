// Copyright 2025 Cowboy AI, LLC.

//! Player commands
//!
//! Commands represent requests to change state. They are processed by command
//! handlers which validate business rules and emit events; a command returns
//! only an acknowledgment, never data.
//!
//! The wire form is a kind string, an agent id, and a string-keyed payload
//! map. Each kind has a typed payload struct that handlers deserialize the
//! map into; the structs derive [`schemars::JsonSchema`] so hosts can expose
//! tool schemas to an LLM driver.

use crate::errors::{DomainError, DomainResult};
use crate::state::{
    AllianceKind, BenefitKind, CampaignKind, CharityKind, CommunicationChannel, LoanKind,
    MachineKind, MaintenanceKind, ReportKind, ResolutionKind, ServiceKind, StaffRole, SupplyKind,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical command kind strings
pub mod kinds {
    /// Set a service price at a location
    pub const SET_PRICE: &str = "SET_PRICE";
    /// Take out a loan
    pub const TAKE_LOAN: &str = "TAKE_LOAN";
    /// Pay down a debt
    pub const MAKE_DEBT_PAYMENT: &str = "MAKE_DEBT_PAYMENT";
    /// Run a marketing campaign
    pub const INVEST_IN_MARKETING: &str = "INVEST_IN_MARKETING";
    /// Buy machines
    pub const BUY_EQUIPMENT: &str = "BUY_EQUIPMENT";
    /// Sell a machine
    pub const SELL_EQUIPMENT: &str = "SELL_EQUIPMENT";
    /// Service machines or clean the premises
    pub const PERFORM_MAINTENANCE: &str = "PERFORM_MAINTENANCE";
    /// Emergency-repair a broken machine
    pub const FIX_MACHINE: &str = "FIX_MACHINE";
    /// Buy supplies into inventory
    pub const BUY_SUPPLIES: &str = "BUY_SUPPLIES";
    /// Open a new location
    pub const OPEN_NEW_LOCATION: &str = "OPEN_NEW_LOCATION";
    /// Hire an employee
    pub const HIRE_STAFF: &str = "HIRE_STAFF";
    /// Terminate an employee
    pub const FIRE_STAFF: &str = "FIRE_STAFF";
    /// Change an employee's wage
    pub const ADJUST_STAFF_WAGE: &str = "ADJUST_STAFF_WAGE";
    /// Implement a staff benefit program
    pub const PROVIDE_BENEFITS: &str = "PROVIDE_BENEFITS";
    /// Negotiate supply terms with a vendor
    pub const NEGOTIATE_VENDOR_DEAL: &str = "NEGOTIATE_VENDOR_DEAL";
    /// Sign an exclusive supply contract
    pub const SIGN_EXCLUSIVE_CONTRACT: &str = "SIGN_EXCLUSIVE_CONTRACT";
    /// Cancel a vendor contract
    pub const CANCEL_VENDOR_CONTRACT: &str = "CANCEL_VENDOR_CONTRACT";
    /// Make a charitable contribution
    pub const INITIATE_CHARITY: &str = "INITIATE_CHARITY";
    /// Address an active scandal
    pub const RESOLVE_SCANDAL: &str = "RESOLVE_SCANDAL";
    /// Resolve an ethical dilemma
    pub const MAKE_ETHICAL_CHOICE: &str = "MAKE_ETHICAL_CHOICE";
    /// File a regulatory report
    pub const FILE_REGULATORY_REPORT: &str = "FILE_REGULATORY_REPORT";
    /// Appeal a fine
    pub const FILE_APPEAL: &str = "FILE_APPEAL";
    /// Launch a loyalty program
    pub const SUBSCRIBE_LOYALTY_PROGRAM: &str = "SUBSCRIBE_LOYALTY_PROGRAM";
    /// Form an alliance with another agent
    pub const ENTER_ALLIANCE: &str = "ENTER_ALLIANCE";
    /// Propose buying out another agent
    pub const PROPOSE_BUYOUT: &str = "PROPOSE_BUYOUT";
    /// Accept a pending buyout offer
    pub const ACCEPT_BUYOUT_OFFER: &str = "ACCEPT_BUYOUT_OFFER";
    /// Send a message to another agent
    pub const COMMUNICATE_TO_AGENT: &str = "COMMUNICATE_TO_AGENT";
}

/// A player or host intent submitted for validation and possible event
/// emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Kind string, e.g. `SET_PRICE`
    pub command_kind: String,
    /// Agent issuing the command
    pub agent_id: String,
    /// String-keyed payload map
    pub payload: serde_json::Value,
}

impl Command {
    /// Build a command from a typed payload
    pub fn new<P: Serialize>(
        command_kind: impl Into<String>,
        agent_id: impl Into<String>,
        payload: &P,
    ) -> DomainResult<Self> {
        Ok(Self {
            command_kind: command_kind.into(),
            agent_id: agent_id.into(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Deserialize the payload map into a typed payload struct
    pub fn parse_payload<P: for<'de> Deserialize<'de>>(&self) -> DomainResult<P> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            DomainError::ValidationError(format!(
                "Malformed {} payload: {e}",
                self.command_kind
            ))
        })
    }
}

fn default_legal_fee() -> f64 {
    500.0
}

fn default_alliance_duration() -> u32 {
    52
}

/// Payload of [`kinds::SET_PRICE`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetPricePayload {
    /// Location to reprice
    pub location_id: String,
    /// Service to reprice
    pub service: ServiceKind,
    /// New price, within [0.01, 100.0]
    pub new_price: f64,
}

/// Payload of [`kinds::TAKE_LOAN`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TakeLoanPayload {
    /// Loan product
    pub loan_kind: LoanKind,
    /// Principal requested
    pub amount: f64,
    /// Accepted for host compatibility; the validator ignores it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

/// Payload of [`kinds::MAKE_DEBT_PAYMENT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MakeDebtPaymentPayload {
    /// Loan to pay against
    pub debt_id: String,
    /// Payment amount
    pub amount: f64,
}

/// Payload of [`kinds::INVEST_IN_MARKETING`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvestInMarketingPayload {
    /// Location to promote
    pub location_id: String,
    /// Campaign channel
    pub campaign: CampaignKind,
    /// Campaign spend
    pub cost: f64,
}

/// Payload of [`kinds::BUY_EQUIPMENT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuyEquipmentPayload {
    /// Receiving location
    pub location_id: String,
    /// Equipment kind to buy
    pub machine_kind: MachineKind,
    /// Supplying vendor; the default vendor is used when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Units to buy
    pub quantity: u32,
}

/// Payload of [`kinds::SELL_EQUIPMENT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SellEquipmentPayload {
    /// Location holding the machine
    pub location_id: String,
    /// Machine to sell
    pub machine_id: String,
    /// Agreed sale price
    pub sale_price: f64,
}

/// Payload of [`kinds::PERFORM_MAINTENANCE`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformMaintenancePayload {
    /// Location to service
    pub location_id: String,
    /// Service tier
    pub maintenance: MaintenanceKind,
    /// Machines to service; unused for premises cleaning
    #[serde(default)]
    pub equipment_ids: Vec<String>,
}

/// Payload of [`kinds::FIX_MACHINE`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FixMachinePayload {
    /// Location holding the machine
    pub location_id: String,
    /// Broken machine
    pub machine_id: String,
    /// Emergency repair cost
    pub repair_cost: f64,
}

/// Payload of [`kinds::BUY_SUPPLIES`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuySuppliesPayload {
    /// Receiving location
    pub location_id: String,
    /// Supply class
    pub supply: SupplyKind,
    /// Supplying vendor; the default vendor is used when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Loads worth to buy
    pub quantity_loads: i64,
}

/// Payload of [`kinds::OPEN_NEW_LOCATION`].
///
/// Either `listing_id` references an available listing (zone, rent, and
/// setup cost come from the listing) or `zone`, `monthly_rent`, and
/// `setup_cost` describe a direct opening.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpenNewLocationPayload {
    /// Listing to consume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    /// Zone for a direct opening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Monthly rent for a direct opening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<f64>,
    /// Setup cost for a direct opening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_cost: Option<f64>,
}

/// Payload of [`kinds::HIRE_STAFF`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HireStaffPayload {
    /// Location the hire will work at
    pub location_id: String,
    /// Display name
    pub name: String,
    /// Role
    pub role: StaffRole,
    /// Offered hourly wage
    pub hourly_rate: f64,
    /// Optional signing bonus
    #[serde(default)]
    pub hiring_bonus: f64,
}

/// Payload of [`kinds::FIRE_STAFF`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FireStaffPayload {
    /// Location the employee works at
    pub location_id: String,
    /// Employee to terminate
    pub staff_id: String,
    /// Stated reason
    #[serde(default)]
    pub reason: String,
    /// Severance paid
    #[serde(default)]
    pub severance_cost: f64,
}

/// Payload of [`kinds::ADJUST_STAFF_WAGE`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdjustStaffWagePayload {
    /// Location the employee works at
    pub location_id: String,
    /// Employee to adjust
    pub staff_id: String,
    /// New hourly wage
    pub new_hourly_rate: f64,
}

/// Payload of [`kinds::PROVIDE_BENEFITS`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProvideBenefitsPayload {
    /// Location whose staff are covered
    pub location_id: String,
    /// Benefit program
    pub benefit: BenefitKind,
    /// Annual cost per covered employee
    pub annual_cost_per_employee: f64,
}

/// Payload of [`kinds::NEGOTIATE_VENDOR_DEAL`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NegotiateVendorDealPayload {
    /// Location negotiating
    pub location_id: String,
    /// Vendor to approach
    pub vendor_id: String,
    /// Requested discount fraction, within [0, 0.5]
    pub requested_discount: f64,
    /// The pitch
    pub proposal: String,
}

/// Payload of [`kinds::SIGN_EXCLUSIVE_CONTRACT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SignExclusiveContractPayload {
    /// Location bound by the contract
    pub location_id: String,
    /// Vendor granted exclusivity
    pub vendor_id: String,
    /// Contract duration in weeks
    pub duration_weeks: u32,
    /// Committed volume in loads
    pub volume_commitment_loads: i64,
    /// Up-front signing fee
    #[serde(default)]
    pub upfront_fee: f64,
}

/// Payload of [`kinds::CANCEL_VENDOR_CONTRACT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CancelVendorContractPayload {
    /// Location released
    pub location_id: String,
    /// Vendor released
    pub vendor_id: String,
    /// Stated reason
    #[serde(default)]
    pub reason: String,
}

/// Payload of [`kinds::INITIATE_CHARITY`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InitiateCharityPayload {
    /// Contribution form
    pub contribution: CharityKind,
    /// Amount to contribute
    pub amount: f64,
}

/// Payload of [`kinds::RESOLVE_SCANDAL`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveScandalPayload {
    /// Scandal to address
    pub scandal_id: String,
    /// Strategy
    pub strategy: ResolutionKind,
    /// Budget for the effort
    pub cost: f64,
}

/// Payload of [`kinds::MAKE_ETHICAL_CHOICE`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MakeEthicalChoicePayload {
    /// Dilemma being resolved
    pub dilemma_id: String,
    /// Chosen option id
    pub choice: String,
}

/// Payload of [`kinds::FILE_REGULATORY_REPORT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileRegulatoryReportPayload {
    /// Report kind
    pub report: ReportKind,
    /// Whether the filing is on time
    pub on_time: bool,
    /// Filing cost, if any
    #[serde(default)]
    pub filing_cost: f64,
}

/// Payload of [`kinds::FILE_APPEAL`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileAppealPayload {
    /// Fine to contest
    pub fine_id: String,
    /// Legal fee
    #[serde(default = "default_legal_fee")]
    pub legal_fee: f64,
}

/// Payload of [`kinds::SUBSCRIBE_LOYALTY_PROGRAM`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubscribeLoyaltyProgramPayload {
    /// Location running the program
    pub location_id: String,
    /// Program name
    pub program_name: String,
    /// Program setup cost
    pub program_cost: f64,
    /// Members expected to register
    pub expected_member_count: u32,
}

/// Payload of [`kinds::ENTER_ALLIANCE`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnterAlliancePayload {
    /// Counterpart agent
    pub partner_agent_id: String,
    /// Alliance form
    pub kind: AllianceKind,
    /// Agreed duration in weeks
    #[serde(default = "default_alliance_duration")]
    pub duration_weeks: u32,
    /// Formation cost
    #[serde(default)]
    pub alliance_cost: f64,
    /// Penalty owed on breach
    #[serde(default)]
    pub penalties_on_breach: f64,
}

/// Payload of [`kinds::PROPOSE_BUYOUT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProposeBuyoutPayload {
    /// Agent to buy out
    pub target_agent_id: String,
    /// Offer amount
    pub offer_amount: f64,
    /// Whether the approach is hostile
    #[serde(default)]
    pub hostile: bool,
}

/// Payload of [`kinds::ACCEPT_BUYOUT_OFFER`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AcceptBuyoutOfferPayload {
    /// Offer being accepted
    pub offer_id: String,
    /// Agent whose offer is accepted
    pub counterparty_agent_id: String,
    /// Settlement amount
    pub amount: f64,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
}

/// Payload of [`kinds::COMMUNICATE_TO_AGENT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommunicateToAgentPayload {
    /// Recipient agent
    pub recipient_agent_id: String,
    /// Message body
    pub message: String,
    /// Channel used
    pub channel: CommunicationChannel,
}
