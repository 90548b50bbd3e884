// Copyright 2025 Cowboy AI, LLC.

//! Read-model state for the laundromat simulation
//!
//! These structures are the projection output: they are only ever mutated by
//! reducers during a fold, and every snapshot handed to a caller is an owned
//! value. Ordered maps keep folds byte-identical across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinds of laundromat equipment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
pub enum MachineKind {
    /// Washing machine
    Washer,
    /// Drying machine
    Dryer,
    /// Vending machine (detergent packets, snacks)
    Vending,
}

impl MachineKind {
    /// Catalog purchase price per unit
    pub fn unit_price(&self) -> f64 {
        match self {
            MachineKind::Washer => 2_000.0,
            MachineKind::Dryer => 1_200.0,
            MachineKind::Vending => 800.0,
        }
    }

    /// Daily wear on an operational machine, before the usage factor
    pub fn base_daily_wear(&self) -> f64 {
        match self {
            MachineKind::Washer => 0.8,
            MachineKind::Dryer => 0.6,
            MachineKind::Vending => 0.2,
        }
    }
}

/// Operational status of a machine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    /// Machine is running and earning
    Operational,
    /// Machine is broken and earns nothing until fixed
    Broken,
    /// Machine is being serviced
    InRepair,
}

/// Agent's regulatory oversight status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegulatoryStatus {
    /// No open concerns
    Normal,
    /// At least one recent finding
    Warning,
    /// An active investigation is running
    UnderInvestigation,
    /// Penalties have been applied
    Penalized,
}

impl RegulatoryStatus {
    /// Severity rank used to keep status updates monotone within a window
    pub fn rank(&self) -> u8 {
        match self {
            RegulatoryStatus::Normal => 0,
            RegulatoryStatus::Warning => 1,
            RegulatoryStatus::UnderInvestigation => 2,
            RegulatoryStatus::Penalized => 3,
        }
    }
}

/// Services a location can price
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
pub enum ServiceKind {
    /// Basic wash cycle
    StandardWash,
    /// Premium wash cycle
    PremiumWash,
    /// Drying cycle
    Dry,
    /// Vending-machine items
    VendingItems,
}

impl ServiceKind {
    /// All priceable services
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::StandardWash,
        ServiceKind::PremiumWash,
        ServiceKind::Dry,
        ServiceKind::VendingItems,
    ];
}

/// Staff roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    /// Front-of-house attendant
    Attendant,
    /// Machine technician
    Technician,
    /// Location manager
    Manager,
}

/// Loan products
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanKind {
    /// Revolving line of credit
    Loc,
    /// Equipment financing
    Equipment,
    /// Expansion financing
    Expansion,
    /// Emergency bridge loan
    Emergency,
}

impl LoanKind {
    /// Fixed annual interest rate for the product
    pub fn interest_rate(&self) -> f64 {
        match self {
            LoanKind::Loc => 0.08,
            LoanKind::Equipment => 0.06,
            LoanKind::Expansion => 0.07,
            LoanKind::Emergency => 0.12,
        }
    }

    /// Fixed term in weeks; zero means revolving
    pub fn term_weeks(&self) -> u32 {
        match self {
            LoanKind::Loc => 0,
            LoanKind::Equipment => 24,
            LoanKind::Expansion => 52,
            LoanKind::Emergency => 8,
        }
    }

    /// Minimum credit rating required to qualify
    pub fn credit_floor(&self) -> u8 {
        match self {
            LoanKind::Loc => 40,
            LoanKind::Equipment => 35,
            LoanKind::Expansion => 50,
            LoanKind::Emergency => 20,
        }
    }
}

/// Transfer direction classes for [`FundsTransferred`](crate::events::financial::FundsTransferred)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferKind {
    /// Operating income; increases cash
    Revenue,
    /// Loan disbursement; increases cash
    Loan,
    /// Refund; increases cash
    Refund,
    /// Operating expense; decreases cash
    Expense,
    /// Debt payment; decreases cash
    Payment,
    /// Fine settlement; decreases cash
    Fine,
    /// Contract or breach penalty; decreases cash
    Penalty,
}

impl TransferKind {
    /// Whether this transfer class credits the cash balance
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            TransferKind::Revenue | TransferKind::Loan | TransferKind::Refund
        )
    }
}

/// Vendor payment outcomes retained in the bounded history tail
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    /// Invoice paid on time
    OnTime,
    /// Invoice paid late
    Late,
    /// Invoice defaulted
    Default,
}

/// Fine lifecycle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineStatus {
    /// Issued, not yet settled
    Open,
    /// Settled
    Paid,
    /// Contested via FILE_APPEAL
    Appealed,
}

/// Alliance forms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllianceKind {
    /// Handshake agreement
    Informal,
    /// Contractual partnership
    Formal,
}

/// Maintenance service tiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceKind {
    /// Quick service, restores +15 condition
    Routine,
    /// Thorough service, restores +35 condition
    DeepService,
    /// Full rebuild, restores condition to 100
    Overhaul,
    /// Professional cleaning of the premises, not a machine service
    PremisesCleaning,
}

impl MaintenanceKind {
    /// Cost per machine (or per premises for cleaning)
    pub fn cost(&self) -> f64 {
        match self {
            MaintenanceKind::Routine => 50.0,
            MaintenanceKind::DeepService => 150.0,
            MaintenanceKind::Overhaul => 500.0,
            MaintenanceKind::PremisesCleaning => 100.0,
        }
    }

    /// Condition after servicing a machine currently at `condition`
    pub fn restored_condition(&self, condition: f64) -> f64 {
        match self {
            MaintenanceKind::Routine => (condition + 15.0).min(100.0),
            MaintenanceKind::DeepService => (condition + 35.0).min(100.0),
            MaintenanceKind::Overhaul => 100.0,
            MaintenanceKind::PremisesCleaning => condition,
        }
    }
}

/// Marketing campaign channels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignKind {
    /// Printed flyers
    Flyers,
    /// Social media push
    SocialMedia,
    /// Newspaper advertisement
    NewspaperAd,
    /// Local sponsorship
    Sponsorship,
}

/// Staff benefit programs
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitKind {
    /// Health coverage
    HealthPlan,
    /// Profit sharing
    ProfitSharing,
    /// Flexible scheduling
    FlexibleSchedule,
}

/// Charitable contribution forms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharityKind {
    /// Direct donation
    Donation,
    /// Free laundry day for the neighborhood
    FreeLaundryDay,
    /// Community sponsorship
    Sponsorship,
}

/// Scandal resolution strategies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionKind {
    /// Public apology
    PublicApology,
    /// Community outreach program
    CommunityOutreach,
    /// Hired PR firm
    PrFirmEngagement,
    /// Compensation paid to those affected
    VictimCompensation,
}

/// Regulatory report kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    /// Quarterly tax filing
    TaxQuarterly,
    /// Quarterly market-share filing
    MarketQuarterly,
    /// Compliance improvement plan
    CompliancePlan,
}

/// Outcome of a vendor negotiation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NegotiationOutcome {
    /// Vendor accepted the requested discount
    Accepted,
    /// Vendor countered with a smaller discount
    Countered,
    /// Vendor rejected the proposal
    Rejected,
}

/// Delivery disruption classes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisruptionKind {
    /// Shipment delayed
    Delay,
    /// Only part of the order arrived
    PartialShipment,
    /// Goods arrived unusable
    QualityIssue,
}

/// Channels for inter-agent communication
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationChannel {
    /// Private message
    Direct,
    /// Public statement
    Public,
    /// Formal proposal
    Proposal,
}

/// Supply classes held in location inventory
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyKind {
    /// Detergent, measured in loads worth
    Detergent,
    /// Fabric softener, measured in loads worth
    Softener,
}

/// A single physical machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineState {
    /// Machine id
    pub machine_id: String,
    /// Equipment kind
    pub kind: MachineKind,
    /// Operational status
    pub status: MachineStatus,
    /// Condition 0-100, monotone non-increasing between repair events
    pub condition: f64,
    /// Loads processed since the last service
    pub loads_processed_since_service: u32,
    /// Week of the last maintenance
    pub last_maintenance_week: u32,
}

/// A persistent scandal marker on an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScandalMarker {
    /// Scandal id
    pub scandal_id: String,
    /// Human-readable description
    pub description: String,
    /// Severity 0.0-1.0
    pub severity: f64,
    /// Planned duration in weeks
    pub duration_weeks: u32,
    /// Severity removed per weekly decay event
    pub decay_rate: f64,
    /// Week the scandal started
    pub start_week: u32,
}

/// A fine issued by the regulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fine {
    /// Fine id
    pub fine_id: String,
    /// What the fine was issued for
    pub description: String,
    /// Amount due
    pub amount: f64,
    /// Week the fine was issued
    pub issued_week: u32,
    /// Week the fine falls due
    pub due_week: u32,
    /// Lifecycle status
    pub status: FineStatus,
}

/// An alliance with another agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    /// Alliance id (shared by both parties)
    pub alliance_id: String,
    /// The counterpart agent
    pub partner_agent_id: String,
    /// Alliance form
    pub kind: AllianceKind,
    /// Week the alliance formed
    pub start_week: u32,
}

/// An outstanding loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Loan id
    pub loan_id: String,
    /// Loan product
    pub kind: LoanKind,
    /// Outstanding balance (principal plus accrued interest)
    pub outstanding: f64,
    /// Annual interest rate
    pub interest_rate: f64,
    /// Term in weeks; zero means revolving
    pub term_weeks: u32,
    /// Week the loan was taken
    pub taken_week: u32,
}

/// An employee at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Staff id
    pub staff_id: String,
    /// Display name
    pub name: String,
    /// Role
    pub role: StaffRole,
    /// Hourly wage
    pub hourly_rate: f64,
    /// Morale 0-100
    pub morale: f64,
    /// Weeks since hiring
    pub tenure_weeks: u32,
    /// Week the employee was hired
    pub hired_week: u32,
}

/// Relationship with a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRelationship {
    /// Vendor id
    pub vendor_id: String,
    /// Relationship tier (1 = new, higher is better terms)
    pub tier: u8,
    /// Weeks spent at the current tier
    pub weeks_at_tier: u32,
    /// Bounded tail of recent payment outcomes (newest last)
    pub payment_history: Vec<PaymentOutcome>,
    /// Whether an exclusive contract is active
    pub exclusive_contract: bool,
    /// Week the exclusive window ends, if any
    pub exclusive_until_week: Option<u32>,
    /// Current unit price multiplier (1.0 = list price)
    pub current_unit_price: f64,
    /// Whether deliveries are currently disrupted
    pub disrupted: bool,
}

/// How many payment records the history tail retains
pub const PAYMENT_HISTORY_LIMIT: usize = 12;

impl VendorRelationship {
    /// Create a fresh tier-1 relationship
    pub fn new(vendor_id: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            tier: 1,
            weeks_at_tier: 0,
            payment_history: Vec::new(),
            exclusive_contract: false,
            exclusive_until_week: None,
            current_unit_price: 1.0,
            disrupted: false,
        }
    }

    /// Fraction of retained payments that were on time (1.0 with no history)
    pub fn on_time_ratio(&self) -> f64 {
        if self.payment_history.is_empty() {
            return 1.0;
        }
        let on_time = self
            .payment_history
            .iter()
            .filter(|p| **p == PaymentOutcome::OnTime)
            .count();
        on_time as f64 / self.payment_history.len() as f64
    }

    /// Record a payment outcome, keeping only the bounded tail
    pub fn record_payment(&mut self, outcome: PaymentOutcome) {
        self.payment_history.push(outcome);
        if self.payment_history.len() > PAYMENT_HISTORY_LIMIT {
            let excess = self.payment_history.len() - PAYMENT_HISTORY_LIMIT;
            self.payment_history.drain(..excess);
        }
    }
}

/// An ethical dilemma awaiting resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilemmaState {
    /// What the player is being asked to decide
    pub description: String,
    /// Option id -> consequence summary
    pub options: BTreeMap<String, DilemmaOption>,
    /// Week the dilemma was triggered
    pub triggered_week: u32,
}

/// One selectable option of a dilemma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilemmaOption {
    /// Option description
    pub description: String,
    /// Up-front cost of choosing this option
    pub immediate_cost: f64,
    /// Social score delta applied on resolution
    pub social_score_impact: f64,
    /// Qualitative regulatory exposure (LOW / MEDIUM / HIGH)
    pub regulatory_risk: String,
}

/// An open regulatory investigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    /// Why the investigation was opened
    pub reason: String,
    /// Severity label assigned by the regulator
    pub severity: String,
    /// Current stage
    pub stage: String,
    /// Week the investigation opened
    pub started_week: u32,
}

/// A storefront available for expansion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationListing {
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

/// Physical assets and operational state of one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    /// Location id
    pub location_id: String,
    /// Zone label
    pub zone: String,
    /// Monthly rent
    pub monthly_rent: f64,
    /// Cleanliness 0-100
    pub cleanliness: f64,
    /// Machines by id
    pub equipment: BTreeMap<String, MachineState>,
    /// Detergent stock, in loads worth
    pub inventory_detergent: i64,
    /// Softener stock, in loads worth
    pub inventory_softener: i64,
    /// Staff by id
    pub staff: BTreeMap<String, StaffMember>,
    /// Active price per service
    pub active_pricing: BTreeMap<ServiceKind, f64>,
    /// Latest observed competitor price per service
    pub observed_competitor_prices: BTreeMap<ServiceKind, f64>,
    /// Supplier relationships by vendor id
    pub vendor_relationships: BTreeMap<String, VendorRelationship>,
    /// Current marketing attraction boost (fraction)
    pub marketing_boost: f64,
    /// Week the marketing boost stops applying
    pub marketing_expires_week: u32,
    /// Revenue accumulated this week
    pub accumulated_revenue_week: f64,
    /// Cost of goods sold accumulated this week
    pub accumulated_cogs_week: f64,
}

impl LocationState {
    /// Create a location with default pricing and starter inventory
    pub fn new(location_id: impl Into<String>, zone: impl Into<String>, monthly_rent: f64) -> Self {
        let mut active_pricing = BTreeMap::new();
        active_pricing.insert(ServiceKind::StandardWash, 3.50);
        active_pricing.insert(ServiceKind::PremiumWash, 5.00);
        active_pricing.insert(ServiceKind::Dry, 2.00);
        active_pricing.insert(ServiceKind::VendingItems, 1.50);

        Self {
            location_id: location_id.into(),
            zone: zone.into(),
            monthly_rent,
            cleanliness: 80.0,
            equipment: BTreeMap::new(),
            inventory_detergent: 1_000,
            inventory_softener: 500,
            staff: BTreeMap::new(),
            active_pricing,
            observed_competitor_prices: BTreeMap::new(),
            vendor_relationships: BTreeMap::new(),
            marketing_boost: 0.0,
            marketing_expires_week: 0,
            accumulated_revenue_week: 0.0,
            accumulated_cogs_week: 0.0,
        }
    }

    /// Machines currently earning
    pub fn operational_machine_count(&self) -> usize {
        self.equipment
            .values()
            .filter(|m| m.status == MachineStatus::Operational)
            .count()
    }

    /// Mean condition across all machines (100 when there are none)
    pub fn average_machine_condition(&self) -> f64 {
        if self.equipment.is_empty() {
            return 100.0;
        }
        let total: f64 = self.equipment.values().map(|m| m.condition).sum();
        total / self.equipment.len() as f64
    }

    /// Weekly wage bill at 40 hours per employee
    pub fn weekly_wage_bill(&self) -> f64 {
        self.staff.values().map(|s| s.hourly_rate * 40.0).sum()
    }
}

/// Financial, social, and intangible assets tied to an agent.
///
/// Always derived by folding the agent's event stream; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Agent id
    pub agent_id: String,
    /// Current week
    pub current_week: u32,
    /// Current day within the week (0-6)
    pub current_day: u8,
    /// Cash on hand
    pub cash_balance: f64,
    /// Drawn line-of-credit balance
    pub line_of_credit_balance: f64,
    /// Line-of-credit ceiling
    pub line_of_credit_limit: f64,
    /// Total outstanding debt across all loans
    pub total_debt_owed: f64,
    /// Outstanding loans
    pub loans: Vec<Loan>,
    /// Social standing 0-100
    pub social_score: f64,
    /// Active scandal markers (the only scandal store)
    pub active_scandals: Vec<ScandalMarker>,
    /// Open dilemmas by id
    pub active_dilemmas: BTreeMap<String, DilemmaState>,
    /// Registered loyalty-program members
    pub customer_loyalty_members: u32,
    /// Weekly loads processed, for market-share accounting
    pub market_share_loads: f64,
    /// Accrued, unpaid tax
    pub current_tax_liability: f64,
    /// Regulatory oversight status
    pub regulatory_status: RegulatoryStatus,
    /// Open investigations by id
    pub active_investigations: BTreeMap<String, Investigation>,
    /// Credit rating 0-100
    pub credit_rating: u8,
    /// Active alliances
    pub active_alliances: Vec<Alliance>,
    /// Unsettled fines
    pub pending_fines: Vec<Fine>,
    /// Locations by id
    pub locations: BTreeMap<String, LocationState>,
    /// Storefront listings available for expansion
    pub available_listings: BTreeMap<String, LocationListing>,
    /// Private end-of-turn notes
    pub private_notes: Vec<String>,
    /// Number of entries at the last audit snapshot
    pub audit_entries_count: u64,
    /// Kind of the last audited event
    pub last_audit_event: String,
}

impl AgentState {
    /// Fresh zero state; real values arrive with `AgentCreated`
    pub fn zero(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            current_week: 0,
            current_day: 0,
            cash_balance: 0.0,
            line_of_credit_balance: 0.0,
            line_of_credit_limit: 0.0,
            total_debt_owed: 0.0,
            loans: Vec::new(),
            social_score: 50.0,
            active_scandals: Vec::new(),
            active_dilemmas: BTreeMap::new(),
            customer_loyalty_members: 0,
            market_share_loads: 0.0,
            current_tax_liability: 0.0,
            regulatory_status: RegulatoryStatus::Normal,
            active_investigations: BTreeMap::new(),
            credit_rating: 50,
            active_alliances: Vec::new(),
            pending_fines: Vec::new(),
            locations: BTreeMap::new(),
            available_listings: BTreeMap::new(),
            private_notes: Vec::new(),
            audit_entries_count: 0,
            last_audit_event: String::new(),
        }
    }

    /// Cash plus undrawn line-of-credit capacity
    pub fn available_funds(&self) -> f64 {
        self.cash_balance + (self.line_of_credit_limit - self.line_of_credit_balance).max(0.0)
    }

    /// Whether `cost` can be covered by cash plus available credit
    pub fn can_afford(&self, cost: f64) -> bool {
        self.available_funds() >= cost
    }

    /// Sum of active scandal severities
    pub fn total_scandal_severity(&self) -> f64 {
        self.active_scandals.iter().map(|s| s.severity).sum()
    }

    /// Look up a loan by id
    pub fn loan(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.loan_id == loan_id)
    }

    /// Look up a pending fine by id
    pub fn fine(&self, fine_id: &str) -> Option<&Fine> {
        self.pending_fines.iter().find(|f| f.fine_id == fine_id)
    }

    /// Look up a scandal marker by id
    pub fn scandal(&self, scandal_id: &str) -> Option<&ScandalMarker> {
        self.active_scandals.iter().find(|s| s.scandal_id == scandal_id)
    }
}

/// Clamp a score-like value into [0, 100]
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Clamp a severity-like value into [0, 1]
pub fn clamp_severity(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_state_defaults() {
        let state = AgentState::zero("P001");
        assert_eq!(state.agent_id, "P001");
        assert_eq!(state.cash_balance, 0.0);
        assert_eq!(state.regulatory_status, RegulatoryStatus::Normal);
        assert!(state.locations.is_empty());
    }

    #[test]
    fn test_available_funds_includes_credit_headroom() {
        let mut state = AgentState::zero("P001");
        state.cash_balance = 100.0;
        state.line_of_credit_limit = 5_000.0;
        state.line_of_credit_balance = 1_500.0;
        assert!((state.available_funds() - 3_600.0).abs() < 1e-9);
        assert!(state.can_afford(3_600.0));
        assert!(!state.can_afford(3_600.01));
    }

    #[test]
    fn test_location_defaults_match_catalog() {
        let location = LocationState::new("LOC_001", "DOWNTOWN", 1_200.0);
        assert_eq!(location.active_pricing[&ServiceKind::StandardWash], 3.50);
        assert_eq!(location.active_pricing[&ServiceKind::VendingItems], 1.50);
        assert_eq!(location.inventory_detergent, 1_000);
        assert_eq!(location.cleanliness, 80.0);
    }

    #[test]
    fn test_operational_machine_count() {
        let mut location = LocationState::new("LOC_001", "DOWNTOWN", 1_200.0);
        location.equipment.insert(
            "M1".into(),
            MachineState {
                machine_id: "M1".into(),
                kind: MachineKind::Washer,
                status: MachineStatus::Operational,
                condition: 90.0,
                loads_processed_since_service: 0,
                last_maintenance_week: 0,
            },
        );
        location.equipment.insert(
            "M2".into(),
            MachineState {
                machine_id: "M2".into(),
                kind: MachineKind::Dryer,
                status: MachineStatus::Broken,
                condition: 5.0,
                loads_processed_since_service: 400,
                last_maintenance_week: 0,
            },
        );
        assert_eq!(location.operational_machine_count(), 1);
        assert!((location.average_machine_condition() - 47.5).abs() < 1e-9);
    }

    #[test]
    fn test_payment_history_is_bounded() {
        let mut rel = VendorRelationship::new("VENDOR_A");
        for _ in 0..20 {
            rel.record_payment(PaymentOutcome::OnTime);
        }
        rel.record_payment(PaymentOutcome::Late);
        assert_eq!(rel.payment_history.len(), PAYMENT_HISTORY_LIMIT);
        assert_eq!(*rel.payment_history.last().unwrap(), PaymentOutcome::Late);
    }

    #[test]
    fn test_on_time_ratio() {
        let mut rel = VendorRelationship::new("VENDOR_A");
        assert_eq!(rel.on_time_ratio(), 1.0);
        rel.record_payment(PaymentOutcome::OnTime);
        rel.record_payment(PaymentOutcome::Late);
        assert!((rel.on_time_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_loan_product_terms() {
        assert_eq!(LoanKind::Loc.interest_rate(), 0.08);
        assert_eq!(LoanKind::Loc.term_weeks(), 0);
        assert_eq!(LoanKind::Equipment.term_weeks(), 24);
        assert_eq!(LoanKind::Expansion.term_weeks(), 52);
        assert_eq!(LoanKind::Emergency.interest_rate(), 0.12);
        assert!(LoanKind::Expansion.credit_floor() > LoanKind::Emergency.credit_floor());
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_severity(1.7), 1.0);
        assert_eq!(clamp_severity(-0.2), 0.0);
    }

    #[test]
    fn test_regulatory_status_rank_is_monotone() {
        assert!(RegulatoryStatus::Penalized.rank() > RegulatoryStatus::UnderInvestigation.rank());
        assert!(RegulatoryStatus::UnderInvestigation.rank() > RegulatoryStatus::Warning.rank());
        assert!(RegulatoryStatus::Warning.rank() > RegulatoryStatus::Normal.rank());
    }
}
