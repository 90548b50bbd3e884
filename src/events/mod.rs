// Copyright 2025 Cowboy AI, LLC.

//! Immutable game events
//!
//! Every observable fact in the simulation is one event appended to the log.
//! An event is an envelope (id, agent, clock, timestamp, correlation) plus a
//! kind-specific payload carried as a tagged variant; dispatch is by the
//! `event_kind` tag, never by downcasting.

pub mod competition;
pub mod financial;
pub mod operational;
pub mod social;
pub mod staffing;
pub mod time;
pub mod vendor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use competition::*;
pub use financial::*;
pub use operational::*;
pub use social::*;
pub use staffing::*;
pub use time::*;
pub use vendor::*;

/// An agent entered the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCreated {
    /// Cash granted at creation
    pub starting_cash: f64,
    /// Line-of-credit ceiling granted at creation
    pub starting_credit_limit: f64,
    /// Credit rating at creation
    pub starting_credit_rating: u8,
}

/// An agent left the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRetired {
    /// Why the agent retired
    pub reason: String,
}

/// Kind-specific payload of a [`GameEvent`].
///
/// The serde tag doubles as the stored `event_kind` field and as the
/// projection-registry key. Adding a kind means adding a variant here and
/// registering a producer and a reducer; nothing else changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_kind")]
pub enum EventPayload {
    // Lifecycle
    /// An agent entered the simulation
    AgentCreated(AgentCreated),
    /// An agent left the simulation
    AgentRetired(AgentRetired),

    // Time
    /// The clock moved forward one day
    TimeAdvanced(TimeAdvanced),
    /// A location finished a day of operations
    DailyRevenueProcessed(DailyRevenueProcessed),
    /// Weekly fixed costs fell due
    WeeklyFixedCostsBilled(WeeklyFixedCostsBilled),
    /// Monthly interest accrued onto a loan
    InterestAccrued(InterestAccrued),
    /// Monthly tax liability was computed
    TaxLiabilityCalculated(TaxLiabilityCalculated),
    /// A machine wore down
    MachineWearUpdated(MachineWearUpdated),
    /// A machine's status changed
    MachineStatusChanged(MachineStatusChanged),

    // Financial
    /// Cash moved in or out
    FundsTransferred(FundsTransferred),
    /// A loan was disbursed
    LoanTaken(LoanTaken),
    /// A debt payment was applied
    DebtPaymentProcessed(DebtPaymentProcessed),
    /// A loan defaulted
    DefaultRecorded(DefaultRecorded),
    /// A service price changed
    PriceSet(PriceSet),
    /// A marketing campaign went live
    MarketingBoostApplied(MarketingBoostApplied),
    /// The tax bracket moved
    TaxBracketAdjusted(TaxBracketAdjusted),

    // Operational
    /// A machine was purchased
    EquipmentPurchased(EquipmentPurchased),
    /// A machine was sold
    EquipmentSold(EquipmentSold),
    /// A machine was serviced
    EquipmentRepaired(EquipmentRepaired),
    /// The premises were cleaned
    PremisesCleaned(PremisesCleaned),
    /// Supplies were delivered
    SuppliesAcquired(SuppliesAcquired),
    /// A supply class ran out
    StockoutStarted(StockoutStarted),
    /// A supply class was restocked
    StockoutEnded(StockoutEnded),
    /// A location opened
    LocationOpened(LocationOpened),
    /// A location closed
    LocationClosed(LocationClosed),
    /// A storefront listing appeared
    LocationListingAdded(LocationListingAdded),
    /// A storefront listing was withdrawn
    LocationListingRemoved(LocationListingRemoved),

    // Staffing
    /// An employee was hired
    StaffHired(StaffHired),
    /// An employee was terminated
    StaffFired(StaffFired),
    /// An employee resigned
    StaffQuit(StaffQuit),
    /// An employee's wage changed
    WageAdjusted(WageAdjusted),
    /// A benefit program took effect
    BenefitImplemented(BenefitImplemented),
    /// An employee's morale moved
    StaffMoraleChanged(StaffMoraleChanged),

    // Social / regulatory
    /// Social standing moved
    SocialScoreAdjusted(SocialScoreAdjusted),
    /// A scandal broke
    ScandalStarted(ScandalStarted),
    /// A scandal marker decayed
    ScandalMarkerDecayed(ScandalMarkerDecayed),
    /// A scandal was actively addressed
    ScandalResolved(ScandalResolved),
    /// A charitable initiative went ahead
    CharityInitiated(CharityInitiated),
    /// A dilemma was put to the agent
    DilemmaTriggered(DilemmaTriggered),
    /// A dilemma was resolved
    DilemmaResolved(DilemmaResolved),
    /// The regulator issued a finding
    RegulatoryFinding(RegulatoryFinding),
    /// Regulatory status changed
    RegulatoryStatusUpdated(RegulatoryStatusUpdated),
    /// A regulatory report was filed
    RegulatoryReportFiled(RegulatoryReportFiled),
    /// A fine was contested
    AppealFiled(AppealFiled),
    /// A fine was settled
    FinePaid(FinePaid),
    /// An investigation opened
    InvestigationStarted(InvestigationStarted),
    /// An investigation advanced a stage
    InvestigationStageAdvanced(InvestigationStageAdvanced),
    /// A customer left a review
    CustomerReviewSubmitted(CustomerReviewSubmitted),
    /// Loyalty members signed up
    LoyaltyMemberRegistered(LoyaltyMemberRegistered),
    /// End-of-turn notes were saved
    EndOfTurnNotesSaved(EndOfTurnNotesSaved),
    /// An audit snapshot marker was recorded
    AuditSnapshotRecorded(AuditSnapshotRecorded),

    // Vendor
    /// A vendor relationship moved up a tier
    VendorTierPromoted(VendorTierPromoted),
    /// A vendor relationship dropped a tier
    VendorTierDemoted(VendorTierDemoted),
    /// A vendor's unit price moved
    VendorPriceFluctuated(VendorPriceFluctuated),
    /// A negotiation was opened
    VendorNegotiationInitiated(VendorNegotiationInitiated),
    /// A negotiation concluded
    VendorNegotiationResult(VendorNegotiationResult),
    /// Vendor terms changed
    VendorTermsUpdated(VendorTermsUpdated),
    /// An exclusive contract was signed
    ExclusiveContractSigned(ExclusiveContractSigned),
    /// An exclusive contract was cancelled
    ExclusiveContractCancelled(ExclusiveContractCancelled),
    /// Deliveries became disrupted
    DeliveryDisruptionStarted(DeliveryDisruptionStarted),
    /// Deliveries recovered
    DeliveryDisruptionEnded(DeliveryDisruptionEnded),

    // Competition / inter-agent
    /// An alliance formed
    AllianceFormed(AllianceFormed),
    /// An alliance was breached
    AllianceBreached(AllianceBreached),
    /// A buyout was proposed
    BuyoutProposed(BuyoutProposed),
    /// A buyout offer arrived
    BuyoutOfferReceived(BuyoutOfferReceived),
    /// A buyout offer was accepted
    BuyoutAccepted(BuyoutAccepted),
    /// A competitor was absorbed
    AgentAcquired(AgentAcquired),
    /// An NPC competitor repriced
    CompetitorPriceChanged(CompetitorPriceChanged),
    /// An NPC competitor left the market
    CompetitorExitedMarket(CompetitorExitedMarket),
    /// A message was sent to another agent
    CommunicationSent(CommunicationSent),
    /// A message arrived from another agent
    CommunicationReceived(CommunicationReceived),
}

impl EventPayload {
    /// The kind tag under which this payload is stored and dispatched
    pub fn kind(&self) -> &'static str {
        match self {
            EventPayload::AgentCreated(_) => "AgentCreated",
            EventPayload::AgentRetired(_) => "AgentRetired",
            EventPayload::TimeAdvanced(_) => "TimeAdvanced",
            EventPayload::DailyRevenueProcessed(_) => "DailyRevenueProcessed",
            EventPayload::WeeklyFixedCostsBilled(_) => "WeeklyFixedCostsBilled",
            EventPayload::InterestAccrued(_) => "InterestAccrued",
            EventPayload::TaxLiabilityCalculated(_) => "TaxLiabilityCalculated",
            EventPayload::MachineWearUpdated(_) => "MachineWearUpdated",
            EventPayload::MachineStatusChanged(_) => "MachineStatusChanged",
            EventPayload::FundsTransferred(_) => "FundsTransferred",
            EventPayload::LoanTaken(_) => "LoanTaken",
            EventPayload::DebtPaymentProcessed(_) => "DebtPaymentProcessed",
            EventPayload::DefaultRecorded(_) => "DefaultRecorded",
            EventPayload::PriceSet(_) => "PriceSet",
            EventPayload::MarketingBoostApplied(_) => "MarketingBoostApplied",
            EventPayload::TaxBracketAdjusted(_) => "TaxBracketAdjusted",
            EventPayload::EquipmentPurchased(_) => "EquipmentPurchased",
            EventPayload::EquipmentSold(_) => "EquipmentSold",
            EventPayload::EquipmentRepaired(_) => "EquipmentRepaired",
            EventPayload::PremisesCleaned(_) => "PremisesCleaned",
            EventPayload::SuppliesAcquired(_) => "SuppliesAcquired",
            EventPayload::StockoutStarted(_) => "StockoutStarted",
            EventPayload::StockoutEnded(_) => "StockoutEnded",
            EventPayload::LocationOpened(_) => "LocationOpened",
            EventPayload::LocationClosed(_) => "LocationClosed",
            EventPayload::LocationListingAdded(_) => "LocationListingAdded",
            EventPayload::LocationListingRemoved(_) => "LocationListingRemoved",
            EventPayload::StaffHired(_) => "StaffHired",
            EventPayload::StaffFired(_) => "StaffFired",
            EventPayload::StaffQuit(_) => "StaffQuit",
            EventPayload::WageAdjusted(_) => "WageAdjusted",
            EventPayload::BenefitImplemented(_) => "BenefitImplemented",
            EventPayload::StaffMoraleChanged(_) => "StaffMoraleChanged",
            EventPayload::SocialScoreAdjusted(_) => "SocialScoreAdjusted",
            EventPayload::ScandalStarted(_) => "ScandalStarted",
            EventPayload::ScandalMarkerDecayed(_) => "ScandalMarkerDecayed",
            EventPayload::ScandalResolved(_) => "ScandalResolved",
            EventPayload::CharityInitiated(_) => "CharityInitiated",
            EventPayload::DilemmaTriggered(_) => "DilemmaTriggered",
            EventPayload::DilemmaResolved(_) => "DilemmaResolved",
            EventPayload::RegulatoryFinding(_) => "RegulatoryFinding",
            EventPayload::RegulatoryStatusUpdated(_) => "RegulatoryStatusUpdated",
            EventPayload::RegulatoryReportFiled(_) => "RegulatoryReportFiled",
            EventPayload::AppealFiled(_) => "AppealFiled",
            EventPayload::FinePaid(_) => "FinePaid",
            EventPayload::InvestigationStarted(_) => "InvestigationStarted",
            EventPayload::InvestigationStageAdvanced(_) => "InvestigationStageAdvanced",
            EventPayload::CustomerReviewSubmitted(_) => "CustomerReviewSubmitted",
            EventPayload::LoyaltyMemberRegistered(_) => "LoyaltyMemberRegistered",
            EventPayload::EndOfTurnNotesSaved(_) => "EndOfTurnNotesSaved",
            EventPayload::AuditSnapshotRecorded(_) => "AuditSnapshotRecorded",
            EventPayload::VendorTierPromoted(_) => "VendorTierPromoted",
            EventPayload::VendorTierDemoted(_) => "VendorTierDemoted",
            EventPayload::VendorPriceFluctuated(_) => "VendorPriceFluctuated",
            EventPayload::VendorNegotiationInitiated(_) => "VendorNegotiationInitiated",
            EventPayload::VendorNegotiationResult(_) => "VendorNegotiationResult",
            EventPayload::VendorTermsUpdated(_) => "VendorTermsUpdated",
            EventPayload::ExclusiveContractSigned(_) => "ExclusiveContractSigned",
            EventPayload::ExclusiveContractCancelled(_) => "ExclusiveContractCancelled",
            EventPayload::DeliveryDisruptionStarted(_) => "DeliveryDisruptionStarted",
            EventPayload::DeliveryDisruptionEnded(_) => "DeliveryDisruptionEnded",
            EventPayload::AllianceFormed(_) => "AllianceFormed",
            EventPayload::AllianceBreached(_) => "AllianceBreached",
            EventPayload::BuyoutProposed(_) => "BuyoutProposed",
            EventPayload::BuyoutOfferReceived(_) => "BuyoutOfferReceived",
            EventPayload::BuyoutAccepted(_) => "BuyoutAccepted",
            EventPayload::AgentAcquired(_) => "AgentAcquired",
            EventPayload::CompetitorPriceChanged(_) => "CompetitorPriceChanged",
            EventPayload::CompetitorExitedMarket(_) => "CompetitorExitedMarket",
            EventPayload::CommunicationSent(_) => "CommunicationSent",
            EventPayload::CommunicationReceived(_) => "CommunicationReceived",
        }
    }
}

/// An immutable fact appended to the log.
///
/// Envelope fields are supplied by the engine when the event is sealed;
/// handler logic only ever produces payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Unique event id
    pub event_id: Uuid,
    /// Stream the event belongs to
    pub agent_id: String,
    /// Week at emission
    pub week: u32,
    /// Day within the week at emission
    pub day: u8,
    /// Wall-clock timestamp at emission
    pub timestamp: DateTime<Utc>,
    /// Shared by all events of one command execution and by inter-agent
    /// mirror pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
    /// Kind-specific payload, flattened into the record
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl GameEvent {
    /// Seal a payload into an envelope, generating id and timestamp
    pub fn seal(
        agent_id: impl Into<String>,
        week: u32,
        day: u8,
        correlation_id: Option<Uuid>,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            agent_id: agent_id.into(),
            week,
            day,
            timestamp: Utc::now(),
            correlation_id,
            payload,
        }
    }

    /// The kind tag of the payload
    pub fn kind(&self) -> &'static str {
        self.payload.kind()
    }
}

/// A handler's output before the engine seals it: a payload plus the stream
/// it belongs on. `recipient` is `None` for the commanding agent's own
/// stream and `Some(agent)` for a counterpart's mirror record.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Counterpart stream, when this is a mirror record
    pub recipient: Option<String>,
    /// The payload to seal
    pub payload: EventPayload,
}

impl EventDraft {
    /// Draft an event for the commanding agent's own stream
    pub fn own(payload: EventPayload) -> Self {
        Self {
            recipient: None,
            payload,
        }
    }

    /// Draft a mirror event for a counterpart's stream
    pub fn mirror(recipient: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            recipient: Some(recipient.into()),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ServiceKind, TransferKind};

    fn sample_event() -> GameEvent {
        GameEvent::seal(
            "P001",
            3,
            2,
            None,
            EventPayload::PriceSet(PriceSet {
                location_id: "LOC_001".to_string(),
                service: ServiceKind::StandardWash,
                new_price: 3.75,
            }),
        )
    }

    #[test]
    fn test_event_serializes_with_kind_tag_and_flat_payload() {
        let event = sample_event();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_kind"], "PriceSet");
        assert_eq!(json["agent_id"], "P001");
        assert_eq!(json["week"], 3);
        assert_eq!(json["day"], 2);
        // Payload fields sit at the top level of the record
        assert_eq!(json["location_id"], "LOC_001");
        assert_eq!(json["new_price"], 3.75);
    }

    #[test]
    fn test_event_roundtrip() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_unknown_fields_are_ignored_on_read() {
        let event = sample_event();
        let mut json = serde_json::to_value(&event).unwrap();
        json["some_future_field"] = serde_json::json!("ignored");
        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.payload, event.payload);
    }

    #[test]
    fn test_unknown_kind_fails_deserialization() {
        let record = serde_json::json!({
            "event_id": Uuid::new_v4(),
            "agent_id": "P001",
            "week": 0,
            "day": 0,
            "timestamp": Utc::now(),
            "event_kind": "QuantumEntanglementDetected",
        });
        assert!(serde_json::from_value::<GameEvent>(record).is_err());
    }

    #[test]
    fn test_kind_matches_serde_tag() {
        let payload = EventPayload::FundsTransferred(FundsTransferred {
            amount: 10.0,
            kind: TransferKind::Revenue,
            description: "test".to_string(),
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["event_kind"], payload.kind());

        let payload = EventPayload::TimeAdvanced(TimeAdvanced {
            new_week: 1,
            new_day: 0,
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["event_kind"], payload.kind());
    }

    #[test]
    fn test_draft_constructors() {
        let payload = EventPayload::AgentRetired(AgentRetired {
            reason: "sold the business".to_string(),
        });
        let own = EventDraft::own(payload.clone());
        assert!(own.recipient.is_none());
        let mirror = EventDraft::mirror("P002", payload);
        assert_eq!(mirror.recipient.as_deref(), Some("P002"));
    }
}
