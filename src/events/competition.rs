// Copyright 2025 Cowboy AI, LLC.

//! Competition, alliance, and inter-agent events
//!
//! Inter-agent facts are recorded twice, once per stream, with both records
//! sharing the execution's correlation id.

use crate::state::{AllianceKind, CommunicationChannel, ServiceKind};
use serde::{Deserialize, Serialize};

/// An alliance formed (recorded on both parties' streams)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceFormed {
    /// Alliance id, shared by both records
    pub alliance_id: String,
    /// The counterpart from this stream's point of view
    pub partner_agent_id: String,
    /// Alliance form
    pub kind: AllianceKind,
    /// Agreed duration in weeks
    pub duration_weeks: u32,
    /// Penalty owed on breach
    pub penalties_on_breach: f64,
}

/// An alliance was breached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceBreached {
    /// Alliance breached
    pub alliance_id: String,
    /// Penalty assessed
    pub penalty_amount: f64,
}

/// A buyout was proposed (initiator's stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyoutProposed {
    /// Offer id, shared with the mirror record
    pub offer_id: String,
    /// Target of the buyout
    pub target_agent_id: String,
    /// Offer amount
    pub offer_amount: f64,
    /// Whether the approach is hostile
    pub hostile: bool,
}

/// A buyout offer arrived (target's stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyoutOfferReceived {
    /// Offer id, shared with the initiator's record
    pub offer_id: String,
    /// Who made the offer
    pub from_agent_id: String,
    /// Offer amount
    pub offer_amount: f64,
    /// Whether the approach is hostile
    pub hostile: bool,
}

/// A buyout offer was accepted (recorded on both streams)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyoutAccepted {
    /// Offer accepted
    pub offer_id: String,
    /// The counterpart from this stream's point of view
    pub counterparty_agent_id: String,
    /// Settlement amount
    pub amount: f64,
}

/// A competitor's business was absorbed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAcquired {
    /// Agent acquired
    pub target_agent_id: String,
    /// Price paid
    pub acquisition_cost: f64,
}

/// An NPC competitor repriced a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorPriceChanged {
    /// Competitor id
    pub competitor_id: String,
    /// Location whose market observed the change
    pub location_id: String,
    /// Service repriced
    pub service: ServiceKind,
    /// Competitor's new price
    pub new_price: f64,
}

/// An NPC competitor left the market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorExitedMarket {
    /// Competitor id
    pub competitor_id: String,
    /// Why they left
    pub reason: String,
}

/// A message was sent to another agent (sender's stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationSent {
    /// Recipient agent
    pub recipient_agent_id: String,
    /// Channel used
    pub channel: CommunicationChannel,
    /// Message body
    pub message: String,
}

/// A message arrived from another agent (recipient's stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationReceived {
    /// Sender agent
    pub sender_agent_id: String,
    /// Channel used
    pub channel: CommunicationChannel,
    /// Message body
    pub message: String,
}
