// Copyright 2025 Cowboy AI, LLC.

//! Adjudication injection handler
//!
//! Non-player drivers (a game-master or judge process, often LLM-backed)
//! inject world facts through the same Command -> Event -> State pipeline as
//! players. Each role may only inject from a conservative allow-list.

use crate::commands::Command;
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{EventDraft, EventPayload};
use crate::state::AgentState;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Command kind for adjudicator-injected events
pub const INJECT_WORLD_EVENT: &str = "INJECT_WORLD_EVENT";

/// Narrative and market kinds the game master may inject
const GM_ALLOWED: &[&str] = &[
    "VendorPriceFluctuated",
    "VendorTierPromoted",
    "VendorTierDemoted",
    "VendorNegotiationResult",
    "VendorTermsUpdated",
    "CustomerReviewSubmitted",
    "DeliveryDisruptionStarted",
    "DeliveryDisruptionEnded",
    "DilemmaTriggered",
    "CompetitorPriceChanged",
    "CompetitorExitedMarket",
    "LocationListingAdded",
    "LocationListingRemoved",
    "StaffQuit",
];

/// Consequence kinds the judge may inject
const JUDGE_ALLOWED: &[&str] = &[
    "ScandalStarted",
    "RegulatoryFinding",
    "RegulatoryStatusUpdated",
    "InvestigationStarted",
    "InvestigationStageAdvanced",
];

/// Which adjudication role is injecting
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceRole {
    /// The game master (narrative and market)
    Gm,
    /// The judge (regulatory consequences)
    Judge,
}

/// Payload of [`INJECT_WORLD_EVENT`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InjectWorldEventPayload {
    /// Role performing the injection
    pub source_role: SourceRole,
    /// Event kind to inject
    pub event_kind: String,
    /// Kind-specific payload fields
    pub event_fields: serde_json::Value,
}

/// Validates and injects a single allow-listed event kind.
pub struct InjectWorldEventHandler;

impl CommandHandler for InjectWorldEventHandler {
    fn handle(&self, _state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: InjectWorldEventPayload = command.parse_payload()?;

        if payload.event_kind.is_empty() {
            return Err(DomainError::InvalidState(
                "event_kind is required".to_string(),
            ));
        }
        let allowed = match payload.source_role {
            SourceRole::Gm => GM_ALLOWED,
            SourceRole::Judge => JUDGE_ALLOWED,
        };
        if !allowed.contains(&payload.event_kind.as_str()) {
            return Err(DomainError::InvalidState(format!(
                "event kind {} is not allowed for {:?}",
                payload.event_kind, payload.source_role
            )));
        }

        // Reassemble a tagged record and let the catalog validate the fields
        let mut record = match payload.event_fields {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            _ => {
                return Err(DomainError::InvalidState(
                    "event_fields must be an object".to_string(),
                ))
            }
        };
        record.insert(
            "event_kind".to_string(),
            serde_json::Value::String(payload.event_kind.clone()),
        );
        let event: EventPayload = serde_json::from_value(serde_json::Value::Object(record))
            .map_err(|e| {
                DomainError::InvalidState(format!(
                    "invalid event_fields for {}: {e}",
                    payload.event_kind
                ))
            })?;

        Ok(vec![EventDraft::own(event)])
    }
}
