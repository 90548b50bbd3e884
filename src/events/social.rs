// Copyright 2025 Cowboy AI, LLC.

//! Social, ethics, and regulatory events

use crate::state::{CharityKind, DilemmaOption, RegulatoryStatus, ReportKind, ResolutionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The agent's social standing moved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialScoreAdjusted {
    /// Delta applied (positive or negative)
    pub delta: f64,
    /// Why the score moved
    pub reason: String,
}

/// A scandal broke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScandalStarted {
    /// Scandal id
    pub scandal_id: String,
    /// What happened
    pub description: String,
    /// Severity 0.0-1.0
    pub severity: f64,
    /// Planned duration in weeks
    pub duration_weeks: u32,
    /// Severity removed per weekly decay
    pub decay_rate: f64,
}

/// A scandal marker lost severity for the week.
///
/// The reducer removes the marker once `remaining_severity` is zero or less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScandalMarkerDecayed {
    /// Scandal id
    pub scandal_id: String,
    /// Severity removed
    pub decay_amount: f64,
    /// Severity after decay
    pub remaining_severity: f64,
}

/// A scandal was actively addressed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScandalResolved {
    /// Scandal id
    pub scandal_id: String,
    /// Strategy used
    pub strategy: ResolutionKind,
    /// Money spent on the resolution
    pub cost: f64,
    /// Severity removed by the effort
    pub severity_reduction: f64,
}

/// A charitable initiative went ahead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharityInitiated {
    /// Contribution form
    pub contribution: CharityKind,
    /// Amount contributed
    pub amount: f64,
}

/// An ethical dilemma was put to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilemmaTriggered {
    /// Dilemma id
    pub dilemma_id: String,
    /// What the agent must decide
    pub description: String,
    /// Option id -> consequence summary
    pub options: BTreeMap<String, DilemmaOption>,
}

/// A dilemma was resolved by a choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilemmaResolved {
    /// Dilemma id
    pub dilemma_id: String,
    /// Chosen option id
    pub chosen_option: String,
}

/// The regulator issued a finding with a fine attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryFinding {
    /// Fine id
    pub fine_id: String,
    /// What was found
    pub description: String,
    /// Fine amount
    pub fine_amount: f64,
    /// Week the fine falls due
    pub due_week: u32,
}

/// The agent's regulatory status changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryStatusUpdated {
    /// New status
    pub new_status: RegulatoryStatus,
    /// Why the status changed
    pub reason: String,
}

/// A regulatory report was filed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryReportFiled {
    /// Report kind
    pub report: ReportKind,
    /// Whether it was filed on time
    pub on_time: bool,
}

/// A fine was contested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealFiled {
    /// Fine contested
    pub fine_id: String,
    /// Legal fee paid
    pub legal_fee: f64,
}

/// A fine was settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinePaid {
    /// Fine settled
    pub fine_id: String,
    /// Amount paid
    pub amount: f64,
}

/// A regulatory investigation opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationStarted {
    /// Investigation id
    pub investigation_id: String,
    /// Why it opened
    pub reason: String,
    /// Severity label
    pub severity: String,
}

/// An investigation moved to a new stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationStageAdvanced {
    /// Investigation id
    pub investigation_id: String,
    /// New stage label
    pub stage: String,
}

/// A customer left a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerReviewSubmitted {
    /// Reviewed location
    pub location_id: String,
    /// Star rating 1-5
    pub rating: f64,
    /// Review text
    pub review_text: String,
}

/// Loyalty-program members signed up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyMemberRegistered {
    /// Location running the program
    pub location_id: String,
    /// Members registered
    pub member_count: u32,
    /// Program name
    pub program_name: String,
}

/// End-of-turn private notes were saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndOfTurnNotesSaved {
    /// The notes
    pub notes: String,
}

/// An audit snapshot marker was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSnapshotRecorded {
    /// Entries in the log at snapshot time
    pub entries_count: u64,
    /// Kind of the last event covered
    pub last_event_kind: String,
}
