// Copyright 2025 Cowboy AI, LLC.

//! Social, ethics, and regulatory reducers

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::{
    clamp_score, AgentState, DilemmaState, Fine, FineStatus, Investigation, RegulatoryStatus,
    ScandalMarker,
};

/// Wire the social and regulatory reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("SocialScoreAdjusted", social_score_adjusted);
    registry.register("ScandalStarted", scandal_started);
    registry.register("ScandalMarkerDecayed", scandal_marker_decayed);
    registry.register("ScandalResolved", scandal_resolved);
    registry.register("CharityInitiated", charity_initiated);
    registry.register("DilemmaTriggered", dilemma_triggered);
    registry.register("DilemmaResolved", dilemma_resolved);
    registry.register("RegulatoryFinding", regulatory_finding);
    registry.register("RegulatoryStatusUpdated", regulatory_status_updated);
    registry.register("RegulatoryReportFiled", regulatory_report_filed);
    registry.register("AppealFiled", appeal_filed);
    registry.register("FinePaid", fine_paid);
    registry.register("InvestigationStarted", investigation_started);
    registry.register("InvestigationStageAdvanced", investigation_stage_advanced);
    registry.register("CustomerReviewSubmitted", customer_review_submitted);
    registry.register("LoyaltyMemberRegistered", loyalty_member_registered);
    registry.register("EndOfTurnNotesSaved", end_of_turn_notes_saved);
    registry.register("AuditSnapshotRecorded", audit_snapshot_recorded);
}

/// Apply the delta and clamp into [0, 100]
pub fn social_score_adjusted(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::SocialScoreAdjusted(e) = &event.payload else {
        return Err(unexpected(event, "SocialScoreAdjusted"));
    };
    state.social_score = clamp_score(state.social_score + e.delta);
    Ok(state)
}

/// Append the scandal marker
pub fn scandal_started(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::ScandalStarted(e) = &event.payload else {
        return Err(unexpected(event, "ScandalStarted"));
    };
    state.active_scandals.push(ScandalMarker {
        scandal_id: e.scandal_id.clone(),
        description: e.description.clone(),
        severity: e.severity.clamp(0.0, 1.0),
        duration_weeks: e.duration_weeks,
        decay_rate: e.decay_rate,
        start_week: event.week,
    });
    Ok(state)
}

/// Lower the marker's severity; remove it once fully decayed
pub fn scandal_marker_decayed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::ScandalMarkerDecayed(e) = &event.payload else {
        return Err(unexpected(event, "ScandalMarkerDecayed"));
    };
    if let Some(index) = state
        .active_scandals
        .iter()
        .position(|s| s.scandal_id == e.scandal_id)
    {
        if e.remaining_severity <= 0.0 {
            state.active_scandals.remove(index);
        } else {
            state.active_scandals[index].severity = e.remaining_severity.clamp(0.0, 1.0);
        }
    }
    Ok(state)
}

/// Apply the resolution's severity reduction; remove the marker if spent
pub fn scandal_resolved(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::ScandalResolved(e) = &event.payload else {
        return Err(unexpected(event, "ScandalResolved"));
    };
    if let Some(index) = state
        .active_scandals
        .iter()
        .position(|s| s.scandal_id == e.scandal_id)
    {
        let remaining = state.active_scandals[index].severity - e.severity_reduction;
        if remaining <= 0.0 {
            state.active_scandals.remove(index);
        } else {
            state.active_scandals[index].severity = remaining;
        }
    }
    Ok(state)
}

/// The contribution record stands alone; the score moves via
/// SocialScoreAdjusted and cash via FundsTransferred
pub fn charity_initiated(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::CharityInitiated(_) = &event.payload else {
        return Err(unexpected(event, "CharityInitiated"));
    };
    Ok(state)
}

/// Surface the dilemma for the player
pub fn dilemma_triggered(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::DilemmaTriggered(e) = &event.payload else {
        return Err(unexpected(event, "DilemmaTriggered"));
    };
    state.active_dilemmas.insert(
        e.dilemma_id.clone(),
        DilemmaState {
            description: e.description.clone(),
            options: e.options.clone(),
            triggered_week: event.week,
        },
    );
    Ok(state)
}

/// Retire the resolved dilemma
pub fn dilemma_resolved(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::DilemmaResolved(e) = &event.payload else {
        return Err(unexpected(event, "DilemmaResolved"));
    };
    state.active_dilemmas.remove(&e.dilemma_id);
    Ok(state)
}

/// Append the fine as pending
pub fn regulatory_finding(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::RegulatoryFinding(e) = &event.payload else {
        return Err(unexpected(event, "RegulatoryFinding"));
    };
    state.pending_fines.push(Fine {
        fine_id: e.fine_id.clone(),
        description: e.description.clone(),
        amount: e.fine_amount,
        issued_week: event.week,
        due_week: e.due_week,
        status: FineStatus::Open,
    });
    Ok(state)
}

/// Overwrite the regulatory status with the declared value
pub fn regulatory_status_updated(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::RegulatoryStatusUpdated(e) = &event.payload else {
        return Err(unexpected(event, "RegulatoryStatusUpdated"));
    };
    state.regulatory_status = e.new_status;
    Ok(state)
}

/// The filing record stands alone
pub fn regulatory_report_filed(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::RegulatoryReportFiled(_) = &event.payload else {
        return Err(unexpected(event, "RegulatoryReportFiled"));
    };
    Ok(state)
}

/// Mark the contested fine as appealed
pub fn appeal_filed(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::AppealFiled(e) = &event.payload else {
        return Err(unexpected(event, "AppealFiled"));
    };
    if let Some(fine) = state
        .pending_fines
        .iter_mut()
        .find(|f| f.fine_id == e.fine_id)
    {
        fine.status = FineStatus::Appealed;
    }
    Ok(state)
}

/// Settle the fine and drop it from the pending list
pub fn fine_paid(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::FinePaid(e) = &event.payload else {
        return Err(unexpected(event, "FinePaid"));
    };
    state.pending_fines.retain(|f| f.fine_id != e.fine_id);
    Ok(state)
}

/// Record the investigation and move status to UNDER_INVESTIGATION
pub fn investigation_started(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::InvestigationStarted(e) = &event.payload else {
        return Err(unexpected(event, "InvestigationStarted"));
    };
    state.regulatory_status = RegulatoryStatus::UnderInvestigation;
    state.active_investigations.insert(
        e.investigation_id.clone(),
        Investigation {
            reason: e.reason.clone(),
            severity: e.severity.clone(),
            stage: "INITIAL".to_string(),
            started_week: event.week,
        },
    );
    Ok(state)
}

/// Advance the named investigation's stage
pub fn investigation_stage_advanced(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::InvestigationStageAdvanced(e) = &event.payload else {
        return Err(unexpected(event, "InvestigationStageAdvanced"));
    };
    if let Some(investigation) = state.active_investigations.get_mut(&e.investigation_id) {
        investigation.stage = e.stage.clone();
    }
    Ok(state)
}

/// Reviews nudge the social score around the 3-star midpoint
pub fn customer_review_submitted(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::CustomerReviewSubmitted(e) = &event.payload else {
        return Err(unexpected(event, "CustomerReviewSubmitted"));
    };
    state.social_score = clamp_score(state.social_score + (e.rating - 3.0));
    Ok(state)
}

/// Register the new members
pub fn loyalty_member_registered(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::LoyaltyMemberRegistered(e) = &event.payload else {
        return Err(unexpected(event, "LoyaltyMemberRegistered"));
    };
    state.customer_loyalty_members += e.member_count;
    Ok(state)
}

/// Append the note verbatim
pub fn end_of_turn_notes_saved(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::EndOfTurnNotesSaved(e) = &event.payload else {
        return Err(unexpected(event, "EndOfTurnNotesSaved"));
    };
    if !e.notes.is_empty() {
        state.private_notes.push(e.notes.clone());
    }
    Ok(state)
}

/// Record the audit marker
pub fn audit_snapshot_recorded(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::AuditSnapshotRecorded(e) = &event.payload else {
        return Err(unexpected(event, "AuditSnapshotRecorded"));
    };
    state.audit_entries_count = e.entries_count;
    state.last_audit_event = e.last_event_kind.clone();
    Ok(state)
}
