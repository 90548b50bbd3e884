// Copyright 2025 Cowboy AI, LLC.

//! Vendor relationship command handlers

use crate::commands::{
    CancelVendorContractPayload, Command, NegotiateVendorDealPayload,
    SignExclusiveContractPayload,
};
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    EventDraft, EventPayload, ExclusiveContractCancelled, ExclusiveContractSigned,
    FundsTransferred, VendorNegotiationInitiated, VendorNegotiationResult, VendorTermsUpdated,
};
use crate::state::{AgentState, NegotiationOutcome, TransferKind, VendorRelationship};

/// Penalty for cancelling inside the exclusive window
const EARLY_TERMINATION_PENALTY: f64 = 250.0;

/// Largest discount a vendor will even discuss
const MAX_REQUESTED_DISCOUNT: f64 = 0.5;

/// Deterministic negotiation leverage: tier, tenure at tier, and the bounded
/// payment-history score all pull in the vendor's goodwill.
fn leverage_score(rel: &VendorRelationship) -> f64 {
    rel.tier as f64 * 10.0 + (rel.weeks_at_tier.min(10) as f64) * 2.0 + rel.on_time_ratio() * 20.0
}

/// `NEGOTIATE_VENDOR_DEAL`: ask a known vendor for a discount.
///
/// The outcome is a pure function of the relationship and the request:
/// discounts up to half the leverage score (in percent) are accepted,
/// up to the full score countered at half, and anything beyond rejected.
pub struct NegotiateVendorDealHandler;

impl CommandHandler for NegotiateVendorDealHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: NegotiateVendorDealPayload = command.parse_payload()?;

        let location = state
            .locations
            .get(&payload.location_id)
            .ok_or_else(|| DomainError::LocationNotFound(payload.location_id.clone()))?;
        let rel = location
            .vendor_relationships
            .get(&payload.vendor_id)
            .ok_or_else(|| DomainError::VendorNotFound(payload.vendor_id.clone()))?;
        if !(0.0..=MAX_REQUESTED_DISCOUNT).contains(&payload.requested_discount) {
            return Err(DomainError::InvalidState(format!(
                "requested discount {} outside [0, {MAX_REQUESTED_DISCOUNT}]",
                payload.requested_discount
            )));
        }
        if payload.proposal.is_empty() {
            return Err(DomainError::InvalidState(
                "a proposal is required for negotiation".to_string(),
            ));
        }

        let score = leverage_score(rel);
        let requested_pct = payload.requested_discount * 100.0;
        let (outcome, granted_discount, reason) = if requested_pct <= score / 2.0 {
            (
                NegotiationOutcome::Accepted,
                payload.requested_discount,
                "request within standing goodwill".to_string(),
            )
        } else if requested_pct <= score {
            (
                NegotiationOutcome::Countered,
                payload.requested_discount / 2.0,
                "countered at half the requested discount".to_string(),
            )
        } else {
            (
                NegotiationOutcome::Rejected,
                0.0,
                "request exceeds the relationship's leverage".to_string(),
            )
        };

        let mut drafts = vec![
            EventDraft::own(EventPayload::VendorNegotiationInitiated(
                VendorNegotiationInitiated {
                    location_id: payload.location_id.clone(),
                    vendor_id: payload.vendor_id.clone(),
                    requested_discount: payload.requested_discount,
                    proposal: payload.proposal.clone(),
                },
            )),
            EventDraft::own(EventPayload::VendorNegotiationResult(
                VendorNegotiationResult {
                    location_id: payload.location_id.clone(),
                    vendor_id: payload.vendor_id.clone(),
                    outcome,
                    granted_discount,
                    reason,
                },
            )),
        ];
        if granted_discount > 0.0 {
            drafts.push(EventDraft::own(EventPayload::VendorTermsUpdated(
                VendorTermsUpdated {
                    location_id: payload.location_id.clone(),
                    vendor_id: payload.vendor_id.clone(),
                    change_description: format!(
                        "unit price discounted by {:.0}%",
                        granted_discount * 100.0
                    ),
                    effective_week: state.current_week,
                },
            )));
        }
        Ok(drafts)
    }
}

/// `SIGN_EXCLUSIVE_CONTRACT`: bind a location to a single supplier
pub struct SignExclusiveContractHandler;

impl CommandHandler for SignExclusiveContractHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: SignExclusiveContractPayload = command.parse_payload()?;

        let location = state
            .locations
            .get(&payload.location_id)
            .ok_or_else(|| DomainError::LocationNotFound(payload.location_id.clone()))?;
        if payload.vendor_id.is_empty() {
            return Err(DomainError::InvalidState(
                "vendor id is required".to_string(),
            ));
        }
        if payload.duration_weeks == 0 {
            return Err(DomainError::InvalidState(
                "contract duration must be positive".to_string(),
            ));
        }
        if payload.upfront_fee < 0.0 {
            return Err(DomainError::InvalidState(
                "upfront fee cannot be negative".to_string(),
            ));
        }
        // One exclusive partner per location, full stop
        if let Some(existing) = location
            .vendor_relationships
            .values()
            .find(|rel| rel.exclusive_contract)
        {
            return Err(DomainError::ContractViolation(format!(
                "location {} already has an exclusive contract with {}",
                payload.location_id, existing.vendor_id
            )));
        }
        if !state.can_afford(payload.upfront_fee) {
            return Err(DomainError::InsufficientFunds {
                required: payload.upfront_fee,
                available: state.available_funds(),
            });
        }

        let mut drafts = vec![EventDraft::own(EventPayload::ExclusiveContractSigned(
            ExclusiveContractSigned {
                location_id: payload.location_id.clone(),
                vendor_id: payload.vendor_id.clone(),
                duration_weeks: payload.duration_weeks,
                volume_commitment_loads: payload.volume_commitment_loads,
            },
        ))];
        if payload.upfront_fee > 0.0 {
            drafts.push(EventDraft::own(EventPayload::FundsTransferred(
                FundsTransferred {
                    amount: payload.upfront_fee,
                    kind: TransferKind::Expense,
                    description: format!("Exclusive contract signing: {}", payload.vendor_id),
                },
            )));
        }
        Ok(drafts)
    }
}

/// `CANCEL_VENDOR_CONTRACT`: walk away from an exclusive deal.
///
/// Cancelling inside the active window costs the early-termination penalty.
pub struct CancelVendorContractHandler;

impl CommandHandler for CancelVendorContractHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: CancelVendorContractPayload = command.parse_payload()?;

        let location = state
            .locations
            .get(&payload.location_id)
            .ok_or_else(|| DomainError::LocationNotFound(payload.location_id.clone()))?;
        let rel = location
            .vendor_relationships
            .get(&payload.vendor_id)
            .ok_or_else(|| DomainError::VendorNotFound(payload.vendor_id.clone()))?;
        if !rel.exclusive_contract {
            return Err(DomainError::ContractViolation(format!(
                "no exclusive contract to cancel with {}",
                payload.vendor_id
            )));
        }

        let in_window = rel
            .exclusive_until_week
            .map(|until| until > state.current_week)
            .unwrap_or(true);
        let penalty = if in_window {
            EARLY_TERMINATION_PENALTY
        } else {
            0.0
        };
        if !state.can_afford(penalty) {
            return Err(DomainError::InsufficientFunds {
                required: penalty,
                available: state.available_funds(),
            });
        }

        let mut drafts = vec![EventDraft::own(EventPayload::ExclusiveContractCancelled(
            ExclusiveContractCancelled {
                location_id: payload.location_id.clone(),
                vendor_id: payload.vendor_id.clone(),
                penalty_amount: penalty,
                reason: payload.reason.clone(),
            },
        ))];
        if penalty > 0.0 {
            drafts.push(EventDraft::own(EventPayload::FundsTransferred(
                FundsTransferred {
                    amount: penalty,
                    kind: TransferKind::Penalty,
                    description: format!("Contract cancellation penalty: {}", payload.vendor_id),
                },
            )));
        }
        Ok(drafts)
    }
}
