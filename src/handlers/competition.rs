// Copyright 2025 Cowboy AI, LLC.

//! Competition and inter-agent command handlers
//!
//! Inter-agent intents emit on the initiator's stream plus a mirror record on
//! the counterpart's stream. Per-stream ordering holds; there is no
//! cross-stream atomicity.

use crate::commands::{
    AcceptBuyoutOfferPayload, Command, EnterAlliancePayload, ProposeBuyoutPayload,
};
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    AllianceFormed, BuyoutAccepted, BuyoutOfferReceived, BuyoutProposed, EventDraft, EventPayload,
    FundsTransferred,
};
use crate::state::{AgentState, TransferKind};
use uuid::Uuid;

/// Legal and advisory fees for a friendly buyout approach
const FRIENDLY_PROPOSAL_COST: f64 = 1_000.0;
/// Fees for a hostile approach
const HOSTILE_PROPOSAL_COST: f64 = 5_000.0;

/// `ENTER_ALLIANCE`: form an alliance; both parties record it
pub struct EnterAllianceHandler;

impl CommandHandler for EnterAllianceHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: EnterAlliancePayload = command.parse_payload()?;

        if payload.partner_agent_id.is_empty() || payload.partner_agent_id == state.agent_id {
            return Err(DomainError::InvalidState(
                "invalid partner agent".to_string(),
            ));
        }
        if payload.duration_weeks == 0 {
            return Err(DomainError::InvalidState(
                "duration must be positive".to_string(),
            ));
        }
        if payload.alliance_cost < 0.0 {
            return Err(DomainError::InvalidState(
                "alliance cost cannot be negative".to_string(),
            ));
        }
        if state
            .active_alliances
            .iter()
            .any(|a| a.partner_agent_id == payload.partner_agent_id)
        {
            return Err(DomainError::InvalidState(format!(
                "already allied with {}",
                payload.partner_agent_id
            )));
        }
        if !state.can_afford(payload.alliance_cost) {
            return Err(DomainError::InsufficientFunds {
                required: payload.alliance_cost,
                available: state.available_funds(),
            });
        }

        let alliance_id = Uuid::new_v4().to_string();
        let mut drafts = vec![
            EventDraft::own(EventPayload::AllianceFormed(AllianceFormed {
                alliance_id: alliance_id.clone(),
                partner_agent_id: payload.partner_agent_id.clone(),
                kind: payload.kind,
                duration_weeks: payload.duration_weeks,
                penalties_on_breach: payload.penalties_on_breach,
            })),
            EventDraft::mirror(
                payload.partner_agent_id.clone(),
                EventPayload::AllianceFormed(AllianceFormed {
                    alliance_id,
                    partner_agent_id: state.agent_id.clone(),
                    kind: payload.kind,
                    duration_weeks: payload.duration_weeks,
                    penalties_on_breach: payload.penalties_on_breach,
                }),
            ),
        ];
        if payload.alliance_cost > 0.0 {
            drafts.push(EventDraft::own(EventPayload::FundsTransferred(
                FundsTransferred {
                    amount: payload.alliance_cost,
                    kind: TransferKind::Expense,
                    description: format!(
                        "Alliance formation with {}",
                        payload.partner_agent_id
                    ),
                },
            )));
        }
        Ok(drafts)
    }
}

/// `PROPOSE_BUYOUT`: make an offer; the target gets notified on its stream
pub struct ProposeBuyoutHandler;

impl CommandHandler for ProposeBuyoutHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: ProposeBuyoutPayload = command.parse_payload()?;

        if payload.target_agent_id.is_empty() || payload.target_agent_id == state.agent_id {
            return Err(DomainError::InvalidState("invalid target agent".to_string()));
        }
        if payload.offer_amount <= 0.0 {
            return Err(DomainError::InvalidState(
                "offer amount must be positive".to_string(),
            ));
        }
        let proposal_cost = if payload.hostile {
            HOSTILE_PROPOSAL_COST
        } else {
            FRIENDLY_PROPOSAL_COST
        };
        if !state.can_afford(proposal_cost) {
            return Err(DomainError::InsufficientFunds {
                required: proposal_cost,
                available: state.available_funds(),
            });
        }

        let offer_id = Uuid::new_v4().to_string();
        Ok(vec![
            EventDraft::own(EventPayload::BuyoutProposed(BuyoutProposed {
                offer_id: offer_id.clone(),
                target_agent_id: payload.target_agent_id.clone(),
                offer_amount: payload.offer_amount,
                hostile: payload.hostile,
            })),
            EventDraft::mirror(
                payload.target_agent_id.clone(),
                EventPayload::BuyoutOfferReceived(BuyoutOfferReceived {
                    offer_id,
                    from_agent_id: state.agent_id.clone(),
                    offer_amount: payload.offer_amount,
                    hostile: payload.hostile,
                }),
            ),
            EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
                amount: proposal_cost,
                kind: TransferKind::Expense,
                description: format!(
                    "Buyout proposal: {:.2} for {} (hostile: {})",
                    payload.offer_amount, payload.target_agent_id, payload.hostile
                ),
            })),
        ])
    }
}

/// `ACCEPT_BUYOUT_OFFER`: accept a standing offer; the seller books the
/// proceeds and both streams record the acceptance
pub struct AcceptBuyoutOfferHandler;

impl CommandHandler for AcceptBuyoutOfferHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: AcceptBuyoutOfferPayload = command.parse_payload()?;

        if payload.counterparty_agent_id.is_empty()
            || payload.counterparty_agent_id == state.agent_id
        {
            return Err(DomainError::InvalidState(
                "invalid counterparty agent".to_string(),
            ));
        }
        if payload.amount <= 0.0 {
            return Err(DomainError::InvalidState(
                "settlement amount must be positive".to_string(),
            ));
        }

        Ok(vec![
            EventDraft::own(EventPayload::BuyoutAccepted(BuyoutAccepted {
                offer_id: payload.offer_id.clone(),
                counterparty_agent_id: payload.counterparty_agent_id.clone(),
                amount: payload.amount,
            })),
            EventDraft::mirror(
                payload.counterparty_agent_id.clone(),
                EventPayload::BuyoutAccepted(BuyoutAccepted {
                    offer_id: payload.offer_id.clone(),
                    counterparty_agent_id: state.agent_id.clone(),
                    amount: payload.amount,
                }),
            ),
            EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
                amount: payload.amount,
                kind: TransferKind::Revenue,
                description: format!("Accepted buyout offer {}", payload.offer_id),
            })),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::kinds;
    use crate::state::{Alliance, AllianceKind};

    fn base_state() -> AgentState {
        let mut state = AgentState::zero("P001");
        state.cash_balance = 10_000.0;
        state
    }

    #[test]
    fn test_alliance_emits_mirrored_records_with_swapped_partner() {
        let state = base_state();
        let command = Command::new(
            kinds::ENTER_ALLIANCE,
            "P001",
            &EnterAlliancePayload {
                partner_agent_id: "P002".to_string(),
                kind: AllianceKind::Formal,
                duration_weeks: 26,
                alliance_cost: 500.0,
                penalties_on_breach: 2_000.0,
            },
        )
        .unwrap();
        let drafts = EnterAllianceHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 3);

        let EventPayload::AllianceFormed(own) = &drafts[0].payload else {
            panic!("expected alliance");
        };
        let EventPayload::AllianceFormed(mirror) = &drafts[1].payload else {
            panic!("expected mirror alliance");
        };
        assert_eq!(own.partner_agent_id, "P002");
        assert_eq!(mirror.partner_agent_id, "P001");
        assert_eq!(own.alliance_id, mirror.alliance_id);
        assert_eq!(drafts[1].recipient.as_deref(), Some("P002"));
    }

    #[test]
    fn test_duplicate_alliance_rejected() {
        let mut state = base_state();
        state.active_alliances.push(Alliance {
            alliance_id: "A1".to_string(),
            partner_agent_id: "P002".to_string(),
            kind: AllianceKind::Informal,
            start_week: 0,
        });
        let command = Command::new(
            kinds::ENTER_ALLIANCE,
            "P001",
            &EnterAlliancePayload {
                partner_agent_id: "P002".to_string(),
                kind: AllianceKind::Formal,
                duration_weeks: 26,
                alliance_cost: 0.0,
                penalties_on_breach: 0.0,
            },
        )
        .unwrap();
        assert!(EnterAllianceHandler.handle(&state, &command).is_err());
    }

    #[test]
    fn test_hostile_buyout_costs_more() {
        let mut state = base_state();
        state.cash_balance = 2_000.0;
        state.line_of_credit_limit = 0.0;
        let hostile = Command::new(
            kinds::PROPOSE_BUYOUT,
            "P001",
            &ProposeBuyoutPayload {
                target_agent_id: "P002".to_string(),
                offer_amount: 50_000.0,
                hostile: true,
            },
        )
        .unwrap();
        assert!(matches!(
            ProposeBuyoutHandler.handle(&state, &hostile),
            Err(DomainError::InsufficientFunds { .. })
        ));

        let friendly = Command::new(
            kinds::PROPOSE_BUYOUT,
            "P001",
            &ProposeBuyoutPayload {
                target_agent_id: "P002".to_string(),
                offer_amount: 50_000.0,
                hostile: false,
            },
        )
        .unwrap();
        let drafts = ProposeBuyoutHandler.handle(&state, &friendly).unwrap();
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[1].recipient.as_deref(), Some("P002"));
    }

    #[test]
    fn test_accept_buyout_books_proceeds() {
        let state = base_state();
        let command = Command::new(
            kinds::ACCEPT_BUYOUT_OFFER,
            "P001",
            &AcceptBuyoutOfferPayload {
                offer_id: "OFF_1".to_string(),
                counterparty_agent_id: "P002".to_string(),
                amount: 25_000.0,
                notes: String::new(),
            },
        )
        .unwrap();
        let drafts = AcceptBuyoutOfferHandler.handle(&state, &command).unwrap();
        let EventPayload::FundsTransferred(funds) = &drafts[2].payload else {
            panic!("expected proceeds");
        };
        assert_eq!(funds.kind, TransferKind::Revenue);
        assert_eq!(funds.amount, 25_000.0);
    }
}
