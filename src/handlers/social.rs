// Copyright 2025 Cowboy AI, LLC.

//! Social, ethics, and regulatory command handlers

use crate::commands::{
    Command, CommunicateToAgentPayload, FileAppealPayload, FileRegulatoryReportPayload,
    InitiateCharityPayload, MakeEthicalChoicePayload, ResolveScandalPayload,
    SubscribeLoyaltyProgramPayload,
};
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    AppealFiled, CharityInitiated, CommunicationReceived, CommunicationSent, DilemmaResolved,
    EventDraft, EventPayload, FundsTransferred, LoyaltyMemberRegistered, RegulatoryReportFiled,
    ScandalResolved, SocialScoreAdjusted,
};
use crate::state::{AgentState, FineStatus, TransferKind};

/// Social points earned by filing a report on time
const ON_TIME_FILING_BOOST: f64 = 2.0;
/// Social points lost by filing late
const LATE_FILING_PENALTY: f64 = 2.0;

fn expense(amount: f64, description: String) -> EventDraft {
    EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
        amount,
        kind: TransferKind::Expense,
        description,
    }))
}

fn require_affordable(state: &AgentState, cost: f64) -> DomainResult<()> {
    if state.can_afford(cost) {
        Ok(())
    } else {
        Err(DomainError::InsufficientFunds {
            required: cost,
            available: state.available_funds(),
        })
    }
}

/// `INITIATE_CHARITY`: trade cash for community goodwill
pub struct InitiateCharityHandler;

impl CommandHandler for InitiateCharityHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: InitiateCharityPayload = command.parse_payload()?;

        if payload.amount <= 0.0 {
            return Err(DomainError::InvalidState(
                "donation amount must be positive".to_string(),
            ));
        }
        require_affordable(state, payload.amount)?;

        // Roughly one point of goodwill per hundred donated, capped
        let boost = (payload.amount / 100.0).min(50.0);

        Ok(vec![
            EventDraft::own(EventPayload::CharityInitiated(CharityInitiated {
                contribution: payload.contribution,
                amount: payload.amount,
            })),
            expense(
                payload.amount,
                format!("Charity contribution: {:?}", payload.contribution),
            ),
            EventDraft::own(EventPayload::SocialScoreAdjusted(SocialScoreAdjusted {
                delta: boost,
                reason: format!("Charity initiative: {:?}", payload.contribution),
            })),
        ])
    }
}

/// `RESOLVE_SCANDAL`: spend money to shrink an active scandal
pub struct ResolveScandalHandler;

impl CommandHandler for ResolveScandalHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: ResolveScandalPayload = command.parse_payload()?;

        let scandal = state.scandal(&payload.scandal_id).ok_or_else(|| {
            DomainError::InvalidState(format!("no active scandal {}", payload.scandal_id))
        })?;
        if payload.cost < 0.0 {
            return Err(DomainError::InvalidState(
                "resolution cost cannot be negative".to_string(),
            ));
        }
        require_affordable(state, payload.cost)?;

        // A thousand dollars of effort buys a tenth of severity
        let severity_reduction = scandal.severity.min(payload.cost / 1_000.0 * 0.1);

        Ok(vec![
            EventDraft::own(EventPayload::ScandalResolved(ScandalResolved {
                scandal_id: payload.scandal_id.clone(),
                strategy: payload.strategy,
                cost: payload.cost,
                severity_reduction,
            })),
            expense(
                payload.cost,
                format!(
                    "Scandal resolution ({:?}): {}",
                    payload.strategy, payload.scandal_id
                ),
            ),
            EventDraft::own(EventPayload::SocialScoreAdjusted(SocialScoreAdjusted {
                delta: severity_reduction * 10.0,
                reason: format!("Resolved scandal: {}", payload.scandal_id),
            })),
        ])
    }
}

/// `MAKE_ETHICAL_CHOICE`: resolve an open dilemma by one of its options
pub struct MakeEthicalChoiceHandler;

impl CommandHandler for MakeEthicalChoiceHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: MakeEthicalChoicePayload = command.parse_payload()?;

        let dilemma = state.active_dilemmas.get(&payload.dilemma_id).ok_or_else(|| {
            DomainError::InvalidState(format!("no active dilemma {}", payload.dilemma_id))
        })?;
        let option = dilemma.options.get(&payload.choice).ok_or_else(|| {
            DomainError::InvalidState(format!(
                "dilemma {} has no option {}",
                payload.dilemma_id, payload.choice
            ))
        })?;
        require_affordable(state, option.immediate_cost)?;

        let mut drafts = vec![
            EventDraft::own(EventPayload::DilemmaResolved(DilemmaResolved {
                dilemma_id: payload.dilemma_id.clone(),
                chosen_option: payload.choice.clone(),
            })),
            EventDraft::own(EventPayload::SocialScoreAdjusted(SocialScoreAdjusted {
                delta: option.social_score_impact,
                reason: format!("Ethical choice made: {}", payload.choice),
            })),
        ];
        if option.immediate_cost > 0.0 {
            drafts.push(expense(
                option.immediate_cost,
                format!("Cost of choice: {}", payload.choice),
            ));
        }
        Ok(drafts)
    }
}

/// `FILE_REGULATORY_REPORT`: demonstrate compliance (or tardiness)
pub struct FileRegulatoryReportHandler;

impl CommandHandler for FileRegulatoryReportHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: FileRegulatoryReportPayload = command.parse_payload()?;

        if payload.filing_cost < 0.0 {
            return Err(DomainError::InvalidState(
                "filing cost cannot be negative".to_string(),
            ));
        }
        require_affordable(state, payload.filing_cost)?;

        let delta = if payload.on_time {
            ON_TIME_FILING_BOOST
        } else {
            -LATE_FILING_PENALTY
        };

        let mut drafts = vec![EventDraft::own(EventPayload::RegulatoryReportFiled(
            RegulatoryReportFiled {
                report: payload.report,
                on_time: payload.on_time,
            },
        ))];
        if payload.filing_cost > 0.0 {
            drafts.push(expense(
                payload.filing_cost,
                format!("Regulatory report filing: {:?}", payload.report),
            ));
        }
        drafts.push(EventDraft::own(EventPayload::SocialScoreAdjusted(
            SocialScoreAdjusted {
                delta,
                reason: format!("Filed {:?}", payload.report),
            },
        )));
        Ok(drafts)
    }
}

/// `FILE_APPEAL`: contest an open fine
pub struct FileAppealHandler;

impl CommandHandler for FileAppealHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: FileAppealPayload = command.parse_payload()?;

        let fine = state
            .fine(&payload.fine_id)
            .ok_or_else(|| DomainError::InvalidState(format!("no fine {}", payload.fine_id)))?;
        if fine.status != FineStatus::Open {
            return Err(DomainError::InvalidState(format!(
                "fine {} is not open",
                payload.fine_id
            )));
        }
        if payload.legal_fee <= 0.0 {
            return Err(DomainError::InvalidState(
                "legal fee must be positive".to_string(),
            ));
        }
        require_affordable(state, payload.legal_fee)?;

        Ok(vec![
            EventDraft::own(EventPayload::AppealFiled(AppealFiled {
                fine_id: payload.fine_id.clone(),
                legal_fee: payload.legal_fee,
            })),
            expense(
                payload.legal_fee,
                format!("Appeal filing cost for fine {}", payload.fine_id),
            ),
        ])
    }
}

/// `SUBSCRIBE_LOYALTY_PROGRAM`: launch a loyalty program at a location
pub struct SubscribeLoyaltyProgramHandler;

impl CommandHandler for SubscribeLoyaltyProgramHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: SubscribeLoyaltyProgramPayload = command.parse_payload()?;

        if !state.locations.contains_key(&payload.location_id) {
            return Err(DomainError::LocationNotFound(payload.location_id));
        }
        if payload.program_cost <= 0.0 {
            return Err(DomainError::InvalidState(
                "program cost must be positive".to_string(),
            ));
        }
        if payload.expected_member_count == 0 {
            return Err(DomainError::InvalidState(
                "expected member count must be positive".to_string(),
            ));
        }
        require_affordable(state, payload.program_cost)?;

        Ok(vec![
            EventDraft::own(EventPayload::LoyaltyMemberRegistered(
                LoyaltyMemberRegistered {
                    location_id: payload.location_id.clone(),
                    member_count: payload.expected_member_count,
                    program_name: payload.program_name.clone(),
                },
            )),
            expense(
                payload.program_cost,
                format!("Loyalty program setup at {}", payload.location_id),
            ),
        ])
    }
}

/// `COMMUNICATE_TO_AGENT`: message another agent; both streams get a record
pub struct CommunicateToAgentHandler;

impl CommandHandler for CommunicateToAgentHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: CommunicateToAgentPayload = command.parse_payload()?;

        if payload.recipient_agent_id.is_empty() {
            return Err(DomainError::InvalidState(
                "recipient agent id is required".to_string(),
            ));
        }
        if payload.recipient_agent_id == state.agent_id {
            return Err(DomainError::InvalidState(
                "cannot message yourself".to_string(),
            ));
        }
        if payload.message.is_empty() {
            return Err(DomainError::InvalidState(
                "message content is required".to_string(),
            ));
        }

        Ok(vec![
            EventDraft::own(EventPayload::CommunicationSent(CommunicationSent {
                recipient_agent_id: payload.recipient_agent_id.clone(),
                channel: payload.channel,
                message: payload.message.clone(),
            })),
            EventDraft::mirror(
                payload.recipient_agent_id.clone(),
                EventPayload::CommunicationReceived(CommunicationReceived {
                    sender_agent_id: state.agent_id.clone(),
                    channel: payload.channel,
                    message: payload.message,
                }),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::kinds;
    use crate::state::{
        CharityKind, CommunicationChannel, DilemmaOption, DilemmaState, Fine, ResolutionKind,
        ScandalMarker,
    };
    use std::collections::BTreeMap;

    fn base_state() -> AgentState {
        let mut state = AgentState::zero("P001");
        state.cash_balance = 10_000.0;
        state
    }

    #[test]
    fn test_charity_boost_is_capped() {
        let mut state = base_state();
        state.cash_balance = 100_000.0;
        let command = Command::new(
            kinds::INITIATE_CHARITY,
            "P001",
            &InitiateCharityPayload {
                contribution: CharityKind::Donation,
                amount: 20_000.0,
            },
        )
        .unwrap();
        let drafts = InitiateCharityHandler.handle(&state, &command).unwrap();
        let EventPayload::SocialScoreAdjusted(social) = &drafts[2].payload else {
            panic!("expected social adjustment");
        };
        assert_eq!(social.delta, 50.0);
    }

    #[test]
    fn test_resolve_scandal_requires_active_marker() {
        let state = base_state();
        let command = Command::new(
            kinds::RESOLVE_SCANDAL,
            "P001",
            &ResolveScandalPayload {
                scandal_id: "SC_404".to_string(),
                strategy: ResolutionKind::PublicApology,
                cost: 500.0,
            },
        )
        .unwrap();
        assert!(ResolveScandalHandler.handle(&state, &command).is_err());

        let mut state = base_state();
        state.active_scandals.push(ScandalMarker {
            scandal_id: "SC1".to_string(),
            description: "mold in dryers".to_string(),
            severity: 0.6,
            duration_weeks: 8,
            decay_rate: 0.1,
            start_week: 0,
        });
        let command = Command::new(
            kinds::RESOLVE_SCANDAL,
            "P001",
            &ResolveScandalPayload {
                scandal_id: "SC1".to_string(),
                strategy: ResolutionKind::PrFirmEngagement,
                cost: 2_000.0,
            },
        )
        .unwrap();
        let drafts = ResolveScandalHandler.handle(&state, &command).unwrap();
        let EventPayload::ScandalResolved(resolved) = &drafts[0].payload else {
            panic!("expected resolution");
        };
        assert!((resolved.severity_reduction - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_ethical_choice_must_match_an_option() {
        let mut state = base_state();
        let mut options = BTreeMap::new();
        options.insert(
            "cut_corners".to_string(),
            DilemmaOption {
                description: "skip the safety checks".to_string(),
                immediate_cost: 0.0,
                social_score_impact: -15.0,
                regulatory_risk: "HIGH".to_string(),
            },
        );
        options.insert(
            "maintain_standards".to_string(),
            DilemmaOption {
                description: "keep the inspections".to_string(),
                immediate_cost: 500.0,
                social_score_impact: 5.0,
                regulatory_risk: "LOW".to_string(),
            },
        );
        state.active_dilemmas.insert(
            "D1".to_string(),
            DilemmaState {
                description: "safety corners".to_string(),
                options,
                triggered_week: 0,
            },
        );

        let bad = Command::new(
            kinds::MAKE_ETHICAL_CHOICE,
            "P001",
            &MakeEthicalChoicePayload {
                dilemma_id: "D1".to_string(),
                choice: "invent_option".to_string(),
            },
        )
        .unwrap();
        assert!(MakeEthicalChoiceHandler.handle(&state, &bad).is_err());

        let good = Command::new(
            kinds::MAKE_ETHICAL_CHOICE,
            "P001",
            &MakeEthicalChoicePayload {
                dilemma_id: "D1".to_string(),
                choice: "maintain_standards".to_string(),
            },
        )
        .unwrap();
        let drafts = MakeEthicalChoiceHandler.handle(&state, &good).unwrap();
        assert_eq!(drafts.len(), 3);
        let EventPayload::SocialScoreAdjusted(social) = &drafts[1].payload else {
            panic!("expected social adjustment");
        };
        assert_eq!(social.delta, 5.0);
    }

    #[test]
    fn test_appeal_only_for_open_fines() {
        let mut state = base_state();
        state.pending_fines.push(Fine {
            fine_id: "F1".to_string(),
            description: "late filing".to_string(),
            amount: 250.0,
            issued_week: 1,
            due_week: 5,
            status: FineStatus::Appealed,
        });
        let command = Command::new(
            kinds::FILE_APPEAL,
            "P001",
            &FileAppealPayload {
                fine_id: "F1".to_string(),
                legal_fee: 500.0,
            },
        )
        .unwrap();
        assert!(FileAppealHandler.handle(&state, &command).is_err());

        state.pending_fines[0].status = FineStatus::Open;
        let drafts = FileAppealHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].payload.kind(), "AppealFiled");
    }

    #[test]
    fn test_communication_mirrors_to_recipient_stream() {
        let state = base_state();
        let command = Command::new(
            kinds::COMMUNICATE_TO_AGENT,
            "P001",
            &CommunicateToAgentPayload {
                recipient_agent_id: "P002".to_string(),
                message: "fancy splitting the detergent order?".to_string(),
                channel: CommunicationChannel::Direct,
            },
        )
        .unwrap();
        let drafts = CommunicateToAgentHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].recipient.is_none());
        assert_eq!(drafts[1].recipient.as_deref(), Some("P002"));
        let EventPayload::CommunicationReceived(received) = &drafts[1].payload else {
            panic!("expected mirror record");
        };
        assert_eq!(received.sender_agent_id, "P001");
    }

    #[test]
    fn test_self_message_rejected() {
        let state = base_state();
        let command = Command::new(
            kinds::COMMUNICATE_TO_AGENT,
            "P001",
            &CommunicateToAgentPayload {
                recipient_agent_id: "P001".to_string(),
                message: "hello me".to_string(),
                channel: CommunicationChannel::Direct,
            },
        )
        .unwrap();
        assert!(CommunicateToAgentHandler.handle(&state, &command).is_err());
    }
}
