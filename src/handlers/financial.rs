// Copyright 2025 Cowboy AI, LLC.

//! Financial command handlers

use crate::commands::{
    Command, InvestInMarketingPayload, MakeDebtPaymentPayload, SetPricePayload, TakeLoanPayload,
};
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    DebtPaymentProcessed, EventDraft, EventPayload, FundsTransferred, LoanTaken,
    MarketingBoostApplied, PriceSet,
};
use crate::state::{AgentState, LoanKind, TransferKind};
use uuid::Uuid;

/// Lowest accepted service price
pub const MIN_PRICE: f64 = 0.01;
/// Highest accepted service price
pub const MAX_PRICE: f64 = 100.0;

/// Marketing duration applied to every campaign
const MARKETING_DURATION_WEEKS: u32 = 4;

fn expense(amount: f64, description: String) -> EventDraft {
    EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
        amount,
        kind: TransferKind::Expense,
        description,
    }))
}

/// `SET_PRICE`: reprice one service at a location
pub struct SetPriceHandler;

impl CommandHandler for SetPriceHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: SetPricePayload = command.parse_payload()?;

        if !state.locations.contains_key(&payload.location_id) {
            return Err(DomainError::LocationNotFound(payload.location_id));
        }
        if !(MIN_PRICE..=MAX_PRICE).contains(&payload.new_price) {
            return Err(DomainError::InvalidState(format!(
                "price {} outside [{MIN_PRICE}, {MAX_PRICE}]",
                payload.new_price
            )));
        }

        Ok(vec![EventDraft::own(EventPayload::PriceSet(PriceSet {
            location_id: payload.location_id,
            service: payload.service,
            new_price: payload.new_price,
        }))])
    }
}

/// `TAKE_LOAN`: originate a loan product.
///
/// The payload's `location_id` is accepted for host compatibility and
/// ignored, matching the reference validator.
pub struct TakeLoanHandler;

impl CommandHandler for TakeLoanHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: TakeLoanPayload = command.parse_payload()?;

        if payload.amount <= 0.0 {
            return Err(DomainError::InvalidState(
                "loan amount must be positive".to_string(),
            ));
        }
        let floor = payload.loan_kind.credit_floor();
        if state.credit_rating < floor {
            return Err(DomainError::CreditError(format!(
                "credit rating {} below the floor of {floor} for {:?}",
                state.credit_rating, payload.loan_kind
            )));
        }
        if payload.loan_kind == LoanKind::Loc {
            let headroom = state.line_of_credit_limit - state.line_of_credit_balance;
            if payload.amount > headroom {
                return Err(DomainError::CreditError(format!(
                    "draw of {:.2} exceeds remaining line-of-credit capacity {:.2}",
                    payload.amount, headroom
                )));
            }
        }

        let loan_id = Uuid::new_v4().to_string();
        Ok(vec![
            EventDraft::own(EventPayload::LoanTaken(LoanTaken {
                loan_id: loan_id.clone(),
                kind: payload.loan_kind,
                principal: payload.amount,
                interest_rate: payload.loan_kind.interest_rate(),
                term_weeks: payload.loan_kind.term_weeks(),
            })),
            EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
                amount: payload.amount,
                kind: TransferKind::Loan,
                description: format!("Loan disbursement: {:?} ({loan_id})", payload.loan_kind),
            })),
        ])
    }
}

/// `MAKE_DEBT_PAYMENT`: pay down one loan from cash
pub struct MakeDebtPaymentHandler;

impl CommandHandler for MakeDebtPaymentHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: MakeDebtPaymentPayload = command.parse_payload()?;

        let loan = state
            .loan(&payload.debt_id)
            .ok_or_else(|| DomainError::InvalidState(format!("no loan {}", payload.debt_id)))?;
        if payload.amount <= 0.0 {
            return Err(DomainError::InvalidState(
                "payment must be positive".to_string(),
            ));
        }
        let ceiling = state.cash_balance.min(loan.outstanding);
        if payload.amount > ceiling {
            return Err(DomainError::InsufficientFunds {
                required: payload.amount,
                available: ceiling,
            });
        }

        let principal_reduction = payload.amount * 0.8;
        let interest_paid = payload.amount * 0.2;
        let remaining_balance = (loan.outstanding - principal_reduction).max(0.0);

        Ok(vec![
            EventDraft::own(EventPayload::DebtPaymentProcessed(DebtPaymentProcessed {
                loan_id: payload.debt_id.clone(),
                amount_paid: payload.amount,
                principal_reduction,
                interest_paid,
                remaining_balance,
            })),
            EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
                amount: payload.amount,
                kind: TransferKind::Payment,
                description: format!("Debt payment for {}", payload.debt_id),
            })),
        ])
    }
}

/// `INVEST_IN_MARKETING`: buy a customer-attraction boost
pub struct InvestInMarketingHandler;

impl CommandHandler for InvestInMarketingHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: InvestInMarketingPayload = command.parse_payload()?;

        if !state.locations.contains_key(&payload.location_id) {
            return Err(DomainError::LocationNotFound(payload.location_id));
        }
        if payload.cost <= 0.0 {
            return Err(DomainError::InvalidState(
                "marketing cost must be positive".to_string(),
            ));
        }
        if !state.can_afford(payload.cost) {
            return Err(DomainError::InsufficientFunds {
                required: payload.cost,
                available: state.available_funds(),
            });
        }

        // $100 of spend buys five points of attraction
        let attraction_boost = (payload.cost / 100.0) * 0.05;

        Ok(vec![
            EventDraft::own(EventPayload::MarketingBoostApplied(MarketingBoostApplied {
                location_id: payload.location_id.clone(),
                campaign_kind: payload.campaign,
                marketing_cost: payload.cost,
                attraction_boost,
                duration_weeks: MARKETING_DURATION_WEEKS,
            })),
            expense(
                payload.cost,
                format!(
                    "Marketing campaign: {:?} at {}",
                    payload.campaign, payload.location_id
                ),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::kinds;
    use crate::state::{CampaignKind, LocationState, ServiceKind};

    fn base_state() -> AgentState {
        let mut state = AgentState::zero("P001");
        state.cash_balance = 10_000.0;
        state.line_of_credit_limit = 5_000.0;
        state.credit_rating = 50;
        state
            .locations
            .insert("LOC_001".to_string(), LocationState::new("LOC_001", "Z", 1_200.0));
        state
    }

    #[test]
    fn test_set_price_happy_path() {
        let state = base_state();
        let command = Command::new(
            kinds::SET_PRICE,
            "P001",
            &SetPricePayload {
                location_id: "LOC_001".to_string(),
                service: ServiceKind::StandardWash,
                new_price: 3.75,
            },
        )
        .unwrap();
        let drafts = SetPriceHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].payload.kind(), "PriceSet");
    }

    #[test]
    fn test_set_price_minimum_boundary_accepted() {
        let state = base_state();
        let command = Command::new(
            kinds::SET_PRICE,
            "P001",
            &SetPricePayload {
                location_id: "LOC_001".to_string(),
                service: ServiceKind::Dry,
                new_price: MIN_PRICE,
            },
        )
        .unwrap();
        assert!(SetPriceHandler.handle(&state, &command).is_ok());
    }

    #[test]
    fn test_set_price_rejects_out_of_range_and_missing_location() {
        let state = base_state();
        let too_low = Command::new(
            kinds::SET_PRICE,
            "P001",
            &SetPricePayload {
                location_id: "LOC_001".to_string(),
                service: ServiceKind::Dry,
                new_price: 0.005,
            },
        )
        .unwrap();
        assert!(matches!(
            SetPriceHandler.handle(&state, &too_low),
            Err(DomainError::InvalidState(_))
        ));

        let missing = Command::new(
            kinds::SET_PRICE,
            "P001",
            &SetPricePayload {
                location_id: "LOC_404".to_string(),
                service: ServiceKind::Dry,
                new_price: 2.0,
            },
        )
        .unwrap();
        assert!(matches!(
            SetPriceHandler.handle(&state, &missing),
            Err(DomainError::LocationNotFound(_))
        ));
    }

    #[test]
    fn test_take_loan_emits_loan_and_disbursement() {
        let state = base_state();
        let command = Command::new(
            kinds::TAKE_LOAN,
            "P001",
            &TakeLoanPayload {
                loan_kind: LoanKind::Loc,
                amount: 3_000.0,
                location_id: None,
            },
        )
        .unwrap();
        let drafts = TakeLoanHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].payload.kind(), "LoanTaken");
        let EventPayload::FundsTransferred(funds) = &drafts[1].payload else {
            panic!("expected disbursement");
        };
        assert_eq!(funds.kind, TransferKind::Loan);
        assert_eq!(funds.amount, 3_000.0);
    }

    #[test]
    fn test_take_loan_enforces_credit_floor() {
        let mut state = base_state();
        state.credit_rating = 45;
        let command = Command::new(
            kinds::TAKE_LOAN,
            "P001",
            &TakeLoanPayload {
                loan_kind: LoanKind::Expansion,
                amount: 10_000.0,
                location_id: None,
            },
        )
        .unwrap();
        assert!(matches!(
            TakeLoanHandler.handle(&state, &command),
            Err(DomainError::CreditError(_))
        ));
    }

    #[test]
    fn test_loc_draw_cannot_exceed_headroom() {
        let mut state = base_state();
        state.line_of_credit_balance = 4_500.0;
        let command = Command::new(
            kinds::TAKE_LOAN,
            "P001",
            &TakeLoanPayload {
                loan_kind: LoanKind::Loc,
                amount: 1_000.0,
                location_id: None,
            },
        )
        .unwrap();
        assert!(matches!(
            TakeLoanHandler.handle(&state, &command),
            Err(DomainError::CreditError(_))
        ));
    }

    #[test]
    fn test_debt_payment_capped_by_cash_and_outstanding() {
        let mut state = base_state();
        state.loans.push(crate::state::Loan {
            loan_id: "L1".to_string(),
            kind: LoanKind::Equipment,
            outstanding: 500.0,
            interest_rate: 0.06,
            term_weeks: 24,
            taken_week: 0,
        });
        let command = Command::new(
            kinds::MAKE_DEBT_PAYMENT,
            "P001",
            &MakeDebtPaymentPayload {
                debt_id: "L1".to_string(),
                amount: 600.0,
            },
        )
        .unwrap();
        assert!(matches!(
            MakeDebtPaymentHandler.handle(&state, &command),
            Err(DomainError::InsufficientFunds { .. })
        ));

        let command = Command::new(
            kinds::MAKE_DEBT_PAYMENT,
            "P001",
            &MakeDebtPaymentPayload {
                debt_id: "L1".to_string(),
                amount: 500.0,
            },
        )
        .unwrap();
        let drafts = MakeDebtPaymentHandler.handle(&state, &command).unwrap();
        let EventPayload::DebtPaymentProcessed(p) = &drafts[0].payload else {
            panic!("expected payment");
        };
        assert!((p.principal_reduction - 400.0).abs() < 1e-9);
        assert!((p.remaining_balance - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_marketing_scales_boost_with_spend() {
        let state = base_state();
        let command = Command::new(
            kinds::INVEST_IN_MARKETING,
            "P001",
            &InvestInMarketingPayload {
                location_id: "LOC_001".to_string(),
                campaign: CampaignKind::SocialMedia,
                cost: 400.0,
            },
        )
        .unwrap();
        let drafts = InvestInMarketingHandler.handle(&state, &command).unwrap();
        let EventPayload::MarketingBoostApplied(boost) = &drafts[0].payload else {
            panic!("expected boost");
        };
        assert!((boost.attraction_boost - 0.2).abs() < 1e-9);
        assert_eq!(boost.duration_weeks, 4);
    }
}
