// Copyright 2025 Cowboy AI, LLC.

//! Financial reducers

use crate::dispatch::ProjectionRegistry;
use crate::errors::DomainResult;
use crate::events::{EventPayload, GameEvent};
use crate::projection::unexpected;
use crate::state::{AgentState, Loan, LoanKind};

/// Wire the financial reducers
pub fn register(registry: &mut ProjectionRegistry) {
    registry.register("FundsTransferred", funds_transferred);
    registry.register("LoanTaken", loan_taken);
    registry.register("DebtPaymentProcessed", debt_payment_processed);
    registry.register("DefaultRecorded", default_recorded);
    registry.register("PriceSet", price_set);
    registry.register("MarketingBoostApplied", marketing_boost_applied);
    registry.register("TaxBracketAdjusted", tax_bracket_adjusted);
}

/// Move cash by the declared amount and direction.
///
/// The reducer does not stop the balance going negative; affordability was
/// the emitting handler's responsibility.
pub fn funds_transferred(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::FundsTransferred(e) = &event.payload else {
        return Err(unexpected(event, "FundsTransferred"));
    };
    if e.kind.is_credit() {
        state.cash_balance += e.amount;
    } else {
        state.cash_balance -= e.amount;
    }
    Ok(state)
}

/// Record the loan, grow the debt total, and apply the fixed origination
/// hit to the credit rating.
pub fn loan_taken(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::LoanTaken(e) = &event.payload else {
        return Err(unexpected(event, "LoanTaken"));
    };
    state.loans.push(Loan {
        loan_id: e.loan_id.clone(),
        kind: e.kind,
        outstanding: e.principal,
        interest_rate: e.interest_rate,
        term_weeks: e.term_weeks,
        taken_week: event.week,
    });
    state.total_debt_owed += e.principal;
    if e.kind == LoanKind::Loc {
        state.line_of_credit_balance += e.principal;
    }
    state.credit_rating = state.credit_rating.saturating_sub(2);
    Ok(state)
}

/// Reduce the loan by the declared split; a fully repaid loan leaves the
/// schedule and earns a fixed credit-rating bump.
pub fn debt_payment_processed(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::DebtPaymentProcessed(e) = &event.payload else {
        return Err(unexpected(event, "DebtPaymentProcessed"));
    };
    state.total_debt_owed = (state.total_debt_owed - e.principal_reduction).max(0.0);
    if let Some(index) = state.loans.iter().position(|l| l.loan_id == e.loan_id) {
        let is_loc = state.loans[index].kind == LoanKind::Loc;
        state.loans[index].outstanding = e.remaining_balance.max(0.0);
        if is_loc {
            state.line_of_credit_balance =
                (state.line_of_credit_balance - e.principal_reduction).max(0.0);
        }
        if e.remaining_balance <= 0.0 {
            state.loans.remove(index);
            state.credit_rating = (state.credit_rating + 3).min(100);
        }
    }
    Ok(state)
}

/// Record the defaulted balance and penalty
pub fn default_recorded(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::DefaultRecorded(e) = &event.payload else {
        return Err(unexpected(event, "DefaultRecorded"));
    };
    state.total_debt_owed += e.penalty_amount;
    if let Some(loan) = state.loans.iter_mut().find(|l| l.loan_id == e.loan_id) {
        loan.outstanding += e.penalty_amount;
    }
    state.credit_rating = state.credit_rating.saturating_sub(10);
    Ok(state)
}

/// Overwrite the active price for the service
pub fn price_set(mut state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::PriceSet(e) = &event.payload else {
        return Err(unexpected(event, "PriceSet"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.active_pricing.insert(e.service, e.new_price);
    }
    Ok(state)
}

/// Install the campaign boost and its expiry week
pub fn marketing_boost_applied(
    mut state: AgentState,
    event: &GameEvent,
) -> DomainResult<AgentState> {
    let EventPayload::MarketingBoostApplied(e) = &event.payload else {
        return Err(unexpected(event, "MarketingBoostApplied"));
    };
    if let Some(location) = state.locations.get_mut(&e.location_id) {
        location.marketing_boost = e.attraction_boost;
        location.marketing_expires_week = event.week + e.duration_weeks;
    }
    Ok(state)
}

/// Bracket changes only affect future TaxLiabilityCalculated events
pub fn tax_bracket_adjusted(state: AgentState, event: &GameEvent) -> DomainResult<AgentState> {
    let EventPayload::TaxBracketAdjusted(_) = &event.payload else {
        return Err(unexpected(event, "TaxBracketAdjusted"));
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DebtPaymentProcessed, FundsTransferred, LoanTaken, PriceSet};
    use crate::state::{LocationState, ServiceKind, TransferKind};

    #[test]
    fn test_funds_transferred_directions() {
        let mut state = AgentState::zero("P001");
        state.cash_balance = 100.0;

        let credit = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::FundsTransferred(FundsTransferred {
                amount: 50.0,
                kind: TransferKind::Revenue,
                description: "loads".to_string(),
            }),
        );
        let state = funds_transferred(state, &credit).unwrap();
        assert_eq!(state.cash_balance, 150.0);

        let debit = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::FundsTransferred(FundsTransferred {
                amount: 200.0,
                kind: TransferKind::Expense,
                description: "rent".to_string(),
            }),
        );
        // Reducers never guard the balance; it may go negative
        let state = funds_transferred(state, &debit).unwrap();
        assert_eq!(state.cash_balance, -50.0);
    }

    #[test]
    fn test_loan_taken_records_debt_and_credit_hit() {
        let mut state = AgentState::zero("P001");
        state.credit_rating = 50;
        let event = GameEvent::seal(
            "P001",
            2,
            0,
            None,
            EventPayload::LoanTaken(LoanTaken {
                loan_id: "L1".to_string(),
                kind: LoanKind::Loc,
                principal: 3_000.0,
                interest_rate: 0.08,
                term_weeks: 0,
            }),
        );
        let state = loan_taken(state, &event).unwrap();
        assert_eq!(state.total_debt_owed, 3_000.0);
        assert_eq!(state.line_of_credit_balance, 3_000.0);
        assert_eq!(state.loans.len(), 1);
        assert_eq!(state.loans[0].taken_week, 2);
        assert_eq!(state.credit_rating, 48);
    }

    #[test]
    fn test_full_repayment_removes_loan_and_bumps_rating() {
        let mut state = AgentState::zero("P001");
        state.credit_rating = 48;
        state.total_debt_owed = 1_000.0;
        state.loans.push(Loan {
            loan_id: "L1".to_string(),
            kind: LoanKind::Equipment,
            outstanding: 1_000.0,
            interest_rate: 0.06,
            term_weeks: 24,
            taken_week: 0,
        });
        let event = GameEvent::seal(
            "P001",
            4,
            0,
            None,
            EventPayload::DebtPaymentProcessed(DebtPaymentProcessed {
                loan_id: "L1".to_string(),
                amount_paid: 1_250.0,
                principal_reduction: 1_000.0,
                interest_paid: 250.0,
                remaining_balance: 0.0,
            }),
        );
        let state = debt_payment_processed(state, &event).unwrap();
        assert!(state.loans.is_empty());
        assert_eq!(state.total_debt_owed, 0.0);
        assert_eq!(state.credit_rating, 51);
    }

    #[test]
    fn test_price_set_overwrites_service_price() {
        let mut state = AgentState::zero("P001");
        state
            .locations
            .insert("LOC_001".to_string(), LocationState::new("LOC_001", "Z", 1_000.0));
        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::PriceSet(PriceSet {
                location_id: "LOC_001".to_string(),
                service: ServiceKind::StandardWash,
                new_price: 3.75,
            }),
        );
        let state = price_set(state, &event).unwrap();
        assert_eq!(
            state.locations["LOC_001"].active_pricing[&ServiceKind::StandardWash],
            3.75
        );
    }
}
