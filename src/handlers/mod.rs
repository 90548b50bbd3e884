// Copyright 2025 Cowboy AI, LLC.

//! Command handlers
//!
//! One handler per command kind. Handlers share a single structure: parse
//! the payload, validate preconditions against the snapshot, compute derived
//! values, and return event drafts. On any failure they return a typed error
//! and emit nothing.
//!
//! Entity ids minted here (loan ids, machine ids, staff ids) are random like
//! envelope ids; handler purity is judged modulo generated identifiers.

pub mod adjudication;
pub mod competition;
pub mod financial;
pub mod operational;
pub mod social;
pub mod staffing;
pub mod vendor;

use crate::commands::kinds;
use crate::config::EngineConfig;
use crate::dispatch::CommandRegistry;

/// Register the built-in handler for every canonical command kind.
pub fn register_default_handlers(registry: &mut CommandRegistry, config: &EngineConfig) {
    registry.register(kinds::SET_PRICE, Box::new(financial::SetPriceHandler));
    registry.register(kinds::TAKE_LOAN, Box::new(financial::TakeLoanHandler));
    registry.register(
        kinds::MAKE_DEBT_PAYMENT,
        Box::new(financial::MakeDebtPaymentHandler),
    );
    registry.register(
        kinds::INVEST_IN_MARKETING,
        Box::new(financial::InvestInMarketingHandler),
    );

    registry.register(kinds::BUY_EQUIPMENT, Box::new(operational::BuyEquipmentHandler));
    registry.register(kinds::SELL_EQUIPMENT, Box::new(operational::SellEquipmentHandler));
    registry.register(
        kinds::PERFORM_MAINTENANCE,
        Box::new(operational::PerformMaintenanceHandler),
    );
    registry.register(kinds::FIX_MACHINE, Box::new(operational::FixMachineHandler));
    registry.register(kinds::BUY_SUPPLIES, Box::new(operational::BuySuppliesHandler));
    registry.register(
        kinds::OPEN_NEW_LOCATION,
        Box::new(operational::OpenNewLocationHandler),
    );

    registry.register(
        kinds::HIRE_STAFF,
        Box::new(staffing::HireStaffHandler {
            minimum_wage: config.minimum_wage,
        }),
    );
    registry.register(kinds::FIRE_STAFF, Box::new(staffing::FireStaffHandler));
    registry.register(
        kinds::ADJUST_STAFF_WAGE,
        Box::new(staffing::AdjustStaffWageHandler),
    );
    registry.register(
        kinds::PROVIDE_BENEFITS,
        Box::new(staffing::ProvideBenefitsHandler),
    );

    registry.register(
        kinds::NEGOTIATE_VENDOR_DEAL,
        Box::new(vendor::NegotiateVendorDealHandler),
    );
    registry.register(
        kinds::SIGN_EXCLUSIVE_CONTRACT,
        Box::new(vendor::SignExclusiveContractHandler),
    );
    registry.register(
        kinds::CANCEL_VENDOR_CONTRACT,
        Box::new(vendor::CancelVendorContractHandler),
    );

    registry.register(kinds::INITIATE_CHARITY, Box::new(social::InitiateCharityHandler));
    registry.register(kinds::RESOLVE_SCANDAL, Box::new(social::ResolveScandalHandler));
    registry.register(
        kinds::MAKE_ETHICAL_CHOICE,
        Box::new(social::MakeEthicalChoiceHandler),
    );
    registry.register(
        kinds::FILE_REGULATORY_REPORT,
        Box::new(social::FileRegulatoryReportHandler),
    );
    registry.register(kinds::FILE_APPEAL, Box::new(social::FileAppealHandler));
    registry.register(
        kinds::SUBSCRIBE_LOYALTY_PROGRAM,
        Box::new(social::SubscribeLoyaltyProgramHandler),
    );
    registry.register(
        kinds::COMMUNICATE_TO_AGENT,
        Box::new(social::CommunicateToAgentHandler),
    );

    registry.register(kinds::ENTER_ALLIANCE, Box::new(competition::EnterAllianceHandler));
    registry.register(kinds::PROPOSE_BUYOUT, Box::new(competition::ProposeBuyoutHandler));
    registry.register(
        kinds::ACCEPT_BUYOUT_OFFER,
        Box::new(competition::AcceptBuyoutOfferHandler),
    );

    registry.register(
        adjudication::INJECT_WORLD_EVENT,
        Box::new(adjudication::InjectWorldEventHandler),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_kind_has_a_handler() {
        let mut registry = CommandRegistry::new();
        register_default_handlers(&mut registry, &EngineConfig::default());

        for kind in [
            kinds::SET_PRICE,
            kinds::TAKE_LOAN,
            kinds::MAKE_DEBT_PAYMENT,
            kinds::INVEST_IN_MARKETING,
            kinds::BUY_EQUIPMENT,
            kinds::SELL_EQUIPMENT,
            kinds::PERFORM_MAINTENANCE,
            kinds::FIX_MACHINE,
            kinds::BUY_SUPPLIES,
            kinds::OPEN_NEW_LOCATION,
            kinds::HIRE_STAFF,
            kinds::FIRE_STAFF,
            kinds::ADJUST_STAFF_WAGE,
            kinds::PROVIDE_BENEFITS,
            kinds::NEGOTIATE_VENDOR_DEAL,
            kinds::SIGN_EXCLUSIVE_CONTRACT,
            kinds::CANCEL_VENDOR_CONTRACT,
            kinds::INITIATE_CHARITY,
            kinds::RESOLVE_SCANDAL,
            kinds::MAKE_ETHICAL_CHOICE,
            kinds::FILE_REGULATORY_REPORT,
            kinds::FILE_APPEAL,
            kinds::SUBSCRIBE_LOYALTY_PROGRAM,
            kinds::ENTER_ALLIANCE,
            kinds::PROPOSE_BUYOUT,
            kinds::ACCEPT_BUYOUT_OFFER,
            kinds::COMMUNICATE_TO_AGENT,
        ] {
            assert!(registry.is_registered(kind), "missing handler for {kind}");
        }
    }
}
