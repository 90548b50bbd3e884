// Copyright 2025 Cowboy AI, LLC.

//! End-to-end engine scenarios against the in-memory and file log backends.

use std::sync::Arc;
use suds_domain::commands::{
    kinds, BuyEquipmentPayload, Command, SetPricePayload, TakeLoanPayload,
};
use suds_domain::engine::Engine;
use suds_domain::events::{EventPayload, GameEvent};
use suds_domain::infrastructure::{EventLog, FileEventLog, InMemoryEventLog};
use suds_domain::state::{
    LoanKind, MachineKind, RegulatoryStatus, ServiceKind, TransferKind,
};

fn memory_engine() -> Engine {
    Engine::new(Arc::new(InMemoryEventLog::new()))
}

fn set_price(agent: &str, price: f64) -> Command {
    Command::new(
        kinds::SET_PRICE,
        agent,
        &SetPricePayload {
            location_id: "LOC_001".to_string(),
            service: ServiceKind::StandardWash,
            new_price: price,
        },
    )
    .unwrap()
}

fn count_kind(events: &[GameEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

#[tokio::test]
async fn scenario_set_price_updates_active_pricing() {
    let engine = memory_engine();
    engine.create_agent("A").await.unwrap();

    let outcome = engine
        .execute_command("A", set_price("A", 3.75), None)
        .await
        .unwrap();
    assert!(outcome.ok());
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind(), "PriceSet");

    let state = engine.get_current_state("A").await.unwrap();
    assert_eq!(
        state.locations["LOC_001"].active_pricing[&ServiceKind::StandardWash],
        3.75
    );
}

#[tokio::test]
async fn scenario_take_loan_credits_cash_and_debt() {
    let engine = memory_engine();
    engine.create_agent("A").await.unwrap();

    let command = Command::new(
        kinds::TAKE_LOAN,
        "A",
        &TakeLoanPayload {
            loan_kind: LoanKind::Loc,
            amount: 3_000.0,
            location_id: None,
        },
    )
    .unwrap();
    let outcome = engine.execute_command("A", command, None).await.unwrap();
    assert!(outcome.ok());
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[0].kind(), "LoanTaken");
    let EventPayload::FundsTransferred(funds) = &outcome.events[1].payload else {
        panic!("expected disbursement");
    };
    assert_eq!(funds.kind, TransferKind::Loan);

    let state = engine.get_current_state("A").await.unwrap();
    assert_eq!(state.cash_balance, 13_000.0);
    assert_eq!(state.total_debt_owed, 3_000.0);
}

#[tokio::test]
async fn scenario_one_week_tick_cycle() {
    let engine = memory_engine();
    engine.create_agent("A").await.unwrap();

    let events = engine.advance_time("A", 7, None).await.unwrap();

    assert_eq!(count_kind(&events, "TimeAdvanced"), 7);
    assert_eq!(count_kind(&events, "DailyRevenueProcessed"), 7);
    assert_eq!(count_kind(&events, "MachineWearUpdated"), 7);
    assert_eq!(count_kind(&events, "WeeklyFixedCostsBilled"), 1);
    assert_eq!(count_kind(&events, "ScandalMarkerDecayed"), 0);

    let revenue_transfers = events
        .iter()
        .filter(|e| {
            matches!(&e.payload, EventPayload::FundsTransferred(f) if f.kind == TransferKind::Revenue)
        })
        .count();
    let expense_transfers = events
        .iter()
        .filter(|e| {
            matches!(&e.payload, EventPayload::FundsTransferred(f) if f.kind == TransferKind::Expense)
        })
        .count();
    assert_eq!(revenue_transfers, 7);
    assert_eq!(expense_transfers, 1);

    let state = engine.get_current_state("A").await.unwrap();
    assert_eq!((state.current_week, state.current_day), (1, 0));
}

#[tokio::test]
async fn scenario_buy_two_washers() {
    let engine = memory_engine();
    engine.create_agent("A").await.unwrap();

    let command = Command::new(
        kinds::BUY_EQUIPMENT,
        "A",
        &BuyEquipmentPayload {
            location_id: "LOC_001".to_string(),
            machine_kind: MachineKind::Washer,
            vendor_id: Some("DEFAULT_VENDOR".to_string()),
            quantity: 2,
        },
    )
    .unwrap();
    let outcome = engine.execute_command("A", command, None).await.unwrap();
    assert!(outcome.ok());
    assert_eq!(count_kind(&outcome.events, "EquipmentPurchased"), 2);

    let EventPayload::FundsTransferred(funds) = &outcome.events[2].payload else {
        panic!("expected expense");
    };
    assert_eq!(funds.kind, TransferKind::Expense);
    assert_eq!(funds.amount, 4_000.0);

    let state = engine.get_current_state("A").await.unwrap();
    assert_eq!(state.cash_balance, 6_000.0);
    // Starter washer plus the two new machines, all factory-fresh
    let location = &state.locations["LOC_001"];
    assert_eq!(location.equipment.len(), 3);
    assert!(location.equipment.values().all(|m| m.condition == 100.0));
}

#[tokio::test]
async fn scenario_predatory_price_draws_consequences() {
    let engine = memory_engine();
    engine.create_agent("A").await.unwrap();

    let outcome = engine
        .execute_command("A", set_price("A", 0.10), None)
        .await
        .unwrap();
    assert!(outcome.ok());
    assert_eq!(outcome.events[0].kind(), "PriceSet");
    assert_eq!(count_kind(&outcome.events, "RegulatoryFinding"), 1);
    assert_eq!(count_kind(&outcome.events, "RegulatoryStatusUpdated"), 1);

    let state = engine.get_current_state("A").await.unwrap();
    assert_eq!(state.pending_fines.len(), 1);
    assert_eq!(state.regulatory_status, RegulatoryStatus::Warning);
}

#[tokio::test]
async fn scenario_fold_matches_running_state() {
    let engine = memory_engine();
    engine.create_agent("A").await.unwrap();

    engine
        .execute_command("A", set_price("A", 3.75), None)
        .await
        .unwrap();
    let loan = Command::new(
        kinds::TAKE_LOAN,
        "A",
        &TakeLoanPayload {
            loan_kind: LoanKind::Loc,
            amount: 3_000.0,
            location_id: None,
        },
    )
    .unwrap();
    engine.execute_command("A", loan, None).await.unwrap();
    engine.advance_time("A", 7, None).await.unwrap();
    let buy = Command::new(
        kinds::BUY_EQUIPMENT,
        "A",
        &BuyEquipmentPayload {
            location_id: "LOC_001".to_string(),
            machine_kind: MachineKind::Washer,
            vendor_id: None,
            quantity: 2,
        },
    )
    .unwrap();
    engine.execute_command("A", buy, None).await.unwrap();
    engine
        .execute_command("A", set_price("A", 0.10), None)
        .await
        .unwrap();

    // Folding the whole log again reproduces the running state exactly
    let first = engine.get_current_state("A").await.unwrap();
    let second = engine.get_current_state("A").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );

    // Point-in-time reconstruction stops before the tick week
    let early = engine.get_state_at("A", 0, 6).await.unwrap();
    assert_eq!(early.current_week, 0);
    assert!(early.locations["LOC_001"].equipment.len() == 1);
}

#[tokio::test]
async fn scenario_file_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    {
        let engine = Engine::new(Arc::new(FileEventLog::open(&path).unwrap()));
        engine.create_agent("A").await.unwrap();
        engine
            .execute_command("A", set_price("A", 3.75), None)
            .await
            .unwrap();
        engine.advance_time("A", 3, None).await.unwrap();
    }

    let log = Arc::new(FileEventLog::open(&path).unwrap());
    assert!(!log.is_empty().await.unwrap());
    let engine = Engine::new(log);
    let state = engine.get_current_state("A").await.unwrap();
    assert_eq!(
        state.locations["LOC_001"].active_pricing[&ServiceKind::StandardWash],
        3.75
    );
    assert_eq!((state.current_week, state.current_day), (0, 3));
}
