// Copyright 2025 Cowboy AI, LLC.

//! Operational command handlers: equipment, maintenance, supplies, locations

use crate::commands::{
    BuyEquipmentPayload, BuySuppliesPayload, Command, FixMachinePayload, OpenNewLocationPayload,
    PerformMaintenancePayload, SellEquipmentPayload,
};
use crate::dispatch::CommandHandler;
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    EquipmentPurchased, EquipmentRepaired, EquipmentSold, EventDraft, EventPayload,
    FundsTransferred, LocationListingRemoved, LocationOpened, MachineStatusChanged,
    PremisesCleaned, StockoutEnded, SuppliesAcquired,
};
use crate::state::{
    AgentState, LocationState, MachineStatus, MaintenanceKind, SupplyKind, TransferKind,
};
use uuid::Uuid;

/// Cleanliness restored by premises cleaning
const CLEANED_LEVEL: f64 = 95.0;
/// Condition a broken machine is patched up to by an emergency fix
const EMERGENCY_FIX_CONDITION: f64 = 50.0;

fn location<'a>(state: &'a AgentState, location_id: &str) -> DomainResult<&'a LocationState> {
    state
        .locations
        .get(location_id)
        .ok_or_else(|| DomainError::LocationNotFound(location_id.to_string()))
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

fn expense(amount: f64, description: String) -> EventDraft {
    EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
        amount,
        kind: TransferKind::Expense,
        description,
    }))
}

/// The other vendor's exclusive contract forbids buying from `vendor_id`
fn check_exclusivity(
    location: &LocationState,
    vendor_id: Option<&str>,
    current_week: u32,
) -> DomainResult<()> {
    for rel in location.vendor_relationships.values() {
        let window_open = rel.exclusive_contract
            && rel
                .exclusive_until_week
                .map(|until| until > current_week)
                .unwrap_or(true);
        if window_open && vendor_id.is_some() && vendor_id != Some(rel.vendor_id.as_str()) {
            return Err(DomainError::ContractViolation(format!(
                "exclusive contract with {} forbids buying from {}",
                rel.vendor_id,
                vendor_id.unwrap_or_default()
            )));
        }
    }
    Ok(())
}

/// `BUY_EQUIPMENT`: install one or more machines
pub struct BuyEquipmentHandler;

impl CommandHandler for BuyEquipmentHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: BuyEquipmentPayload = command.parse_payload()?;

        let loc = location(state, &payload.location_id)?;
        if payload.quantity == 0 {
            return Err(DomainError::InvalidState(
                "quantity must be positive".to_string(),
            ));
        }
        check_exclusivity(loc, payload.vendor_id.as_deref(), state.current_week)?;

        let unit_price = payload.machine_kind.unit_price();
        let total = unit_price * payload.quantity as f64;
        require_affordable(state, total)?;

        let mut drafts = Vec::with_capacity(payload.quantity as usize + 1);
        for _ in 0..payload.quantity {
            drafts.push(EventDraft::own(EventPayload::EquipmentPurchased(
                EquipmentPurchased {
                    location_id: payload.location_id.clone(),
                    machine_id: Uuid::new_v4().to_string(),
                    machine_kind: payload.machine_kind,
                    purchase_price: unit_price,
                },
            )));
        }
        drafts.push(expense(
            total,
            format!(
                "Equipment purchase: {}x {:?} at {} from {}",
                payload.quantity,
                payload.machine_kind,
                payload.location_id,
                payload.vendor_id.as_deref().unwrap_or("DEFAULT_VENDOR")
            ),
        ));
        Ok(drafts)
    }
}

/// `SELL_EQUIPMENT`: dispose of a machine for cash
pub struct SellEquipmentHandler;

impl CommandHandler for SellEquipmentHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: SellEquipmentPayload = command.parse_payload()?;

        let loc = location(state, &payload.location_id)?;
        let machine =
            loc.equipment
                .get(&payload.machine_id)
                .ok_or_else(|| DomainError::MachineNotFound {
                    location_id: payload.location_id.clone(),
                    machine_id: payload.machine_id.clone(),
                })?;
        if machine.status == MachineStatus::InRepair {
            return Err(DomainError::InvalidState(format!(
                "machine {} is in repair",
                payload.machine_id
            )));
        }
        if payload.sale_price < 0.0 {
            return Err(DomainError::InvalidState(
                "sale price cannot be negative".to_string(),
            ));
        }

        Ok(vec![
            EventDraft::own(EventPayload::EquipmentSold(EquipmentSold {
                location_id: payload.location_id.clone(),
                machine_id: payload.machine_id.clone(),
                sale_price: payload.sale_price,
            })),
            EventDraft::own(EventPayload::FundsTransferred(FundsTransferred {
                amount: payload.sale_price,
                kind: TransferKind::Revenue,
                description: format!(
                    "Equipment sale: {} from {}",
                    payload.machine_id, payload.location_id
                ),
            })),
        ])
    }
}

/// `PERFORM_MAINTENANCE`: service machines or clean the premises
pub struct PerformMaintenanceHandler;

impl CommandHandler for PerformMaintenanceHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: PerformMaintenancePayload = command.parse_payload()?;
        let loc = location(state, &payload.location_id)?;

        if payload.maintenance == MaintenanceKind::PremisesCleaning {
            let cost = payload.maintenance.cost();
            require_affordable(state, cost)?;
            return Ok(vec![
                EventDraft::own(EventPayload::PremisesCleaned(PremisesCleaned {
                    location_id: payload.location_id.clone(),
                    cost,
                    new_cleanliness: CLEANED_LEVEL,
                })),
                expense(cost, format!("Premises cleaning at {}", payload.location_id)),
            ]);
        }

        if payload.equipment_ids.is_empty() {
            return Err(DomainError::InvalidState(
                "equipment ids are required for machine maintenance".to_string(),
            ));
        }

        let cost_per_unit = payload.maintenance.cost();
        let mut drafts = Vec::with_capacity(payload.equipment_ids.len() + 1);
        for machine_id in &payload.equipment_ids {
            let machine =
                loc.equipment
                    .get(machine_id)
                    .ok_or_else(|| DomainError::MachineNotFound {
                        location_id: payload.location_id.clone(),
                        machine_id: machine_id.clone(),
                    })?;
            if machine.status == MachineStatus::InRepair {
                return Err(DomainError::InvalidState(format!(
                    "machine {machine_id} is already in repair"
                )));
            }
            drafts.push(EventDraft::own(EventPayload::EquipmentRepaired(
                EquipmentRepaired {
                    location_id: payload.location_id.clone(),
                    machine_id: machine_id.clone(),
                    maintenance_kind: payload.maintenance,
                    maintenance_cost: cost_per_unit,
                    new_condition: payload.maintenance.restored_condition(machine.condition),
                },
            )));
        }

        let total = cost_per_unit * payload.equipment_ids.len() as f64;
        require_affordable(state, total)?;
        drafts.push(expense(
            total,
            format!(
                "Maintenance {:?} for {} machines at {}",
                payload.maintenance,
                payload.equipment_ids.len(),
                payload.location_id
            ),
        ));
        Ok(drafts)
    }
}

/// `FIX_MACHINE`: emergency repair of a broken machine
pub struct FixMachineHandler;

impl CommandHandler for FixMachineHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: FixMachinePayload = command.parse_payload()?;

        let loc = location(state, &payload.location_id)?;
        let machine =
            loc.equipment
                .get(&payload.machine_id)
                .ok_or_else(|| DomainError::MachineNotFound {
                    location_id: payload.location_id.clone(),
                    machine_id: payload.machine_id.clone(),
                })?;
        if machine.status != MachineStatus::Broken {
            return Err(DomainError::InvalidState(format!(
                "machine {} is not broken",
                payload.machine_id
            )));
        }
        if payload.repair_cost <= 0.0 {
            return Err(DomainError::InvalidState(
                "repair cost must be positive".to_string(),
            ));
        }
        require_affordable(state, payload.repair_cost)?;

        Ok(vec![
            EventDraft::own(EventPayload::EquipmentRepaired(EquipmentRepaired {
                location_id: payload.location_id.clone(),
                machine_id: payload.machine_id.clone(),
                maintenance_kind: MaintenanceKind::Routine,
                maintenance_cost: payload.repair_cost,
                new_condition: machine.condition.max(EMERGENCY_FIX_CONDITION),
            })),
            EventDraft::own(EventPayload::MachineStatusChanged(MachineStatusChanged {
                location_id: payload.location_id.clone(),
                machine_id: payload.machine_id.clone(),
                new_status: MachineStatus::Operational,
                reason: "Emergency repair completed".to_string(),
            })),
            expense(
                payload.repair_cost,
                format!(
                    "Emergency repair: {} at {}",
                    payload.machine_id, payload.location_id
                ),
            ),
        ])
    }
}

/// `BUY_SUPPLIES`: restock detergent or softener
pub struct BuySuppliesHandler;

impl CommandHandler for BuySuppliesHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: BuySuppliesPayload = command.parse_payload()?;
        let loc = location(state, &payload.location_id)?;

        if payload.quantity_loads <= 0 {
            return Err(DomainError::InvalidState(
                "quantity must be positive".to_string(),
            ));
        }
        check_exclusivity(loc, payload.vendor_id.as_deref(), state.current_week)?;

        let list_price = match payload.supply {
            SupplyKind::Detergent => 0.50,
            SupplyKind::Softener => 0.30,
        };
        // Negotiated vendors sell at their discounted multiplier
        let multiplier = payload
            .vendor_id
            .as_deref()
            .and_then(|v| loc.vendor_relationships.get(v))
            .map(|rel| rel.current_unit_price)
            .unwrap_or(1.0);
        let total = list_price * multiplier * payload.quantity_loads as f64;
        require_affordable(state, total)?;

        let was_out = match payload.supply {
            SupplyKind::Detergent => loc.inventory_detergent == 0,
            SupplyKind::Softener => loc.inventory_softener == 0,
        };

        let mut drafts = vec![
            EventDraft::own(EventPayload::SuppliesAcquired(SuppliesAcquired {
                location_id: payload.location_id.clone(),
                supply: payload.supply,
                quantity_loads: payload.quantity_loads,
                cost: total,
            })),
            expense(
                total,
                format!(
                    "Supplies purchase: {} loads of {:?} at {} from {}",
                    payload.quantity_loads,
                    payload.supply,
                    payload.location_id,
                    payload.vendor_id.as_deref().unwrap_or("DEFAULT_VENDOR")
                ),
            ),
        ];
        if was_out {
            drafts.push(EventDraft::own(EventPayload::StockoutEnded(StockoutEnded {
                location_id: payload.location_id.clone(),
                supply: payload.supply,
            })));
        }
        Ok(drafts)
    }
}

/// `OPEN_NEW_LOCATION`: expand from a listing or by direct terms
pub struct OpenNewLocationHandler;

impl CommandHandler for OpenNewLocationHandler {
    fn handle(&self, state: &AgentState, command: &Command) -> DomainResult<Vec<EventDraft>> {
        let payload: OpenNewLocationPayload = command.parse_payload()?;

        let (zone, monthly_rent, setup_cost, consumed_listing) =
            if let Some(listing_id) = &payload.listing_id {
                let listing = state.available_listings.get(listing_id).ok_or_else(|| {
                    DomainError::InvalidState(format!("no listing {listing_id}"))
                })?;
                (
                    listing.zone.clone(),
                    listing.monthly_rent,
                    listing.setup_cost,
                    Some(listing_id.clone()),
                )
            } else {
                let zone = payload
                    .zone
                    .clone()
                    .filter(|z| !z.is_empty())
                    .ok_or_else(|| {
                        DomainError::InvalidState("zone must be specified".to_string())
                    })?;
                let rent = payload.monthly_rent.ok_or_else(|| {
                    DomainError::InvalidState("monthly rent must be specified".to_string())
                })?;
                let setup = payload.setup_cost.ok_or_else(|| {
                    DomainError::InvalidState("setup cost must be specified".to_string())
                })?;
                (zone, rent, setup, None)
            };

        if monthly_rent <= 0.0 || setup_cost <= 0.0 {
            return Err(DomainError::InvalidState(
                "rent and setup cost must be positive".to_string(),
            ));
        }
        require_affordable(state, setup_cost)?;

        let location_id = Uuid::new_v4().to_string();
        let mut drafts = vec![EventDraft::own(EventPayload::LocationOpened(
            LocationOpened {
                location_id,
                zone: zone.clone(),
                monthly_rent,
                initial_investment: setup_cost,
            },
        ))];
        if let Some(listing_id) = consumed_listing {
            drafts.push(EventDraft::own(EventPayload::LocationListingRemoved(
                LocationListingRemoved { listing_id },
            )));
        }
        drafts.push(expense(setup_cost, format!("New location setup: {zone}")));
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::kinds;
    use crate::state::{LocationListing, MachineKind, MachineState, VendorRelationship};

    fn base_state() -> AgentState {
        let mut state = AgentState::zero("P001");
        state.cash_balance = 10_000.0;
        state
            .locations
            .insert("LOC_001".to_string(), LocationState::new("LOC_001", "Z", 1_200.0));
        state
    }

    fn with_machine(mut state: AgentState, status: MachineStatus, condition: f64) -> AgentState {
        state.locations.get_mut("LOC_001").unwrap().equipment.insert(
            "M1".to_string(),
            MachineState {
                machine_id: "M1".to_string(),
                kind: MachineKind::Washer,
                status,
                condition,
                loads_processed_since_service: 0,
                last_maintenance_week: 0,
            },
        );
        state
    }

    #[test]
    fn test_buy_two_washers_emits_per_unit_events() {
        let state = base_state();
        let command = Command::new(
            kinds::BUY_EQUIPMENT,
            "P001",
            &BuyEquipmentPayload {
                location_id: "LOC_001".to_string(),
                machine_kind: MachineKind::Washer,
                vendor_id: Some("DEFAULT_VENDOR".to_string()),
                quantity: 2,
            },
        )
        .unwrap();
        let drafts = BuyEquipmentHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].payload.kind(), "EquipmentPurchased");
        assert_eq!(drafts[1].payload.kind(), "EquipmentPurchased");
        let EventPayload::FundsTransferred(funds) = &drafts[2].payload else {
            panic!("expected expense");
        };
        assert_eq!(funds.amount, 4_000.0);
    }

    #[test]
    fn test_buy_equipment_cash_exactly_equal_succeeds() {
        let mut state = base_state();
        state.cash_balance = 2_000.0;
        state.line_of_credit_limit = 0.0;
        let command = Command::new(
            kinds::BUY_EQUIPMENT,
            "P001",
            &BuyEquipmentPayload {
                location_id: "LOC_001".to_string(),
                machine_kind: MachineKind::Washer,
                vendor_id: None,
                quantity: 1,
            },
        )
        .unwrap();
        assert!(BuyEquipmentHandler.handle(&state, &command).is_ok());

        state.cash_balance = 1_999.99;
        assert!(matches!(
            BuyEquipmentHandler.handle(&state, &command),
            Err(DomainError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_maintenance_rejects_machine_in_repair() {
        let state = with_machine(base_state(), MachineStatus::InRepair, 40.0);
        let command = Command::new(
            kinds::PERFORM_MAINTENANCE,
            "P001",
            &PerformMaintenancePayload {
                location_id: "LOC_001".to_string(),
                maintenance: MaintenanceKind::Routine,
                equipment_ids: vec!["M1".to_string()],
            },
        )
        .unwrap();
        assert!(matches!(
            PerformMaintenanceHandler.handle(&state, &command),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_maintenance_tiers_restore_condition() {
        let state = with_machine(base_state(), MachineStatus::Operational, 40.0);
        let run = |kind: MaintenanceKind| {
            let command = Command::new(
                kinds::PERFORM_MAINTENANCE,
                "P001",
                &PerformMaintenancePayload {
                    location_id: "LOC_001".to_string(),
                    maintenance: kind,
                    equipment_ids: vec!["M1".to_string()],
                },
            )
            .unwrap();
            let drafts = PerformMaintenanceHandler.handle(&state, &command).unwrap();
            let EventPayload::EquipmentRepaired(repair) = &drafts[0].payload else {
                panic!("expected repair");
            };
            repair.new_condition
        };
        assert_eq!(run(MaintenanceKind::Routine), 55.0);
        assert_eq!(run(MaintenanceKind::DeepService), 75.0);
        assert_eq!(run(MaintenanceKind::Overhaul), 100.0);
    }

    #[test]
    fn test_premises_cleaning_needs_no_equipment() {
        let state = base_state();
        let command = Command::new(
            kinds::PERFORM_MAINTENANCE,
            "P001",
            &PerformMaintenancePayload {
                location_id: "LOC_001".to_string(),
                maintenance: MaintenanceKind::PremisesCleaning,
                equipment_ids: vec![],
            },
        )
        .unwrap();
        let drafts = PerformMaintenanceHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts[0].payload.kind(), "PremisesCleaned");
    }

    #[test]
    fn test_fix_machine_requires_broken_status() {
        let state = with_machine(base_state(), MachineStatus::Operational, 80.0);
        let command = Command::new(
            kinds::FIX_MACHINE,
            "P001",
            &FixMachinePayload {
                location_id: "LOC_001".to_string(),
                machine_id: "M1".to_string(),
                repair_cost: 200.0,
            },
        )
        .unwrap();
        assert!(FixMachineHandler.handle(&state, &command).is_err());

        let state = with_machine(base_state(), MachineStatus::Broken, 5.0);
        let drafts = FixMachineHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[1].payload.kind(), "MachineStatusChanged");
    }

    #[test]
    fn test_supplies_respect_exclusive_contract() {
        let mut state = base_state();
        {
            let loc = state.locations.get_mut("LOC_001").unwrap();
            let mut rel = VendorRelationship::new("CLEANCO");
            rel.exclusive_contract = true;
            rel.exclusive_until_week = Some(20);
            loc.vendor_relationships.insert("CLEANCO".to_string(), rel);
        }
        let other = Command::new(
            kinds::BUY_SUPPLIES,
            "P001",
            &BuySuppliesPayload {
                location_id: "LOC_001".to_string(),
                supply: SupplyKind::Detergent,
                vendor_id: Some("RIVAL_SUPPLY".to_string()),
                quantity_loads: 100,
            },
        )
        .unwrap();
        assert!(matches!(
            BuySuppliesHandler.handle(&state, &other),
            Err(DomainError::ContractViolation(_))
        ));

        let same = Command::new(
            kinds::BUY_SUPPLIES,
            "P001",
            &BuySuppliesPayload {
                location_id: "LOC_001".to_string(),
                supply: SupplyKind::Detergent,
                vendor_id: Some("CLEANCO".to_string()),
                quantity_loads: 100,
            },
        )
        .unwrap();
        assert!(BuySuppliesHandler.handle(&state, &same).is_ok());
    }

    #[test]
    fn test_open_location_from_listing_consumes_it() {
        let mut state = base_state();
        state.available_listings.insert(
            "LST_1".to_string(),
            LocationListing {
                listing_id: "LST_1".to_string(),
                zone: "UPTOWN".to_string(),
                monthly_rent: 1_500.0,
                setup_cost: 4_000.0,
                description: "corner lot".to_string(),
            },
        );
        let command = Command::new(
            kinds::OPEN_NEW_LOCATION,
            "P001",
            &OpenNewLocationPayload {
                listing_id: Some("LST_1".to_string()),
                zone: None,
                monthly_rent: None,
                setup_cost: None,
            },
        )
        .unwrap();
        let drafts = OpenNewLocationHandler.handle(&state, &command).unwrap();
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].payload.kind(), "LocationOpened");
        assert_eq!(drafts[1].payload.kind(), "LocationListingRemoved");
    }
}
