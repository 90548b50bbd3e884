// Copyright 2025 Cowboy AI, LLC.

//! # Suds Domain
//!
//! Event-sourced simulation core for a multi-agent laundromat tycoon game.
//!
//! Players (human or LLM-driven) submit commands; handlers validate them
//! against a projected snapshot and emit immutable events; the append-only
//! log is the sole source of truth; reducers fold the log back into state.
//! An autonomous ticker synthesizes the facts of elapsed time, a game master
//! injects deterministic narrative, and a regulator turns misconduct into
//! consequences.
//!
//! ```rust
//! use std::sync::Arc;
//! use suds_domain::commands::{kinds, Command, SetPricePayload};
//! use suds_domain::engine::Engine;
//! use suds_domain::infrastructure::InMemoryEventLog;
//! use suds_domain::state::ServiceKind;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(Arc::new(InMemoryEventLog::new()));
//! engine.create_agent("P001").await?;
//!
//! let command = Command::new(
//!     kinds::SET_PRICE,
//!     "P001",
//!     &SetPricePayload {
//!         location_id: "LOC_001".into(),
//!         service: ServiceKind::StandardWash,
//!         new_price: 3.75,
//!     },
//! )?;
//! let outcome = engine.execute_command("P001", command, None).await?;
//! assert!(outcome.ok());
//!
//! let state = engine.get_current_state("P001").await?;
//! assert_eq!(state.locations["LOC_001"].active_pricing[&ServiceKind::StandardWash], 3.75);
//! # Ok(())
//! # }
//! ```

pub mod adjudication;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod infrastructure;
pub mod projection;
pub mod state;
pub mod ticker;

pub use adjudication::{AdjudicationHook, GameMaster, Regulator};
pub use commands::Command;
pub use config::EngineConfig;
pub use dispatch::{CommandHandler, CommandRegistry, ProjectionRegistry, ReducerFn};
pub use engine::{CommandOutcome, CommandStatus, Engine};
pub use errors::{DomainError, DomainResult};
pub use events::{EventDraft, EventPayload, GameEvent};
pub use infrastructure::{EventLog, FileEventLog, InMemoryEventLog, SequencedEvent};
pub use projection::StateBuilder;
pub use state::AgentState;
pub use ticker::AutonomousTicker;
