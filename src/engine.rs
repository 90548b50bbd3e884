// Copyright 2025 Cowboy AI, LLC.

//! Game engine: orchestration of the Command -> Event -> State flow
//!
//! The engine is pure orchestration; every rule lives in a handler, reducer,
//! ticker, or adjudicator. Within one agent's timeline, command execution,
//! tick advancement, narrative injection, and regulator inspection are
//! serialized behind a per-agent lock; the shared event log is the
//! synchronization point across agents.

use crate::adjudication::{AdjudicationHook, GameMaster, Regulator};
use crate::commands::Command;
use crate::config::EngineConfig;
use crate::dispatch::{CommandHandler, CommandRegistry, ProjectionRegistry, ReducerFn};
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    AgentCreated, EquipmentPurchased, EventDraft, EventPayload, GameEvent, LocationOpened,
};
use crate::handlers::register_default_handlers;
use crate::infrastructure::EventLog;
use crate::projection::{register_default_reducers, StateBuilder};
use crate::state::{AgentState, MachineKind};
use crate::ticker::AutonomousTicker;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events of recent history handed to the regulator for frequency checks
const REGULATOR_HISTORY_WINDOW: usize = 64;

/// Whether a command was accepted for processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Validated; its events were appended
    Accepted,
    /// Rejected by validation; nothing was appended
    Rejected,
}

/// Result of `execute_command`: acceptance, the appended events (including
/// regulator consequences), and on rejection a terse error kind plus a
/// human-readable message.
#[derive(Debug)]
pub struct CommandOutcome {
    /// Acceptance status
    pub status: CommandStatus,
    /// Every event appended for this execution, in append order
    pub events: Vec<GameEvent>,
    /// The validation error on rejection
    pub error: Option<DomainError>,
    /// Status message for the caller
    pub message: String,
}

impl CommandOutcome {
    /// Whether the command was accepted
    pub fn ok(&self) -> bool {
        self.status == CommandStatus::Accepted
    }

    /// Machine-readable error kind, when rejected
    pub fn error_kind(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| e.kind())
    }
}

/// The simulation engine.
pub struct Engine {
    log: Arc<dyn EventLog>,
    commands: RwLock<CommandRegistry>,
    reducers: RwLock<ProjectionRegistry>,
    config: EngineConfig,
    ticker: AutonomousTicker,
    regulator: Regulator,
    game_master: Option<GameMaster>,
    agent_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("log", &self.log)
            .field("game_master", &self.game_master.is_some())
            .finish()
    }
}

impl Engine {
    /// Create an engine over a log backend with the default configuration,
    /// all built-in handlers, and all built-in reducers registered.
    pub fn new(log: Arc<dyn EventLog>) -> Self {
        Self::with_config(log, EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(log: Arc<dyn EventLog>, config: EngineConfig) -> Self {
        let mut commands = CommandRegistry::new();
        register_default_handlers(&mut commands, &config);
        let mut reducers = ProjectionRegistry::new();
        register_default_reducers(&mut reducers);

        Self {
            log,
            commands: RwLock::new(commands),
            reducers: RwLock::new(reducers),
            ticker: AutonomousTicker::new(config.clone()),
            regulator: Regulator::new(config.clone()),
            config,
            game_master: None,
            agent_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a game master; it will observe post-command and post-tick
    pub fn with_game_master(mut self, game_master: GameMaster) -> Self {
        self.game_master = Some(game_master);
        self
    }

    /// Register (or replace) the handler for a command kind
    pub fn register_command_handler(
        &self,
        kind: impl Into<String>,
        handler: Box<dyn CommandHandler>,
    ) {
        self.commands
            .write()
            .expect("command registry poisoned")
            .register(kind, handler);
    }

    /// Register (or replace) the reducer for an event kind
    pub fn register_reducer(&self, kind: impl Into<String>, reducer: ReducerFn) {
        self.reducers
            .write()
            .expect("projection registry poisoned")
            .register(kind, reducer);
    }

    /// All registered command kinds
    pub fn registered_commands(&self) -> Vec<String> {
        self.commands
            .read()
            .expect("command registry poisoned")
            .registered_kinds()
    }

    /// All registered event kinds
    pub fn registered_events(&self) -> Vec<String> {
        self.reducers
            .read()
            .expect("projection registry poisoned")
            .registered_kinds()
    }

    /// Seed a new agent: an `AgentCreated` grant plus a starter location
    /// with one washer.
    pub async fn create_agent(&self, agent_id: &str) -> DomainResult<Vec<GameEvent>> {
        let lock = self.agent_lock(agent_id).await;
        let _guard = lock.lock().await;

        if !self.log.load_for_agent(agent_id).await?.is_empty() {
            return Err(DomainError::InvalidState(format!(
                "agent {agent_id} already exists"
            )));
        }

        let correlation = Some(Uuid::new_v4());
        let events = vec![
            GameEvent::seal(
                agent_id,
                0,
                0,
                correlation,
                EventPayload::AgentCreated(AgentCreated {
                    starting_cash: self.config.starting_cash,
                    starting_credit_limit: self.config.starting_credit_limit,
                    starting_credit_rating: self.config.starting_credit_rating,
                }),
            ),
            GameEvent::seal(
                agent_id,
                0,
                0,
                correlation,
                EventPayload::LocationOpened(LocationOpened {
                    location_id: self.config.starting_location_id.clone(),
                    zone: self.config.starting_zone.clone(),
                    monthly_rent: self.config.starting_monthly_rent,
                    initial_investment: 0.0,
                }),
            ),
            GameEvent::seal(
                agent_id,
                0,
                0,
                correlation,
                EventPayload::EquipmentPurchased(EquipmentPurchased {
                    location_id: self.config.starting_location_id.clone(),
                    machine_id: Uuid::new_v4().to_string(),
                    machine_kind: MachineKind::Washer,
                    purchase_price: 0.0,
                }),
            ),
        ];
        self.log.append_batch(events.clone()).await?;
        info!(agent_id, "agent created");
        Ok(events)
    }

    /// Execute a player command.
    ///
    /// The emitted events, any inter-agent mirror records, and the
    /// regulator's consequences are appended as one contiguous batch. On a
    /// validation failure nothing is appended and the caller receives the
    /// typed error in the outcome; storage failures propagate as `Err`.
    pub async fn execute_command(
        &self,
        agent_id: &str,
        command: Command,
        deadline: Option<Instant>,
    ) -> DomainResult<CommandOutcome> {
        if command.agent_id != agent_id {
            return Ok(rejected(
                DomainError::ValidationError("agent id mismatch".to_string()),
            ));
        }

        let lock = self.agent_lock(agent_id).await;
        let _guard = lock.lock().await;

        let stream = self.log.load_for_agent(agent_id).await?;
        let state = self.fold(agent_id, &stream, None)?;

        let drafts = {
            let commands = self.commands.read().expect("command registry poisoned");
            match commands.execute(&state, &command) {
                Ok(drafts) => drafts,
                Err(e) if e.is_validation() => {
                    warn!(agent_id, command = %command.command_kind, error = %e, "command rejected");
                    return Ok(rejected(e));
                }
                Err(e) => return Err(e),
            }
        };

        let correlation = Some(Uuid::new_v4());
        let sealed = seal_drafts(agent_id, &state, correlation, drafts);

        // Fold this agent's new events for the adjudication snapshot
        let post_state = {
            let reducers = self.reducers.read().expect("projection registry poisoned");
            let mut post = state;
            for event in sealed.iter().filter(|e| e.agent_id == agent_id) {
                post = reducers.apply(post, event)?;
            }
            post
        };

        // Regulator analysis runs before the append so consequences land in
        // the same batch as their trigger
        let history_start = stream.len().saturating_sub(REGULATOR_HISTORY_WINDOW);
        let consequences = self
            .regulator
            .review(&post_state, &stream[history_start..], &sealed);
        let mut batch = sealed;
        batch.extend(seal_drafts(agent_id, &post_state, correlation, consequences));

        if let Some(game_master) = &self.game_master {
            let narrative = game_master.observe(&post_state, AdjudicationHook::PostCommand);
            batch.extend(seal_drafts(agent_id, &post_state, correlation, narrative));
        }

        check_deadline(deadline, "execute_command")?;
        self.log.append_batch(batch.clone()).await?;
        debug!(
            agent_id,
            command = %command.command_kind,
            events = batch.len(),
            "command applied"
        );

        Ok(CommandOutcome {
            status: CommandStatus::Accepted,
            events: batch,
            error: None,
            message: format!("Command {} succeeded", command.command_kind),
        })
    }

    /// Advance simulation time for one agent by `days`.
    ///
    /// Ticker output, game-master narrative, and regulator consequences are
    /// appended as one batch; events for day `d` precede events for day
    /// `d+1`.
    pub async fn advance_time(
        &self,
        agent_id: &str,
        days: u32,
        deadline: Option<Instant>,
    ) -> DomainResult<Vec<GameEvent>> {
        let lock = self.agent_lock(agent_id).await;
        let _guard = lock.lock().await;

        let stream = self.log.load_for_agent(agent_id).await?;
        let state = self.fold(agent_id, &stream, None)?;

        let correlation = Some(Uuid::new_v4());
        let mut batch = {
            let reducers = self.reducers.read().expect("projection registry poisoned");
            self.ticker.generate(&state, days, &reducers, correlation)?
        };

        let post_state = {
            let reducers = self.reducers.read().expect("projection registry poisoned");
            let mut post = state;
            for event in &batch {
                post = reducers.apply(post, event)?;
            }
            post
        };

        if let Some(game_master) = &self.game_master {
            let narrative = game_master.observe(&post_state, AdjudicationHook::PostTick);
            batch.extend(seal_drafts(agent_id, &post_state, correlation, narrative));
        }

        let history_start = stream.len().saturating_sub(REGULATOR_HISTORY_WINDOW);
        let consequences = self
            .regulator
            .review(&post_state, &stream[history_start..], &batch);
        batch.extend(seal_drafts(agent_id, &post_state, correlation, consequences));

        check_deadline(deadline, "advance_time")?;
        self.log.append_batch(batch.clone()).await?;
        debug!(agent_id, days, events = batch.len(), "time advanced");
        Ok(batch)
    }

    /// Reconstruct the current state for an agent; always a fresh owned
    /// snapshot.
    pub async fn get_current_state(&self, agent_id: &str) -> DomainResult<AgentState> {
        let stream = self.log.load_for_agent(agent_id).await?;
        self.fold(agent_id, &stream, None)
    }

    /// Reconstruct the state as of the end of `(week, day)`
    pub async fn get_state_at(
        &self,
        agent_id: &str,
        week: u32,
        day: u8,
    ) -> DomainResult<AgentState> {
        let stream = self.log.load_for_agent(agent_id).await?;
        self.fold(agent_id, &stream, Some((week, day)))
    }

    /// The agent's event history in append order, optionally limited to the
    /// most recent `limit` events
    pub async fn get_history(
        &self,
        agent_id: &str,
        limit: Option<usize>,
    ) -> DomainResult<Vec<GameEvent>> {
        match limit {
            Some(n) => self.log.tail(agent_id, n).await,
            None => self.log.load_for_agent(agent_id).await,
        }
    }

    fn fold(
        &self,
        agent_id: &str,
        stream: &[GameEvent],
        until: Option<(u32, u8)>,
    ) -> DomainResult<AgentState> {
        let reducers = self.reducers.read().expect("projection registry poisoned");
        StateBuilder::new(&reducers).build(agent_id, stream, until)
    }

    async fn agent_lock(&self, agent_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.agent_locks.lock().await;
        locks
            .entry(agent_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn rejected(error: DomainError) -> CommandOutcome {
    let message = format!("Validation failed: {error}");
    CommandOutcome {
        status: CommandStatus::Rejected,
        events: Vec::new(),
        error: Some(error),
        message,
    }
}

fn check_deadline(deadline: Option<Instant>, operation: &str) -> DomainResult<()> {
    if let Some(deadline) = deadline {
        if Instant::now() > deadline {
            return Err(DomainError::DeadlineExceeded {
                operation: operation.to_string(),
            });
        }
    }
    Ok(())
}

/// Seal drafts into envelopes on the right streams. Mirror records carry the
/// initiator's clock; the shared correlation id ties the pair together.
fn seal_drafts(
    agent_id: &str,
    state: &AgentState,
    correlation: Option<Uuid>,
    drafts: Vec<EventDraft>,
) -> Vec<GameEvent> {
    drafts
        .into_iter()
        .map(|draft| {
            let stream = draft.recipient.unwrap_or_else(|| agent_id.to_string());
            GameEvent::seal(
                stream,
                state.current_week,
                state.current_day,
                correlation,
                draft.payload,
            )
        })
        .collect()
}
