// Copyright 2025 Cowboy AI, LLC.

//! Event log trait

use crate::errors::DomainResult;
use crate::events::GameEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event paired with its global sequence number.
///
/// Sequence numbers are monotonic across the whole log; per-agent order is
/// the subsequence of that total order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedEvent {
    /// Monotonic position in the log
    pub sequence: u64,
    /// The stored event
    pub event: GameEvent,
}

/// Append-only ordered journal of game events.
///
/// There is no deletion, no mutation, and no filtering-as-policy: readers
/// receive events exactly as appended. Appends may be buffered internally,
/// but a batch is durable before `append_batch` returns.
#[async_trait]
pub trait EventLog: Send + Sync + fmt::Debug {
    /// Append one event, returning its sequence number.
    ///
    /// A storage failure is fatal to the caller's operation; the log never
    /// records a partial event.
    async fn append(&self, event: GameEvent) -> DomainResult<u64>;

    /// Append a batch atomically and contiguously.
    ///
    /// Either every event in the batch is durably appended, in order, with
    /// no interleaving from other appenders, or none is.
    async fn append_batch(&self, events: Vec<GameEvent>) -> DomainResult<Vec<u64>>;

    /// All events in append order
    async fn load_all(&self) -> DomainResult<Vec<SequencedEvent>>;

    /// The ordered subsequence belonging to one agent
    async fn load_for_agent(&self, agent_id: &str) -> DomainResult<Vec<GameEvent>>;

    /// The last `n` events for one agent, oldest first
    async fn tail(&self, agent_id: &str, n: usize) -> DomainResult<Vec<GameEvent>>;

    /// Number of events in the log
    async fn len(&self) -> DomainResult<u64>;

    /// Whether the log is empty
    async fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.len().await? == 0)
    }
}
