// Copyright 2025 Cowboy AI, LLC.

//! In-memory event log
//!
//! Volatile, process-lifetime backend for tests and development hosts. A
//! single global lock serializes appenders; per-agent order follows from the
//! total order.

use crate::errors::DomainResult;
use crate::events::GameEvent;
use crate::infrastructure::event_log::{EventLog, SequencedEvent};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-lifetime log backed by a locked vector.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<GameEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, event: GameEvent) -> DomainResult<u64> {
        let mut events = self.events.write().await;
        events.push(event);
        Ok(events.len() as u64 - 1)
    }

    async fn append_batch(&self, batch: Vec<GameEvent>) -> DomainResult<Vec<u64>> {
        let mut events = self.events.write().await;
        let start = events.len() as u64;
        let sequences = (start..start + batch.len() as u64).collect();
        events.extend(batch);
        Ok(sequences)
    }

    async fn load_all(&self) -> DomainResult<Vec<SequencedEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .enumerate()
            .map(|(i, event)| SequencedEvent {
                sequence: i as u64,
                event: event.clone(),
            })
            .collect())
    }

    async fn load_for_agent(&self, agent_id: &str) -> DomainResult<Vec<GameEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.agent_id == agent_id)
            .cloned()
            .collect())
    }

    async fn tail(&self, agent_id: &str, n: usize) -> DomainResult<Vec<GameEvent>> {
        let mut stream = self.load_for_agent(agent_id).await?;
        if stream.len() > n {
            stream.drain(..stream.len() - n);
        }
        Ok(stream)
    }

    async fn len(&self) -> DomainResult<u64> {
        Ok(self.events.read().await.len() as u64)
    }
}
