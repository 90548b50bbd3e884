// Copyright 2025 Cowboy AI, LLC.

//! Event log infrastructure
//!
//! The append-only journal is the sole source of truth. Two backends are
//! supported: a process-lifetime in-memory log and a crash-safe JSONL file
//! log.

pub mod event_log;
pub mod file_log;
pub mod memory_log;

pub use event_log::{EventLog, SequencedEvent};
pub use file_log::FileEventLog;
pub use memory_log::InMemoryEventLog;
