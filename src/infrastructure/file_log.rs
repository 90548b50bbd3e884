// Copyright 2025 Cowboy AI, LLC.

//! Line-delimited file event log
//!
//! One JSON record per newline-terminated line; lines are immutable once
//! written and there are no in-place updates. Appends fsync per commit
//! batch. On open, a trailing partial line (a crash mid-write) is dropped;
//! corruption anywhere earlier is a storage error.
//!
//! Lock discipline: a single mutex owns both the file handle and the
//! in-memory index, so the file has exactly one writer and batches land
//! contiguously.

use crate::errors::{DomainError, DomainResult};
use crate::events::GameEvent;
use crate::infrastructure::event_log::{EventLog, SequencedEvent};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug)]
struct FileLogInner {
    file: File,
    events: Vec<GameEvent>,
}

/// Crash-safe JSONL log backend.
#[derive(Debug)]
pub struct FileEventLog {
    path: PathBuf,
    inner: Mutex<FileLogInner>,
}

impl FileEventLog {
    /// Open (or create) the log at `path`, recovering existing events.
    pub fn open(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::Storage(format!("create {parent:?}: {e}")))?;
            }
        }

        let events = Self::recover(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DomainError::Storage(format!("open {path:?}: {e}")))?;

        Ok(Self {
            path,
            inner: Mutex::new(FileLogInner { file, events }),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn recover(path: &Path) -> DomainResult<Vec<GameEvent>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DomainError::Storage(format!("open {path:?}: {e}"))),
        };

        let reader = BufReader::new(file);
        let mut raw_lines = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| DomainError::Storage(format!("read {path:?}: {e}")))?;
            raw_lines.push(line);
        }

        let mut events = Vec::with_capacity(raw_lines.len());
        let last = raw_lines.len().saturating_sub(1);
        for (index, line) in raw_lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<GameEvent>(line) {
                Ok(event) => events.push(event),
                Err(e) if index == last => {
                    // A torn final line is a crash mid-write; drop it
                    warn!(path = %path.display(), error = %e, "dropping truncated final line");
                    Self::truncate_torn_tail(path, &raw_lines[..last])?;
                }
                Err(e) => {
                    return Err(DomainError::Storage(format!(
                        "corrupt record at line {} of {path:?}: {e}",
                        index + 1
                    )));
                }
            }
        }
        Ok(events)
    }

    fn truncate_torn_tail(path: &Path, keep: &[String]) -> DomainResult<()> {
        let mut content = keep.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(path, content)
            .map_err(|e| DomainError::Storage(format!("truncate {path:?}: {e}")))
    }

    fn write_batch(inner: &mut FileLogInner, batch: &[GameEvent]) -> DomainResult<()> {
        let mut buffer = Vec::new();
        for event in batch {
            serde_json::to_writer(&mut buffer, event)
                .map_err(|e| DomainError::Storage(format!("encode event: {e}")))?;
            buffer.push(b'\n');
        }
        inner
            .file
            .write_all(&buffer)
            .map_err(|e| DomainError::Storage(format!("append: {e}")))?;
        // One fsync per commit boundary
        inner
            .file
            .sync_data()
            .map_err(|e| DomainError::Storage(format!("fsync: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl EventLog for FileEventLog {
    async fn append(&self, event: GameEvent) -> DomainResult<u64> {
        let mut inner = self.inner.lock().await;
        Self::write_batch(&mut inner, std::slice::from_ref(&event))?;
        inner.events.push(event);
        Ok(inner.events.len() as u64 - 1)
    }

    async fn append_batch(&self, batch: Vec<GameEvent>) -> DomainResult<Vec<u64>> {
        let mut inner = self.inner.lock().await;
        Self::write_batch(&mut inner, &batch)?;
        let start = inner.events.len() as u64;
        let sequences = (start..start + batch.len() as u64).collect();
        inner.events.extend(batch);
        Ok(sequences)
    }

    async fn load_all(&self) -> DomainResult<Vec<SequencedEvent>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .events
            .iter()
            .enumerate()
            .map(|(i, event)| SequencedEvent {
                sequence: i as u64,
                event: event.clone(),
            })
            .collect())
    }

    async fn load_for_agent(&self, agent_id: &str) -> DomainResult<Vec<GameEvent>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .events
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
        Ok(self.inner.lock().await.events.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AgentRetired, EventPayload};
    use std::io::Read;

    fn event(agent: &str, reason: &str) -> GameEvent {
        GameEvent::seal(
            agent,
            0,
            0,
            None,
            EventPayload::AgentRetired(AgentRetired {
                reason: reason.to_string(),
            }),
        )
    }

    #[tokio::test]
    async fn test_events_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        {
            let log = FileEventLog::open(&path).unwrap();
            log.append(event("P001", "first")).await.unwrap();
            log.append_batch(vec![event("P001", "second"), event("P002", "third")])
                .await
                .unwrap();
        }

        let log = FileEventLog::open(&path).unwrap();
        assert_eq!(log.len().await.unwrap(), 3);
        let stream = log.load_for_agent("P001").await.unwrap();
        assert_eq!(stream.len(), 2);
    }

    #[tokio::test]
    async fn test_one_record_per_newline_terminated_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = FileEventLog::open(&path).unwrap();
        log.append(event("P001", "a")).await.unwrap();
        log.append(event("P001", "b")).await.unwrap();
        drop(log);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.ends_with('\n'));
        assert_eq!(content.lines().count(), 2);
        for line in content.lines() {
            serde_json::from_str::<GameEvent>(line).unwrap();
        }
    }

    #[tokio::test]
    async fn test_torn_final_line_is_dropped_on_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        {
            let log = FileEventLog::open(&path).unwrap();
            log.append(event("P001", "kept")).await.unwrap();
        }
        // Simulate a crash mid-write
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"{\"event_id\":\"torn").unwrap();
        }

        let log = FileEventLog::open(&path).unwrap();
        assert_eq!(log.len().await.unwrap(), 1);
        // The torn bytes are gone from disk as well
        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_corruption_before_the_tail_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        {
            let log = FileEventLog::open(&path).unwrap();
            log.append(event("P001", "a")).await.unwrap();
        }
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"not json at all\n").unwrap();
            file.write_all(
                serde_json::to_string(&event("P001", "b"))
                    .unwrap()
                    .as_bytes(),
            )
            .unwrap();
            file.write_all(b"\n").unwrap();
        }

        let err = FileEventLog::open(&path).unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
