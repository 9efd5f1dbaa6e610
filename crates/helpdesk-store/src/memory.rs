//! Process-lifetime store backed by a sharded concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::{StoreError, SubmissionStore};

/// In-memory submission log. Contents are lost on restart.
///
/// Each append holds the shard lock of its key for the duration of the push,
/// which makes per-submitter appends atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, submitter: &str, summary: String) -> Result<usize, StoreError> {
        let mut seq = self.entries.entry(submitter.to_string()).or_default();
        seq.push(summary);
        let len = seq.len();
        debug!(submitter, len, "appended submission");
        Ok(len)
    }

    async fn list(&self, submitter: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .get(submitter)
            .map(|seq| seq.value().clone())
            .unwrap_or_default())
    }
}
