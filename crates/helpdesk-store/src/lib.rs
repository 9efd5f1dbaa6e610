//! Submission log: per-submitter, append-only sequences of request summaries.

mod error;
pub use error::StoreError;

mod memory;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Backend for the submission log.
///
/// Appends for one submitter must be atomic: two racing appends both land,
/// in some order, and neither is lost.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Push `summary` to the end of the submitter's sequence, creating it if
    /// absent. Returns the sequence length after the append.
    async fn append(&self, submitter: &str, summary: String) -> Result<usize, StoreError>;

    /// The submitter's summaries in insertion order; empty if none.
    async fn list(&self, submitter: &str) -> Result<Vec<String>, StoreError>;
}
