use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("submission store unavailable: {0}")]
    Unavailable(String),
}
