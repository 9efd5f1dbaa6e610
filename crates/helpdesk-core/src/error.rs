use thiserror::Error;

/// Malformed or out-of-contract input from the chat platform.
///
/// The platform only ever offers the options this crate renders, so none of
/// these are user mistakes. They abort the interaction that produced them.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown category type detected ({0})")]
    UnknownCategory(String),

    #[error("missing field in submission: {0}")]
    MissingField(&'static str),

    #[error("malformed date {value:?} in field {field}")]
    MalformedDate { field: &'static str, value: String },

    #[error("malformed private metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}
