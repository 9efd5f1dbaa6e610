use helpdesk_core::{Category, CoreError};
use helpdesk_store::StoreError;
use thiserror::Error;

use crate::form::Step;
use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Protocol(#[from] CoreError),

    #[error("{event} is not valid at {step:?}")]
    InvalidTransition { step: Step, event: &'static str },

    #[error("field {field} is not part of the {category} form")]
    UnexpectedField { field: String, category: Category },

    #[error("malformed payload: {0}")]
    Malformed(&'static str),

    #[error("platform call failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("submission store: {0}")]
    Store(#[from] StoreError),

    #[error("interaction already acknowledged")]
    AlreadyAcknowledged,
}

impl FlowError {
    /// True for input the platform should never have sent us.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            FlowError::Protocol(_)
                | FlowError::InvalidTransition { .. }
                | FlowError::UnexpectedField { .. }
                | FlowError::Malformed(_)
        )
    }
}
