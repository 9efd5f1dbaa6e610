//! The collaborator surface: acknowledgments, view display, and messaging.

use async_trait::async_trait;
use helpdesk_core::{ValidationErrors, View, ViewHandle};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[cfg(feature = "slack")]
    #[error(transparent)]
    Slack(#[from] helpdesk_slack::SlackError),

    #[error("{0}")]
    Other(String),
}

/// Response to an interaction.
///
/// For view submissions the two variants are distinct protocol answers: an
/// empty acknowledgment closes the modal, `Errors` keeps it open and shows
/// the messages under the named inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum AckResponse {
    Empty,
    Errors(ValidationErrors),
}

impl AckResponse {
    /// Response body, `None` for an empty acknowledgment.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            AckResponse::Empty => None,
            AckResponse::Errors(errors) => Some(json!({
                "response_action": "errors",
                "errors": errors,
            })),
        }
    }
}

/// Acknowledges the interaction currently being handled.
#[async_trait]
pub trait Acknowledge: Send {
    async fn ack(&mut self, response: AckResponse) -> Result<(), crate::FlowError>;
}

/// Platform calls made while handling interactions.
#[async_trait]
pub trait HostPlatform: Send + Sync {
    async fn open_view(&self, trigger_id: &str, view: &View) -> Result<ViewHandle, PlatformError>;

    /// Replace a displayed view. `hash` is the version the caller last saw.
    async fn update_view(
        &self,
        view_id: &str,
        hash: &str,
        view: &View,
    ) -> Result<ViewHandle, PlatformError>;

    async fn publish_home_view(&self, user_id: &str, view: &View) -> Result<(), PlatformError>;

    /// Channel id of the direct conversation between the app and a user.
    async fn open_direct_channel(&self, user_id: &str) -> Result<String, PlatformError>;

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), PlatformError>;
}

#[cfg(feature = "slack")]
#[async_trait]
impl HostPlatform for helpdesk_slack::SlackClient {
    async fn open_view(&self, trigger_id: &str, view: &View) -> Result<ViewHandle, PlatformError> {
        Ok(self.views_open(trigger_id, view).await?)
    }

    async fn update_view(
        &self,
        view_id: &str,
        hash: &str,
        view: &View,
    ) -> Result<ViewHandle, PlatformError> {
        Ok(self.views_update(view_id, hash, view).await?)
    }

    async fn publish_home_view(&self, user_id: &str, view: &View) -> Result<(), PlatformError> {
        self.views_publish(user_id, view).await?;
        Ok(())
    }

    async fn open_direct_channel(&self, user_id: &str) -> Result<String, PlatformError> {
        Ok(self.conversations_open(user_id).await?)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), PlatformError> {
        self.chat_post_message(channel, text).await?;
        Ok(())
    }
}
