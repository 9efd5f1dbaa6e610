//! Inbound request bodies: interactivity payloads and Events API envelopes.

use helpdesk_core::StateValues;
use helpdesk_core::submission::SelectedOption;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("form body has no payload field")]
    MissingPayload,
    #[error("malformed payload JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: String,
}

/// One element interaction inside a `block_actions` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    pub action_id: String,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewStateValues {
    #[serde(default)]
    pub values: StateValues,
}

/// The view an interaction came from, as reported by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewPayload {
    pub id: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub callback_id: String,
    #[serde(default)]
    pub private_metadata: String,
    #[serde(default)]
    pub state: ViewStateValues,
}

/// The interactivity payloads the workflow listens to.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    Shortcut {
        callback_id: String,
        trigger_id: String,
        user: UserRef,
    },
    BlockActions {
        user: UserRef,
        #[serde(default)]
        actions: Vec<Action>,
        #[serde(default)]
        view: Option<ViewPayload>,
    },
    ViewSubmission {
        user: UserRef,
        view: ViewPayload,
    },
    #[serde(other)]
    Unsupported,
}

impl InteractionPayload {
    /// Decode the `payload` field of an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Result<Self, PayloadError> {
        let raw = url::form_urlencoded::parse(body)
            .find(|(key, _)| key == "payload")
            .map(|(_, value)| value.into_owned())
            .ok_or(PayloadError::MissingPayload)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Events API bodies. Only the endpoint handshake is handled.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventsPayload {
    UrlVerification {
        challenge: String,
    },
    #[serde(other)]
    Unsupported,
}
