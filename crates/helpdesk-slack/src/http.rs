//! HTTP client for the Slack Web API methods the workflow needs.

use helpdesk_core::{View, ViewHandle};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

/// Production Web API endpoint.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("{method} failed: {error}")]
    Api { method: &'static str, error: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bot-token client for `views.*`, `conversations.open` and `chat.postMessage`.
pub struct SlackClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ViewResponse {
    view: ViewHandle,
}

#[derive(Deserialize)]
struct ChannelRef {
    id: String,
}

#[derive(Deserialize)]
struct ConversationResponse {
    channel: ChannelRef,
}

/// Where a posted message landed.
#[derive(Debug, Clone, Deserialize)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

impl SlackClient {
    /// Create a client for the given API base and bot token.
    ///
    /// `base_url` should be like `https://slack.com/api` (no trailing slash).
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// POST a JSON body to a Web API method and decode the `ok` envelope.
    async fn call<R: DeserializeOwned>(
        &self,
        method: &'static str,
        body: Value,
    ) -> Result<R, SlackError> {
        let url = format!("{}/{}", self.base_url, method);

        debug!(url = %url, "calling web api");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SlackError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await?;
        let envelope: Envelope = serde_json::from_value(value.clone())?;
        if !envelope.ok {
            return Err(SlackError::Api {
                method,
                error: envelope.error.unwrap_or_else(|| "unknown_error".into()),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Open a modal in response to a shortcut (`views.open`).
    pub async fn views_open(&self, trigger_id: &str, view: &View) -> Result<ViewHandle, SlackError> {
        let resp: ViewResponse = self
            .call("views.open", json!({ "trigger_id": trigger_id, "view": view }))
            .await?;
        info!(view_id = %resp.view.id, "opened view");
        Ok(resp.view)
    }

    /// Replace an open modal (`views.update`), guarded by the view's `hash`.
    pub async fn views_update(
        &self,
        view_id: &str,
        hash: &str,
        view: &View,
    ) -> Result<ViewHandle, SlackError> {
        let resp: ViewResponse = self
            .call(
                "views.update",
                json!({ "view_id": view_id, "hash": hash, "view": view }),
            )
            .await?;
        info!(view_id = %resp.view.id, "updated view");
        Ok(resp.view)
    }

    /// Publish a user's home tab (`views.publish`).
    pub async fn views_publish(&self, user_id: &str, view: &View) -> Result<ViewHandle, SlackError> {
        let resp: ViewResponse = self
            .call("views.publish", json!({ "user_id": user_id, "view": view }))
            .await?;
        info!(user_id, "published home view");
        Ok(resp.view)
    }

    /// Open (or reuse) the bot's direct message channel with a user.
    pub async fn conversations_open(&self, user_id: &str) -> Result<String, SlackError> {
        let resp: ConversationResponse = self
            .call("conversations.open", json!({ "users": user_id }))
            .await?;
        Ok(resp.channel.id)
    }

    /// Post a plain text message to a channel id or `#name`.
    pub async fn chat_post_message(
        &self,
        channel: &str,
        text: &str,
    ) -> Result<PostedMessage, SlackError> {
        let posted: PostedMessage = self
            .call("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await?;
        info!(channel = %posted.channel, ts = %posted.ts, "posted message");
        Ok(posted)
    }
}
