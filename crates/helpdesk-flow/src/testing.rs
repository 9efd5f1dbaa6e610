//! In-process fakes of the platform collaborators.

use std::sync::Mutex;

use async_trait::async_trait;
use helpdesk_core::{View, ViewHandle};

use crate::FlowError;
use crate::platform::{AckResponse, Acknowledge, HostPlatform, PlatformError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    OpenView { trigger_id: String, view: View },
    UpdateView { view_id: String, hash: String, view: View },
    PublishHome { user_id: String, view: View },
    OpenDirectChannel(String),
    PostMessage(String, String),
}

/// Records every call. Direct channels are named `D-<user>`.
#[derive(Default)]
pub struct FakePlatform {
    calls: Mutex<Vec<Call>>,
    failing_channel: Option<String>,
}

impl FakePlatform {
    /// Posts to `channel` fail and are not recorded.
    pub fn failing_channel(channel: &str) -> Self {
        Self {
            failing_channel: Some(channel.to_string()),
            ..Default::default()
        }
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PostMessage(channel, text) => Some((channel, text)),
                _ => None,
            })
            .collect()
    }

    pub fn posted_channels(&self) -> Vec<String> {
        self.posts().into_iter().map(|(channel, _)| channel).collect()
    }

    pub fn view_updates(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::UpdateView { .. }))
            .count()
    }
}

#[async_trait]
impl HostPlatform for FakePlatform {
    async fn open_view(&self, trigger_id: &str, view: &View) -> Result<ViewHandle, PlatformError> {
        self.push(Call::OpenView {
            trigger_id: trigger_id.to_string(),
            view: view.clone(),
        });
        Ok(ViewHandle {
            id: "V1".into(),
            hash: "h1".into(),
        })
    }

    async fn update_view(
        &self,
        view_id: &str,
        hash: &str,
        view: &View,
    ) -> Result<ViewHandle, PlatformError> {
        self.push(Call::UpdateView {
            view_id: view_id.to_string(),
            hash: hash.to_string(),
            view: view.clone(),
        });
        Ok(ViewHandle {
            id: view_id.to_string(),
            hash: format!("{hash}+"),
        })
    }

    async fn publish_home_view(&self, user_id: &str, view: &View) -> Result<(), PlatformError> {
        self.push(Call::PublishHome {
            user_id: user_id.to_string(),
            view: view.clone(),
        });
        Ok(())
    }

    async fn open_direct_channel(&self, user_id: &str) -> Result<String, PlatformError> {
        self.push(Call::OpenDirectChannel(user_id.to_string()));
        Ok(format!("D-{user_id}"))
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), PlatformError> {
        if self.failing_channel.as_deref() == Some(channel) {
            return Err(PlatformError::Other("channel_not_found".into()));
        }
        self.push(Call::PostMessage(channel.to_string(), text.to_string()));
        Ok(())
    }
}

/// Collects acknowledgments.
#[derive(Default)]
pub struct RecordingAck {
    pub responses: Vec<AckResponse>,
}

#[async_trait]
impl Acknowledge for RecordingAck {
    async fn ack(&mut self, response: AckResponse) -> Result<(), FlowError> {
        self.responses.push(response);
        Ok(())
    }
}
