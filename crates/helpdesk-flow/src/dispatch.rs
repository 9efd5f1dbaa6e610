//! Notification fan-out for accepted requests.

use tracing::{info, warn};

use crate::platform::{HostPlatform, PlatformError};

/// Channel the helpdesk team triages new requests in.
pub const DEFAULT_TRIAGE_CHANNEL: &str = "#general";

/// Where a notification goes, decided by the shape of its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    /// A user (`U…`) or workspace user (`W…`); messaged via a direct channel.
    User(&'a str),
    /// A channel id or `#name`; messaged directly.
    Channel(&'a str),
}

impl<'a> Destination<'a> {
    pub fn parse(id: &'a str) -> Self {
        if id.starts_with('U') || id.starts_with('W') {
            Destination::User(id)
        } else {
            Destination::Channel(id)
        }
    }
}

pub fn triage_message(submitter: &str, summary: &str) -> String {
    format!(":new: *New Request* :new:\nWe’ve got a request from <@{submitter}>:\n{summary}")
}

pub fn thank_you_message(summary: &str) -> String {
    format!(
        "*Thank you!* :bow:\nYou've sent the following request. I will update you on this shortly.\n{summary}"
    )
}

pub fn approval_message(submitter: &str, summary: &str) -> String {
    format!(
        ":wave: Hi from Helpdesk team! <@{submitter}> needs *your approval* on the following request.\n{summary}"
    )
}

/// What happened to the notifications of one submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub skipped: usize,
    /// Recipient and error message of every failed send.
    pub failed: Vec<(String, String)>,
}

impl DeliveryReport {
    fn record(&mut self, recipient: &str, result: Result<bool, PlatformError>) {
        match result {
            Ok(true) => self.sent += 1,
            Ok(false) => self.skipped += 1,
            Err(e) => {
                warn!(recipient, error = %e, "notification delivery failed");
                self.failed.push((recipient.to_string(), e.to_string()));
            }
        }
    }
}

/// Sends notifications through the host platform.
pub struct Dispatcher<'a> {
    platform: &'a dyn HostPlatform,
}

impl<'a> Dispatcher<'a> {
    pub fn new(platform: &'a dyn HostPlatform) -> Self {
        Self { platform }
    }

    /// Send `text` to `destination`. Returns `Ok(false)` when there is no
    /// destination and nothing was sent.
    pub async fn notify(&self, destination: Option<&str>, text: &str) -> Result<bool, PlatformError> {
        let Some(id) = destination else {
            return Ok(false);
        };
        match Destination::parse(id) {
            Destination::User(user_id) => {
                let channel = self.platform.open_direct_channel(user_id).await?;
                self.platform.post_message(&channel, text).await?;
            }
            Destination::Channel(channel) => {
                self.platform.post_message(channel, text).await?;
            }
        }
        Ok(true)
    }

    /// Notify the triage channel, the submitter, and the approver, in that
    /// order. A failed send is logged and does not stop the others.
    pub async fn fan_out(
        &self,
        triage_channel: &str,
        submitter: &str,
        approver: Option<&str>,
        summary: &str,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        let result = self
            .notify(Some(triage_channel), &triage_message(submitter, summary))
            .await;
        report.record(triage_channel, result);

        let result = self
            .notify(Some(submitter), &thank_you_message(summary))
            .await;
        report.record(submitter, result);

        let result = self
            .notify(approver, &approval_message(submitter, summary))
            .await;
        report.record(approver.unwrap_or("-"), result);

        info!(
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed.len(),
            "notifications dispatched"
        );
        report
    }
}
