//! Slack plumbing: Web API client, inbound interaction payloads, and request
//! signature verification.

pub mod payload;
pub mod signature;

#[cfg(feature = "http")]
pub mod http;

pub use payload::{EventsPayload, InteractionPayload, PayloadError};
pub use signature::{SignatureError, SignatureVerifier};

#[cfg(feature = "http")]
pub use http::{DEFAULT_API_BASE, SlackClient, SlackError};
