//! Request signature verification (`v0` signing scheme).
//!
//! The platform signs `v0:<timestamp>:<raw body>` with HMAC-SHA256 keyed by
//! the app's signing secret and sends `v0=<hex digest>` alongside the
//! timestamp. Requests older than five minutes are refused to stop replays.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

const VERSION: &str = "v0";
const MAX_SKEW_SECS: u64 = 60 * 5;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("missing header {0}")]
    MissingHeader(&'static str),
    #[error("malformed timestamp {0:?}")]
    MalformedTimestamp(String),
    #[error("timestamp {timestamp} outside tolerance (now {now})")]
    Stale { timestamp: i64, now: i64 },
    #[error("signature mismatch")]
    Mismatch,
    #[error("signing secret rejected as HMAC key")]
    InvalidKey,
}

/// Verifies inbound requests against the app's signing secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"***")
            .finish()
    }
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::InvalidKey)?;
        mac.update(VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }

    /// Compute the `v0=...` signature for a request.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, SignatureError> {
        let digest = self.mac(timestamp, body)?.finalize().into_bytes();
        Ok(format!("{VERSION}={}", hex::encode(digest)))
    }

    /// Check the signature headers of a request received at `now` (unix seconds).
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::MalformedTimestamp(timestamp.to_string()))?;
        if now.abs_diff(ts) > MAX_SKEW_SECS {
            return Err(SignatureError::Stale { timestamp: ts, now });
        }

        let digest = signature
            .strip_prefix("v0=")
            .and_then(|hex_digest| hex::decode(hex_digest).ok())
            .ok_or(SignatureError::Mismatch)?;

        self.mac(timestamp, body)?
            .verify_slice(&digest)
            .map_err(|_| SignatureError::Mismatch)
    }
}
