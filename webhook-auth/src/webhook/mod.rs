//! Webhook signature verification.

mod hmac;

pub use self::hmac::{sign, verify};

/// Header carrying `v1=<hex HMAC-SHA256 digest>`.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";
/// Header carrying the signing time as decimal Unix seconds.
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";
/// Optional header carrying the provider's delivery identifier.
pub const WEBHOOK_ID_HEADER: &str = "x-webhook-id";

/// Version prefix of the signature header value.
pub const SIGNATURE_VERSION: &str = "v1=";

/// Maximum distance, in seconds, between the signing time and now.
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Result of checking a request's signature headers against its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid,
    InvalidSignature,
    StaleTimestamp,
    MalformedHeaders,
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }
}
