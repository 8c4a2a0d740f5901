//! # webhook-auth
//!
//! Authentication primitives for inbound webhook notifications:
//! - HMAC-SHA256 signature verification with a freshness window
//! - The `WebhookSecret` value and the `SecretSource` seam used to supply it per request
//!
//! ## Usage
//!
//! ```rust,ignore
//! use webhook_auth::{webhook, WebhookSecret};
//!
//! let outcome = webhook::verify(
//!     body,
//!     Some(timestamp_header),
//!     Some(signature_header),
//!     &secret,
//!     now,
//!     webhook::DEFAULT_TOLERANCE_SECS,
//! );
//! ```

pub mod error;
pub mod secret;
pub mod webhook;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use secret::{SecretSource, StaticSecretSource, WebhookSecret, PLACEHOLDER_SECRET};
pub use webhook::VerificationOutcome;
