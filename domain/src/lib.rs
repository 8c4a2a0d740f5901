//! Classification and dispatch of inbound webhook notifications.
//!
//! The `domain` layer turns an `InboundRequest` captured by the transport adapter
//! into a single `DispatchDecision`. It decides which requests are setup
//! handshakes, which are standard events that must pass signature verification,
//! and which are malformed. It performs no I/O and holds no state besides the
//! freshness tolerance.

pub use events::WebhookEvent;
pub use webhook_auth::{VerificationOutcome, WebhookSecret};

pub mod dispatcher;
pub mod error;
pub mod inbound_request;
pub mod secret;
pub mod webhook_payload;

pub use dispatcher::{handle, DispatchDecision, Dispatcher, RejectReason};
pub use inbound_request::InboundRequest;
