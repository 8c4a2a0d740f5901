//! Classifies an inbound request and decides how the adapter must answer it.
//!
//! `Received -> ParseBody -> Classify -> (Verify) -> decision`. Handshakes are
//! answered without consulting the verifier: they arrive while the provider is
//! being set up, possibly before both sides share a secret, so the handshake
//! path is a low-trust control path. Every other `type` must verify.

use events::WebhookEvent;
use log::{info, warn};
use webhook_auth::webhook::{self, VerificationOutcome, DEFAULT_TOLERANCE_SECS};
use webhook_auth::WebhookSecret;

use crate::inbound_request::InboundRequest;
use crate::webhook_payload::{self, StandardEvent, WebhookPayload};

/// The single outcome the transport adapter turns into a response.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchDecision {
    /// Token handshake (`webhook.verification`): echo the verification token.
    RespondHandshakeToken(String),
    /// Challenge handshake (`url_verification`): echo the challenge.
    RespondHandshakeChallenge(String),
    /// Authenticated standard event, ready for business processing.
    Accept(WebhookEvent),
    Reject(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A signature or timestamp header is absent or unparsable.
    MalformedHeaders,
    /// The timestamp is outside the freshness window.
    StaleTimestamp,
    /// The supplied signature does not match the body.
    InvalidSignature,
    /// The body is not a JSON object with a string `type`.
    MalformedPayload,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MalformedHeaders => "malformed_headers",
            RejectReason::StaleTimestamp => "stale_timestamp",
            RejectReason::InvalidSignature => "invalid_signature",
            RejectReason::MalformedPayload => "malformed_payload",
        }
    }
}

enum Classification {
    Answered(DispatchDecision),
    NeedsVerification(StandardEvent),
}

/// Stateless dispatcher; the tolerance is its only setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    tolerance_secs: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS)
    }
}

impl Dispatcher {
    pub fn new(tolerance_secs: u64) -> Self {
        Self { tolerance_secs }
    }

    pub fn tolerance_secs(&self) -> u64 {
        self.tolerance_secs
    }

    /// Decides how to answer `request`.
    ///
    /// `secret` is supplied per call so the caller controls rotation, and `now`
    /// (Unix seconds) is injected so the freshness check is testable.
    pub fn handle(
        &self,
        request: &InboundRequest,
        secret: &WebhookSecret,
        now: i64,
    ) -> DispatchDecision {
        match self.classify(request) {
            Classification::Answered(decision) => decision,
            Classification::NeedsVerification(event) => {
                self.verify_standard(request, event, secret, now)
            }
        }
    }

    /// Like [`Dispatcher::handle`], but asks `current_secret` for the secret
    /// only when the request is a standard event. Handshakes and malformed
    /// bodies are decided without it, so a failing secret store only affects
    /// requests that actually need verification.
    pub fn handle_with_secret<F, E>(
        &self,
        request: &InboundRequest,
        current_secret: F,
        now: i64,
    ) -> Result<DispatchDecision, E>
    where
        F: FnOnce() -> Result<WebhookSecret, E>,
    {
        match self.classify(request) {
            Classification::Answered(decision) => Ok(decision),
            Classification::NeedsVerification(event) => {
                let secret = current_secret()?;
                Ok(self.verify_standard(request, event, &secret, now))
            }
        }
    }

    fn classify(&self, request: &InboundRequest) -> Classification {
        let payload = match webhook_payload::parse(request.raw_body()) {
            Ok(payload) => payload,
            Err(malformed) => {
                warn!("Rejecting webhook with malformed payload: {:?}", malformed);
                return Classification::Answered(DispatchDecision::Reject(
                    RejectReason::MalformedPayload,
                ));
            }
        };

        match payload {
            WebhookPayload::VerificationToken { token } => {
                info!("Webhook verification request (token handshake)");
                Classification::Answered(DispatchDecision::RespondHandshakeToken(token))
            }
            WebhookPayload::UrlVerification { challenge } => {
                info!("URL verification request (challenge handshake)");
                Classification::Answered(DispatchDecision::RespondHandshakeChallenge(challenge))
            }
            WebhookPayload::Standard(event) => Classification::NeedsVerification(event),
        }
    }

    fn verify_standard(
        &self,
        request: &InboundRequest,
        event: StandardEvent,
        secret: &WebhookSecret,
        now: i64,
    ) -> DispatchDecision {
        let outcome = webhook::verify(
            request.raw_body(),
            request.timestamp_header(),
            request.signature_header(),
            secret,
            now,
            self.tolerance_secs,
        );

        let reason = match outcome {
            VerificationOutcome::Valid => {
                info!("Signature verified for {:?} event", event.event_type);
                return DispatchDecision::Accept(WebhookEvent {
                    id: event.id,
                    event_type: event.event_type,
                    webhook_id: request.webhook_id().map(str::to_string),
                    data: event.data,
                    created: event.created,
                });
            }
            VerificationOutcome::InvalidSignature => RejectReason::InvalidSignature,
            VerificationOutcome::StaleTimestamp => RejectReason::StaleTimestamp,
            VerificationOutcome::MalformedHeaders => RejectReason::MalformedHeaders,
        };

        warn!(
            "Rejecting {:?} event: {}",
            event.event_type,
            reason.as_str()
        );
        DispatchDecision::Reject(reason)
    }
}

/// Dispatches `request` with the default freshness tolerance.
pub fn handle(request: &InboundRequest, secret: &WebhookSecret, now: i64) -> DispatchDecision {
    Dispatcher::default().handle(request, secret, now)
}
