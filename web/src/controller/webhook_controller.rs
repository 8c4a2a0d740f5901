//! Controller for inbound webhook notifications.
//!
//! Captures the raw body and the signature headers, lets the domain dispatcher
//! decide, and turns the decision into a response. Nothing here inspects the
//! body or the signature itself.

use crate::response::handshake;
use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use chrono::Utc;
use domain::{DispatchDecision, Dispatcher, InboundRequest, RejectReason};
use log::*;
use webhook_auth::webhook::{SIGNATURE_HEADER, TIMESTAMP_HEADER, WEBHOOK_ID_HEADER};

/// POST a webhook notification
///
/// Setup handshakes (`webhook.verification`, `url_verification`) are answered
/// without signature checks and without consulting the secret store. Every
/// other event type must carry a fresh, valid signature. The route is mounted
/// at the configured webhook path; `/webhook` is the default.
#[utoipa::path(
    post,
    path = "/webhook",
    params(
        ("x-webhook-signature" = Option<String>, Header, description = "`v1=` followed by the hex HMAC-SHA256 of `<timestamp>.<body>`"),
        ("x-webhook-timestamp" = Option<String>, Header, description = "Signing time in Unix seconds"),
        ("x-webhook-id" = Option<String>, Header, description = "Provider delivery identifier"),
    ),
    request_body(content = String, description = "JSON event document with a string `type` field", content_type = "application/json"),
    responses(
        (status = 200, description = "Event accepted, or handshake answered", body = String),
        (status = 400, description = "Body is not a JSON object with a string `type`"),
        (status = 401, description = "Signature headers missing, stale or invalid"),
        (status = 413, description = "Body exceeds the configured size limit"),
        (status = 500, description = "Webhook secret is misconfigured"),
        (status = 503, description = "Webhook secret is temporarily unavailable"),
    )
)]
pub async fn receive(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, Error> {
    let request = InboundRequest::new(
        body.to_vec(),
        header_value(&headers, SIGNATURE_HEADER),
        header_value(&headers, TIMESTAMP_HEADER),
        header_value(&headers, WEBHOOK_ID_HEADER),
    );
    info!(
        "Webhook received ({} bytes, webhook_id: {})",
        request.raw_body().len(),
        request.webhook_id().unwrap_or("-")
    );

    let dispatcher = Dispatcher::new(app_state.config.webhook_tolerance_secs);
    let decision = dispatcher.handle_with_secret(
        &request,
        || app_state.current_secret(),
        Utc::now().timestamp(),
    )?;

    let response = match decision {
        DispatchDecision::Accept(event) => {
            app_state.event_publisher().publish(event).await;
            info!("Webhook processed successfully");
            (StatusCode::OK, "OK").into_response()
        }
        DispatchDecision::RespondHandshakeToken(token) => handshake::verification_token(&token),
        DispatchDecision::RespondHandshakeChallenge(challenge) => handshake::challenge(&challenge),
        DispatchDecision::Reject(reason) => rejection(reason),
    };

    Ok(response)
}

// Non UTF-8 values are treated as absent.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn rejection(reason: RejectReason) -> Response {
    match reason {
        RejectReason::MalformedHeaders => {
            (StatusCode::UNAUTHORIZED, "Missing signature headers").into_response()
        }
        RejectReason::StaleTimestamp => {
            (StatusCode::UNAUTHORIZED, "Request timestamp too old").into_response()
        }
        RejectReason::InvalidSignature => {
            (StatusCode::UNAUTHORIZED, "Invalid signature").into_response()
        }
        RejectReason::MalformedPayload => {
            (StatusCode::BAD_REQUEST, "Invalid payload").into_response()
        }
    }
}
