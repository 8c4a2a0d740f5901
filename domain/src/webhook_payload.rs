//! Tagged parsing of webhook request bodies.
//!
//! A body is decoded once into a `WebhookPayload`, so downstream code matches
//! on the variant instead of probing optional fields of an untyped document.

use serde::Deserialize;
use serde_json::{Map, Value};

/// `type` of the token-echo setup handshake (Stripe style).
pub const VERIFICATION_TOKEN_TYPE: &str = "webhook.verification";
/// `type` of the challenge-echo setup handshake (Slack style).
pub const URL_VERIFICATION_TYPE: &str = "url_verification";

/// A successfully structured webhook body.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookPayload {
    /// Setup handshake answered by echoing `verification_token`.
    VerificationToken { token: String },
    /// Setup handshake answered by echoing `challenge`.
    UrlVerification { challenge: String },
    /// Any other `type`; must pass signature verification.
    Standard(StandardEvent),
}

/// Fields of a standard event body.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardEvent {
    pub id: Option<String>,
    pub event_type: String,
    pub data: Value,
    pub created: Option<i64>,
}

/// Why a body could not be structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedPayload {
    /// Not a syntactically valid JSON document.
    Syntax,
    /// Valid JSON, but not an object.
    NotAnObject,
    /// No `type` field.
    MissingType,
    /// `type`, or the field a handshake echoes, is not a string.
    InvalidField,
    /// A field the handshake needs is absent.
    MissingField(&'static str),
}

// Only `type` is interpreted before classification. Every other field stays an
// untyped value until the variant that uses it reads it.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: Option<Value>,
    id: Option<Value>,
    #[serde(default)]
    data: Value,
    verification_token: Option<Value>,
    challenge: Option<Value>,
    created: Option<Value>,
}

/// Decodes `raw_body` into a `WebhookPayload`.
///
/// A standard event fails to parse only when the body is not a JSON object or
/// its `type` is missing or not a string. Its other fields are read leniently.
pub fn parse(raw_body: &[u8]) -> Result<WebhookPayload, MalformedPayload> {
    let document: Value = serde_json::from_slice(raw_body).map_err(|_| MalformedPayload::Syntax)?;

    // Only keyed documents are accepted; serde would otherwise read a JSON array
    // positionally into `Envelope`.
    let object: Map<String, Value> = match document {
        Value::Object(object) => object,
        _ => return Err(MalformedPayload::NotAnObject),
    };

    let envelope = Envelope::deserialize(Value::Object(object))
        .map_err(|_| MalformedPayload::InvalidField)?;

    let event_type = match envelope.event_type {
        None => return Err(MalformedPayload::MissingType),
        Some(Value::String(event_type)) => event_type,
        Some(_) => return Err(MalformedPayload::InvalidField),
    };

    match event_type.as_str() {
        VERIFICATION_TOKEN_TYPE => {
            echoed_string(envelope.verification_token, "verification_token")
                .map(|token| WebhookPayload::VerificationToken { token })
        }
        URL_VERIFICATION_TYPE => echoed_string(envelope.challenge, "challenge")
            .map(|challenge| WebhookPayload::UrlVerification { challenge }),
        _ => Ok(WebhookPayload::Standard(StandardEvent {
            id: envelope.id.and_then(id_string),
            event_type,
            data: envelope.data,
            created: envelope.created.as_ref().and_then(Value::as_i64),
        })),
    }
}

/// The value a handshake echoes back must be a string.
fn echoed_string(value: Option<Value>, field: &'static str) -> Result<String, MalformedPayload> {
    match value {
        None => Err(MalformedPayload::MissingField(field)),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(MalformedPayload::InvalidField),
    }
}

/// Event ids are opaque: numeric or structured ids keep their JSON text.
fn id_string(id: Value) -> Option<String> {
    match id {
        Value::Null => None,
        Value::String(id) => Some(id),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_standard_event() {
        let body = br#"{"type":"payment.succeeded","id":"evt_1","data":{"amount":1000},"created":1700000000}"#;

        assert_eq!(
            parse(body),
            Ok(WebhookPayload::Standard(StandardEvent {
                id: Some("evt_1".to_string()),
                event_type: "payment.succeeded".to_string(),
                data: json!({ "amount": 1000 }),
                created: Some(1_700_000_000),
            }))
        );
    }

    #[test]
    fn test_parse_standard_event_with_only_type() {
        assert_eq!(
            parse(br#"{"type":"ping"}"#),
            Ok(WebhookPayload::Standard(StandardEvent {
                id: None,
                event_type: "ping".to_string(),
                data: Value::Null,
                created: None,
            }))
        );
    }

    #[test]
    fn test_parse_verification_token_handshake() {
        assert_eq!(
            parse(br#"{"type":"webhook.verification","verification_token":"tok_123"}"#),
            Ok(WebhookPayload::VerificationToken {
                token: "tok_123".to_string()
            })
        );
    }

    #[test]
    fn test_parse_url_verification_handshake() {
        assert_eq!(
            parse(br#"{"type":"url_verification","challenge":"abc"}"#),
            Ok(WebhookPayload::UrlVerification {
                challenge: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_handshake_without_its_field_is_malformed() {
        assert_eq!(
            parse(br#"{"type":"webhook.verification"}"#),
            Err(MalformedPayload::MissingField("verification_token"))
        );
        assert_eq!(
            parse(br#"{"type":"url_verification","verification_token":"tok"}"#),
            Err(MalformedPayload::MissingField("challenge"))
        );
    }

    #[test]
    fn test_invalid_syntax_is_malformed() {
        for body in [&b""[..], b"not json", b"{\"type\":", b"\xff\xfe"] {
            assert_eq!(parse(body), Err(MalformedPayload::Syntax));
        }
    }

    #[test]
    fn test_non_object_documents_are_malformed() {
        for body in [&b"[]"[..], b"[\"payment.succeeded\"]", b"\"type\"", b"42", b"null"] {
            assert_eq!(parse(body), Err(MalformedPayload::NotAnObject));
        }
    }

    #[test]
    fn test_missing_type_is_malformed() {
        assert_eq!(
            parse(br#"{"id":"evt_1","data":{}}"#),
            Err(MalformedPayload::MissingType)
        );
        assert_eq!(parse(b"{}"), Err(MalformedPayload::MissingType));
    }

    #[test]
    fn test_wrongly_typed_fields_are_malformed() {
        assert_eq!(
            parse(br#"{"type":42}"#),
            Err(MalformedPayload::InvalidField)
        );
        assert_eq!(
            parse(br#"{"type":"url_verification","challenge":{"nested":true}}"#),
            Err(MalformedPayload::InvalidField)
        );
        assert_eq!(
            parse(br#"{"type":"webhook.verification","verification_token":7}"#),
            Err(MalformedPayload::InvalidField)
        );
    }

    #[test]
    fn test_null_handshake_field_counts_as_missing() {
        assert_eq!(
            parse(br#"{"type":"url_verification","challenge":null}"#),
            Err(MalformedPayload::MissingField("challenge"))
        );
    }

    #[test]
    fn test_standard_event_ignores_handshake_fields() {
        let body = br#"{"type":"payment.succeeded","id":"evt_1","challenge":5,"verification_token":{"x":1}}"#;

        assert_eq!(
            parse(body),
            Ok(WebhookPayload::Standard(StandardEvent {
                id: Some("evt_1".to_string()),
                event_type: "payment.succeeded".to_string(),
                data: Value::Null,
                created: None,
            }))
        );
    }

    #[test]
    fn test_standard_event_reads_id_and_created_leniently() {
        match parse(br#"{"type":"payment.succeeded","id":12345,"created":"2024-01-01T00:00:00Z"}"#) {
            Ok(WebhookPayload::Standard(event)) => {
                assert_eq!(event.id.as_deref(), Some("12345"));
                assert_eq!(event.created, None);
            }
            other => panic!("expected a standard event, got {:?}", other),
        }

        match parse(br#"{"type":"ping","id":null,"created":1.5}"#) {
            Ok(WebhookPayload::Standard(event)) => {
                assert_eq!(event.id, None);
                assert_eq!(event.created, None);
            }
            other => panic!("expected a standard event, got {:?}", other),
        }
    }
}
