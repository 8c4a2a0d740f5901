//! HMAC-SHA256 webhook signature validation with a replay window.

use hmac::{Hmac, Mac};
use log::debug;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{VerificationOutcome, SIGNATURE_VERSION};
use crate::secret::WebhookSecret;

type HmacSha256 = Hmac<Sha256>;

/// Computes the signature header value for `timestamp` and `raw_body`.
///
/// The signed message is `timestamp + "." + raw_body`, using the timestamp
/// exactly as it appears on the wire and the body bytes before any parsing.
pub fn sign(secret: &WebhookSecret, timestamp: &str, raw_body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.expose_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);

    format!(
        "{}{}",
        SIGNATURE_VERSION,
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Verifies a webhook request.
///
/// # Arguments
///
/// * `raw_body` - Unmodified request body bytes
/// * `timestamp_header` - Value of the timestamp header, if present
/// * `signature_header` - Value of the signature header, if present
/// * `secret` - Shared signing secret
/// * `now` - Current Unix time in seconds
/// * `tolerance_secs` - Largest accepted distance between `now` and the timestamp
///
/// Freshness is checked before the digest is computed, so a replayed request
/// is rejected as stale even when its signature is genuine. A distance equal
/// to `tolerance_secs` is still fresh.
pub fn verify(
    raw_body: &[u8],
    timestamp_header: Option<&str>,
    signature_header: Option<&str>,
    secret: &WebhookSecret,
    now: i64,
    tolerance_secs: u64,
) -> VerificationOutcome {
    let (Some(timestamp_header), Some(signature_header)) = (timestamp_header, signature_header)
    else {
        debug!("Webhook signature or timestamp header missing");
        return VerificationOutcome::MalformedHeaders;
    };

    let timestamp = match timestamp_header.parse::<i64>() {
        Ok(ts) => ts,
        Err(_) => {
            debug!("Webhook timestamp header is not an integer");
            return VerificationOutcome::MalformedHeaders;
        }
    };

    if now.abs_diff(timestamp) > tolerance_secs {
        debug!(
            "Webhook timestamp outside tolerance window ({}s)",
            tolerance_secs
        );
        return VerificationOutcome::StaleTimestamp;
    }

    let expected = sign(secret, timestamp_header, raw_body);

    if constant_time_compare(expected.as_bytes(), signature_header.as_bytes()) {
        VerificationOutcome::Valid
    } else {
        debug!("Webhook signature verification failed");
        VerificationOutcome::InvalidSignature
    }
}

/// Constant-time comparison of the computed and supplied signatures.
///
/// A length mismatch is an immediate inequality; the expected length is public
/// (`v1=` plus 64 hex characters) so it reveals nothing about the secret.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    const NOW: i64 = 1_700_000_000;
    const TOLERANCE: u64 = 300;

    fn secret(value: &str) -> WebhookSecret {
        WebhookSecret::new(SecretString::from(value.to_string())).unwrap()
    }

    /// Signs `body` as if it were sent `age` seconds before `NOW`.
    fn signed_headers(secret: &WebhookSecret, body: &[u8], age: i64) -> (String, String) {
        let timestamp = (NOW - age).to_string();
        let signature = sign(secret, &timestamp, body);
        (timestamp, signature)
    }

    fn verify_at_now(
        body: &[u8],
        timestamp: &str,
        signature: &str,
        secret: &WebhookSecret,
    ) -> VerificationOutcome {
        verify(body, Some(timestamp), Some(signature), secret, NOW, TOLERANCE)
    }

    // ============ sign tests ============

    #[test]
    fn test_sign_produces_v1_prefixed_lowercase_hex() {
        let signature = sign(&secret("s3cr3t"), "1700000000", b"{}");
        let digest = signature.strip_prefix("v1=").expect("v1= prefix");
        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_sign_matches_manual_hmac_over_timestamp_dot_body() {
        let body = br#"{"type":"payment.succeeded","id":"evt_1"}"#;
        let timestamp = "1700000000";

        let mut mac = HmacSha256::new_from_slice(b"s3cr3t").unwrap();
        mac.update(format!("{}.", timestamp).as_bytes());
        mac.update(body);
        let expected = format!("v1={}", hex::encode(mac.finalize().into_bytes()));

        assert_eq!(sign(&secret("s3cr3t"), timestamp, body), expected);
    }

    // ============ constant_time_compare tests ============

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare(&[], &[]));
        assert!(constant_time_compare(b"v1=abc", b"v1=abc"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare(b"v1=abc", b"v1=abd"));
        assert!(!constant_time_compare(b"v1=abc", b"v1=ab"));
        assert!(!constant_time_compare(b"", b"v1="));
    }

    // ============ verify tests ============

    #[test]
    fn test_valid_signature() {
        let secret = secret("s3cr3t");
        let body = br#"{"type":"payment.succeeded","id":"evt_1"}"#;
        let (timestamp, signature) = signed_headers(&secret, body, 0);

        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret),
            VerificationOutcome::Valid
        );
    }

    #[test]
    fn test_verify_is_deterministic() {
        let secret = secret("s3cr3t");
        let body = b"payload";
        let (timestamp, signature) = signed_headers(&secret, body, 10);

        let first = verify_at_now(body, &timestamp, &signature, &secret);
        for _ in 0..10 {
            assert_eq!(verify_at_now(body, &timestamp, &signature, &secret), first);
        }
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let secret = secret("s3cr3t");
        let body = b"boundary";

        let (timestamp, signature) = signed_headers(&secret, body, 300);
        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret),
            VerificationOutcome::Valid
        );

        let (timestamp, signature) = signed_headers(&secret, body, 301);
        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret),
            VerificationOutcome::StaleTimestamp
        );
    }

    #[test]
    fn test_future_timestamps_use_the_same_window() {
        let secret = secret("s3cr3t");
        let body = b"future";

        let (timestamp, signature) = signed_headers(&secret, body, -300);
        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret),
            VerificationOutcome::Valid
        );

        let (timestamp, signature) = signed_headers(&secret, body, -301);
        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret),
            VerificationOutcome::StaleTimestamp
        );
    }

    #[test]
    fn test_stale_overrides_valid_signature() {
        let secret = secret("s3cr3t");
        let body = b"replayed";
        let (timestamp, signature) = signed_headers(&secret, body, 400);

        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret),
            VerificationOutcome::StaleTimestamp
        );
    }

    #[test]
    fn test_stale_is_reported_before_signature_mismatch() {
        let timestamp = (NOW - 400).to_string();
        let forged = sign(&secret("not-the-secret"), &timestamp, b"replayed");
        let secret = secret("s3cr3t");

        assert_eq!(
            verify_at_now(b"replayed", &timestamp, &forged, &secret),
            VerificationOutcome::StaleTimestamp
        );
        assert_eq!(
            verify_at_now(b"replayed", &timestamp, "v1=garbage", &secret),
            VerificationOutcome::StaleTimestamp
        );
    }

    #[test]
    fn test_flipping_any_body_byte_invalidates_signature() {
        let secret = secret("s3cr3t");
        let body = br#"{"type":"payment.succeeded","id":"evt_1"}"#.to_vec();
        let (timestamp, signature) = signed_headers(&secret, &body, 0);

        for i in 0..body.len() {
            let mut tampered = body.clone();
            tampered[i] ^= 0x01;
            assert_eq!(
                verify_at_now(&tampered, &timestamp, &signature, &secret),
                VerificationOutcome::InvalidSignature,
                "byte {} flipped",
                i
            );
        }
    }

    #[test]
    fn test_signature_is_bound_to_exact_timestamp_string() {
        let secret = secret("s3cr3t");
        let body = b"payload";
        let (timestamp, signature) = signed_headers(&secret, body, 0);

        // Same instant, different spelling.
        let respelled = format!("+{}", timestamp);
        assert_eq!(
            verify_at_now(body, &respelled, &signature, &secret),
            VerificationOutcome::InvalidSignature
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let body = b"payload";
        let (timestamp, signature) = signed_headers(&secret("secret1"), body, 0);

        assert_eq!(
            verify_at_now(body, &timestamp, &signature, &secret("secret2")),
            VerificationOutcome::InvalidSignature
        );
    }

    #[test]
    fn test_malformed_signature_values_are_invalid() {
        let secret = secret("s3cr3t");
        let body = b"payload";
        let (timestamp, signature) = signed_headers(&secret, body, 0);
        let bare_digest = signature.trim_start_matches("v1=").to_string();
        let uppercase = signature.to_uppercase();

        for candidate in ["", "v1=", "not-a-signature", &bare_digest, &uppercase] {
            assert_eq!(
                verify_at_now(body, &timestamp, candidate, &secret),
                VerificationOutcome::InvalidSignature,
                "candidate {:?}",
                candidate
            );
        }
    }

    #[test]
    fn test_missing_headers_are_malformed() {
        let secret = secret("s3cr3t");
        let body = b"payload";
        let (timestamp, signature) = signed_headers(&secret, body, 0);

        assert_eq!(
            verify(body, None, Some(&signature), &secret, NOW, TOLERANCE),
            VerificationOutcome::MalformedHeaders
        );
        assert_eq!(
            verify(body, Some(&timestamp), None, &secret, NOW, TOLERANCE),
            VerificationOutcome::MalformedHeaders
        );
        assert_eq!(
            verify(body, None, None, &secret, NOW, TOLERANCE),
            VerificationOutcome::MalformedHeaders
        );
    }

    #[test]
    fn test_unparsable_timestamp_is_malformed() {
        let secret = secret("s3cr3t");
        let body = b"payload";

        for timestamp in ["", "abc", "17e8", " 1700000000", "1700000000.5", "99999999999999999999"] {
            let signature = sign(&secret, timestamp, body);
            assert_eq!(
                verify_at_now(body, timestamp, &signature, &secret),
                VerificationOutcome::MalformedHeaders,
                "timestamp {:?}",
                timestamp
            );
        }
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let secret = secret("s3cr3t");
        let body = b"payload";

        for timestamp in [i64::MIN.to_string(), i64::MAX.to_string()] {
            let signature = sign(&secret, &timestamp, body);
            assert_eq!(
                verify_at_now(body, &timestamp, &signature, &secret),
                VerificationOutcome::StaleTimestamp
            );
        }
    }

    #[test]
    fn test_valid_against_wall_clock() {
        let secret = secret("s3cr3t");
        let body = br#"{"type":"payment.succeeded","id":"evt_1"}"#;
        let now = chrono::Utc::now().timestamp();
        let timestamp = now.to_string();
        let signature = sign(&secret, &timestamp, body);

        assert_eq!(
            verify(
                body,
                Some(&timestamp),
                Some(&signature),
                &secret,
                now,
                TOLERANCE
            ),
            VerificationOutcome::Valid
        );
    }
}
