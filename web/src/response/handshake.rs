//! Response bodies for the two setup handshakes.
//!
//! Providers compare the echoed body byte for byte, so these are written with
//! `": "` and `", "` separators (`{"challenge": "abc"}`) rather than the
//! compact form `axum::Json` produces.

use std::io;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use log::*;
use serde::Serialize;
use serde_json::ser::Formatter;

#[derive(Debug, Serialize)]
struct VerificationTokenResponse<'a> {
    verification_token: &'a str,
}

#[derive(Debug, Serialize)]
struct ChallengeResponse<'a> {
    challenge: &'a str,
}

/// Answer to a `webhook.verification` request.
pub(crate) fn verification_token(token: &str) -> Response {
    json_response(&VerificationTokenResponse {
        verification_token: token,
    })
}

/// Answer to a `url_verification` request.
pub(crate) fn challenge(challenge: &str) -> Response {
    json_response(&ChallengeResponse { challenge })
}

fn json_response<T: Serialize>(body: &T) -> Response {
    match to_spaced_json(body) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode handshake response: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
        }
    }
}

/// Single line JSON with a space after every `:` and `,`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
