//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;
use webhook_auth::error::{Error as WebhookAuthError, ErrorKind as WebhookAuthErrorKind, SecretErrorKind};

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. Ex. `domain` is dependent on `webhook-auth`, and `web` is dependent on `domain`,
/// but `web` maps only `domain` error kinds to HTTP status codes.
///
/// Rejected webhook requests are not errors; they are `DispatchDecision::Reject` values.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// The deployment configuration is unusable (e.g. empty or placeholder secret).
    Config,
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The secret store could not supply the current secret.
    SecretStore,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `webhook-auth` layer to the `domain` layer.
impl From<WebhookAuthError> for Error {
    fn from(err: WebhookAuthError) -> Self {
        let error_kind = match &err.error_kind {
            WebhookAuthErrorKind::Secret(SecretErrorKind::Empty) => {
                DomainErrorKind::Internal(InternalErrorKind::Config)
            }
            WebhookAuthErrorKind::Secret(SecretErrorKind::Unavailable) => {
                DomainErrorKind::External(ExternalErrorKind::SecretStore)
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Helper function to create configuration errors.
pub fn config_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    }
}
