//! The shared signing secret and the seam that supplies it per request.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{secret_error, Error, SecretErrorKind};

/// Value shipped in sample configuration. A deployment still using it has not
/// been provisioned with a real secret.
pub const PLACEHOLDER_SECRET: &str = "whsec_your_secret_here";

/// Shared secret used to sign webhook notifications.
///
/// The value is read-only after construction and is never printed: `Debug`
/// is redacted and there is no `Display`.
#[derive(Clone)]
pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    /// Wraps a configured secret, rejecting an empty value.
    pub fn new(secret: SecretString) -> Result<Self, Error> {
        if secret.expose_secret().is_empty() {
            return Err(secret_error(
                SecretErrorKind::Empty,
                "Webhook secret must not be empty",
            ));
        }
        Ok(Self(secret))
    }

    /// `true` when the secret is the sample placeholder rather than a provisioned value.
    pub fn is_placeholder(&self) -> bool {
        self.0.expose_secret() == PLACEHOLDER_SECRET
    }

    pub(crate) fn expose_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret([REDACTED])")
    }
}

/// Supplies the secret to use for the current request.
///
/// The adapter asks for the secret on every call, so an implementation backed
/// by a rotating store takes effect without restarting the receiver.
pub trait SecretSource: Send + Sync {
    fn current_secret(&self) -> Result<WebhookSecret, Error>;
}

/// A source that always returns the secret provisioned at startup.
pub struct StaticSecretSource {
    secret: WebhookSecret,
}

impl StaticSecretSource {
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }
}

impl SecretSource for StaticSecretSource {
    fn current_secret(&self) -> Result<WebhookSecret, Error> {
        Ok(self.secret.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let err = WebhookSecret::new(secret("")).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Secret(SecretErrorKind::Empty));
    }

    #[test]
    fn test_placeholder_is_detected() {
        let placeholder = WebhookSecret::new(secret(PLACEHOLDER_SECRET)).unwrap();
        assert!(placeholder.is_placeholder());

        let real = WebhookSecret::new(secret("s3cr3t")).unwrap();
        assert!(!real.is_placeholder());
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let value = WebhookSecret::new(secret("s3cr3t")).unwrap();
        let printed = format!("{:?}", value);
        assert!(!printed.contains("s3cr3t"));
        assert_eq!(printed, "WebhookSecret([REDACTED])");
    }

    #[test]
    fn test_static_source_returns_provisioned_secret() {
        let source = StaticSecretSource::new(WebhookSecret::new(secret("s3cr3t")).unwrap());
        let current = source.current_secret().unwrap();
        assert_eq!(current.expose_bytes(), b"s3cr3t");
    }
}
