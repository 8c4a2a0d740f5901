//! Startup provisioning of the webhook signing secret.

use log::warn;
use secrecy::SecretString;
use webhook_auth::WebhookSecret;

use crate::error::{config_error, Error};

/// Turns the configured secret into a `WebhookSecret`.
///
/// An empty value is always a configuration error. The sample placeholder is
/// tolerated only when `allow_placeholder` is set (development), so a
/// production deployment that was never provisioned fails at startup instead
/// of verifying against a publicly known key.
pub fn provision(raw: SecretString, allow_placeholder: bool) -> Result<WebhookSecret, Error> {
    let secret = WebhookSecret::new(raw)?;

    if secret.is_placeholder() {
        if !allow_placeholder {
            return Err(config_error(
                "WEBHOOK_SECRET is still the placeholder value outside development",
            ));
        }
        warn!("Using the placeholder webhook secret; set WEBHOOK_SECRET before deploying");
    }

    Ok(secret)
}
