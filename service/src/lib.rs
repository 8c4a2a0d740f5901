//! Infrastructure concerns shared by the receiver binary and the web layer:
//! configuration loading, console logging and the state handed to every
//! request handler.

use config::Config;
use events::EventPublisher;
use std::sync::Arc;
use webhook_auth::{Error as AuthError, SecretSource, WebhookSecret};

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    secret_source: Arc<dyn SecretSource>,
    event_publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(
        app_config: Config,
        secret_source: Arc<dyn SecretSource>,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            config: app_config,
            secret_source,
            event_publisher: Arc::new(event_publisher),
        }
    }

    /// Looks the signing secret up again on every call so a rotated secret
    /// takes effect on the next request.
    pub fn current_secret(&self) -> Result<WebhookSecret, AuthError> {
        self.secret_source.current_secret()
    }

    pub fn event_publisher(&self) -> &EventPublisher {
        self.event_publisher.as_ref()
    }

    pub fn set_secret_source(&mut self, secret_source: Arc<dyn SecretSource>) {
        self.secret_source = secret_source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use webhook_auth::StaticSecretSource;

    fn secret(value: &str) -> WebhookSecret {
        WebhookSecret::new(SecretString::from(value.to_string())).unwrap()
    }

    #[test]
    fn test_current_secret_follows_the_configured_source() {
        let mut app_state = AppState::new(
            Config::default(),
            Arc::new(StaticSecretSource::new(secret("first"))),
            EventPublisher::new(),
        );
        assert!(app_state.current_secret().is_ok());

        app_state.set_secret_source(Arc::new(StaticSecretSource::new(secret("second"))));
        let cloned = app_state.clone();
        assert!(format!("{:?}", cloned.current_secret().unwrap()).contains("REDACTED"));
    }
}
