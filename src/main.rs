use std::process;
use std::sync::Arc;

use events::{EventPublisher, LoggingEventHandler};
use log::*;
use service::{config::Config, logging::Logger, AppState};
use webhook_auth::StaticSecretSource;

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
        process::exit(1);
    }

    info!(
        "Starting up {} in {} mode",
        env!("CARGO_PKG_NAME"),
        config.runtime_env()
    );

    // The placeholder secret is only tolerated while developing locally.
    let secret = match domain::secret::provision(
        config.webhook_secret().clone(),
        config.is_development(),
    ) {
        Ok(secret) => secret,
        Err(e) => {
            error!("Refusing to start: {e}");
            process::exit(1);
        }
    };

    info!("Webhook endpoint: POST {}", config.webhook_path());
    info!("Secret configured: {}", !secret.is_placeholder());
    info!(
        "Signature tolerance: {}s, max body: {} bytes",
        config.webhook_tolerance_secs, config.max_body_bytes
    );

    let event_publisher = EventPublisher::new().with_handler(Arc::new(LoggingEventHandler));
    let app_state = AppState::new(
        config,
        Arc::new(StaticSecretSource::new(secret)),
        event_publisher,
    );

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped with an error: {e}");
        process::exit(1);
    }
}
