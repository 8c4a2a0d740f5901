//! Event fan-out for accepted webhook notifications.
//!
//! This crate provides the infrastructure that hands authenticated events to
//! business processing without coupling the receiver to any particular handler.
//!
//! # Architecture
//!
//! - **WebhookEvent**: Normalized standard event that passed signature verification
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (domain, web, etc.),
//! avoiding circular dependencies. Event payloads are carried as JSON values.

use async_trait::async_trait;
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A standard (non-handshake) webhook event whose signature has been verified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEvent {
    /// Provider-assigned event id from the body, when present.
    pub id: Option<String>,
    /// Event type string from the body, e.g. `payment.succeeded`.
    pub event_type: String,
    /// Delivery identifier from the `X-Webhook-Id` header, when present.
    pub webhook_id: Option<String>,
    /// Event payload; JSON `null` when the body carries no `data`.
    pub data: Value,
    /// Unix seconds at which the provider created the event, when present.
    pub created: Option<i64>,
}

/// Trait for handling accepted webhook events.
/// Implementations can perform side effects like business processing,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &WebhookEvent);
}

#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub async fn publish(&self, event: WebhookEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs the details of every accepted event.
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn handle(&self, event: &WebhookEvent) {
        info!(
            "Event details: id={} type={} webhook_id={}",
            event.id.as_deref().unwrap_or("-"),
            event.event_type,
            event.webhook_id.as_deref().unwrap_or("-"),
        );
        if let Ok(pretty) = serde_json::to_string_pretty(&event.data) {
            info!("Event data: {}", pretty);
        }
    }
}
