use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use uuid::Uuid;
use webhook_auth::webhook::{sign, SIGNATURE_HEADER, TIMESTAMP_HEADER, WEBHOOK_ID_HEADER};
use webhook_auth::WebhookSecret;

/// What the receiver answered.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
}

/// Posts webhook deliveries to a receiver, signing them the way a provider does.
pub struct WebhookClient {
    client: Client,
    url: String,
    secret: WebhookSecret,
}

impl WebhookClient {
    pub fn new(client: Client, base_url: &str, path: &str, secret: WebhookSecret) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
            secret,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Signs `body` with the current time.
    pub async fn send_signed(&self, body: &str) -> Result<Delivery> {
        self.send_signed_at(body, chrono::Utc::now().timestamp())
            .await
    }

    /// Signs `body` as if it had been sent at `timestamp`.
    pub async fn send_signed_at(&self, body: &str, timestamp: i64) -> Result<Delivery> {
        let timestamp = timestamp.to_string();
        let signature = sign(&self.secret, &timestamp, body.as_bytes());
        self.send_with_signature(body, &timestamp, &signature).await
    }

    pub async fn send_with_signature(
        &self,
        body: &str,
        timestamp: &str,
        signature: &str,
    ) -> Result<Delivery> {
        let request = self
            .client
            .post(&self.url)
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp)
            .header(WEBHOOK_ID_HEADER, format!("wh_{}", Uuid::new_v4()));
        self.send(request, body).await
    }

    /// Posts `body` with no signature headers at all.
    pub async fn send_unsigned(&self, body: &str) -> Result<Delivery> {
        let request = self.client.post(&self.url);
        self.send(request, body).await
    }

    pub fn sign(&self, timestamp: &str, body: &str) -> String {
        sign(&self.secret, timestamp, body.as_bytes())
    }

    async fn send(&self, request: reqwest::RequestBuilder, body: &str) -> Result<Delivery> {
        debug!("POST {} ({} bytes)", self.url, body.len());

        let response = request
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        debug!("Receiver answered {status}: {body}");

        Ok(Delivery { status, body })
    }
}
