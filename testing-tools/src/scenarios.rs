use anyhow::Result;
use colored::*;
use serde_json::json;
use std::time::Instant;
use uuid::Uuid;

use crate::api_client::WebhookClient;
use crate::output::{print_delivery, TestResult};

/// How far outside the receiver's default freshness window stale deliveries are dated.
const STALE_AGE_SECS: i64 = 400;

fn banner(title: &str) {
    println!("\n{}", format!("=== TEST: {title} ===").bright_cyan().bold());
}

fn standard_event_body() -> String {
    json!({
        "id": format!("evt_{}", Uuid::new_v4().simple()),
        "type": "payment.succeeded",
        "created": chrono::Utc::now().timestamp(),
        "data": { "amount": 4200, "currency": "usd" }
    })
    .to_string()
}

pub async fn test_standard_event(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("Signed Standard Event");

    println!("{} Sending signed payment.succeeded event...", "→".blue());
    let delivery = client.send_signed(&standard_event_body()).await?;
    print_delivery(&delivery);

    Ok(TestResult::check(
        "standard_event",
        &delivery,
        200,
        Some("OK"),
        start,
    ))
}

pub async fn test_verification_token(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("Verification Token Handshake");

    let token = format!("tok_{}", Uuid::new_v4().simple());
    let body = json!({ "type": "webhook.verification", "verification_token": token }).to_string();

    println!("{} Sending unsigned webhook.verification request...", "→".blue());
    let delivery = client.send_unsigned(&body).await?;
    print_delivery(&delivery);

    let expected = format!(r#"{{"verification_token": "{token}"}}"#);
    Ok(TestResult::check(
        "verification_token",
        &delivery,
        200,
        Some(&expected),
        start,
    ))
}

pub async fn test_url_verification(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("URL Verification Challenge");

    let challenge = Uuid::new_v4().simple().to_string();
    let body = json!({ "type": "url_verification", "challenge": challenge }).to_string();

    println!("{} Sending unsigned url_verification request...", "→".blue());
    let delivery = client.send_unsigned(&body).await?;
    print_delivery(&delivery);

    let expected = format!(r#"{{"challenge": "{challenge}"}}"#);
    Ok(TestResult::check(
        "url_verification",
        &delivery,
        200,
        Some(&expected),
        start,
    ))
}

pub async fn test_tampered_body(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("Tampered Body");

    let original = standard_event_body();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = client.sign(&timestamp, &original);
    let tampered = original.replace("4200", "9999");

    println!(
        "{} Sending body altered after signing (amount 4200 -> 9999)...",
        "→".blue()
    );
    let delivery = client
        .send_with_signature(&tampered, &timestamp, &signature)
        .await?;
    print_delivery(&delivery);

    Ok(TestResult::check(
        "tampered_body",
        &delivery,
        401,
        Some("Invalid signature"),
        start,
    ))
}

pub async fn test_stale_timestamp(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("Stale Timestamp");

    let timestamp = chrono::Utc::now().timestamp() - STALE_AGE_SECS;
    println!(
        "{} Sending event signed {}s ago...",
        "→".blue(),
        STALE_AGE_SECS
    );
    let delivery = client
        .send_signed_at(&standard_event_body(), timestamp)
        .await?;
    print_delivery(&delivery);

    Ok(TestResult::check(
        "stale_timestamp",
        &delivery,
        401,
        Some("Request timestamp too old"),
        start,
    ))
}

pub async fn test_malformed_payload(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("Malformed Payload");

    println!("{} Sending correctly signed non-JSON body...", "→".blue());
    let delivery = client.send_signed("this is not json").await?;
    print_delivery(&delivery);

    Ok(TestResult::check(
        "malformed_payload",
        &delivery,
        400,
        Some("Invalid payload"),
        start,
    ))
}

pub async fn test_missing_headers(client: &WebhookClient) -> Result<TestResult> {
    let start = Instant::now();
    banner("Missing Signature Headers");

    println!("{} Sending standard event without signature headers...", "→".blue());
    let delivery = client.send_unsigned(&standard_event_body()).await?;
    print_delivery(&delivery);

    Ok(TestResult::check(
        "missing_headers",
        &delivery,
        401,
        Some("Missing signature headers"),
        start,
    ))
}
