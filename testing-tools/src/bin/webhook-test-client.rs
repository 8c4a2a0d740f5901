use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use secrecy::SecretString;
use std::process;

use testing_tools::api_client::WebhookClient;
use testing_tools::output::{print_test_summary, TestResult};
use testing_tools::scenarios;
use webhook_auth::WebhookSecret;

#[derive(Parser)]
#[command(name = "webhook-test-client")]
#[command(about = "Webhook Receiver Integration Testing Tool")]
struct Cli {
    /// Base URL of the receiver (e.g., http://localhost:8080)
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Path the receiver accepts webhooks on; follows the receiver's WEBHOOK_PATH
    #[arg(long, env = "WEBHOOK_PATH", default_value = "/webhook")]
    path: String,

    /// Shared secret the receiver was started with
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    secret: String,

    /// Test scenario to run
    #[arg(long, value_enum, default_value = "all")]
    scenario: ScenarioChoice,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, PartialEq)]
enum ScenarioChoice {
    /// Correctly signed standard event
    StandardEvent,
    /// Unsigned webhook.verification handshake
    VerificationToken,
    /// Unsigned url_verification challenge
    UrlVerification,
    /// Body changed after signing
    TamperedBody,
    /// Signature older than the freshness window
    StaleTimestamp,
    /// Correctly signed body that is not JSON
    MalformedPayload,
    /// Standard event with no signature headers
    MissingHeaders,
    /// Run every scenario
    All,
}

const ALL_SCENARIOS: [ScenarioChoice; 7] = [
    ScenarioChoice::StandardEvent,
    ScenarioChoice::VerificationToken,
    ScenarioChoice::UrlVerification,
    ScenarioChoice::TamperedBody,
    ScenarioChoice::StaleTimestamp,
    ScenarioChoice::MalformedPayload,
    ScenarioChoice::MissingHeaders,
];

async fn run(choice: ScenarioChoice, client: &WebhookClient) -> Result<TestResult> {
    match choice {
        ScenarioChoice::StandardEvent => scenarios::test_standard_event(client).await,
        ScenarioChoice::VerificationToken => scenarios::test_verification_token(client).await,
        ScenarioChoice::UrlVerification => scenarios::test_url_verification(client).await,
        ScenarioChoice::TamperedBody => scenarios::test_tampered_body(client).await,
        ScenarioChoice::StaleTimestamp => scenarios::test_stale_timestamp(client).await,
        ScenarioChoice::MalformedPayload => scenarios::test_malformed_payload(client).await,
        ScenarioChoice::MissingHeaders => scenarios::test_missing_headers(client).await,
        ScenarioChoice::All => bail!("`all` runs each scenario in turn"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    let secret = WebhookSecret::new(SecretString::from(cli.secret))
        .context("--secret must not be empty")?;
    let client = WebhookClient::new(reqwest::Client::new(), &cli.base_url, &cli.path, secret);
    println!("{} Targeting {}", "→".blue(), client.url());

    let selected: Vec<ScenarioChoice> = if cli.scenario == ScenarioChoice::All {
        ALL_SCENARIOS.to_vec()
    } else {
        vec![cli.scenario]
    };

    let mut results = Vec::with_capacity(selected.len());
    for choice in selected {
        results.push(run(choice, &client).await?);
    }

    print_test_summary(&results);

    if results.iter().any(|r| !r.passed) {
        process::exit(1);
    }

    Ok(())
}
