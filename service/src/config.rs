use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use webhook_auth::webhook::DEFAULT_TOLERANCE_SECS;
use webhook_auth::PLACEHOLDER_SECRET;

/// Default path the webhook endpoint is mounted at.
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::from(value.to_string()))
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The shared secret used to verify webhook signatures. Leaving the placeholder
    /// in place is only accepted in the development runtime environment.
    #[arg(
        long,
        env,
        hide_env_values = true,
        hide_default_value = true,
        default_value = PLACEHOLDER_SECRET,
        value_parser = parse_secret
    )]
    webhook_secret: SecretString,

    /// Maximum distance in seconds between a webhook's signing timestamp and now
    #[arg(long, env, default_value_t = DEFAULT_TOLERANCE_SECS)]
    pub webhook_tolerance_secs: u64,

    /// The path the webhook endpoint accepts POST requests on
    #[arg(long, env, default_value = DEFAULT_WEBHOOK_PATH)]
    webhook_path: String,

    /// Largest accepted webhook request body, in bytes
    #[arg(long, env, default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8080)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    /// Configuration from defaults and environment variables only, ignoring
    /// command line arguments.
    fn default() -> Self {
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_webhook_secret(mut self, webhook_secret: SecretString) -> Self {
        self.webhook_secret = webhook_secret;
        self
    }

    pub fn set_webhook_path(mut self, webhook_path: String) -> Self {
        self.webhook_path = webhook_path;
        self
    }

    /// Returns the configured webhook secret. Callers must not log it.
    pub fn webhook_secret(&self) -> &SecretString {
        &self.webhook_secret
    }

    pub fn webhook_path(&self) -> &str {
        &self.webhook_path
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }

    pub fn is_development(&self) -> bool {
        self.runtime_env() == RustEnv::Development
    }
}
