//! Application settings and configuration
//!
//! Settings are loaded from environment variables (and an optional `.env`
//! file) with sensible defaults. CLI flags override them afterwards.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::env;
use std::fmt;

/// Region used when neither settings nor the SDK's provider chain name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default Bedrock model used by the converse snippets
pub const DEFAULT_BEDROCK_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format: {}. Expected: pretty or json", s),
        }
    }
}

/// How snippet results are printed to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid output format: {}. Expected: text or json", s),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub output_format: OutputFormat,

    // AWS settings
    /// Explicit region; `None` defers to the SDK's provider chain
    pub aws_region: Option<String>,
    pub aws_profile: Option<String>,
    /// Custom endpoint for every client (LocalStack, DynamoDB Local, MinIO)
    pub endpoint_url: Option<String>,

    // Bedrock
    pub bedrock_model_id: String,
}

impl Settings {
    /// Load settings from environment variables with defaults
    ///
    /// Values are not validated here; callers apply their overrides first
    /// and then call [`Settings::validate`].
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let settings = Self {
            app_name: env_or_default("APP_NAME", "aws-sdk-snippets"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: env_or_default("LOG_LEVEL", "info"),
            log_format: env_or_default("LOG_FORMAT", "pretty")
                .parse()
                .context("Invalid LOG_FORMAT value")?,
            output_format: env_or_default("OUTPUT_FORMAT", "text")
                .parse()
                .context("Invalid OUTPUT_FORMAT value")?,

            aws_region: env::var("AWS_REGION").ok().filter(|r| !r.is_empty()),
            aws_profile: env::var("AWS_PROFILE").ok().filter(|p| !p.is_empty()),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok().filter(|u| !u.is_empty()),

            bedrock_model_id: env_or_default("BEDROCK_MODEL_ID", DEFAULT_BEDROCK_MODEL_ID),
        };

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if let Some(region) = &self.aws_region {
            if region.trim().is_empty() {
                anyhow::bail!("AWS region cannot be empty");
            }
        }

        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("Endpoint URL must start with http:// or https://: {}", url);
            }
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "aws-sdk-snippets".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            output_format: OutputFormat::Text,
            aws_region: None,
            aws_profile: None,
            endpoint_url: None,
            bedrock_model_id: DEFAULT_BEDROCK_MODEL_ID.to_string(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
