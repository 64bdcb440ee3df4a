//! Configuration management module
//!
//! This module handles loading and validating application configuration
//! from environment variables and .env files, and builds AWS SDK clients.

pub mod aws;
pub mod settings;

pub use aws::{build_aws_config, AwsConfigBuilder};
pub use settings::{LogFormat, OutputFormat, Settings, DEFAULT_BEDROCK_MODEL_ID, DEFAULT_REGION};
