//! AWS SDK snippets library
//!
//! Thin, one-call-per-method wrappers over the AWS SDK for Rust, plus the
//! configuration, logging and CLI plumbing shared by the binaries.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use error::{Result, SnippetError};
