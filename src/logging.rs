//! Logging setup
//!
//! Diagnostics go to stderr through `tracing-subscriber`; stdout is left to
//! snippet output so it can be piped.

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogFormat;

/// Level used when the configured one does not parse
const FALLBACK_LEVEL: &str = "info";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when it is set.
pub fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(log_level));

    let json_layer = match format {
        LogFormat::Json => Some(fmt::layer().json().with_writer(io::stderr)),
        LogFormat::Pretty => None,
    };
    let pretty_layer = match format {
        LogFormat::Pretty => Some(fmt::layer().with_target(false).with_writer(io::stderr)),
        LogFormat::Json => None,
    };

    tracing_subscriber::registry()
        .with(json_layer.with_filter(filter.clone()))
        .with(pretty_layer.with_filter(filter))
        .init();
}

/// Build a filter from a level or directive string such as `debug` or
/// `aws_sdk_snippets=debug,aws_smithy_runtime=info`.
pub fn filter_for(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|err| {
        eprintln!("Invalid log level {log_level:?} ({err}), using {FALLBACK_LEVEL}");
        EnvFilter::new(FALLBACK_LEVEL)
    })
}
