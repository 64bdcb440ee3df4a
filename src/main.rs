//! AWS SDK snippets
//!
//! Runs one snippet per invocation, e.g. `aws-snippets s3 list-buckets`.

use aws_sdk_snippets::{
    cli::{self, Cli, Context},
    config::Settings,
    logging::init_tracing,
    SnippetError,
};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Cli::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut settings);

    init_tracing(&settings.log_level, settings.log_format);

    if let Err(e) = settings.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    tracing::debug!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        region = ?settings.aws_region,
        profile = ?settings.aws_profile,
        endpoint = ?settings.endpoint_url,
        "Starting snippet"
    );

    let service = args.command.service();
    let ctx = Context::new(settings).await;

    match cli::run(args.command, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(service, &e);
            ExitCode::FAILURE
        }
    }
}

fn report(service: &str, err: &SnippetError) {
    tracing::error!(
        service,
        code = err.code(),
        kind = ?err.kind(),
        retryable = err.is_retryable(),
        error = %err,
        "Snippet failed"
    );
    eprintln!("Error: {err}");
}
