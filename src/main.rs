//! Cdiml CLI - Environment provisioner for the CDI ML course book
//!
//! Entry point for the cdiml command-line application.

use anyhow::Result;
use clap::Parser;

use cdiml::cli::output::{display_error, OutputConfig};
use cdiml::cli::Cli;
use cdiml::error::CdimlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber; -v/-vv raise the default level
    let default_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(exit_code(&e));
        }
    }
}

/// Exit status for a failed run.
///
/// A failed provisioning step propagates the subprocess's own exit
/// status unchanged; everything else exits 1.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CdimlError>()
        .map(CdimlError::exit_code)
        .unwrap_or(1)
}
