//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no provisioning logic - that belongs in the
//! [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;

use commands::Commands;

/// Cdiml - Environment provisioner for the CDI ML course book
///
/// Bootstrap the isolated Python environment the course notebooks and
/// rendered book run in.
#[derive(Parser, Debug)]
#[command(name = "cdiml")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// Invoking `cdiml` with no subcommand runs setup, preserving the
    /// original one-shot bootstrap entry point.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(cmd) => cmd.run().await,
            None => {
                let current_dir = std::env::current_dir()?;
                commands::setup::execute(&current_dir, &commands::setup::default_python()).await
            }
        }
    }
}
