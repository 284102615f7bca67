//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod check;
pub mod clean;
pub mod doctor;
pub mod setup;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the course environment (default when no command given)
    Setup {
        /// Base interpreter used to create the environment
        #[arg(long, env = "CDIML_PYTHON", default_value = "python3")]
        python: String,
    },

    /// Validate the workspace without provisioning
    Check {
        /// Base interpreter that would be used
        #[arg(long, env = "CDIML_PYTHON", default_value = "python3")]
        python: String,
    },

    /// Check system dependencies
    Doctor {
        /// Base interpreter to diagnose
        #[arg(long, env = "CDIML_PYTHON", default_value = "python3")]
        python: String,
    },

    /// Remove the environment and its kernel registration
    Clean {
        /// Keep the kernel registration, remove only the environment
        #[arg(long)]
        env_only: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Setup { python } => {
                let current_dir = std::env::current_dir()?;
                setup::execute(&current_dir, &python).await
            }
            Self::Check { python } => {
                let current_dir = std::env::current_dir()?;
                check::execute(&current_dir, &python).await
            }
            Self::Doctor { python } => {
                let current_dir = std::env::current_dir().ok();
                doctor::execute(current_dir.as_deref(), &python).await
            }
            Self::Clean { env_only } => {
                let current_dir = std::env::current_dir()?;
                clean::execute(&current_dir, env_only).await
            }
        }
    }
}
