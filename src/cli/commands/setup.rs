//! CLI implementation for `cdiml setup`
//!
//! This module handles the CLI interface for provisioning the course
//! environment. The steps themselves live in
//! [`crate::core::provision`].

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{is_json, print_detail, print_info, print_success};
use crate::config::defaults::{DEFAULT_PYTHON, PYTHON_ENV_VAR};
use crate::core::manifest::Requirements;
use crate::core::provision::{self, ProvisionConfig};
use crate::error::CdimlError;
use crate::infra::interpreter;

/// Interpreter to use when clap did not parse one (bare `cdiml`)
pub fn default_python() -> String {
    std::env::var(PYTHON_ENV_VAR).unwrap_or_else(|_| DEFAULT_PYTHON.to_string())
}

/// Execute the setup command
pub async fn execute(workspace: &Path, python: &str) -> Result<()> {
    let interp = interpreter::resolve(python).map_err(CdimlError::from)?;
    tracing::info!(interpreter = %interp.path.display(), "starting provisioning run");

    let config = ProvisionConfig::new(workspace, interp.path.clone());

    // Validate the manifest before any subprocess runs
    let requirements = Requirements::load(&config.requirements).map_err(CdimlError::from)?;

    let version = interp
        .version
        .as_ref()
        .map(|v| format!(" {v}"))
        .unwrap_or_default();
    print_info(&format!(
        "Provisioning with Python{version} ({} packages declared)",
        requirements.package_count()
    ));

    if provision::reset_env_dir(&config).map_err(CdimlError::from)? {
        print_detail(&format!(
            "Removed existing environment at {}",
            config.env.root().display()
        ));
    }

    let plan = provision::build_plan(&config);
    for step in &plan {
        print_info(&format!("{}...", step.kind.describe()));
        provision::run_step(workspace, step).map_err(CdimlError::from)?;
    }

    let activate = config
        .env
        .activate_script()
        .strip_prefix(workspace)
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|_| config.env.activate_script());

    if is_json() {
        let summary = serde_json::json!({
            "status": "success",
            "environment": config.env.root(),
            "kernel_name": config.kernel_name,
            "kernel_display_name": config.kernel_display_name,
            "packages_declared": requirements.package_count(),
            "activate": format!("source {}", activate.display()),
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
        return Ok(());
    }

    print_success(&format!(
        "Environment ready: kernel '{}' registered as \"{}\"",
        config.kernel_name, config.kernel_display_name
    ));
    print_detail(&format!("Activate it with: source {}", activate.display()));

    Ok(())
}
