//! Check command implementation
//!
//! Implements `cdiml check` to validate the workspace without
//! provisioning anything.

use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::output::{is_json, print_warning, status};
use crate::core::check::check_workspace;

/// Execute the check command
pub async fn execute(workspace: &Path, python: &str) -> Result<()> {
    tracing::info!(workspace = %workspace.display(), "checking workspace");

    let report = check_workspace(workspace, python);

    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.is_provisionable() { "success" } else { "error" },
            "manifest": report.manifest.as_ref().map(|m| serde_json::json!({
                "path": m.path,
                "packages": m.package_count(),
                "pinned": m.pinned().iter().map(|(name, version)| {
                    serde_json::json!({"name": name, "version": version})
                }).collect::<Vec<_>>(),
            })),
            "manifest_issue": report.manifest_issue,
            "interpreter": report.interpreter.as_ref().map(|i| serde_json::json!({
                "program": i.program,
                "path": i.path,
                "version": i.version.as_ref().map(ToString::to_string),
            })),
            "interpreter_issue": report.interpreter_issue,
            "env_exists": report.env_exists,
            "kernel_registered": report.kernel_registered,
            "kernel_display_name": report.kernel_display_name,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&json_result).unwrap_or_default());

        if !report.is_provisionable() {
            return Err(anyhow::anyhow!("Workspace cannot be provisioned"));
        }
        return Ok(());
    }

    println!("Checking course workspace...\n");

    match (&report.manifest, &report.manifest_issue) {
        (Some(manifest), _) => {
            println!(
                "{} Requirements manifest: {} package(s) declared",
                status::SUCCESS,
                manifest.package_count()
            );
            for (name, version) in manifest.pinned() {
                println!("    {name} pinned to {version}");
            }
        }
        (None, Some(issue)) => println!("{} {issue}", status::ERROR),
        (None, None) => unreachable!("missing manifest always carries an issue"),
    }

    match (&report.interpreter, &report.interpreter_issue) {
        (Some(interp), _) => {
            let version = interp
                .version
                .as_ref()
                .map(|v| format!(" (v{v})"))
                .unwrap_or_default();
            println!(
                "{} Base interpreter: {}{version}",
                status::SUCCESS,
                interp.path.display()
            );
        }
        (None, Some(issue)) => println!("{} {issue}", status::ERROR),
        (None, None) => unreachable!("missing interpreter always carries an issue"),
    }

    if report.env_exists {
        println!(
            "{} Environment exists (setup will recreate it from scratch)",
            status::INFO
        );
    } else {
        println!("{} No environment yet", status::INFO);
    }

    if report.kernel_registered {
        let label = report
            .kernel_display_name
            .as_deref()
            .unwrap_or("<unreadable>");
        println!("{} Kernel registered: \"{label}\"", status::INFO);
    } else {
        println!("{} Kernel not registered yet", status::INFO);
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            print_warning(warning);
        }
    }

    println!();
    if report.is_provisionable() {
        println!("{} Check passed - ready to run 'cdiml setup'", status::SUCCESS);
        Ok(())
    } else {
        bail!("Check failed - fix the issues above before running 'cdiml setup'");
    }
}
