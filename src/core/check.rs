//! Check command logic
//!
//! Validates the workspace and reports what setup would do, without
//! touching anything: manifest, interpreter, current environment, and
//! kernel registration state.

use std::path::Path;

use crate::config::defaults::{ENV_DIR, KERNEL_NAME, REQUIREMENTS_FILE};
use crate::core::manifest::Requirements;
use crate::infra::interpreter::{self, Interpreter};
use crate::infra::{kernelspec, venv::VirtualEnv};

/// Result of the check operation
#[derive(Debug)]
pub struct WorkspaceReport {
    /// Parsed manifest, when present and valid
    pub manifest: Option<Requirements>,
    /// Why the manifest is unusable, when it is
    pub manifest_issue: Option<String>,
    /// Resolved base interpreter, when found
    pub interpreter: Option<Interpreter>,
    /// Why the interpreter is unusable, when it is
    pub interpreter_issue: Option<String>,
    /// Whether the isolated environment already exists
    pub env_exists: bool,
    /// Whether the course kernel is registered for the current user
    pub kernel_registered: bool,
    /// Display label of the registered kernel, when readable
    pub kernel_display_name: Option<String>,
    /// Non-fatal observations
    pub warnings: Vec<String>,
}

impl WorkspaceReport {
    /// Whether `setup` could run against this workspace
    pub fn is_provisionable(&self) -> bool {
        self.manifest.is_some() && self.interpreter.is_some()
    }
}

/// Inspect a workspace without provisioning it
pub fn check_workspace(workspace: &Path, python: &str) -> WorkspaceReport {
    let mut warnings = Vec::new();

    let (manifest, manifest_issue) = match Requirements::load(&workspace.join(REQUIREMENTS_FILE)) {
        Ok(reqs) => (Some(reqs), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let (resolved, interpreter_issue) = match interpreter::resolve(python) {
        Ok(interp) => {
            if !interp.meets_minimum() {
                if let Some(version) = &interp.version {
                    warnings.push(format!(
                        "Python {version} is older than the supported minimum {}",
                        interpreter::minimum_version()
                    ));
                }
            }
            (Some(interp), None)
        }
        Err(e) => (None, Some(e.to_string())),
    };

    let env = VirtualEnv::new(workspace.join(ENV_DIR));
    let kernel_registered = kernelspec::is_registered(KERNEL_NAME);
    let kernel_display_name = if kernel_registered {
        match kernelspec::read_spec(KERNEL_NAME) {
            Ok(spec) => Some(spec.display_name),
            Err(e) => {
                warnings.push(e.to_string());
                None
            }
        }
    } else {
        None
    };

    WorkspaceReport {
        manifest,
        manifest_issue,
        interpreter: resolved,
        interpreter_issue,
        env_exists: env.exists(),
        kernel_registered,
        kernel_display_name,
        warnings,
    }
}
