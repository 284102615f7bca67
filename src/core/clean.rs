//! Clean logic
//!
//! Removes what setup produced: the isolated environment directory and
//! the registered kernel spec. Absent artifacts are skipped, never
//! errors, so clean is safe to run repeatedly.

use std::path::{Path, PathBuf};

use crate::config::defaults::{ENV_DIR, KERNEL_NAME};
use crate::error::CdimlError;
use crate::infra::{filesystem, kernelspec, venv::VirtualEnv};

/// One artifact removed by clean
#[derive(Debug)]
pub struct RemovedArtifact {
    /// Short label for reporting
    pub label: String,
    /// Path that was removed
    pub path: PathBuf,
    /// Bytes reclaimed
    pub bytes: u64,
}

/// Result of clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Artifacts that were removed
    pub removed: Vec<RemovedArtifact>,
    /// Artifacts that didn't exist (skipped)
    pub skipped: Vec<String>,
}

/// Check whether anything remains for clean to remove
pub fn has_artifacts(workspace: &Path) -> bool {
    workspace.join(ENV_DIR).exists() || kernelspec::is_registered(KERNEL_NAME)
}

/// Remove provisioned artifacts from a workspace.
///
/// With `env_only`, the kernel registration is left in place.
pub fn clean_workspace(workspace: &Path, env_only: bool) -> Result<CleanResult, CdimlError> {
    let mut result = CleanResult::default();

    let env = VirtualEnv::new(workspace.join(ENV_DIR));
    let env_bytes = filesystem::dir_size(env.root());
    if filesystem::remove_dir_all(env.root())? {
        tracing::info!(path = %env.root().display(), "removed environment directory");
        result.removed.push(RemovedArtifact {
            label: format!("environment ({ENV_DIR}/)"),
            path: env.root().to_path_buf(),
            bytes: env_bytes,
        });
    } else {
        result.skipped.push(format!("environment ({ENV_DIR}/)"));
    }

    if env_only {
        return Ok(result);
    }

    let spec_path = kernelspec::spec_dir(KERNEL_NAME);
    let spec_bytes = filesystem::dir_size(&spec_path);
    if kernelspec::remove_spec(KERNEL_NAME)? {
        tracing::info!(path = %spec_path.display(), "removed kernel spec");
        result.removed.push(RemovedArtifact {
            label: format!("kernel spec ('{KERNEL_NAME}')"),
            path: spec_path,
            bytes: spec_bytes,
        });
    } else {
        result
            .skipped
            .push(format!("kernel spec ('{KERNEL_NAME}')"));
    }

    Ok(result)
}

/// Render a byte count for humans
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
