//! Jupyter kernel registry access
//!
//! The registry itself is owned by Jupyter; registration goes through
//! `python -m ipykernel install`. This module only locates the user-level
//! registry to inspect and remove entries, honoring the same
//! `JUPYTER_DATA_DIR` override ipykernel does.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::defaults::JUPYTER_DATA_DIR_ENV;
use crate::error::KernelspecError;

/// Parsed `kernel.json` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpec {
    /// Command line Jupyter launches for this kernel
    pub argv: Vec<String>,
    /// Human-readable label shown in kernel pickers
    pub display_name: String,
    /// Kernel language
    #[serde(default)]
    pub language: String,
}

/// User-level Jupyter data directory.
///
/// `JUPYTER_DATA_DIR` wins; otherwise the platform default Jupyter uses
/// (`~/.local/share/jupyter` on Linux, `~/Library/Jupyter` on macOS).
pub fn jupyter_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os(JUPYTER_DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Jupyter"))
            .unwrap_or_else(|| PathBuf::from(".").join("jupyter"))
    } else {
        dirs::data_dir()
            .map(|d| d.join("jupyter"))
            .unwrap_or_else(|| PathBuf::from(".").join("jupyter"))
    }
}

/// Directory holding user-level kernel specs
pub fn kernels_dir() -> PathBuf {
    jupyter_data_dir().join("kernels")
}

/// Directory of one named kernel spec
pub fn spec_dir(name: &str) -> PathBuf {
    kernels_dir().join(name)
}

/// Whether a kernel with this name is registered for the current user
pub fn is_registered(name: &str) -> bool {
    spec_dir(name).join("kernel.json").exists()
}

/// Read and parse a registered kernel's `kernel.json`
pub fn read_spec(name: &str) -> Result<KernelSpec, KernelspecError> {
    let path = spec_dir(name).join("kernel.json");

    let content = std::fs::read_to_string(&path).map_err(|e| KernelspecError::Read {
        path: path.clone(),
        error: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| KernelspecError::Parse {
        path,
        error: e.to_string(),
    })
}

/// Remove a registered kernel spec.
///
/// Returns `true` if the spec existed and was removed.
pub fn remove_spec(name: &str) -> Result<bool, KernelspecError> {
    let path = spec_dir(name);
    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_dir_all(&path).map_err(|e| KernelspecError::Remove {
        path: path.clone(),
        error: e.to_string(),
    })?;
    Ok(true)
}
