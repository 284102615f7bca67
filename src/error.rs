//! Error types for cdiml
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::provision::StepKind;

/// Requirements manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("Requirements file not found at '{path}'. The course workspace ships one at its root.")]
    NotFound { path: PathBuf },

    /// Manifest could not be read
    #[error("Failed to read requirements file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Manifest contains no installable entries
    #[error("Requirements file '{path}' declares no packages")]
    Empty { path: PathBuf },
}

/// Base interpreter resolution errors
#[derive(Error, Debug)]
pub enum InterpreterError {
    /// Interpreter not found on PATH (or at the given path)
    #[error("Python interpreter '{program}' not found. Install Python 3 or set CDIML_PYTHON to an existing interpreter.")]
    NotFound { program: String },
}

/// Provisioning step errors
///
/// Each variant names the step that failed so callers and tests can
/// distinguish where the fail-fast chain halted.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The step's subprocess could not be launched
    #[error("Failed to launch '{program}' for step '{step}': {error}")]
    Spawn {
        step: StepKind,
        program: PathBuf,
        error: String,
    },

    /// The step's subprocess exited with a non-zero status
    #[error("Step '{step}' failed ({})", exit_status_label(.code))]
    StepFailed { step: StepKind, code: Option<i32> },
}

/// Render a subprocess exit for error messages
fn exit_status_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Kernel registry errors
#[derive(Error, Debug)]
pub enum KernelspecError {
    /// kernel.json could not be read
    #[error("Failed to read kernel spec '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// kernel.json could not be parsed
    #[error("Failed to parse kernel spec '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Kernel spec directory could not be removed
    #[error("Failed to remove kernel spec '{path}': {error}")]
    Remove { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },
}

/// Top-level cdiml error type
#[derive(Error, Debug)]
pub enum CdimlError {
    /// Manifest error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Interpreter error
    #[error("Interpreter error: {0}")]
    Interpreter(#[from] InterpreterError),

    /// Provisioning error
    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// Kernel registry error
    #[error("Kernel registry error: {0}")]
    Kernelspec(#[from] KernelspecError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// IO error
    #[error("IO error: {source}")]
    Io { source: std::io::Error },

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

impl CdimlError {
    /// Process exit status to use for this error.
    ///
    /// A failed provisioning step propagates the subprocess's own exit
    /// status unchanged; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Provision(ProvisionError::StepFailed {
                code: Some(code), ..
            }) => *code,
            _ => 1,
        }
    }
}
