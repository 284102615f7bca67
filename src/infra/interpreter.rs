//! Base interpreter discovery
//!
//! Resolves the Python interpreter used to create the isolated
//! environment and probes its version. The interpreter is selected by
//! the `--python` flag or `CDIML_PYTHON`, defaulting to `python3`.

use std::path::{Path, PathBuf};

use semver::Version;

use crate::config::defaults::MIN_PYTHON_VERSION;
use crate::error::InterpreterError;

/// A resolved base interpreter
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Program name or path as requested
    pub program: String,
    /// Absolute path the program resolved to
    pub path: PathBuf,
    /// Probed version, if `--version` output could be parsed
    pub version: Option<Version>,
}

impl Interpreter {
    /// Whether the probed version satisfies the course minimum.
    ///
    /// An unprobeable version is not treated as too old; pip and venv
    /// will surface real incompatibilities themselves.
    pub fn meets_minimum(&self) -> bool {
        match &self.version {
            Some(version) => version >= &minimum_version(),
            None => true,
        }
    }
}

/// The minimum interpreter version the course supports
pub fn minimum_version() -> Version {
    // MIN_PYTHON_VERSION is a compile-time constant; parsing it cannot fail
    Version::parse(MIN_PYTHON_VERSION).unwrap_or_else(|_| Version::new(3, 9, 0))
}

/// Resolve an interpreter program name (or path) to an executable.
pub fn resolve(program: &str) -> Result<Interpreter, InterpreterError> {
    let path = which::which(program).map_err(|_| InterpreterError::NotFound {
        program: program.to_string(),
    })?;

    tracing::debug!(program, path = %path.display(), "resolved base interpreter");

    let version = probe_version(&path);

    Ok(Interpreter {
        program: program.to_string(),
        path,
        version,
    })
}

/// Run `<interpreter> --version` and parse the reported version.
pub fn probe_version(path: &Path) -> Option<Version> {
    let output = std::process::Command::new(path)
        .arg("--version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    // Python 2 printed the version on stderr, Python 3 on stdout
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{stdout}{stderr}");
    parse_version(&combined)
}

/// Extract a semver version from `--version` output like "Python 3.11.4".
fn parse_version(output: &str) -> Option<Version> {
    let version_regex = regex::Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
    let caps = version_regex.captures(output)?;

    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    Some(Version::new(major, minor, patch))
}
