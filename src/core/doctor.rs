//! Doctor command logic
//!
//! Checks the host for everything the course workflow needs and reports
//! issues with suggestions. The base interpreter and its venv/ensurepip
//! modules are required; the book-rendering and versioning tools are
//! optional collaborators the setup itself never invokes.

use std::path::Path;

use crate::config::defaults::{MIN_PYTHON_VERSION, PYTHON_ENV_VAR, REQUIREMENTS_FILE};
use crate::core::manifest::Requirements;
use crate::error::ManifestError;
use crate::infra::interpreter;

/// Result of a single dependency check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the dependency being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Version if available
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether this is a required or optional dependency
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Workspace issues found
    pub workspace_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a workspace issue
    pub fn add_workspace_issue(&mut self, issue: String) {
        self.workspace_issues.push(issue);
    }

    /// Check if all checks passed (including optional)
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.workspace_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Check if a command is available in PATH, returning its version
pub fn check_command_available(command: &str) -> Option<String> {
    std::process::Command::new(command)
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let combined = format!("{stdout}{stderr}");
                extract_version(&combined)
            } else {
                None
            }
        })
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check the base Python interpreter
pub fn check_python(program: &str) -> CheckResult {
    let label = format!("Python interpreter ({program})");

    let interp = match interpreter::resolve(program) {
        Ok(interp) => interp,
        Err(e) => {
            return CheckResult::fail(
                &label,
                &e.to_string(),
                Some(&format!(
                    "Install Python {MIN_PYTHON_VERSION}+ or point {PYTHON_ENV_VAR} at an existing interpreter"
                )),
                true,
            )
        }
    };

    match &interp.version {
        Some(version) if !interp.meets_minimum() => CheckResult::fail(
            &label,
            &format!("Python {version} is older than the supported minimum {MIN_PYTHON_VERSION}"),
            Some(&format!(
                "Install Python {MIN_PYTHON_VERSION}+ and set {PYTHON_ENV_VAR} to it"
            )),
            true,
        ),
        version => CheckResult::pass(&label, version.as_ref().map(ToString::to_string), true),
    }
}

/// Check that the interpreter ships venv and ensurepip.
///
/// Some distributions split these into a separate package (e.g.
/// python3-venv on Debian), so a working interpreter is not enough.
pub fn check_venv_support(program: &str) -> CheckResult {
    let name = "venv + ensurepip modules";

    let Ok(interp) = interpreter::resolve(program) else {
        return CheckResult::fail(
            name,
            "Cannot check: base interpreter not found",
            Some("Fix the interpreter check first"),
            true,
        );
    };

    let available = std::process::Command::new(&interp.path)
        .args(["-c", "import venv, ensurepip"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    if available {
        CheckResult::pass(name, None, true)
    } else {
        CheckResult::fail(
            name,
            "The interpreter cannot import venv/ensurepip",
            Some("On Debian/Ubuntu install the python3-venv package"),
            true,
        )
    }
}

/// Check Quarto availability (optional, renders the book)
pub fn check_quarto() -> CheckResult {
    match check_command_available("quarto") {
        Some(version) => CheckResult::pass("Quarto (book rendering)", Some(version), false),
        None => CheckResult::fail(
            "Quarto (book rendering)",
            "Quarto not found in PATH",
            Some("Install Quarto from https://quarto.org/docs/get-started/ to render the book (optional)"),
            false,
        ),
    }
}

/// Check Git availability (optional, used to track course work)
pub fn check_git() -> CheckResult {
    match check_command_available("git") {
        Some(version) => CheckResult::pass("Git", Some(version), false),
        None => CheckResult::fail(
            "Git",
            "Git not found in PATH",
            Some("Install Git from https://git-scm.com/ or use your package manager (optional)"),
            false,
        ),
    }
}

/// Scan the workspace for issues that would make setup fail
pub fn scan_workspace_issues(workspace: &Path) -> Vec<String> {
    let mut issues = Vec::new();
    let manifest_path = workspace.join(REQUIREMENTS_FILE);

    match Requirements::load(&manifest_path) {
        Ok(_) => {}
        Err(ManifestError::NotFound { .. }) => {
            issues.push(format!(
                "{REQUIREMENTS_FILE} not found - setup will fail before installing anything"
            ));
        }
        Err(e) => issues.push(e.to_string()),
    }

    issues
}

/// Run all doctor checks
pub fn run_doctor(python: &str, workspace: Option<&Path>) -> DoctorReport {
    let mut report = DoctorReport::new();

    // Required for provisioning
    report.add_check(check_python(python));
    report.add_check(check_venv_support(python));

    // Optional downstream tooling
    report.add_check(check_quarto());
    report.add_check(check_git());

    if let Some(dir) = workspace {
        for issue in scan_workspace_issues(dir) {
            report.add_workspace_issue(issue);
        }
    }

    report
}
