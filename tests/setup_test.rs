//! Integration tests for `cdiml setup`
//!
//! The provisioning chain is exercised against a fake interpreter so the
//! tests are hermetic: no real Python, pip, or Jupyter is needed. The
//! fake records every invocation, letting the tests assert step order
//! and fail-fast behavior.

#![cfg(unix)]

mod common;

use common::{install_fake_python, TestWorkspace, SAMPLE_REQUIREMENTS};
use predicates::prelude::*;
use std::path::PathBuf;

fn read_log(path: &PathBuf) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Helper: a workspace with a manifest and a fake interpreter installed
fn provisioned_fixture() -> (TestWorkspace, PathBuf, PathBuf) {
    let workspace = TestWorkspace::new();
    workspace.create_file("requirements.txt", SAMPLE_REQUIREMENTS);
    let fake = install_fake_python(&workspace.path());
    let log = workspace.path().join("invocations.log");
    (workspace, fake, log)
}

#[test]
fn test_setup_runs_steps_in_order() {
    let (workspace, fake, log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .arg("setup")
        .arg("--python")
        .arg(&fake)
        .env("FAKE_PY_LOG", &log)
        .output()
        .expect("Failed to execute cdiml setup");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "setup failed: {stdout}{stderr}");

    // The environment exists and was created by the fake venv module
    assert!(workspace.file_exists(".venv/pyvenv.cfg"));

    // Invocations happened in the contract's order: version probe,
    // env creation, installer upgrade, dependency install, registration
    let log_lines = read_log(&log);
    let steps: Vec<&String> = log_lines
        .iter()
        .filter(|l| l.starts_with("-m"))
        .collect();
    assert_eq!(steps.len(), 4, "unexpected step invocations: {log_lines:?}");
    assert!(steps[0].starts_with("-m venv"));
    assert!(steps[1].starts_with("-m pip install --upgrade pip"));
    assert!(steps[2].starts_with("-m pip install -r"));
    assert!(steps[2].contains("requirements.txt"));
    assert!(steps[3].starts_with("-m ipykernel install --user --name cdi-ml"));
    assert!(steps[3].contains("Python (CDI ML)"));

    // Two status lines: confirmation plus the re-activation instruction
    assert!(predicate::str::contains("Environment ready").eval(&stdout));
    assert!(predicate::str::contains("kernel 'cdi-ml'").eval(&stdout));
    assert!(predicate::str::contains("source .venv/bin/activate").eval(&stdout));
}

#[test]
fn test_setup_rerun_recreates_from_scratch() {
    let (workspace, fake, _log) = provisioned_fixture();

    let first = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .output()
        .expect("Failed to execute cdiml setup");
    assert!(first.status.success());

    // Leave a marker inside the environment; a re-run must not keep it
    workspace.create_file(".venv/stale-marker", "left over");

    let second = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .output()
        .expect("Failed to execute cdiml setup");
    assert!(second.status.success());

    assert!(!workspace.file_exists(".venv/stale-marker"));
    assert!(workspace.file_exists(".venv/pyvenv.cfg"));
}

#[test]
fn test_setup_fails_before_subprocesses_without_manifest() {
    let workspace = TestWorkspace::new();
    let fake = install_fake_python(&workspace.path());
    let log = workspace.path().join("invocations.log");

    let output = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .env("FAKE_PY_LOG", &log)
        .output()
        .expect("Failed to execute cdiml setup");

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("Requirements file not found").eval(&stderr));

    // Only the version probe may have run; no provisioning step did
    let log_lines = read_log(&log);
    assert!(
        log_lines.iter().all(|l| !l.starts_with("-m")),
        "steps ran despite missing manifest: {log_lines:?}"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Environment ready"));
}

#[test]
fn test_setup_rejects_manifest_without_packages() {
    let workspace = TestWorkspace::new();
    workspace.create_file("requirements.txt", "# nothing to install\n\n");
    let fake = install_fake_python(&workspace.path());

    let output = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .output()
        .expect("Failed to execute cdiml setup");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("declares no packages").eval(&stderr));
}

#[test]
fn test_setup_fails_at_first_step_with_missing_interpreter() {
    let workspace = TestWorkspace::new();
    workspace.create_file("requirements.txt", SAMPLE_REQUIREMENTS);

    let output = workspace
        .cdiml()
        .args(["setup", "--python", "/nonexistent/interpreter"])
        .output()
        .expect("Failed to execute cdiml setup");

    assert!(!output.status.success());
    assert!(!workspace.file_exists(".venv"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("not found").eval(&stderr));
}

#[test]
fn test_setup_propagates_installer_exit_status() {
    let (workspace, fake, log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .env("FAKE_PY_LOG", &log)
        .env("FAKE_PY_FAIL_MATCH", "--upgrade pip")
        .env("FAKE_PY_FAIL_CODE", "7")
        .output()
        .expect("Failed to execute cdiml setup");

    // The failing step's own exit status surfaces unchanged
    assert_eq!(output.status.code(), Some(7));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("upgrade-installer").eval(&stderr));

    // Nothing past the failing step ran
    let log_lines = read_log(&log);
    assert!(log_lines.iter().all(|l| !l.contains("ipykernel")));
    assert!(log_lines.iter().all(|l| !l.contains("install -r")));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Environment ready"));
}

#[test]
fn test_setup_dependency_failure_stops_before_kernel_registration() {
    let (workspace, fake, log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .env("FAKE_PY_LOG", &log)
        .env("FAKE_PY_FAIL_MATCH", "install -r")
        .env("FAKE_PY_FAIL_CODE", "9")
        .output()
        .expect("Failed to execute cdiml setup");

    assert_eq!(output.status.code(), Some(9));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("install-requirements").eval(&stderr));

    let log_lines = read_log(&log);
    assert!(
        log_lines.iter().all(|l| !l.contains("ipykernel")),
        "kernel registration ran after a failed install: {log_lines:?}"
    );
}

#[test]
fn test_setup_kernel_registration_failure_prints_no_success() {
    let (workspace, fake, _log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .args(["setup", "--python"])
        .arg(&fake)
        .env("FAKE_PY_FAIL_MATCH", "ipykernel")
        .env("FAKE_PY_FAIL_CODE", "3")
        .output()
        .expect("Failed to execute cdiml setup");

    assert_eq!(output.status.code(), Some(3));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Environment ready"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("register-kernel").eval(&stderr));
}

#[test]
fn test_bare_invocation_runs_setup_with_env_override() {
    let (workspace, fake, log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .env("CDIML_PYTHON", &fake)
        .env("FAKE_PY_LOG", &log)
        .output()
        .expect("Failed to execute cdiml");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "bare cdiml failed: {stdout}{stderr}");
    assert!(predicate::str::contains("Environment ready").eval(&stdout));
    assert!(read_log(&log).iter().any(|l| l.starts_with("-m venv")));
}

#[test]
fn test_setup_quiet_mode_suppresses_status_lines() {
    let (workspace, fake, _log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .args(["--quiet", "setup", "--python"])
        .arg(&fake)
        .output()
        .expect("Failed to execute cdiml setup");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().is_empty(), "quiet run printed: {stdout}");
}

#[test]
fn test_setup_json_summary() {
    let (workspace, fake, _log) = provisioned_fixture();

    let output = workspace
        .cdiml()
        .args(["--json", "setup", "--python"])
        .arg(&fake)
        .output()
        .expect("Failed to execute cdiml setup");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let summary: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("setup --json did not emit valid JSON");

    assert_eq!(summary["status"], "success");
    assert_eq!(summary["kernel_name"], "cdi-ml");
    assert_eq!(summary["packages_declared"], 4);
    assert!(summary["activate"]
        .as_str()
        .unwrap()
        .contains(".venv/bin/activate"));
}
