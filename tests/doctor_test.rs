//! Integration tests for `cdiml doctor`
//!
//! Doctor probes the real host for Python, Quarto, and Git, so most of
//! these assertions are deliberately loose about pass/fail. The
//! fake-interpreter tests pin down the required checks hermetically.

mod common;

use common::TestWorkspace;

#[test]
fn test_doctor_runs_and_produces_output() {
    let workspace = TestWorkspace::new();

    let output = workspace
        .cdiml()
        .arg("doctor")
        .output()
        .expect("Failed to execute cdiml doctor");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    // Doctor may pass or report issues depending on the host; it must
    // not crash and must say something either way
    assert!(
        !stdout.is_empty() || !stderr.is_empty(),
        "doctor produced no output"
    );
}

#[test]
fn test_doctor_checks_interpreter_and_book_tooling() {
    let workspace = TestWorkspace::new();

    let output = workspace
        .cdiml()
        .arg("doctor")
        .output()
        .expect("Failed to execute cdiml doctor");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{stdout}{stderr}");

    assert!(combined.contains("Python"));
    assert!(combined.contains("Quarto"));
}

#[test]
fn test_doctor_reports_missing_manifest_as_workspace_issue() {
    let workspace = TestWorkspace::new();

    let output = workspace
        .cdiml()
        .arg("doctor")
        .output()
        .expect("Failed to execute cdiml doctor");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("requirements.txt"));
}

#[test]
fn test_doctor_json_output_shape() {
    let workspace = TestWorkspace::new();
    workspace.create_file("requirements.txt", "numpy==1.26.0\n");

    let output = workspace
        .cdiml()
        .args(["--json", "doctor"])
        .output()
        .expect("Failed to execute cdiml doctor");

    // Valid JSON regardless of which host tools are present
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("doctor --json did not emit valid JSON");

    assert!(report["checks"].as_array().is_some());
    assert!(report["total_count"].as_u64().unwrap() >= 4);
    assert_eq!(report["workspace_issues"].as_array().unwrap().len(), 0);
}

#[cfg(unix)]
#[test]
fn test_doctor_passes_with_fake_interpreter() {
    let workspace = TestWorkspace::new();
    workspace.create_file("requirements.txt", "numpy==1.26.0\n");
    let fake = common::install_fake_python(&workspace.path());

    let output = workspace
        .cdiml()
        .args(["--json", "doctor", "--python"])
        .arg(&fake)
        .output()
        .expect("Failed to execute cdiml doctor");

    // Required checks (interpreter, venv modules) pass against the
    // fake; only the optional tools may be missing
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("doctor --json did not emit valid JSON");

    let checks = report["checks"].as_array().unwrap();
    for check in checks {
        if check["required"].as_bool().unwrap() {
            assert!(
                check["passed"].as_bool().unwrap(),
                "required check failed: {check}"
            );
        }
    }
}

#[cfg(unix)]
#[test]
fn test_doctor_quiet_mode_fails_on_missing_interpreter() {
    let workspace = TestWorkspace::new();

    let output = workspace
        .cdiml()
        .args(["--quiet", "doctor", "--python", "/nonexistent/interpreter"])
        .output()
        .expect("Failed to execute cdiml doctor");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing required"));
}
