//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory standing in for a course workspace and
/// provides utilities for setting up test scenarios. Commands built
/// through [`TestWorkspace::cdiml`] get a private Jupyter data dir so
/// tests never touch the real user kernel registry.
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory for the test workspace
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Private Jupyter data directory for this workspace
    pub fn jupyter_data_dir(&self) -> PathBuf {
        self.dir.path().join(".jupyter")
    }

    /// Build a cdiml command running inside this workspace
    pub fn cdiml(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cdiml"));
        cmd.current_dir(self.dir.path());
        cmd.env("JUPYTER_DATA_DIR", self.jupyter_data_dir());
        cmd.env_remove("CDIML_PYTHON");
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample requirements manifest for testing
#[allow(dead_code)]
pub const SAMPLE_REQUIREMENTS: &str = "\
# Core stack for the course notebooks
numpy==1.26.0
pandas>=2.0
matplotlib
ipykernel==6.29.5
";

/// Install a fake Python interpreter into the workspace.
///
/// The script mimics the interpreter surface the provisioner uses:
/// `--version`, `-m venv <dir>` (creates a minimal env layout and copies
/// itself in as the env's python), and any other `-m`/`-c` invocation
/// succeeds silently. Behavior is driven by environment variables on the
/// spawned cdiml process:
///
/// - `FAKE_PY_LOG`: append each invocation's arguments to this file
/// - `FAKE_PY_FAIL_MATCH`: exit non-zero when the arguments contain this
///   substring
/// - `FAKE_PY_FAIL_CODE`: exit status used on a match (default 1)
#[cfg(unix)]
#[allow(dead_code)]
pub fn install_fake_python(dir: &std::path::Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
if [ -n "$FAKE_PY_LOG" ]; then
    echo "$@" >> "$FAKE_PY_LOG"
fi
if [ -n "$FAKE_PY_FAIL_MATCH" ]; then
    case "$*" in
        *"$FAKE_PY_FAIL_MATCH"*) exit "${FAKE_PY_FAIL_CODE:-1}" ;;
    esac
fi
case "$1" in
    --version)
        echo "Python 3.12.1"
        exit 0
        ;;
    -m)
        if [ "$2" = "venv" ]; then
            target="$3"
            mkdir -p "$target/bin"
            cp "$0" "$target/bin/python"
            chmod +x "$target/bin/python"
            printf 'home = /usr\n' > "$target/pyvenv.cfg"
        fi
        exit 0
        ;;
esac
exit 0
"#;

    let path = dir.join("fake-python");
    std::fs::write(&path, script).expect("Failed to write fake interpreter");
    let mut perms = std::fs::metadata(&path)
        .expect("Failed to stat fake interpreter")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod fake interpreter");
    path
}
