//! Virtual environment layout
//!
//! Path arithmetic for the isolated environment the provisioner creates,
//! plus the explicit activation environment attached to commands that
//! must run "inside" it. Activation never mutates the invoking shell; it
//! is a variable map scoped to the subprocesses of one run.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Path view of an isolated environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    /// Create a view rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Environment root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// The environment's own interpreter
    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("python.exe")
        } else {
            self.bin_dir().join("python")
        }
    }

    /// The activation script a user sources in future sessions
    pub fn activate_script(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("activate.bat")
        } else {
            self.bin_dir().join("activate")
        }
    }

    /// Whether the environment exists on disk.
    ///
    /// `pyvenv.cfg` is the marker venv itself writes; a bare directory
    /// does not count.
    pub fn exists(&self) -> bool {
        self.root.join("pyvenv.cfg").exists()
    }

    /// Variables that place a subprocess inside this environment.
    ///
    /// Mirrors what `bin/activate` exports: `VIRTUAL_ENV` plus the
    /// environment's bin directory prepended to `PATH`.
    pub fn activation_env(&self) -> Vec<(String, OsString)> {
        let mut search_path = vec![self.bin_dir()];
        if let Some(existing) = env::var_os("PATH") {
            search_path.extend(env::split_paths(&existing));
        }
        let joined = env::join_paths(search_path)
            .unwrap_or_else(|_| self.bin_dir().into_os_string());

        vec![
            ("VIRTUAL_ENV".to_string(), self.root.clone().into_os_string()),
            ("PATH".to_string(), joined),
        ]
    }
}
