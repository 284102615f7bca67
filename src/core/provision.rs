//! Provisioning steps and the fail-fast driver
//!
//! The bootstrap is an explicit ordered list of typed steps. Each step is
//! planned as data (program, arguments, environment) before anything
//! runs, and the driver executes them in order, halting on the first
//! failure with an error naming the failing step. Step subprocesses
//! inherit stdout/stderr so their diagnostics reach the user verbatim.
//!
//! The chain is strictly linear:
//! create-env -> upgrade-installer -> install-requirements -> register-kernel.
//! There are no retries and no recovery; a failed run is re-done from
//! scratch by running setup again.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::defaults::{ENV_DIR, KERNEL_DISPLAY_NAME, KERNEL_NAME, REQUIREMENTS_FILE};
use crate::error::{FilesystemError, ProvisionError};
use crate::infra::{filesystem, venv::VirtualEnv};

/// The provisioning steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Create the isolated environment with `python -m venv`
    CreateEnv,
    /// Upgrade the environment's pip to its latest version
    UpgradeInstaller,
    /// Install every manifest entry into the environment
    InstallRequirements,
    /// Register the environment as a user-level Jupyter kernel
    RegisterKernel,
}

impl StepKind {
    /// All steps in execution order
    pub const ALL: [StepKind; 4] = [
        StepKind::CreateEnv,
        StepKind::UpgradeInstaller,
        StepKind::InstallRequirements,
        StepKind::RegisterKernel,
    ];

    /// Stable identifier used in errors and logs
    pub fn name(self) -> &'static str {
        match self {
            StepKind::CreateEnv => "create-env",
            StepKind::UpgradeInstaller => "upgrade-installer",
            StepKind::InstallRequirements => "install-requirements",
            StepKind::RegisterKernel => "register-kernel",
        }
    }

    /// Progress line shown before the step runs
    pub fn describe(self) -> &'static str {
        match self {
            StepKind::CreateEnv => "Creating virtual environment",
            StepKind::UpgradeInstaller => "Upgrading pip",
            StepKind::InstallRequirements => "Installing requirements",
            StepKind::RegisterKernel => "Registering Jupyter kernel",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a provisioning run needs, resolved up front
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Workspace root the bootstrap runs in
    pub workspace: PathBuf,
    /// Resolved base interpreter used to create the environment
    pub interpreter: PathBuf,
    /// The environment being provisioned
    pub env: VirtualEnv,
    /// Path of the dependency manifest
    pub requirements: PathBuf,
    /// Internal kernel identifier
    pub kernel_name: String,
    /// Kernel display label
    pub kernel_display_name: String,
}

impl ProvisionConfig {
    /// Standard configuration for a workspace: fixed environment
    /// directory, manifest path, and kernel identity.
    pub fn new(workspace: &Path, interpreter: PathBuf) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            interpreter,
            env: VirtualEnv::new(workspace.join(ENV_DIR)),
            requirements: workspace.join(REQUIREMENTS_FILE),
            kernel_name: KERNEL_NAME.to_string(),
            kernel_display_name: KERNEL_DISPLAY_NAME.to_string(),
        }
    }
}

/// One planned step: the subprocess to run and the explicit environment
/// it runs under. Activation is data here, not shell state.
#[derive(Debug, Clone)]
pub struct PlannedStep {
    /// Which step this is
    pub kind: StepKind,
    /// Program to execute
    pub program: PathBuf,
    /// Arguments to pass
    pub args: Vec<OsString>,
    /// Extra environment variables layered over the inherited ones
    pub env: Vec<(String, OsString)>,
}

/// Build the ordered provisioning plan for a configuration.
///
/// Pure path arithmetic: nothing runs and nothing is touched on disk.
/// The first step uses the base interpreter; every later step uses the
/// environment's own interpreter under the activation variables.
pub fn build_plan(config: &ProvisionConfig) -> Vec<PlannedStep> {
    let activation = config.env.activation_env();
    let env_python = config.env.python();

    vec![
        PlannedStep {
            kind: StepKind::CreateEnv,
            program: config.interpreter.clone(),
            args: vec![
                OsString::from("-m"),
                OsString::from("venv"),
                config.env.root().into(),
            ],
            env: Vec::new(),
        },
        PlannedStep {
            kind: StepKind::UpgradeInstaller,
            program: env_python.clone(),
            args: ["-m", "pip", "install", "--upgrade", "pip"]
                .iter()
                .map(OsString::from)
                .collect(),
            env: activation.clone(),
        },
        PlannedStep {
            kind: StepKind::InstallRequirements,
            program: env_python.clone(),
            args: vec![
                OsString::from("-m"),
                OsString::from("pip"),
                OsString::from("install"),
                OsString::from("-r"),
                config.requirements.clone().into(),
            ],
            env: activation.clone(),
        },
        PlannedStep {
            kind: StepKind::RegisterKernel,
            program: env_python,
            args: vec![
                OsString::from("-m"),
                OsString::from("ipykernel"),
                OsString::from("install"),
                OsString::from("--user"),
                OsString::from("--name"),
                OsString::from(&config.kernel_name),
                OsString::from("--display-name"),
                OsString::from(&config.kernel_display_name),
            ],
            env: activation,
        },
    ]
}

/// Remove a pre-existing environment directory so the run recreates it
/// from scratch. Returns `true` if something was removed.
pub fn reset_env_dir(config: &ProvisionConfig) -> Result<bool, FilesystemError> {
    filesystem::remove_dir_all(config.env.root())
}

/// Run one planned step to completion, blocking until the subprocess
/// exits. The subprocess inherits stdio; nothing is captured or
/// rewrapped.
pub fn run_step(workspace: &Path, step: &PlannedStep) -> Result<(), ProvisionError> {
    tracing::info!(step = step.kind.name(), program = %step.program.display(), "running step");

    let mut cmd = std::process::Command::new(&step.program);
    cmd.args(&step.args).current_dir(workspace);
    for (key, value) in &step.env {
        cmd.env(key, value);
    }

    let status = cmd.status().map_err(|e| ProvisionError::Spawn {
        step: step.kind,
        program: step.program.clone(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ProvisionError::StepFailed {
            step: step.kind,
            code: status.code(),
        });
    }

    Ok(())
}
