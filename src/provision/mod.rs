//! Environment provisioning.
//!
//! Drives the package-manager executable to create (or find) a project's
//! virtual environment and reports exactly one [`ProvisionResult`] per
//! attempt. There are no retries and no built-in timeout; a host that
//! needs to stop a slow tool sets the [`CancellationToken`].
//!
//! # Modules
//!
//! - [`commands`] - Per-tool command lines and output interpretation
//! - [`runner`] - The subprocess boundary

pub mod commands;
pub mod runner;

pub use runner::{
    CancellationToken, ProcessRunner, RunToolError, ToolInvocation, ToolOutput, ToolRunner,
};

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{EnvlinkError, Result};
use crate::tool::{PyProject, ToolKind};

/// Everything the provisioner needs for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    /// Tool to drive.
    pub kind: ToolKind,

    /// Project directory; the tool runs here.
    pub project: PathBuf,

    /// Validated tool executable.
    pub executable: PathBuf,

    /// Interpreter the new environment is based on.
    pub base_interpreter: Option<String>,

    /// Create the environment, or only locate an existing one.
    pub create_if_absent: bool,

    /// Install the project's locked dependencies after creation.
    pub install_from_lock_file: bool,
}

/// Outcome of one provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionResult {
    /// The environment exists and its interpreter is at this path.
    Created(PathBuf),
    /// The tool could not be launched or a creation step failed.
    ProcessFailure(String),
    /// The tool ran but named no interpreter.
    NoInterpreterProduced,
    /// The tool named an interpreter that is not a file.
    InterpreterFileMissing(PathBuf),
    /// The cancellation token fired while the tool was running.
    Cancelled,
}

impl ProvisionResult {
    /// Convert to the interpreter path or the matching error.
    pub fn into_result(self, kind: ToolKind, project: &Path) -> Result<PathBuf> {
        match self {
            ProvisionResult::Created(path) => Ok(path),
            ProvisionResult::ProcessFailure(message) => Err(EnvlinkError::ProcessLaunchFailure {
                tool: kind,
                project: project.to_path_buf(),
                message,
            }),
            ProvisionResult::NoInterpreterProduced => Err(EnvlinkError::NoInterpreterProduced {
                tool: kind,
                project: project.to_path_buf(),
            }),
            ProvisionResult::InterpreterFileMissing(path) => {
                Err(EnvlinkError::InterpreterFileMissing { path })
            }
            ProvisionResult::Cancelled => Err(EnvlinkError::UserCancelled {
                message: format!("{} environment setup was interrupted", kind.display_name()),
            }),
        }
    }
}

impl From<RunToolError> for ProvisionResult {
    fn from(err: RunToolError) -> Self {
        match err {
            RunToolError::Cancelled { .. } => ProvisionResult::Cancelled,
            RunToolError::Launch { .. } => ProvisionResult::ProcessFailure(err.to_string()),
        }
    }
}

/// Whether poetry needs `poetry init` before it can manage the project.
fn needs_poetry_init(project: &Path) -> std::result::Result<bool, String> {
    match PyProject::load(project) {
        Ok(Some(pyproject)) => Ok(!pyproject.has_poetry_section),
        Ok(None) => Ok(true),
        Err(e) => Err(e.to_string()),
    }
}

/// Provision the environment described by `request`.
pub fn provision(
    request: &ProvisionRequest,
    runner: &dyn ToolRunner,
    cancel: &CancellationToken,
) -> ProvisionResult {
    let executable = request.executable.display();
    let project = request.project.display();

    if request.create_if_absent {
        let poetry_init = match request.kind {
            ToolKind::Poetry => match needs_poetry_init(&request.project) {
                Ok(init) => init,
                Err(message) => {
                    warn!(
                        "Cannot read pyproject.toml for {} (executable {}): {}",
                        project, executable, message
                    );
                    return ProvisionResult::ProcessFailure(message);
                }
            },
            ToolKind::Pipenv => false,
        };

        for step in commands::creation_steps(request, poetry_init) {
            let output = match runner.run_tool(&step, cancel) {
                Ok(output) => output,
                Err(e) => {
                    warn!("{} (executable {}, base path {})", e, executable, project);
                    return e.into();
                }
            };
            if !output.success {
                let diagnostic = format!("`{}` failed: {}", step, output.diagnostic());
                warn!("{} (base path {})", diagnostic, project);
                return ProvisionResult::ProcessFailure(diagnostic);
            }
        }
    }

    let query = commands::introspection(request);
    let output = match runner.run_tool(&query, cancel) {
        Ok(output) => output,
        Err(e) => {
            warn!("{} (executable {}, base path {})", e, executable, project);
            return e.into();
        }
    };

    if !output.success {
        warn!(
            "`{}` found no environment for {}: {}",
            query,
            project,
            output.diagnostic()
        );
        return ProvisionResult::NoInterpreterProduced;
    }

    let Some(interpreter) =
        commands::interpreter_from_output(request.kind, &request.project, &output.stdout)
    else {
        warn!("`{}` printed no interpreter path for {}", query, project);
        return ProvisionResult::NoInterpreterProduced;
    };

    if !interpreter.is_file() {
        warn!(
            "Python executable {} reported by {} for {} does not exist",
            interpreter.display(),
            executable,
            project
        );
        return ProvisionResult::InterpreterFileMissing(interpreter);
    }

    debug!(
        "{} environment for {} uses {}",
        request.kind,
        project,
        interpreter.display()
    );
    ProvisionResult::Created(interpreter)
}
