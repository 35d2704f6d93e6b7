//! Command lines for creating and inspecting environments.

use std::path::{Path, PathBuf};

use super::runner::ToolInvocation;
use super::ProvisionRequest;
use crate::tool::ToolKind;

fn base(request: &ProvisionRequest) -> ToolInvocation {
    let invocation = ToolInvocation::new(&request.executable, &request.project);
    match request.kind {
        ToolKind::Pipenv => invocation
            .env("PIPENV_YES", "1")
            .env("PIPENV_NOSPIN", "1"),
        ToolKind::Poetry => invocation.env("POETRY_VIRTUALENVS_CREATE", "true"),
    }
}

/// Invocations that create the environment, in order.
///
/// `poetry_init` adds `poetry init` first; it is ignored for pipenv.
pub fn creation_steps(request: &ProvisionRequest, poetry_init: bool) -> Vec<ToolInvocation> {
    let base_interpreter = request
        .base_interpreter
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());

    match request.kind {
        ToolKind::Pipenv => {
            let mut args: Vec<&str> = Vec::new();
            if let Some(python) = base_interpreter {
                args.extend(["--python", python]);
            }
            if request.install_from_lock_file {
                args.extend(["install", "--dev"]);
            } else if args.is_empty() {
                args.push("install");
            }
            vec![base(request).args(args)]
        }
        ToolKind::Poetry => {
            let mut steps = Vec::new();
            if poetry_init {
                steps.push(base(request).args(["init", "--no-interaction"]));
            }
            if let Some(python) = base_interpreter {
                steps.push(base(request).args(["env", "use", python, "--no-interaction"]));
            }
            if request.install_from_lock_file {
                steps.push(base(request).args(["install", "--no-interaction"]));
            }
            steps
        }
    }
}

/// Invocation that reports the environment's location.
pub fn introspection(request: &ProvisionRequest) -> ToolInvocation {
    match request.kind {
        ToolKind::Pipenv => base(request).args(["--py"]),
        ToolKind::Poetry => base(request).args(["env", "info", "-p"]),
    }
}

/// Interpreter path named by introspection output.
///
/// Uses the last non-blank line; tools sometimes print notices first.
/// Pipenv prints the interpreter, poetry the environment directory.
pub fn interpreter_from_output(kind: ToolKind, project: &Path, stdout: &str) -> Option<PathBuf> {
    let line = stdout.lines().map(str::trim).rfind(|l| !l.is_empty())?;
    let reported = project.join(line);
    Some(match kind {
        ToolKind::Pipenv => reported,
        ToolKind::Poetry => venv_python(&reported),
    })
}

/// Python executable inside a virtual environment directory.
///
/// Falls back to `bin/python3` when `bin/python` is missing; when neither
/// exists the primary path is returned so the caller can report it.
pub fn venv_python(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        return venv.join("Scripts").join("python.exe");
    }
    let primary = venv.join("bin").join("python");
    if primary.is_file() {
        return primary;
    }
    let fallback = venv.join("bin").join("python3");
    if fallback.is_file() {
        fallback
    } else {
        primary
    }
}
