//! Executable validation.
//!
//! Checks run in a fixed order and stop at the first failure, so an
//! outcome never carries more than one problem.

use std::path::{Path, PathBuf};

use crate::error::EnvlinkError;
use crate::locator::ExecutableCandidate;
use crate::tool::ToolKind;

/// Result of validating a located executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The executable exists, is a regular file and may be executed.
    Valid,
    /// Nothing exists at the path.
    NotFound(PathBuf),
    /// The path exists but is a directory, a special file, or lacks the execute bit.
    NotExecutable(PathBuf),
    /// No executable was located at all.
    NoCandidate,
}

impl ValidationOutcome {
    /// Whether provisioning may use the executable.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Convert a failed outcome into the matching error.
    pub fn to_error(&self, tool: ToolKind) -> Option<EnvlinkError> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::NotFound(path) => {
                Some(EnvlinkError::PathNotFound { path: path.clone() })
            }
            ValidationOutcome::NotExecutable(path) => {
                Some(EnvlinkError::PathNotExecutable { path: path.clone() })
            }
            ValidationOutcome::NoCandidate => Some(EnvlinkError::NoCandidateFound { tool }),
        }
    }

    /// Human-readable message for a failed outcome, `None` when valid.
    pub fn message(&self, tool: ToolKind) -> Option<String> {
        self.to_error(tool).map(|e| e.to_string())
    }

    /// `Ok(())` when valid, otherwise the matching error.
    pub fn into_result(self, tool: ToolKind) -> crate::error::Result<()> {
        match self.to_error(tool) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Validate a located executable.
///
/// Pure apart from filesystem metadata reads: calling it twice on an
/// unchanged path yields the same outcome.
pub fn validate(candidate: Option<&ExecutableCandidate>) -> ValidationOutcome {
    let Some(candidate) = candidate else {
        return ValidationOutcome::NoCandidate;
    };
    let path = candidate.path();

    if !path.exists() {
        return ValidationOutcome::NotFound(path.to_path_buf());
    }

    if !path.is_file() || !is_executable(path) {
        return ValidationOutcome::NotExecutable(path.to_path_buf());
    }

    ValidationOutcome::Valid
}
