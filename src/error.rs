//! Error types for envlink operations.
//!
//! This module defines [`EnvlinkError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every failure the add-environment workflow can hit has its own variant,
//!   so callers can tell "the executable is missing" from "the tool ran but
//!   produced nothing" without parsing messages
//! - None of these abort the host: the workflow ends in a failed state that
//!   carries the error, and the CLI prints it
//! - Use `anyhow::Error` (via `EnvlinkError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::tool::ToolKind;

/// Core error type for envlink operations.
#[derive(Debug, Error)]
pub enum EnvlinkError {
    /// No executable was supplied, remembered, or found on the search path.
    #[error("{tool} executable not found. Install {tool} or pass --executable")]
    NoCandidateFound { tool: ToolKind },

    /// The executable path does not exist on disk.
    #[error("File {path} not found")]
    PathNotFound { path: PathBuf },

    /// The executable path exists but cannot be executed.
    #[error("Cannot execute {path}")]
    PathNotExecutable { path: PathBuf },

    /// The project already has an environment of this kind registered.
    #[error("{tool} environment '{existing}' has already been added for {project}")]
    AlreadyRegisteredConflict {
        tool: ToolKind,
        existing: String,
        project: PathBuf,
    },

    /// The external tool could not be launched or exited with an error.
    #[error("Failed to create {tool} environment in {project}: {message}")]
    ProcessLaunchFailure {
        tool: ToolKind,
        project: PathBuf,
        message: String,
    },

    /// The tool ran but reported no interpreter for the project.
    #[error("{tool} did not report a Python interpreter for {project}")]
    NoInterpreterProduced { tool: ToolKind, project: PathBuf },

    /// The interpreter the tool reported is not a file on disk.
    #[error("Python executable file is not found: {path}")]
    InterpreterFileMissing { path: PathBuf },

    /// The SDK registry refused the new entry.
    #[error("Cannot register interpreter '{name}': {message}")]
    RegistrationRejected { name: String, message: String },

    /// The user declined the confirmation or cancelled provisioning.
    #[error("Cancelled: {message}")]
    UserCancelled { message: String },

    /// A settings or registry file exists but could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    SettingsParseError { path: PathBuf, message: String },

    /// A settings or registry value could not be serialized.
    #[error("Failed to write {path}: {message}")]
    SettingsWriteError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EnvlinkError {
    /// Whether this error means the user chose to stop, as opposed to a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, EnvlinkError::UserCancelled { .. })
    }
}

/// Result type alias for envlink operations.
pub type Result<T> = std::result::Result<T, EnvlinkError>;
