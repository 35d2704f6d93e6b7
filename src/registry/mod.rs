//! SDK registry: the table of interpreters envlink knows about.
//!
//! The add-environment workflow only ever reads the registry (for conflict
//! detection) and writes to it through the registrar. Two implementations:
//!
//! - [`MemoryRegistry`] - in-process table, used by tests and embedding hosts
//! - [`FileRegistry`] - YAML file under the envlink home directory

pub mod file;
pub mod memory;

pub use file::FileRegistry;
pub use memory::MemoryRegistry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::tool::ToolKind;

/// An interpreter registered with envlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredEnvironment {
    /// Unique display name, e.g. "Poetry (myproject)".
    pub name: String,

    /// Path to the Python executable.
    pub interpreter: PathBuf,

    /// Project directory this environment belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_project: Option<PathBuf>,

    /// Tool that manages the environment; `None` for plain interpreters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ToolKind>,

    /// When the entry was added.
    pub registered_at: DateTime<Utc>,
}

impl RegisteredEnvironment {
    /// Create an unassociated, untagged entry.
    pub fn new(name: impl Into<String>, interpreter: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            interpreter: interpreter.into(),
            associated_project: None,
            kind: None,
            registered_at: Utc::now(),
        }
    }

    /// Builder-style association, mostly for tests and fixtures.
    pub fn associated(mut self, project: impl Into<PathBuf>, kind: ToolKind) -> Self {
        self.associated_project = Some(project.into());
        self.kind = Some(kind);
        self
    }

    /// Whether the environment is managed by `kind`.
    pub fn is_kind(&self, kind: ToolKind) -> bool {
        self.kind == Some(kind)
    }

    /// Whether the environment is associated with `project`.
    ///
    /// Paths are compared component-wise, so `/repo/proj/` matches `/repo/proj`.
    pub fn is_associated_with(&self, project: &Path) -> bool {
        self.associated_project
            .as_deref()
            .is_some_and(|p| p.components().eq(project.components()))
    }
}

/// Storage for registered environments.
pub trait SdkRegistry {
    /// Every registered environment, in registration order.
    fn list_all(&self) -> Result<Vec<RegisteredEnvironment>>;

    /// Add a new entry.
    ///
    /// Fails with `RegistrationRejected` if the name is already taken.
    fn add(&mut self, entry: RegisteredEnvironment) -> Result<()>;

    /// Tag an existing entry with `kind` and associate it with `project`.
    ///
    /// Returns the updated entry. Fails with `RegistrationRejected` if no
    /// entry has that name.
    fn associate(
        &mut self,
        name: &str,
        project: &Path,
        kind: ToolKind,
    ) -> Result<RegisteredEnvironment>;
}
