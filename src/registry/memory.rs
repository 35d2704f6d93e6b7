//! In-memory SDK registry.

use std::path::Path;

use crate::error::{EnvlinkError, Result};
use crate::tool::ToolKind;

use super::{RegisteredEnvironment, SdkRegistry};

/// Registry kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    entries: Vec<RegisteredEnvironment>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with `entries`.
    pub fn with_entries(entries: Vec<RegisteredEnvironment>) -> Self {
        Self { entries }
    }

    /// Borrow the entries.
    pub fn entries(&self) -> &[RegisteredEnvironment] {
        &self.entries
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredEnvironment> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Remove an entry by name, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<RegisteredEnvironment> {
        let idx = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(idx))
    }
}

impl SdkRegistry for MemoryRegistry {
    fn list_all(&self) -> Result<Vec<RegisteredEnvironment>> {
        Ok(self.entries.clone())
    }

    fn add(&mut self, entry: RegisteredEnvironment) -> Result<()> {
        if self.get(&entry.name).is_some() {
            return Err(EnvlinkError::RegistrationRejected {
                name: entry.name,
                message: "an interpreter with this name is already registered".to_string(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    fn associate(
        &mut self,
        name: &str,
        project: &Path,
        kind: ToolKind,
    ) -> Result<RegisteredEnvironment> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| EnvlinkError::RegistrationRejected {
                name: name.to_string(),
                message: "no interpreter with this name is registered".to_string(),
            })?;
        entry.associated_project = Some(project.to_path_buf());
        entry.kind = Some(kind);
        Ok(entry.clone())
    }
}
