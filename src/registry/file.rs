//! YAML-backed SDK registry.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnvlinkError, Result};
use crate::tool::ToolKind;

use super::{MemoryRegistry, RegisteredEnvironment, SdkRegistry};

/// On-disk layout of the registry file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    /// Schema version for migration.
    version: u32,
    #[serde(default)]
    environments: Vec<RegisteredEnvironment>,
}

/// Registry persisted to a YAML file; every mutation is saved immediately.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    inner: MemoryRegistry,
}

impl FileRegistry {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Load the registry, starting empty if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                inner: MemoryRegistry::new(),
            });
        }

        let content = fs::read_to_string(path)?;
        let file: RegistryFile =
            serde_yaml::from_str(&content).map_err(|e| EnvlinkError::SettingsParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryRegistry::with_entries(file.environments),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove an entry by name and save.
    pub fn remove(&mut self, name: &str) -> Result<Option<RegisteredEnvironment>> {
        let removed = self.inner.remove(name);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Save to disk using atomic write.
    ///
    /// Uses the write-to-temp-then-rename pattern so a crash mid-write never
    /// leaves a truncated registry behind.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let file = RegistryFile {
            version: Self::CURRENT_VERSION,
            environments: self.inner.entries().to_vec(),
        };
        let content =
            serde_yaml::to_string(&file).map_err(|e| EnvlinkError::SettingsWriteError {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl SdkRegistry for FileRegistry {
    fn list_all(&self) -> Result<Vec<RegisteredEnvironment>> {
        self.inner.list_all()
    }

    fn add(&mut self, entry: RegisteredEnvironment) -> Result<()> {
        self.inner.add(entry)?;
        self.save()
    }

    fn associate(
        &mut self,
        name: &str,
        project: &Path,
        kind: ToolKind,
    ) -> Result<RegisteredEnvironment> {
        let updated = self.inner.associate(name, project, kind)?;
        self.save()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let registry = FileRegistry::load(&temp.path().join("sdks.yml")).unwrap();
        assert!(registry.list_all().unwrap().is_empty());
    }

    #[test]
    fn mutations_survive_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state").join("sdks.yml");

        let mut registry = FileRegistry::load(&path).unwrap();
        registry
            .add(RegisteredEnvironment::new(
                "Poetry (proj)",
                "/repo/proj/.venv/bin/python",
            ))
            .unwrap();
        registry
            .associate("Poetry (proj)", Path::new("/repo/proj"), ToolKind::Poetry)
            .unwrap();

        let reloaded = FileRegistry::load(&path).unwrap();
        let entries = reloaded.list_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_kind(ToolKind::Poetry));
        assert!(entries[0].is_associated_with(Path::new("/repo/proj")));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sdks.yml");
        let mut registry = FileRegistry::load(&path).unwrap();
        registry
            .add(RegisteredEnvironment::new("a", "/a/bin/python"))
            .unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("yml.tmp").exists());
    }

    #[test]
    fn remove_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sdks.yml");
        let mut registry = FileRegistry::load(&path).unwrap();
        registry
            .add(RegisteredEnvironment::new("a", "/a/bin/python"))
            .unwrap();

        assert!(registry.remove("a").unwrap().is_some());
        assert!(registry.remove("a").unwrap().is_none());
        assert!(FileRegistry::load(&path)
            .unwrap()
            .list_all()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn corrupt_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sdks.yml");
        fs::write(&path, "environments: [unterminated").unwrap();

        let err = FileRegistry::load(&path).unwrap_err();
        assert!(matches!(err, EnvlinkError::SettingsParseError { .. }));
        assert!(err.to_string().contains("sdks.yml"));
    }
}
