//! Persisted user preferences.
//!
//! Two values survive between runs: the last executable path confirmed for
//! each tool, and the base interpreter new environments were created from.
//! Blank values clear the entry instead of storing an empty string.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnvlinkError, Result};
use crate::tool::ToolKind;

/// Read/write access to the remembered settings.
pub trait PreferenceStore {
    /// Remembered executable path for `kind`.
    fn executable_path(&self, kind: ToolKind) -> Option<String>;

    /// Remember (or, with `None` or a blank value, forget) the executable path.
    fn set_executable_path(&mut self, kind: ToolKind, path: Option<&str>);

    /// Remembered base interpreter.
    fn preferred_base_interpreter(&self) -> Option<String>;

    /// Remember (or forget) the base interpreter.
    fn set_preferred_base_interpreter(&mut self, interpreter: Option<&str>);

    /// Flush pending changes to durable storage.
    fn persist(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory preferences; also the on-disk layout of `settings.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Executable path per tool, keyed by tool name.
    #[serde(default)]
    pub executables: HashMap<String, String>,

    /// Base interpreter for new environments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_base_interpreter: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl PreferenceStore for Preferences {
    fn executable_path(&self, kind: ToolKind) -> Option<String> {
        self.executables.get(kind.as_str()).cloned()
    }

    fn set_executable_path(&mut self, kind: ToolKind, path: Option<&str>) {
        match non_blank(path) {
            Some(path) => {
                self.executables.insert(kind.as_str().to_string(), path);
            }
            None => {
                self.executables.remove(kind.as_str());
            }
        }
    }

    fn preferred_base_interpreter(&self) -> Option<String> {
        self.preferred_base_interpreter.clone()
    }

    fn set_preferred_base_interpreter(&mut self, interpreter: Option<&str>) {
        self.preferred_base_interpreter = non_blank(interpreter);
    }
}

/// Preferences backed by a YAML file.
///
/// Setters only change memory; [`PreferenceStore::persist`] writes the file.
#[derive(Debug)]
pub struct PreferencesFile {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferencesFile {
    /// Load preferences, starting from defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                prefs: Preferences::default(),
            });
        }

        let content = fs::read_to_string(path)?;
        let prefs = if content.trim().is_empty() {
            Preferences::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| EnvlinkError::SettingsParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(Self {
            path: path.to_path_buf(),
            prefs,
        })
    }

    /// The loaded values.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Save preferences to disk using atomic write.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content =
            serde_yaml::to_string(&self.prefs).map_err(|e| EnvlinkError::SettingsWriteError {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl PreferenceStore for PreferencesFile {
    fn executable_path(&self, kind: ToolKind) -> Option<String> {
        self.prefs.executable_path(kind)
    }

    fn set_executable_path(&mut self, kind: ToolKind, path: Option<&str>) {
        self.prefs.set_executable_path(kind, path);
    }

    fn preferred_base_interpreter(&self) -> Option<String> {
        self.prefs.preferred_base_interpreter()
    }

    fn set_preferred_base_interpreter(&mut self, interpreter: Option<&str>) {
        self.prefs.set_preferred_base_interpreter(interpreter);
    }

    fn persist(&mut self) -> Result<()> {
        self.save()
    }
}
