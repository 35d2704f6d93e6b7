//! Package-manager tool kinds.
//!
//! pipenv and poetry go through the same add-environment workflow; the
//! [`ToolKind`] value carries everything that differs between them
//! (binary names, project files, install locations, display names).
//!
//! # Modules
//!
//! - [`configurator`] - Applicability checks and explicit configurator lookup
//! - [`pyproject`] - Minimal `pyproject.toml` inspection for poetry projects

pub mod configurator;
pub mod pyproject;

pub use configurator::{
    applicable_configurators, configurator_for, PipenvConfigurator, PoetryConfigurator,
    SdkConfigurator,
};
pub use pyproject::PyProject;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A package-management tool that can own a project's virtual environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pipenv,
    Poetry,
}

impl ToolKind {
    /// All supported tools, in detection order.
    pub const ALL: [ToolKind; 2] = [ToolKind::Pipenv, ToolKind::Poetry];

    /// Command name of the tool (also the preference key).
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Pipenv => "pipenv",
            ToolKind::Poetry => "poetry",
        }
    }

    /// Capitalized name for headers and suggested SDK names.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolKind::Pipenv => "Pipenv",
            ToolKind::Poetry => "Poetry",
        }
    }

    /// File whose presence marks a project as managed by this tool.
    pub fn manifest_file(&self) -> &'static str {
        match self {
            ToolKind::Pipenv => "Pipfile",
            ToolKind::Poetry => "pyproject.toml",
        }
    }

    /// Lock file the tool installs pinned dependencies from.
    pub fn lock_file(&self) -> &'static str {
        match self {
            ToolKind::Pipenv => "Pipfile.lock",
            ToolKind::Poetry => "poetry.lock",
        }
    }

    /// File names to look for on the search path, most specific first.
    pub fn binary_names(&self) -> Vec<String> {
        let base = self.as_str();
        if cfg!(windows) {
            ["exe", "cmd", "bat"]
                .iter()
                .map(|ext| format!("{}.{}", base, ext))
                .chain(std::iter::once(base.to_string()))
                .collect()
        } else {
            vec![base.to_string()]
        }
    }

    /// Per-user install directories the tool's installers use, relative to `home`.
    ///
    /// Searched after PATH, because these directories are frequently missing
    /// from PATH in non-login shells.
    pub fn user_install_dirs(&self, home: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![home.join(".local").join("bin")];
        if *self == ToolKind::Poetry {
            dirs.push(home.join(".poetry").join("bin"));
        }
        dirs
    }

    /// Name suggested for an environment created for `project`.
    ///
    /// Follows the "Poetry (myproject)" convention.
    pub fn suggested_sdk_name(&self, project: &Path) -> String {
        let project_name = project
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| project.to_string_lossy().to_string());
        format!("{} ({})", self.display_name(), project_name)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pipenv" => Ok(Self::Pipenv),
            "poetry" => Ok(Self::Poetry),
            _ => Err(format!("unknown tool: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Poetry".parse::<ToolKind>(), Ok(ToolKind::Poetry));
        assert_eq!("pipenv".parse::<ToolKind>(), Ok(ToolKind::Pipenv));
        assert!("conda".parse::<ToolKind>().is_err());
    }

    #[test]
    fn display_is_command_name() {
        assert_eq!(ToolKind::Pipenv.to_string(), "pipenv");
        assert_eq!(ToolKind::Poetry.to_string(), "poetry");
    }

    #[cfg(unix)]
    #[test]
    fn unix_binary_name_has_no_extension() {
        assert_eq!(ToolKind::Poetry.binary_names(), vec!["poetry".to_string()]);
    }

    #[cfg(windows)]
    #[test]
    fn windows_binary_names_try_extensions_first() {
        let names = ToolKind::Pipenv.binary_names();
        assert_eq!(names[0], "pipenv.exe");
        assert_eq!(names.last().map(String::as_str), Some("pipenv"));
    }

    #[test]
    fn poetry_has_extra_install_dir() {
        let home = Path::new("/home/dev");
        assert_eq!(ToolKind::Pipenv.user_install_dirs(home).len(), 1);
        assert!(ToolKind::Poetry
            .user_install_dirs(home)
            .contains(&home.join(".poetry").join("bin")));
    }

    #[test]
    fn lock_file_sits_next_to_manifest() {
        assert_eq!(ToolKind::Pipenv.manifest_file(), "Pipfile");
        assert_eq!(ToolKind::Pipenv.lock_file(), "Pipfile.lock");
        assert_eq!(ToolKind::Poetry.lock_file(), "poetry.lock");
    }

    #[test]
    fn suggested_name_uses_project_dir() {
        let name = ToolKind::Poetry.suggested_sdk_name(Path::new("/repo/proj"));
        assert_eq!(name, "Poetry (proj)");
    }

    #[test]
    fn serializes_lowercase() {
        let yaml = serde_yaml::to_string(&ToolKind::Pipenv).unwrap();
        assert_eq!(yaml.trim(), "pipenv");
    }
}
