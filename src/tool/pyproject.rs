//! Minimal `pyproject.toml` inspection.
//!
//! Only two facts matter here: whether the file already has a
//! `[tool.poetry]` section (otherwise `poetry init` must run first) and the
//! project name to show the user.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnvlinkError, Result};

#[derive(Debug, Default, Deserialize)]
struct PyProjectFile {
    #[serde(default)]
    tool: Option<ToolTable>,
    #[serde(default)]
    project: Option<NameTable>,
}

#[derive(Debug, Default, Deserialize)]
struct ToolTable {
    #[serde(default)]
    poetry: Option<NameTable>,
}

#[derive(Debug, Default, Deserialize)]
struct NameTable {
    #[serde(default)]
    name: Option<String>,
}

/// The parts of a project's `pyproject.toml` envlink cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyProject {
    /// Whether a `[tool.poetry]` table is present.
    pub has_poetry_section: bool,
    /// `[tool.poetry].name`, falling back to `[project].name`.
    pub name: Option<String>,
}

impl PyProject {
    /// Path of `pyproject.toml` inside a project.
    pub fn file_path(project: &Path) -> PathBuf {
        project.join("pyproject.toml")
    }

    /// Load `pyproject.toml` from a project directory.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(project: &Path) -> Result<Option<Self>> {
        let path = Self::file_path(project);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
            .map(Some)
            .map_err(|message| EnvlinkError::SettingsParseError { path, message })
    }

    /// Parse `pyproject.toml` content.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let file: PyProjectFile = toml::from_str(content).map_err(|e| e.to_string())?;
        let poetry = file.tool.and_then(|t| t.poetry);
        let has_poetry_section = poetry.is_some();
        let name = poetry
            .and_then(|p| p.name)
            .or_else(|| file.project.and_then(|p| p.name));
        Ok(Self {
            has_poetry_section,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_poetry_section_and_name() {
        let parsed = PyProject::parse(
            r#"
[tool.poetry]
name = "demo"
version = "0.1.0"

[tool.poetry.dependencies]
python = "^3.11"
"#,
        )
        .unwrap();
        assert!(parsed.has_poetry_section);
        assert_eq!(parsed.name.as_deref(), Some("demo"));
    }

    #[test]
    fn falls_back_to_project_table_name() {
        let parsed = PyProject::parse(
            r#"
[project]
name = "pep621-demo"

[tool.black]
line-length = 100
"#,
        )
        .unwrap();
        assert!(!parsed.has_poetry_section);
        assert_eq!(parsed.name.as_deref(), Some("pep621-demo"));
    }

    #[test]
    fn empty_file_has_nothing() {
        assert_eq!(PyProject::parse("").unwrap(), PyProject::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(PyProject::parse("[tool.poetry").is_err());
    }

    #[test]
    fn load_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(PyProject::load(temp.path()).unwrap().is_none());
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "name = ").unwrap();
        let err = PyProject::load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("pyproject.toml"));
    }
}
