//! Runtime configuration: where envlink keeps its files.
//!
//! Everything envlink persists lives in one home directory, resolved in
//! this order:
//!
//! 1. `--home` / `ENVLINK_HOME`
//! 2. `~/.envlink`

use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the persisted preferences.
pub const SETTINGS_FILE: &str = "settings.yml";

/// File name of the SDK registry.
pub const REGISTRY_FILE: &str = "sdks.yml";

/// Resolved locations of envlink's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    home: PathBuf,
}

impl AppConfig {
    /// Resolve the home directory from an explicit override or the user's home.
    pub fn resolve(home_override: Option<&Path>) -> Result<Self> {
        if let Some(home) = home_override {
            return Ok(Self::with_home(home));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            anyhow::anyhow!("Cannot determine the home directory; pass --home or set ENVLINK_HOME")
        })?;
        Ok(Self::with_home(home.join(".envlink")))
    }

    /// Use `home` as the state directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// The state directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path of `settings.yml`.
    pub fn settings_path(&self) -> PathBuf {
        self.home.join(SETTINGS_FILE)
    }

    /// Path of `sdks.yml`.
    pub fn registry_path(&self) -> PathBuf {
        self.home.join(REGISTRY_FILE)
    }
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}
