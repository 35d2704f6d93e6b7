//! Executable location.
//!
//! Resolution order, first match wins:
//!
//! 1. a non-blank path the user typed or passed on the command line
//! 2. the path remembered from a previous successful run
//! 3. the tool's binary names on PATH, then the per-user install
//!    directories the tool's installers use
//!
//! Locating never touches the filesystem for (1) and (2): a user-supplied
//! path is returned as-is, even if it does not exist, so that validation
//! can say exactly what is wrong with it.
//!
//! # Example
//!
//! ```no_run
//! use envlink::locator::{locate, SearchPath};
//! use envlink::tool::ToolKind;
//!
//! let search = SearchPath::from_env();
//! if let Some(candidate) = locate(ToolKind::Poetry, None, None, &search) {
//!     println!("{} ({})", candidate.path().display(), candidate.provenance());
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::tool::ToolKind;
use crate::validator::is_executable;

/// Where a candidate executable path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Typed by the user or passed with `--executable`.
    UserSupplied,
    /// Remembered from a previous successful run.
    PersistedPreference,
    /// Found on the executable search path.
    AutoDetected,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provenance::UserSupplied => "user supplied",
            Provenance::PersistedPreference => "remembered",
            Provenance::AutoDetected => "auto-detected",
        };
        f.write_str(label)
    }
}

/// A resolved executable path and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableCandidate {
    path: PathBuf,
    provenance: Provenance,
}

impl ExecutableCandidate {
    /// Create a candidate.
    pub fn new(path: PathBuf, provenance: Provenance) -> Self {
        Self { path, provenance }
    }

    /// The absolute path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the path came from.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Directories searched during auto-detection.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    /// PATH entries, in order.
    pub path_entries: Vec<PathBuf>,
    /// Home directory used for per-user install locations.
    pub home: Option<PathBuf>,
}

impl SearchPath {
    /// Build from the process PATH and home directory.
    pub fn from_env() -> Self {
        Self {
            path_entries: parse_system_path(),
            home: dirs::home_dir(),
        }
    }

    /// Build from explicit PATH entries, with no home directory.
    pub fn new(path_entries: Vec<PathBuf>) -> Self {
        Self {
            path_entries,
            home: None,
        }
    }

    /// Set the home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = Some(home);
        self
    }

    /// All directories to search for `tool`, PATH first.
    fn directories_for(&self, tool: ToolKind) -> Vec<PathBuf> {
        let mut dirs = self.path_entries.clone();
        if let Some(home) = &self.home {
            for dir in tool.user_install_dirs(home) {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        dirs
    }
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve the first of `names` found in `dirs`.
///
/// Directories are the outer loop, so an earlier directory wins over a
/// more specific name in a later one. Only regular, executable files match.
pub fn resolve_tool_path(names: &[String], dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        for name in names {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Find the tool on the search path without consulting overrides or preferences.
pub fn detect_executable(tool: ToolKind, search: &SearchPath) -> Option<PathBuf> {
    resolve_tool_path(&tool.binary_names(), &search.directories_for(tool))
}

/// Name of the system Python command.
pub fn system_python_cmd() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

/// Find a base Python interpreter on PATH.
pub fn detect_base_interpreter(search: &SearchPath) -> Option<PathBuf> {
    let names: Vec<String> = if cfg!(windows) {
        vec!["python.exe".to_string(), "python".to_string()]
    } else {
        vec!["python3".to_string(), "python".to_string()]
    };
    resolve_tool_path(&names, &search.path_entries)
}

/// Locate the tool's executable.
pub fn locate(
    tool: ToolKind,
    user_override: Option<&str>,
    persisted_preference: Option<&str>,
    search: &SearchPath,
) -> Option<ExecutableCandidate> {
    if let Some(text) = non_blank(user_override) {
        return Some(ExecutableCandidate::new(
            absolutize(text),
            Provenance::UserSupplied,
        ));
    }

    if let Some(text) = non_blank(persisted_preference) {
        return Some(ExecutableCandidate::new(
            absolutize(text),
            Provenance::PersistedPreference,
        ));
    }

    detect_executable(tool, search)
        .map(|path| ExecutableCandidate::new(path, Provenance::AutoDetected))
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn absolutize(text: &str) -> PathBuf {
    let path = Path::new(text);
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn binary_name(tool: ToolKind) -> String {
        tool.binary_names().remove(0)
    }

    #[test]
    fn user_override_wins_over_everything() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        create_fake_binary(&bin.join(binary_name(ToolKind::Poetry)));
        let search = SearchPath::new(vec![bin]);

        let found = locate(
            ToolKind::Poetry,
            Some("/nonexistent/poetry"),
            Some("/also/valid/poetry"),
            &search,
        )
        .unwrap();

        assert_eq!(found.path(), Path::new("/nonexistent/poetry"));
        assert_eq!(found.provenance(), Provenance::UserSupplied);
    }

    #[test]
    fn persisted_preference_beats_detection() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        create_fake_binary(&bin.join(binary_name(ToolKind::Pipenv)));
        let search = SearchPath::new(vec![bin]);

        let found = locate(
            ToolKind::Pipenv,
            None,
            Some("/opt/pipenv/bin/pipenv"),
            &search,
        )
        .unwrap();

        assert_eq!(found.path(), Path::new("/opt/pipenv/bin/pipenv"));
        assert_eq!(found.provenance(), Provenance::PersistedPreference);
    }

    #[test]
    fn blank_override_falls_through() {
        let found = locate(
            ToolKind::Pipenv,
            Some("   "),
            Some("/opt/pipenv"),
            &SearchPath::default(),
        )
        .unwrap();
        assert_eq!(found.provenance(), Provenance::PersistedPreference);
    }

    #[test]
    fn detects_on_path() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        let exe = bin.join(binary_name(ToolKind::Poetry));
        create_fake_binary(&exe);

        let found = locate(ToolKind::Poetry, None, None, &SearchPath::new(vec![bin])).unwrap();
        assert_eq!(found.path(), exe.as_path());
        assert_eq!(found.provenance(), Provenance::AutoDetected);
    }

    #[test]
    fn nothing_found_returns_none() {
        let temp = TempDir::new().unwrap();
        let search = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert!(locate(ToolKind::Pipenv, None, None, &search).is_none());
    }

    #[test]
    fn earlier_path_entry_wins() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        create_fake_binary(&a.join(binary_name(ToolKind::Pipenv)));
        create_fake_binary(&b.join(binary_name(ToolKind::Pipenv)));

        let found = detect_executable(ToolKind::Pipenv, &SearchPath::new(vec![a.clone(), b]));
        assert_eq!(found, Some(a.join(binary_name(ToolKind::Pipenv))));
    }

    #[cfg(unix)]
    #[test]
    fn detection_skips_non_executable() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::write(a.join("poetry"), "text").unwrap();
        fs::set_permissions(a.join("poetry"), fs::Permissions::from_mode(0o644)).unwrap();
        create_fake_binary(&b.join("poetry"));

        let found = detect_executable(ToolKind::Poetry, &SearchPath::new(vec![a, b.clone()]));
        assert_eq!(found, Some(b.join("poetry")));
    }

    #[test]
    fn falls_back_to_user_install_dir() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let exe = home
            .join(".poetry")
            .join("bin")
            .join(binary_name(ToolKind::Poetry));
        create_fake_binary(&exe);

        let search = SearchPath::new(vec![temp.path().join("empty")]).with_home(home);
        assert_eq!(detect_executable(ToolKind::Poetry, &search), Some(exe));
        assert!(detect_executable(ToolKind::Pipenv, &search).is_none());
    }

    #[test]
    fn relative_override_is_made_absolute() {
        let found = locate(
            ToolKind::Pipenv,
            Some("tools/pipenv"),
            None,
            &SearchPath::default(),
        )
        .unwrap();
        assert!(found.path().is_absolute());
        assert!(found.path().ends_with("tools/pipenv"));
    }

    #[cfg(unix)]
    #[test]
    fn base_interpreter_prefers_python3() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        create_fake_binary(&bin.join("python"));
        create_fake_binary(&bin.join("python3"));

        let found = detect_base_interpreter(&SearchPath::new(vec![bin.clone()]));
        assert_eq!(found, Some(bin.join("python3")));
    }
}
