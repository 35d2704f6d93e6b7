//! Check command implementation.
//!
//! The `envlink check` command locates and validates the tool executable
//! and reports its version, without creating or registering anything.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::cli::args::CheckArgs;
use crate::config::AppConfig;
use crate::conflict::find_conflict;
use crate::error::Result;
use crate::locator::{locate, SearchPath};
use crate::provision::{CancellationToken, ProcessRunner, ToolInvocation, ToolRunner};
use crate::registry::{FileRegistry, SdkRegistry};
use crate::settings::{PreferenceStore, PreferencesFile};
use crate::ui::UserInterface;
use crate::validator::validate;

use super::add::{project_dir, select_tool};
use super::dispatcher::{Command, CommandResult, EXIT_FAILURE};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    config: AppConfig,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, config: &AppConfig, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.clone(),
            args,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = match project_dir(&self.project_root) {
            Ok(p) => p,
            Err(e) => return Ok(CommandResult::from_error(&e, ui)),
        };

        let Some(kind) = select_tool(self.args.tool, &project, ui)? else {
            ui.error(&format!(
                "No Pipfile or pyproject.toml in {}; pass --tool pipenv or --tool poetry",
                project.display()
            ));
            return Ok(CommandResult::failure(EXIT_FAILURE));
        };

        let preferences = PreferencesFile::load(&self.config.settings_path())?;
        let remembered = preferences.executable_path(kind);
        let candidate = locate(
            kind,
            self.args.executable.as_deref(),
            remembered.as_deref(),
            &SearchPath::from_env(),
        );

        let outcome = validate(candidate.as_ref());
        let candidate = match candidate {
            Some(c) if outcome.is_valid() => c,
            _ => {
                let message = outcome
                    .message(kind)
                    .unwrap_or_else(|| format!("{} executable not found", kind));
                ui.error(&message);
                return Ok(CommandResult::failure(EXIT_FAILURE));
            }
        };

        let invocation = ToolInvocation::new(candidate.path(), &project).args(["--version"]);
        let version = ProcessRunner::new()
            .run_tool(&invocation, &CancellationToken::new())
            .ok()
            .filter(|out| out.success)
            .and_then(|out| extract_version(&out.stdout));

        ui.success(&format!(
            "{} {} at {} ({})",
            kind,
            version.as_deref().unwrap_or("(unknown version)"),
            candidate.path().display(),
            candidate.provenance()
        ));

        let registry = FileRegistry::load(&self.config.registry_path())?;
        let existing = registry.list_all()?;
        if let Some(env) = find_conflict(Some(&project), &existing, kind) {
            ui.warning(&format!(
                "{} already has {} environment '{}'",
                project.display(),
                kind,
                env.name
            ));
        }

        Ok(CommandResult::success())
    }
}

/// Pull a dotted version number out of `--version` output.
pub fn extract_version(output: &str) -> Option<String> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION
        .get_or_init(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").ok())
        .as_ref()?;
    re.captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
