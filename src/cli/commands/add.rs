//! Add command implementation.
//!
//! The `envlink add` command runs the add-environment workflow for the
//! project: locate the tool, confirm the settings, create the environment
//! and register its interpreter.

use std::path::{Path, PathBuf};

use crate::cli::args::AddArgs;
use crate::config::AppConfig;
use crate::error::{EnvlinkError, Result};
use crate::provision::ProcessRunner;
use crate::registry::FileRegistry;
use crate::settings::PreferencesFile;
use crate::tool::{applicable_configurators, configurator_for, ToolKind};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};
use crate::workflow::{AddOptions, AutoConfirmer, Collaborators, Confirmer, PromptConfirmer};

use super::dispatcher::{Command, CommandResult, EXIT_FAILURE};

/// The add command implementation.
pub struct AddCommand {
    project_root: PathBuf,
    config: AppConfig,
    args: AddArgs,
}

impl AddCommand {
    /// Create a new add command.
    pub fn new(project_root: &Path, config: &AppConfig, args: AddArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &AddArgs {
        &self.args
    }

    fn options(&self) -> AddOptions {
        AddOptions {
            executable: self.args.executable.clone(),
            base_interpreter: self.args.base_interpreter.clone(),
            install_from_lock_file: self.args.install_choice(),
            create_if_absent: !self.args.locate_only,
            ..Default::default()
        }
    }
}

impl Command for AddCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = match project_dir(&self.project_root) {
            Ok(p) => p,
            Err(e) => return Ok(CommandResult::from_error(&e, ui)),
        };

        let kind = match select_tool(self.args.tool, &project, ui) {
            Ok(Some(kind)) => kind,
            Ok(None) => {
                ui.error(&format!(
                    "No Pipfile or pyproject.toml in {}; pass --tool pipenv or --tool poetry",
                    project.display()
                ));
                return Ok(CommandResult::failure(EXIT_FAILURE));
            }
            Err(e) => return Ok(CommandResult::from_error(&e, ui)),
        };

        let mut preferences = PreferencesFile::load(&self.config.settings_path())?;
        let mut registry = FileRegistry::load(&self.config.registry_path())?;
        let runner = ProcessRunner::new();

        let mut prompting = PromptConfirmer::new();
        let mut automatic = AutoConfirmer::new();
        let confirmer: &mut dyn Confirmer = if self.args.yes {
            &mut automatic
        } else {
            &mut prompting
        };

        let mut deps = Collaborators {
            preferences: &mut preferences,
            registry: &mut registry,
            runner: &runner,
            confirmer,
        };

        match configurator_for(kind).create_and_add(&project, self.options(), &mut deps, ui) {
            Ok(env) => {
                ui.success(&format!(
                    "Registered '{}' ({})",
                    env.name,
                    env.interpreter.display()
                ));
                Ok(CommandResult::success())
            }
            Err(e) => Ok(CommandResult::from_error(&e, ui)),
        }
    }
}

/// The project directory as an absolute path.
pub(crate) fn project_dir(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(anyhow::anyhow!("Project directory {} does not exist", root.display()).into());
    }
    Ok(root.canonicalize()?)
}

/// Pick the tool for `project`.
///
/// An explicit choice wins. Otherwise the tools whose project file exists
/// are offered; with both present the user chooses (the first one in
/// non-interactive mode). `None` when nothing applies.
pub(crate) fn select_tool(
    explicit: Option<ToolKind>,
    project: &Path,
    ui: &mut dyn UserInterface,
) -> Result<Option<ToolKind>> {
    if explicit.is_some() {
        return Ok(explicit);
    }

    let applicable = applicable_configurators(project);
    match applicable.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.kind())),
        several => {
            let options: Vec<PromptOption> = several
                .iter()
                .map(|c| PromptOption {
                    label: c.intention_name(project),
                    value: c.kind().to_string(),
                })
                .collect();
            let default = options.first().map(|o| o.value.clone());
            let answer = ui.prompt(&Prompt {
                key: "tool".to_string(),
                question: "Which tool manages this project?".to_string(),
                prompt_type: PromptType::Select { options },
                default,
            })?;
            answer
                .as_string()
                .parse::<ToolKind>()
                .map(Some)
                .map_err(|e| EnvlinkError::Other(anyhow::anyhow!(e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn command(project: &Path, home: &Path, args: AddArgs) -> AddCommand {
        AddCommand::new(project, &AppConfig::with_home(home), args)
    }

    #[test]
    fn explicit_tool_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Pipfile"), "").unwrap();
        let mut ui = MockUI::new();

        let kind = select_tool(Some(ToolKind::Poetry), temp.path(), &mut ui).unwrap();
        assert_eq!(kind, Some(ToolKind::Poetry));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn single_manifest_selects_tool() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "[tool.poetry]\n").unwrap();
        let mut ui = MockUI::new();

        let kind = select_tool(None, temp.path(), &mut ui).unwrap();
        assert_eq!(kind, Some(ToolKind::Poetry));
    }

    #[test]
    fn both_manifests_prompt_for_tool() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Pipfile"), "").unwrap();
        fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("tool", "poetry");

        let kind = select_tool(None, temp.path(), &mut ui).unwrap();
        assert_eq!(kind, Some(ToolKind::Poetry));
        assert_eq!(ui.prompts_shown(), &["tool"]);
    }

    #[test]
    fn no_manifest_selects_nothing() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        assert_eq!(select_tool(None, temp.path(), &mut ui).unwrap(), None);
    }

    #[test]
    fn missing_project_dir_fails() {
        let temp = TempDir::new().unwrap();
        let cmd = command(
            &temp.path().join("missing"),
            &temp.path().join("state"),
            AddArgs::default(),
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(ui.has_error("does not exist"));
    }

    #[test]
    fn project_without_manifest_needs_tool() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        fs::create_dir_all(&project).unwrap();
        let cmd = command(&project, &temp.path().join("state"), AddArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert!(ui.has_error("--tool"));
    }

    #[test]
    fn missing_executable_fails_without_prompting() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("Pipfile"), "").unwrap();
        let args = AddArgs {
            executable: Some(temp.path().join("no-pipenv").display().to_string()),
            yes: true,
            ..Default::default()
        };
        let cmd = command(&project, &temp.path().join("state"), args);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(ui.has_error("not found"));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn locate_only_disables_creation() {
        let args = AddArgs {
            locate_only: true,
            no_install: true,
            ..Default::default()
        };
        let cmd = command(Path::new("/p"), Path::new("/h"), args);
        let options = cmd.options();
        assert!(!options.create_if_absent);
        assert_eq!(options.install_from_lock_file, Some(false));
    }
}
