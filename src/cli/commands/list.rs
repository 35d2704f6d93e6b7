//! List command implementation.
//!
//! The `envlink list` command shows registered environments.

use crate::cli::args::ListArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::registry::{FileRegistry, RegisteredEnvironment, SdkRegistry};
use crate::ui::theme::EnvlinkTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    config: AppConfig,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(config: &AppConfig, args: ListArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }

    fn selected(&self) -> Result<Vec<RegisteredEnvironment>> {
        let registry = FileRegistry::load(&self.config.registry_path())?;
        let mut entries = registry.list_all()?;
        if let Some(kind) = self.args.tool {
            entries.retain(|e| e.is_kind(kind));
        }
        Ok(entries)
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries = self.selected()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if entries.is_empty() {
            ui.message("No environments registered. Run 'envlink add' in a project.");
            return Ok(CommandResult::success());
        }

        let theme = EnvlinkTheme::for_terminal();
        let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for env in &entries {
            let tool = env.kind.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string());
            ui.message(&format!(
                "  {:<width$}  {:<6}  {}",
                env.name,
                tool,
                theme.path.apply_to(env.interpreter.display()),
                width = width
            ));
            if let Some(project) = &env.associated_project {
                ui.message(&format!(
                    "  {:<width$}  {}",
                    "",
                    theme.dim.apply_to(format!("└── {}", project.display())),
                    width = width
                ));
            }
        }

        Ok(CommandResult::success())
    }
}
