//! Remove command implementation.
//!
//! The `envlink remove` command deletes a registry entry so the project can
//! be added again.

use crate::cli::args::RemoveArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::registry::FileRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_FAILURE};

/// The remove command implementation.
pub struct RemoveCommand {
    config: AppConfig,
    args: RemoveArgs,
}

impl RemoveCommand {
    /// Create a new remove command.
    pub fn new(config: &AppConfig, args: RemoveArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = FileRegistry::load(&self.config.registry_path())?;
        match registry.remove(&self.args.name)? {
            Some(env) => {
                ui.success(&format!(
                    "Removed '{}' ({})",
                    env.name,
                    env.interpreter.display()
                ));
                Ok(CommandResult::success())
            }
            None => {
                ui.error(&format!("No environment named '{}'", self.args.name));
                Ok(CommandResult::failure(EXIT_FAILURE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RegisteredEnvironment, SdkRegistry};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn removes_existing_entry() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::with_home(temp.path());
        let mut registry = FileRegistry::load(&config.registry_path()).unwrap();
        registry
            .add(RegisteredEnvironment::new("Pipenv (web)", "/venvs/web/bin/python"))
            .unwrap();

        let cmd = RemoveCommand::new(
            &config,
            RemoveArgs {
                name: "Pipenv (web)".to_string(),
            },
        );
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let reloaded = FileRegistry::load(&config.registry_path()).unwrap();
        assert!(reloaded.list_all().unwrap().is_empty());
    }

    #[test]
    fn unknown_name_fails() {
        let temp = TempDir::new().unwrap();
        let cmd = RemoveCommand::new(
            &AppConfig::with_home(temp.path()),
            RemoveArgs {
                name: "nope".to_string(),
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(ui.has_error("nope"));
    }
}
