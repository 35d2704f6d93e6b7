//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{EnvlinkError, Result};
use crate::ui::UserInterface;

/// Exit code when the command failed.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the user backed out.
pub const EXIT_CANCELLED: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Report `err` and pick the exit code for it.
    pub fn from_error(err: &EnvlinkError, ui: &mut dyn UserInterface) -> Self {
        if err.is_cancellation() {
            ui.warning(&err.to_string());
            Self::failure(EXIT_CANCELLED)
        } else {
            ui.error(&err.to_string());
            Self::failure(EXIT_FAILURE)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config: AppConfig,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root and state directory.
    pub fn new(project_root: PathBuf, config: AppConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Add(args) => {
                let cmd = super::add::AddCommand::new(&self.project_root, &self.config, args.clone());
                cmd.execute(ui)
            }
            Commands::Check(args) => {
                let cmd = super::check::CheckCommand::new(
                    &self.project_root,
                    &self.config,
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(&self.config, args.clone());
                cmd.execute(ui)
            }
            Commands::Remove(args) => {
                let cmd = super::remove::RemoveCommand::new(&self.config, args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
