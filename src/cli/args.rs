//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::tool::ToolKind;

/// envlink - Pipenv and Poetry environments for Python projects.
#[derive(Debug, Parser)]
#[command(name = "envlink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding settings and the SDK registry (default ~/.envlink)
    #[arg(long, global = true, env = "ENVLINK_HOME")]
    pub home: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create (or locate) a project environment and register its interpreter
    Add(AddArgs),

    /// Locate and validate the tool executable without changing anything
    Check(CheckArgs),

    /// Show registered environments
    List(ListArgs),

    /// Remove a registered environment by name
    Remove(RemoveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddArgs {
    /// Tool to use (detected from Pipfile / pyproject.toml when omitted)
    #[arg(short, long, value_enum)]
    pub tool: Option<ToolKind>,

    /// Path to the pipenv or poetry executable
    #[arg(short, long, value_name = "PATH")]
    pub executable: Option<String>,

    /// Base interpreter the environment is created from
    #[arg(long = "python", value_name = "BASE")]
    pub base_interpreter: Option<String>,

    /// Install packages from the lock file
    #[arg(long, conflicts_with = "no_install")]
    pub install: bool,

    /// Skip installing packages
    #[arg(long)]
    pub no_install: bool,

    /// Only register an environment the tool already created
    #[arg(long)]
    pub locate_only: bool,

    /// Accept the proposed settings without prompting
    #[arg(short, long)]
    pub yes: bool,
}

impl AddArgs {
    /// `Some(true)` for `--install`, `Some(false)` for `--no-install`.
    pub fn install_choice(&self) -> Option<bool> {
        if self.install {
            Some(true)
        } else if self.no_install {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Tool to check (detected from the project when omitted)
    #[arg(short, long, value_enum)]
    pub tool: Option<ToolKind>,

    /// Path to the executable to check
    #[arg(short, long, value_name = "PATH")]
    pub executable: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only show environments created by this tool
    #[arg(short, long, value_enum)]
    pub tool: Option<ToolKind>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveArgs {
    /// Name of the registered environment
    pub name: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
