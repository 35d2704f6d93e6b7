//! envlink - Attach pipenv and poetry environments to Python projects.
//!
//! envlink finds a project's package-management tool, lets the user confirm
//! the executable and base interpreter, has the tool create (or locate) the
//! project's virtual environment, and records the resulting interpreter in
//! a small SDK registry associated with the project.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - State directory resolution
//! - [`conflict`] - Detection of environments already added for a project
//! - [`error`] - Error types and result aliases
//! - [`locator`] - Finding the tool executable and base interpreter
//! - [`provision`] - Running the tool to create the environment
//! - [`registrar`] - Recording the interpreter in the registry
//! - [`registry`] - Registered environments and their storage
//! - [`settings`] - Remembered executable paths and base interpreter
//! - [`tool`] - pipenv / poetry specifics
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`validator`] - Executable checks
//! - [`workflow`] - The add-environment state machine
//!
//! # Example
//!
//! ```
//! use envlink::locator::{locate, Provenance, SearchPath};
//! use envlink::tool::ToolKind;
//!
//! // An explicit path always wins over detection.
//! let candidate = locate(ToolKind::Poetry, Some("/opt/poetry/bin/poetry"), None, &SearchPath::default())
//!     .unwrap();
//! assert_eq!(candidate.provenance(), Provenance::UserSupplied);
//! ```
//!
//! For end-to-end runs with fake tools, see the integration tests.

pub mod cli;
pub mod config;
pub mod conflict;
pub mod error;
pub mod locator;
pub mod provision;
pub mod registrar;
pub mod registry;
pub mod settings;
pub mod tool;
pub mod ui;
pub mod validator;
pub mod workflow;

pub use error::{EnvlinkError, Result};
