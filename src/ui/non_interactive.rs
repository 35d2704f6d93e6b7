//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::{typed_answer, OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts, e.g.
/// `ENVLINK_PROMPT_BASE_INTERPRETER=/usr/bin/python3.12`.
pub const PROMPT_ENV_PREFIX: &str = "ENVLINK_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `ENVLINK_PROMPT_<KEY>` variables, then from
/// the prompt's default; a prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            return Ok(typed_answer(&prompt.prompt_type, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(typed_answer(&prompt.prompt_type, default));
        }

        Err(anyhow::anyhow!(
            "Cannot prompt for '{}' in non-interactive mode (no default value)",
            prompt.key
        )
        .into())
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("{}", message);
        }
        Box::new(LineSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only the final line.
struct LineSpinner;

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("○ {}", msg);
    }
}
