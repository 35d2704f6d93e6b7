//! Interactive prompts.

use console::Term;
use dialoguer::{Confirm, Input, Select};

use crate::error::{EnvlinkError, Result};

use super::{parse_bool, Prompt, PromptOption, PromptResult, PromptType};

/// Convert dialoguer errors to EnvlinkError.
///
/// Ctrl-C / Esc during a prompt surfaces as an interrupted read; treat it
/// as the user backing out.
fn map_dialoguer_err(e: dialoguer::Error) -> EnvlinkError {
    let io: std::io::Error = e.into();
    if io.kind() == std::io::ErrorKind::Interrupted {
        EnvlinkError::UserCancelled {
            message: "prompt interrupted".to_string(),
        }
    } else {
        EnvlinkError::Io(io)
    }
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt.default.as_deref().map(parse_bool).unwrap_or(true);

    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    // An empty answer is meaningful (it resets the executable field).
    let input = Input::<String>::new()
        .with_prompt(&prompt.question)
        .allow_empty(true);

    let result: String = match &prompt.default {
        Some(default) => input
            .default(default.clone())
            .interact_text_on(term)
            .map_err(map_dialoguer_err)?,
        None => input.interact_text_on(term).map_err(map_dialoguer_err)?,
    };

    Ok(PromptResult::String(result))
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    options
        .get(selection)
        .map(|o| PromptResult::String(o.value.clone()))
        .ok_or_else(|| {
            anyhow::anyhow!("selection {} out of range for '{}'", selection, prompt.key).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_prompt_is_cancellation() {
        let err = map_dialoguer_err(dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "ctrl-c",
        )));
        assert!(err.is_cancellation());
    }

    #[test]
    fn other_prompt_errors_are_io() {
        let err = map_dialoguer_err(dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "closed",
        )));
        assert!(matches!(err, EnvlinkError::Io(_)));
    }
}
