//! Confirmation of the proposed environment configuration.
//!
//! The workflow shows a [`ProposedConfig`] to a [`Confirmer`], which either
//! returns the settings to use ([`EnvData`]) or `None` when the user
//! declines.

use std::path::PathBuf;

use crate::error::{EnvlinkError, Result};
use crate::locator::{self, ExecutableCandidate, Provenance, SearchPath};
use crate::tool::ToolKind;
use crate::ui::{Prompt, PromptType, UserInterface};
use crate::validator::{validate, ValidationOutcome};

/// How many invalid executable paths the prompt accepts before giving up.
pub const MAX_EDIT_ATTEMPTS: usize = 3;

/// What the user is asked to confirm.
#[derive(Debug, Clone)]
pub struct ProposedConfig {
    /// Tool that will create the environment.
    pub kind: ToolKind,
    /// Project directory.
    pub project: PathBuf,
    /// Located executable, if any.
    pub candidate: Option<ExecutableCandidate>,
    /// Validation outcome for `candidate`.
    pub validation: ValidationOutcome,
    /// What auto-detection alone would find; used when the field is cleared.
    pub detected: Option<PathBuf>,
    /// Default base interpreter.
    pub base_interpreter: String,
    /// Default for installing from the lock file.
    pub install_from_lock_file: bool,
    /// Whether the project has a manifest to install from.
    pub install_applicable: bool,
    /// One-line description of what will happen.
    pub intention: String,
}

impl ProposedConfig {
    /// Accept the proposal unchanged; `None` when there is no valid executable.
    pub fn accept(&self) -> Option<EnvData> {
        if !self.validation.is_valid() {
            return None;
        }
        Some(EnvData {
            executable: self.candidate.clone()?,
            base_interpreter: self.base_interpreter.clone(),
            install_from_lock_file: self.install_from_lock_file && self.install_applicable,
        })
    }
}

/// Confirmed settings, consumed by provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvData {
    /// Executable to run.
    pub executable: ExecutableCandidate,
    /// Base interpreter for the new environment.
    pub base_interpreter: String,
    /// Install locked dependencies after creation.
    pub install_from_lock_file: bool,
}

/// Confirmation surface.
pub trait Confirmer {
    /// Whether an invalid executable can still be fixed during confirmation.
    fn can_edit_executable(&self, ui: &dyn UserInterface) -> bool;

    /// Show the proposal. `Ok(None)` means the user declined.
    fn confirm(
        &mut self,
        proposal: &ProposedConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<EnvData>>;
}

/// Confirms through [`UserInterface`] prompts.
///
/// Prompt keys: `executable`, `base_interpreter`, `install_packages`, `confirm`.
#[derive(Debug, Clone, Default)]
pub struct PromptConfirmer;

impl PromptConfirmer {
    pub fn new() -> Self {
        Self
    }

    /// Ask for the executable until it validates.
    fn ask_executable(
        &self,
        proposal: &ProposedConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<ExecutableCandidate> {
        let mut current = proposal.candidate.clone();
        let mut outcome = proposal.validation.clone();

        if let (Some(detected), Some(candidate)) = (&proposal.detected, &current) {
            if candidate.provenance() != Provenance::AutoDetected {
                ui.show_hint(&format!("Auto-detected: {}", detected.display()));
            }
        }

        for attempt in 1..=MAX_EDIT_ATTEMPTS {
            if let Some(message) = outcome.message(proposal.kind) {
                ui.error(&message);
            }

            let default = current
                .as_ref()
                .map(|c| c.path().display().to_string())
                .or_else(|| proposal.detected.as_ref().map(|d| d.display().to_string()));
            let answer = ui.prompt(&Prompt {
                key: "executable".to_string(),
                question: format!("{} executable", proposal.kind.display_name()),
                prompt_type: PromptType::Input,
                default,
            })?;

            current = self.resolve_answer(proposal, current.as_ref(), &answer.as_string());
            outcome = validate(current.as_ref());

            if outcome.is_valid() {
                if let Some(candidate) = current {
                    return Ok(candidate);
                }
            }
            if attempt == MAX_EDIT_ATTEMPTS || !ui.is_interactive() {
                break;
            }
        }

        Err(outcome
            .to_error(proposal.kind)
            .unwrap_or(EnvlinkError::NoCandidateFound {
                tool: proposal.kind,
            }))
    }

    /// Turn the text typed into the executable field into a candidate.
    ///
    /// A blank field falls back to auto-detection; re-entering the shown
    /// path keeps its provenance.
    fn resolve_answer(
        &self,
        proposal: &ProposedConfig,
        current: Option<&ExecutableCandidate>,
        answer: &str,
    ) -> Option<ExecutableCandidate> {
        let answer = answer.trim();
        if answer.is_empty() {
            return proposal
                .detected
                .clone()
                .map(|path| ExecutableCandidate::new(path, Provenance::AutoDetected));
        }
        if let Some(candidate) = current {
            if candidate.path().as_os_str() == answer {
                return Some(candidate.clone());
            }
        }
        locator::locate(proposal.kind, Some(answer), None, &SearchPath::default())
    }
}

impl Confirmer for PromptConfirmer {
    fn can_edit_executable(&self, ui: &dyn UserInterface) -> bool {
        ui.is_interactive()
    }

    fn confirm(
        &mut self,
        proposal: &ProposedConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<EnvData>> {
        ui.show_header(&format!("Add {} environment", proposal.kind.display_name()));
        ui.message(&proposal.intention);

        let executable = self.ask_executable(proposal, ui)?;

        let base_interpreter = ui
            .prompt(&Prompt {
                key: "base_interpreter".to_string(),
                question: "Base interpreter".to_string(),
                prompt_type: PromptType::Input,
                default: Some(proposal.base_interpreter.clone()),
            })?
            .as_string();
        let base_interpreter = match base_interpreter.trim() {
            "" => proposal.base_interpreter.clone(),
            typed => typed.to_string(),
        };

        let install_from_lock_file = if proposal.install_applicable {
            let answer = ui.prompt(&Prompt {
                key: "install_packages".to_string(),
                question: format!(
                    "Install packages from {} / {}?",
                    proposal.kind.manifest_file(),
                    proposal.kind.lock_file()
                ),
                prompt_type: PromptType::Confirm,
                default: Some(proposal.install_from_lock_file.to_string()),
            })?;
            answer.as_bool().unwrap_or(proposal.install_from_lock_file)
        } else {
            false
        };

        let proceed = ui.prompt(&Prompt {
            key: "confirm".to_string(),
            question: format!("Create the {} environment?", proposal.kind.display_name()),
            prompt_type: PromptType::Confirm,
            default: Some("true".to_string()),
        })?;
        if proceed.as_bool() != Some(true) {
            return Ok(None);
        }

        Ok(Some(EnvData {
            executable,
            base_interpreter,
            install_from_lock_file,
        }))
    }
}

/// Accepts a valid proposal without asking.
///
/// An invalid executable still goes through the prompts when the UI is
/// interactive.
#[derive(Debug, Clone, Default)]
pub struct AutoConfirmer {
    fallback: PromptConfirmer,
}

impl AutoConfirmer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Confirmer for AutoConfirmer {
    fn can_edit_executable(&self, ui: &dyn UserInterface) -> bool {
        self.fallback.can_edit_executable(ui)
    }

    fn confirm(
        &mut self,
        proposal: &ProposedConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<EnvData>> {
        match proposal.accept() {
            Some(data) => Ok(Some(data)),
            None => self.fallback.confirm(proposal, ui),
        }
    }
}
