//! The add-environment workflow.
//!
//! One [`Workflow`] per "add environment" action, driven through these
//! phases:
//!
//! ```text
//! Idle -> Locating -> Validating -> Confirming -> Validating
//!      -> Provisioning -> Registering -> Done
//! ```
//!
//! Any phase from the first `Validating` on can end in `Failed`. `Done`
//! and `Failed` are terminal: a finished workflow refuses to run again.
//!
//! # Modules
//!
//! - [`confirm`] - The confirmation surface and what it is shown

pub mod confirm;

pub use confirm::{AutoConfirmer, Confirmer, EnvData, PromptConfirmer, ProposedConfig};

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::conflict::{conflict_error, find_conflict};
use crate::error::{EnvlinkError, Result};
use crate::locator::{self, ExecutableCandidate, Provenance, SearchPath};
use crate::provision::{self, CancellationToken, ProvisionRequest, ProvisionResult, ToolRunner};
use crate::registrar;
use crate::registry::{RegisteredEnvironment, SdkRegistry};
use crate::settings::PreferenceStore;
use crate::tool::{configurator_for, ToolKind};
use crate::ui::UserInterface;
use crate::validator::{validate, ValidationOutcome};

/// Workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Locating,
    Validating,
    Confirming,
    Provisioning,
    Registering,
    Done,
    Failed,
}

impl Phase {
    /// Whether the workflow has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Locating => "locating",
            Phase::Validating => "validating",
            Phase::Confirming => "confirming",
            Phase::Provisioning => "provisioning",
            Phase::Registering => "registering",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Caller-supplied inputs for one run.
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Executable path typed or passed on the command line.
    pub executable: Option<String>,

    /// Base interpreter; defaults to the remembered one, then PATH.
    pub base_interpreter: Option<String>,

    /// Install locked dependencies; defaults to "yes" when a manifest exists.
    pub install_from_lock_file: Option<bool>,

    /// Create the environment, or only locate an existing one.
    pub create_if_absent: bool,

    /// Directories searched for the tool and the base interpreter.
    pub search_path: SearchPath,

    /// Stops a running tool when set.
    pub cancel: CancellationToken,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            executable: None,
            base_interpreter: None,
            install_from_lock_file: None,
            create_if_absent: true,
            search_path: SearchPath::from_env(),
            cancel: CancellationToken::new(),
        }
    }
}

/// Everything the workflow reads from or writes to.
pub struct Collaborators<'a> {
    pub preferences: &'a mut dyn PreferenceStore,
    pub registry: &'a mut dyn SdkRegistry,
    pub runner: &'a dyn ToolRunner,
    pub confirmer: &'a mut dyn Confirmer,
}

/// One add-environment action.
#[derive(Debug)]
pub struct Workflow {
    kind: ToolKind,
    project: PathBuf,
    options: AddOptions,
    phase: Phase,
    history: Vec<Phase>,
    failure: Option<String>,
    preferences_dirty: bool,
}

impl Workflow {
    /// Create a workflow in the `Idle` phase.
    pub fn new(kind: ToolKind, project: impl Into<PathBuf>, options: AddOptions) -> Self {
        Self {
            kind,
            project: project.into(),
            options,
            phase: Phase::Idle,
            history: vec![Phase::Idle],
            failure: None,
            preferences_dirty: false,
        }
    }

    /// Current phase.
    pub fn state(&self) -> Phase {
        self.phase
    }

    /// Every phase entered so far, starting with `Idle`.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Why the workflow failed, once it has.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Tool this workflow adds an environment for.
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// Project directory.
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Run to completion.
    ///
    /// On failure the workflow ends in [`Phase::Failed`] and the error is
    /// returned; nothing is left half-registered.
    pub fn run(
        &mut self,
        deps: &mut Collaborators<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<RegisteredEnvironment> {
        if self.phase != Phase::Idle {
            return Err(anyhow::anyhow!(
                "{} workflow for {} already ran (state: {})",
                self.kind,
                self.project.display(),
                self.phase
            )
            .into());
        }

        let outcome = self.drive(deps, ui);

        if self.preferences_dirty {
            if let Err(e) = deps.preferences.persist() {
                warn!("Failed to save preferences: {}", e);
            }
        }

        match outcome {
            Ok(env) => {
                self.transition(Phase::Done);
                Ok(env)
            }
            Err(e) => {
                self.failure = Some(e.to_string());
                self.transition(Phase::Failed);
                Err(e)
            }
        }
    }

    fn transition(&mut self, to: Phase) {
        debug!("{} workflow: {} -> {}", self.kind, self.phase, to);
        self.phase = to;
        self.history.push(to);
    }

    fn check_conflicts(&self, registry: &dyn SdkRegistry) -> Result<()> {
        let existing = registry.list_all()?;
        match find_conflict(Some(&self.project), &existing, self.kind) {
            Some(conflict) => Err(conflict_error(conflict, self.kind)),
            None => Ok(()),
        }
    }

    fn proposal(
        &self,
        candidate: Option<ExecutableCandidate>,
        validation: ValidationOutcome,
        preferences: &dyn PreferenceStore,
    ) -> ProposedConfig {
        let search = &self.options.search_path;
        let base_interpreter = self
            .options
            .base_interpreter
            .clone()
            .or_else(|| preferences.preferred_base_interpreter())
            .or_else(|| {
                locator::detect_base_interpreter(search).map(|p| p.display().to_string())
            })
            .unwrap_or_else(|| locator::system_python_cmd().to_string());

        let install_applicable = self.project.join(self.kind.manifest_file()).is_file();

        ProposedConfig {
            kind: self.kind,
            project: self.project.clone(),
            candidate,
            validation,
            detected: locator::detect_executable(self.kind, search),
            base_interpreter,
            install_from_lock_file: install_applicable
                && self.options.install_from_lock_file.unwrap_or(true),
            install_applicable,
            intention: configurator_for(self.kind).intention_name(&self.project),
        }
    }

    fn drive(
        &mut self,
        deps: &mut Collaborators<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<RegisteredEnvironment> {
        let kind = self.kind;

        self.transition(Phase::Locating);
        let remembered = deps.preferences.executable_path(kind);
        let candidate = locator::locate(
            kind,
            self.options.executable.as_deref(),
            remembered.as_deref(),
            &self.options.search_path,
        );
        if let Some(c) = &candidate {
            debug!("Located {} at {} ({})", kind, c.path().display(), c.provenance());
        }

        self.transition(Phase::Validating);
        let validation = validate(candidate.as_ref());
        self.check_conflicts(deps.registry)?;
        if !validation.is_valid() && !deps.confirmer.can_edit_executable(ui) {
            return Err(validation
                .to_error(kind)
                .unwrap_or(EnvlinkError::NoCandidateFound { tool: kind }));
        }

        self.transition(Phase::Confirming);
        let proposal = self.proposal(candidate, validation, deps.preferences);
        let Some(data) = deps.confirmer.confirm(&proposal, ui)? else {
            return Err(EnvlinkError::UserCancelled {
                message: format!("{} environment was not added", kind.display_name()),
            });
        };

        let remembered_path = match data.executable.provenance() {
            Provenance::AutoDetected => None,
            _ => Some(data.executable.path().display().to_string()),
        };
        deps.preferences
            .set_executable_path(kind, remembered_path.as_deref());
        self.preferences_dirty = true;

        self.transition(Phase::Validating);
        validate(Some(&data.executable)).into_result(kind)?;
        self.check_conflicts(deps.registry)?;

        self.transition(Phase::Provisioning);
        let request = ProvisionRequest {
            kind,
            project: self.project.clone(),
            executable: data.executable.path().to_path_buf(),
            base_interpreter: Some(data.base_interpreter.clone()),
            create_if_absent: self.options.create_if_absent,
            install_from_lock_file: data.install_from_lock_file,
        };
        let mut spinner = ui.start_spinner(&format!(
            "Setting up {} environment...",
            kind.display_name()
        ));
        let result = provision::provision(&request, deps.runner, &self.options.cancel);
        match &result {
            ProvisionResult::Created(path) => {
                spinner.finish_success(&format!("Environment ready: {}", path.display()))
            }
            ProvisionResult::Cancelled => spinner.finish_skipped("Cancelled"),
            _ => spinner.finish_error(&format!("{} failed", kind.display_name())),
        }
        let interpreter = result.into_result(kind, &self.project)?;

        self.transition(Phase::Registering);
        let env = registrar::register(
            &interpreter,
            deps.registry,
            &self.project,
            &kind.suggested_sdk_name(&self.project),
            kind,
        )?;

        deps.preferences
            .set_preferred_base_interpreter(Some(&data.base_interpreter));
        Ok(env)
    }
}
