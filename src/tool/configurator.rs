//! Per-tool entry points to the add-environment workflow.

use std::path::Path;

use super::{PyProject, ToolKind};
use crate::error::Result;
use crate::registry::RegisteredEnvironment;
use crate::ui::UserInterface;
use crate::workflow::{AddOptions, Collaborators, Workflow};

/// Knows when a tool applies to a project and how to describe the action.
pub trait SdkConfigurator {
    /// Tool this configurator drives.
    fn kind(&self) -> ToolKind;

    /// Whether the project looks like it is managed by this tool.
    fn is_applicable(&self, project: &Path) -> bool {
        project.join(self.kind().manifest_file()).is_file()
    }

    /// One-line description of what adding the environment will do.
    fn intention_name(&self, project: &Path) -> String;

    /// Run the add-environment workflow for `project`.
    fn create_and_add(
        &self,
        project: &Path,
        options: AddOptions,
        deps: &mut Collaborators<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<RegisteredEnvironment> {
        Workflow::new(self.kind(), project, options).run(deps, ui)
    }
}

fn project_dir_name(project: &Path) -> String {
    project
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| project.display().to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipenvConfigurator;

impl SdkConfigurator for PipenvConfigurator {
    fn kind(&self) -> ToolKind {
        ToolKind::Pipenv
    }

    fn intention_name(&self, project: &Path) -> String {
        let pipfile = project.join(ToolKind::Pipenv.manifest_file());
        if pipfile.is_file() {
            format!("Create a Pipenv environment using {}", pipfile.display())
        } else {
            format!("Create a Pipenv environment for {}", project_dir_name(project))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoetryConfigurator;

impl SdkConfigurator for PoetryConfigurator {
    fn kind(&self) -> ToolKind {
        ToolKind::Poetry
    }

    fn intention_name(&self, project: &Path) -> String {
        let name = PyProject::load(project)
            .ok()
            .flatten()
            .and_then(|p| p.name)
            .unwrap_or_else(|| project_dir_name(project));
        format!("Create a Poetry environment for {}", name)
    }
}

/// The configurator for `kind`.
pub fn configurator_for(kind: ToolKind) -> Box<dyn SdkConfigurator> {
    match kind {
        ToolKind::Pipenv => Box::new(PipenvConfigurator),
        ToolKind::Poetry => Box::new(PoetryConfigurator),
    }
}

/// Every configurator that applies to `project`, in [`ToolKind::ALL`] order.
pub fn applicable_configurators(project: &Path) -> Vec<Box<dyn SdkConfigurator>> {
    ToolKind::ALL
        .iter()
        .map(|kind| configurator_for(*kind))
        .filter(|c| c.is_applicable(project))
        .collect()
}
