//! Detection of environments already registered for a project.

use std::path::Path;

use crate::error::EnvlinkError;
use crate::registry::RegisteredEnvironment;
use crate::tool::ToolKind;

/// First registered environment of `kind` associated with `project`.
///
/// Pipenv and poetry environments never conflict with each other, and
/// without a project path there is nothing to conflict with.
pub fn find_conflict<'a>(
    project: Option<&Path>,
    existing: &'a [RegisteredEnvironment],
    kind: ToolKind,
) -> Option<&'a RegisteredEnvironment> {
    let project = project?;
    existing
        .iter()
        .find(|env| env.is_kind(kind) && env.is_associated_with(project))
}

/// The error reported when `conflict` blocks adding a `kind` environment.
pub fn conflict_error(conflict: &RegisteredEnvironment, kind: ToolKind) -> EnvlinkError {
    EnvlinkError::AlreadyRegisteredConflict {
        tool: kind,
        existing: conflict.name.clone(),
        project: conflict.associated_project.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str, project: &str, kind: ToolKind) -> RegisteredEnvironment {
        RegisteredEnvironment::new(name, format!("{}/.venv/bin/python", project))
            .associated(project, kind)
    }

    #[test]
    fn no_project_never_conflicts() {
        let existing = vec![env("Pipenv (a)", "/a", ToolKind::Pipenv)];
        assert!(find_conflict(None, &existing, ToolKind::Pipenv).is_none());
    }

    #[test]
    fn same_project_same_kind_conflicts() {
        let existing = vec![
            env("Poetry (a)", "/a", ToolKind::Poetry),
            env("Pipenv (a)", "/a", ToolKind::Pipenv),
        ];
        let found = find_conflict(Some(Path::new("/a")), &existing, ToolKind::Pipenv).unwrap();
        assert_eq!(found.name, "Pipenv (a)");
    }

    #[test]
    fn other_kind_does_not_conflict() {
        let existing = vec![env("Poetry (a)", "/a", ToolKind::Poetry)];
        assert!(find_conflict(Some(Path::new("/a")), &existing, ToolKind::Pipenv).is_none());
    }

    #[test]
    fn other_project_does_not_conflict() {
        let existing = vec![env("Pipenv (b)", "/b", ToolKind::Pipenv)];
        assert!(find_conflict(Some(Path::new("/a")), &existing, ToolKind::Pipenv).is_none());
    }

    #[test]
    fn untagged_interpreter_does_not_conflict() {
        let mut plain = RegisteredEnvironment::new("Python 3", "/usr/bin/python3");
        plain.associated_project = Some("/a".into());
        assert!(find_conflict(Some(Path::new("/a")), &[plain], ToolKind::Poetry).is_none());
    }

    #[test]
    fn conflict_error_names_environment() {
        let existing = env("Poetry (a)", "/a", ToolKind::Poetry);
        let msg = conflict_error(&existing, ToolKind::Poetry).to_string();
        assert!(msg.contains("Poetry (a)"));
        assert!(msg.contains("/a"));
    }
}
