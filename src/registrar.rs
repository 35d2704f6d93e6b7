//! Registration of a provisioned interpreter.

use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::registry::{RegisteredEnvironment, SdkRegistry};
use crate::tool::ToolKind;

/// Register `interpreter` and associate it with `project`.
///
/// An entry that already points at the same interpreter is reused rather
/// than duplicated, but only while it is untagged or already belongs to
/// `project` under `kind`. An entry owned by another tool or project is
/// left alone and a separate entry is added. A fresh entry gets
/// `suggested_name`, suffixed with " (2)", " (3)", ... when taken.
pub fn register(
    interpreter: &Path,
    registry: &mut dyn SdkRegistry,
    project: &Path,
    suggested_name: &str,
    kind: ToolKind,
) -> Result<RegisteredEnvironment> {
    let existing = registry.list_all()?;

    let reusable = existing
        .iter()
        .find(|e| e.interpreter == interpreter && is_reusable(e, project, kind));

    let name = match reusable {
        Some(entry) => {
            debug!(
                "Reusing registered interpreter '{}' for {}",
                entry.name,
                interpreter.display()
            );
            entry.name.clone()
        }
        None => {
            let name = unique_name(suggested_name, &existing);
            if let Err(e) = registry.add(RegisteredEnvironment::new(&name, interpreter)) {
                warn!(
                    "Failed to register {} as '{}': {}",
                    interpreter.display(),
                    name,
                    e
                );
                return Err(e);
            }
            name
        }
    };

    registry.associate(&name, project, kind).inspect_err(|e| {
        warn!(
            "Failed to associate '{}' with {}: {}",
            name,
            project.display(),
            e
        );
    })
}

fn is_reusable(entry: &RegisteredEnvironment, project: &Path, kind: ToolKind) -> bool {
    match (&entry.kind, &entry.associated_project) {
        (None, None) => true,
        (Some(_), Some(_)) => entry.is_kind(kind) && entry.is_associated_with(project),
        _ => false,
    }
}

fn unique_name(suggested: &str, existing: &[RegisteredEnvironment]) -> String {
    let taken = |name: &str| existing.iter().any(|e| e.name == name);
    if !taken(suggested) {
        return suggested.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", suggested, n))
        .find(|name| !taken(name))
        .unwrap_or_else(|| suggested.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    #[test]
    fn registers_and_associates() {
        let mut registry = MemoryRegistry::new();
        let env = register(
            Path::new("/repo/proj/.venv/bin/python"),
            &mut registry,
            Path::new("/repo/proj"),
            "Poetry (proj)",
            ToolKind::Poetry,
        )
        .unwrap();

        assert_eq!(env.name, "Poetry (proj)");
        assert!(env.is_kind(ToolKind::Poetry));
        assert!(env.is_associated_with(Path::new("/repo/proj")));
        assert_eq!(registry.entries().len(), 1);
    }

    #[test]
    fn same_interpreter_is_reused() {
        let mut registry = MemoryRegistry::with_entries(vec![RegisteredEnvironment::new(
            "Python 3.12 (venv)",
            "/repo/proj/.venv/bin/python",
        )]);

        let env = register(
            Path::new("/repo/proj/.venv/bin/python"),
            &mut registry,
            Path::new("/repo/proj"),
            "Pipenv (proj)",
            ToolKind::Pipenv,
        )
        .unwrap();

        assert_eq!(env.name, "Python 3.12 (venv)");
        assert!(env.is_kind(ToolKind::Pipenv));
        assert_eq!(registry.entries().len(), 1);
    }

    #[test]
    fn taken_name_gets_suffix() {
        let mut registry = MemoryRegistry::with_entries(vec![
            RegisteredEnvironment::new("Pipenv (proj)", "/elsewhere/bin/python"),
            RegisteredEnvironment::new("Pipenv (proj) (2)", "/other/bin/python"),
        ]);

        let env = register(
            Path::new("/repo/proj/venv/bin/python"),
            &mut registry,
            Path::new("/repo/proj"),
            "Pipenv (proj)",
            ToolKind::Pipenv,
        )
        .unwrap();

        assert_eq!(env.name, "Pipenv (proj) (3)");
    }

    #[test]
    fn other_tools_entry_is_not_taken_over() {
        let mut registry = MemoryRegistry::with_entries(vec![RegisteredEnvironment::new(
            "Poetry (proj)",
            "/repo/proj/.venv/bin/python",
        )
        .associated("/repo/proj", ToolKind::Poetry)]);

        let env = register(
            Path::new("/repo/proj/.venv/bin/python"),
            &mut registry,
            Path::new("/repo/proj"),
            "Pipenv (proj)",
            ToolKind::Pipenv,
        )
        .unwrap();

        assert_eq!(env.name, "Pipenv (proj)");
        assert!(env.is_kind(ToolKind::Pipenv));
        assert_eq!(registry.entries().len(), 2);

        let poetry = registry.get("Poetry (proj)").unwrap();
        assert!(poetry.is_kind(ToolKind::Poetry));
        assert!(poetry.is_associated_with(Path::new("/repo/proj")));
        assert!(crate::conflict::find_conflict(
            Some(Path::new("/repo/proj")),
            registry.entries(),
            ToolKind::Poetry
        )
        .is_some());
    }

    #[test]
    fn other_projects_entry_is_not_taken_over() {
        let mut registry = MemoryRegistry::with_entries(vec![RegisteredEnvironment::new(
            "Pipenv (a)",
            "/venvs/shared/bin/python",
        )
        .associated("/repo/a", ToolKind::Pipenv)]);

        let env = register(
            Path::new("/venvs/shared/bin/python"),
            &mut registry,
            Path::new("/repo/b"),
            "Pipenv (b)",
            ToolKind::Pipenv,
        )
        .unwrap();

        assert_eq!(env.name, "Pipenv (b)");
        assert!(env.is_associated_with(Path::new("/repo/b")));
        assert_eq!(registry.entries().len(), 2);

        let original = registry.get("Pipenv (a)").unwrap();
        assert!(original.is_associated_with(Path::new("/repo/a")));
    }
}
