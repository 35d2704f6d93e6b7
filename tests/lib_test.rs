//! Library integration tests.

use envlink::EnvlinkError;

#[test]
fn error_types_are_public() {
    let err = EnvlinkError::RegistrationRejected {
        name: "Poetry (api)".into(),
        message: "name already in use".into(),
    };
    assert!(err.to_string().contains("Poetry (api)"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> envlink::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use envlink::cli::{Cli, Commands};
    use envlink::tool::ToolKind;

    let cli = Cli::parse_from(["envlink", "list", "--json", "--tool", "poetry"]);

    if let Commands::List(args) = cli.command {
        assert!(args.json);
        assert_eq!(args.tool, Some(ToolKind::Poetry));
    } else {
        panic!("Expected List command");
    }
}

#[test]
fn registry_file_round_trips_through_disk() {
    use envlink::config::AppConfig;
    use envlink::registry::{FileRegistry, RegisteredEnvironment, SdkRegistry};
    use envlink::tool::ToolKind;
    use std::path::Path;

    let temp = tempfile::TempDir::new().unwrap();
    let config = AppConfig::with_home(temp.path());

    let mut registry = FileRegistry::load(&config.registry_path()).unwrap();
    registry
        .add(RegisteredEnvironment::new("Pipenv (web)", "/venvs/web/bin/python"))
        .unwrap();
    registry
        .associate("Pipenv (web)", Path::new("/src/web"), ToolKind::Pipenv)
        .unwrap();

    let reloaded = FileRegistry::load(&config.registry_path()).unwrap();
    let entries = reloaded.list_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_associated_with(Path::new("/src/web")));
    assert!(entries[0].is_kind(ToolKind::Pipenv));
}
