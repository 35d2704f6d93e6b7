//! Integration tests for the envlink binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `envlink` with its state directory inside `home`.
fn envlink(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("envlink"));
    cmd.env("ENVLINK_HOME", home.path().join("state"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("envlink"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Pipenv and Poetry environments"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("envlink"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("envlink"));
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_list_empty_registry() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    envlink(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No environments registered"));
    Ok(())
}

#[test]
fn cli_list_json_empty() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    envlink(&home)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
    Ok(())
}

#[test]
fn cli_check_missing_executable() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let missing = home.path().join("no-such-pipenv");
    envlink(&home)
        .current_dir(home.path())
        .args(["check", "--tool", "pipenv", "--executable"])
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn cli_add_without_project_files_needs_tool() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    envlink(&home)
        .current_dir(home.path())
        .args(["add", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tool"));
    Ok(())
}

#[test]
fn cli_remove_unknown_name() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    envlink(&home)
        .args(["remove", "Pipenv (nothing)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No environment named"));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("envlink"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("envlink"));
    Ok(())
}

#[cfg(unix)]
mod with_fake_pipenv {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    struct Setup {
        home: TempDir,
        project: PathBuf,
        pipenv: PathBuf,
    }

    /// A Pipfile project and a `pipenv` script that reports a venv python.
    fn setup() -> Setup {
        let home = TempDir::new().unwrap();
        let project = home.path().join("proj");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("Pipfile"), "[packages]\n").unwrap();

        let python = home.path().join("venvs").join("proj").join("bin").join("python");
        fs::create_dir_all(python.parent().unwrap()).unwrap();
        fs::write(&python, "").unwrap();

        let pipenv = home.path().join("pipenv");
        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--py\" ]; then echo \"{}\"; fi\nif [ \"$1\" = \"--version\" ]; then echo \"pipenv, version 2024.0.1\"; fi\nexit 0\n",
            python.display()
        );
        fs::write(&pipenv, script).unwrap();
        fs::set_permissions(&pipenv, fs::Permissions::from_mode(0o755)).unwrap();

        Setup {
            home,
            project,
            pipenv,
        }
    }

    fn add(setup: &Setup) -> assert_cmd::assert::Assert {
        envlink(&setup.home)
            .current_dir(&setup.project)
            .args(["add", "--yes", "--python", "python3", "--executable"])
            .arg(&setup.pipenv)
            .assert()
    }

    #[test]
    fn check_reports_version() {
        let setup = setup();
        envlink(&setup.home)
            .current_dir(&setup.project)
            .args(["check", "--executable"])
            .arg(&setup.pipenv)
            .assert()
            .success()
            .stdout(predicate::str::contains("2024.0.1"));
    }

    #[test]
    fn add_registers_environment() {
        let setup = setup();
        add(&setup)
            .success()
            .stdout(predicate::str::contains("Registered 'Pipenv (proj)'"));

        envlink(&setup.home)
            .args(["list", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kind\": \"pipenv\""));

        let settings = fs::read_to_string(setup.home.path().join("state").join("settings.yml"))
            .unwrap();
        assert!(settings.contains("pipenv"));
    }

    #[test]
    fn second_add_is_a_conflict() {
        let setup = setup();
        add(&setup).success();
        add(&setup)
            .failure()
            .code(1)
            .stderr(predicate::str::contains("already been added"));
    }

    #[test]
    fn remove_allows_adding_again() {
        let setup = setup();
        add(&setup).success();
        envlink(&setup.home)
            .args(["remove", "Pipenv (proj)"])
            .assert()
            .success();
        add(&setup).success();
    }
}
