//! Integration tests for the kitup binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Settings that keep a run inside the temp directory.
fn settings(temp: &TempDir) -> String {
    format!(
        r#"
settings:
  builtin: false
  allow_unsupported_os: true
  preflight: false
  profile: {}
"#,
        temp.path().join(".profile").display()
    )
}

fn setup_project(capabilities: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let kitup_dir = temp.path().join(".kitup");
    fs::create_dir_all(&kitup_dir).unwrap();
    let config = format!("{}\n{}", settings(&temp), capabilities);
    fs::write(kitup_dir.join("config.yml"), config).unwrap();
    temp
}

const MARKERS: &str = r#"
capabilities:
  - name: base
    detect: { type: file, path: base.ok }
    install: { type: shell, command: touch base.ok }
  - name: app
    requires: [base]
    detect: { type: file, path: app.ok }
    install: { type: shell, command: touch app.ok }
"#;

const BROKEN: &str = r#"
capabilities:
  - name: good
    detect: { type: file, path: good.ok }
    install: { type: shell, command: touch good.ok }
  - name: broken
    detect: { type: file, path: never.ok }
    install: { type: shell, command: "exit 3" }
    remediation: Fix the broken thing by hand
"#;

const CYCLE: &str = r#"
capabilities:
  - name: a
    requires: [b]
    detect: { type: file, path: a.ok }
    install: { type: shell, command: touch a.ok }
  - name: b
    requires: [a]
    detect: { type: file, path: b.ok }
    install: { type: shell, command: touch b.ok }
"#;

fn kitup(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("kitup"));
    cmd.current_dir(temp.path()).env("CI", "true");
    cmd
}

#[test]
fn run_provisions_missing_capabilities() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    kitup(&temp)
        .args(["run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment ready"));

    assert!(temp.path().join("base.ok").exists());
    assert!(temp.path().join("app.ok").exists());
    Ok(())
}

#[test]
fn no_subcommand_runs_provisioning() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    kitup(&temp).assert().success();
    assert!(temp.path().join("app.ok").exists());
    Ok(())
}

#[test]
fn second_run_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    kitup(&temp).args(["run", "--yes"]).assert().success();

    kitup(&temp)
        .args(["run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base: already satisfied"))
        .stdout(predicate::str::contains("app: already satisfied"));
    Ok(())
}

#[test]
fn failed_capability_exits_nonzero_with_remediation() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(BROKEN);
    kitup(&temp)
        .args(["run", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken failed"))
        .stdout(predicate::str::contains("Fix the broken thing by hand"));

    assert!(temp.path().join("good.ok").exists());
    Ok(())
}

#[test]
fn cycle_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(CYCLE);
    kitup(&temp)
        .args(["run", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Circular dependency"));

    assert!(!temp.path().join("a.ok").exists());
    assert!(!temp.path().join("b.ok").exists());
    Ok(())
}

#[test]
fn invalid_yaml_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join(".kitup"))?;
    fs::write(
        temp.path().join(".kitup/config.yml"),
        "capabilities: [unclosed",
    )?;

    kitup(&temp).arg("check").assert().code(2);
    Ok(())
}

#[test]
fn missing_explicit_config_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    kitup(&temp)
        .args(["--config", "nowhere.yml", "list"])
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn check_reports_then_passes_after_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    kitup(&temp)
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("base"));

    // Check never installs.
    assert!(!temp.path().join("base.ok").exists());

    kitup(&temp).args(["run", "--yes"]).assert().success();
    kitup(&temp)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All capabilities satisfied"));
    Ok(())
}

#[test]
fn run_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    let output = kitup(&temp).args(["run", "--yes", "--json"]).output()?;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["overall"], "success");
    assert_eq!(json["results"][0]["capability"], "base");
    assert_eq!(json["results"][1]["outcome"], "installed");
    Ok(())
}

#[test]
fn report_file_is_written() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(BROKEN);
    let report = temp.path().join("out/report.json");
    kitup(&temp)
        .args(["run", "--yes", "--report"])
        .arg(&report)
        .assert()
        .code(1);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report)?)?;
    assert_eq!(json["overall"], "partial_failure");
    Ok(())
}

#[test]
fn dry_run_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    kitup(&temp)
        .args(["run", "--dry-run"])
        .assert()
        .stdout(predicate::str::contains("touch base.ok"));

    assert!(!temp.path().join("base.ok").exists());
    Ok(())
}

#[test]
fn list_shows_install_order() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MARKERS);
    let output = kitup(&temp).arg("list").output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let base = stdout.find("1. base").expect("base listed");
    let app = stdout.find("2. app").expect("app listed");
    assert!(base < app);
    assert!(stdout.contains("(requires: base)"));
    Ok(())
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitup"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Declarative"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitup"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitup"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("kitup"));
    Ok(())
}

#[test]
fn unknown_subcommand_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitup"));
    cmd.arg("frobnicate");
    cmd.assert().failure();
    Ok(())
}
