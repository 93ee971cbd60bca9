//! Integration tests for the propsteps CLI
//!
//! These tests run the actual binary against scripts written to a temp dir.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn propsteps_cmd() -> Command {
    let mut cmd = Command::cargo_bin("propsteps").unwrap();
    cmd.env_remove("PROPSTEPS_WAIT_TIMEOUT_MS").env("NO_COLOR", "1");
    cmd
}

fn write_script(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_help_flag() {
    propsteps_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_list_prints_phrases() {
    propsteps_cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"I call "..." with "...""#))
        .stdout(predicate::str::contains(r#"I wait for job "..." within "..." ms"#))
        .stdout(predicate::str::contains("is an array of objects with the following contents"));
}

#[test]
fn test_run_passing_script() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "pass.steps",
        r#"
# a passing script
Scenario: greeting
  Given I set "name" to "World"
  And I set "greeting" to "Hello {name}"
  Then "{greeting}" is "Hello World"
  And "{missing}" is null
"#,
    );

    propsteps_cmd()
        .current_dir(dir.path())
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("greeting"))
        .stdout(predicate::str::contains("1 scenarios (1 passed, 0 failed)"));
}

#[test]
fn test_run_failing_script_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "fail.steps",
        r#"
Scenario: wrong value
  Given I set "n" to "1"
  Then "{n}" is "2"
  And "{n}" is "1"

Scenario: fine
  Then "{n}" is null
"#,
    );

    propsteps_cmd()
        .current_dir(dir.path())
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("expected {n} to equal '2', got '1'"))
        .stdout(predicate::str::contains("2 scenarios (1 passed, 1 failed)"));
}

#[test]
fn test_run_reports_unknown_step_with_fix() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "unknown.steps", "Scenario: s\n  Given I juggle\n");

    propsteps_cmd()
        .current_dir(dir.path())
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout(predicate::str::contains("no step matches: I juggle"))
        .stdout(predicate::str::contains("propsteps list"));
}

#[test]
fn test_run_async_script() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "jobs.steps",
        r#"
Scenario: background job
  Given "fetch" is an async function returning "done"
  When I start "{fetch}" as "job"
  And I wait for job "job" within "1000" ms
  Then "{job}" is "done"
  And "{result}" is not an error
"#,
    );

    propsteps_cmd()
        .current_dir(dir.path())
        .arg("run")
        .arg(&script)
        .assert()
        .success();
}

#[test]
fn test_run_with_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("custom.toml"), "result_key = \"outcome\"\n").unwrap();
    let script = write_script(
        &dir,
        "config.steps",
        r#"
Scenario: custom result key
  Given "fetch" is an async function returning "value"
  When I wait for "{fetch}"
  Then "{outcome}" is "value"
  And "{result}" is null
"#,
    );

    propsteps_cmd()
        .current_dir(dir.path())
        .args(["run", "--config", "custom.toml"])
        .arg(&script)
        .assert()
        .success();
}

#[test]
fn test_run_missing_file() {
    propsteps_cmd()
        .args(["run", "/nonexistent/script.steps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("reading /nonexistent/script.steps"));
}

#[test]
fn test_run_orphan_table_is_script_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "bad.steps", "Scenario: s\n| a |\n");

    propsteps_cmd()
        .current_dir(dir.path())
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("script error at line 2"))
        .stderr(predicate::str::contains("Fix:"));
}
