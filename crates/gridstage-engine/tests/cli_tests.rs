use assert_cmd::Command as AssertCommand;
use gridstage_engine::error::exit_codes;
use predicates::prelude::*;
use tempfile::tempdir;

fn cmd() -> AssertCommand {
    AssertCommand::new(env!("CARGO_BIN_EXE_gridstage"))
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    cmd()
        .assert()
        .failure()
        .code(exit_codes::INVALID_INPUT)
        .stderr(predicate::str::contains("--run-id"));
}

#[test]
fn test_unknown_step_type_is_rejected_before_staging() {
    let dir = tempdir().unwrap();

    cmd()
        .arg("--run-id")
        .arg("1")
        .arg("--run-dir")
        .arg(dir.path())
        .arg("--step-type")
        .arg("teardown")
        .assert()
        .failure()
        .code(exit_codes::INVALID_INPUT)
        .stderr(predicate::str::contains("invalid staging step type"));

    // Rejected input never reaches the filesystem.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unknown_workflow_type_is_rejected() {
    let dir = tempdir().unwrap();

    cmd()
        .arg("--run-id")
        .arg("1")
        .arg("--run-dir")
        .arg(dir.path())
        .arg("--step-type")
        .arg("initial")
        .arg("--workflow-type")
        .arg("SMOKE")
        .assert()
        .failure()
        .code(exit_codes::INVALID_INPUT)
        .stderr(predicate::str::contains("invalid workflow type"));
}

#[test]
fn test_unreachable_store_maps_to_db_error() {
    let dir = tempdir().unwrap();

    cmd()
        .env("SUPERVISOR_API_URL", "http://127.0.0.1:1")
        .arg("--run-id")
        .arg("1")
        .arg("--run-dir")
        .arg(dir.path())
        .arg("--step-type")
        .arg("initial")
        .assert()
        .failure()
        .code(exit_codes::DB_ERROR);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_help_describes_the_step() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Two-phase staging step"));
}
