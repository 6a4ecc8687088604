//! CLI tests for the contact CRUD commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn safeline(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("safeline").unwrap();
    cmd.arg("--home").arg(home.path());
    cmd
}

#[test]
fn test_list_empty() {
    let home = TempDir::new().unwrap();
    safeline(&home)
        .args(["contacts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts added yet"));
}

#[test]
fn test_add_then_list() {
    let home = TempDir::new().unwrap();

    safeline(&home)
        .args(["contacts", "add", "Alice", "9000000001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact added successfully"));

    safeline(&home)
        .args(["contacts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("9000000001"));
}

#[test]
fn test_list_json_format() {
    let home = TempDir::new().unwrap();

    safeline(&home)
        .args(["contacts", "add", "Alice", "9000000001"])
        .assert()
        .success();

    safeline(&home)
        .args(["contacts", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Name\": \"Alice\""));
}

#[test]
fn test_add_rejects_empty_fields() {
    let home = TempDir::new().unwrap();

    safeline(&home)
        .args(["contacts", "add", "Alice", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation error"));
}

#[test]
fn test_rm_with_force() {
    let home = TempDir::new().unwrap();

    safeline(&home)
        .args(["contacts", "add", "Alice", "9000000001"])
        .assert()
        .success();

    safeline(&home)
        .args(["contacts", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Id\": 1"));

    safeline(&home)
        .args(["contacts", "rm", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact deleted successfully"));

    safeline(&home)
        .args(["contacts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts added yet"));
}

#[test]
fn test_rm_unknown_id_fails() {
    let home = TempDir::new().unwrap();

    safeline(&home)
        .args(["contacts", "rm", "42", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no contact with id 42"));
}

#[test]
fn test_rm_declined_prompt_aborts() {
    let home = TempDir::new().unwrap();

    safeline(&home)
        .args(["contacts", "add", "Alice", "9000000001"])
        .assert()
        .success();

    safeline(&home)
        .args(["contacts", "rm", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted"));

    safeline(&home)
        .args(["contacts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"));
}
