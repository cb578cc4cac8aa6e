//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_serve() {
    let mut cmd = Command::cargo_bin("dailydo").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("dailydo").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Database URL"))
        .stdout(predicate::str::contains("--pool-recycle-secs"))
        .stdout(predicate::str::contains("--in-memory"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let dir = std::env::temp_dir();
    let mut cmd = Command::cargo_bin("dailydo").unwrap();
    cmd.current_dir(dir)
        .env_remove("DATABASE_URL")
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_serve_rejects_unsupported_scheme() {
    let dir = std::env::temp_dir();
    let mut cmd = Command::cargo_bin("dailydo").unwrap();
    cmd.current_dir(dir)
        .env("DATABASE_URL", "mysql://u@localhost/todos")
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect to database"));
}
