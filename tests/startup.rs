//! Startup failures must stop the binary before it binds a listener

use assert_cmd::Command;
use predicates::prelude::*;

fn app() -> Command {
    let mut cmd = Command::cargo_bin("demo-app").unwrap();
    cmd.env_remove("MONGODB_URI")
        .env_remove("MONGODB_DATABASE")
        .env_remove("DEBUG_EXPOSE_CREDENTIALS")
        .timeout(std::time::Duration::from_secs(10));
    cmd
}

#[test]
fn test_missing_uri_exits_non_zero() {
    app()
        .assert()
        .failure()
        .stderr(predicate::str::contains("MONGODB_URI is required"));
}

#[test]
fn test_empty_uri_exits_non_zero() {
    app()
        .env("MONGODB_URI", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MONGODB_URI is required"));
}

#[test]
fn test_malformed_uri_exits_non_zero() {
    app()
        .env("MONGODB_URI", "not-a-connection-string")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MongoDB connection error"))
        .stdout(predicate::str::contains("App is running").not());
}
