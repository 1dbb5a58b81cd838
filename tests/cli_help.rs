//! CLI help succeeds and documents every parameter.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn hosts_file_help() {
    Command::cargo_bin("hosts-file")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--hostsfile")
                .and(predicate::str::contains("--state"))
                .and(predicate::str::contains("--definition"))
                .and(predicate::str::contains("--defaults"))
                .and(predicate::str::contains("--debuglog"))
                .and(predicate::str::contains("--params")),
        );
}

#[test]
fn bad_state_value_is_a_usage_error() {
    Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--state", "gone"])
        .assert()
        .failure();
}
