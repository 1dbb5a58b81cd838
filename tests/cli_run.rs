//! E2E: present -> absent via the binary, JSON result on stdout.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn present_then_absent() {
    let dir = common::temp_dir();
    let hosts_path = common::hosts_with(&dir, "127.0.0.1\tlocalhost\n");
    let hosts_arg = hosts_path.to_str().unwrap();

    let out = Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--hostsfile", hosts_arg, "-d", "172.0.0.100=pietje,lala,lala.lala"])
        .args(["-d", "172.0.0.101=fred"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let result: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(result["changed"], true);
    assert_eq!(result["hostsfile"], hosts_arg);

    let content = common::read(&hosts_path);
    assert!(content.starts_with("127.0.0.1\tlocalhost\n"));
    assert!(content.contains(&common::line("172.0.0.100", "pietje lala lala.lala")));

    Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--hostsfile", hosts_arg, "--state", "absent", "-d", "172.0.0.100=lala"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"changed\":true"));

    assert!(common::read(&hosts_path).contains(&common::line("172.0.0.100", "pietje lala.lala")));

    // Same again: nothing to do.
    Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--hostsfile", hosts_arg, "--state", "absent", "-d", "172.0.0.100=lala"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"changed\":false"));
}

#[test]
fn hosts_file_env_sets_default_path() {
    let dir = common::temp_dir();
    let hosts_path = common::hosts_with(&dir, "");

    Command::cargo_bin("hosts-file")
        .unwrap()
        .env("HOSTS_FILE", &hosts_path)
        .args(["-d", "10.0.0.1=api.test"])
        .assert()
        .success();

    assert_eq!(
        common::read(&hosts_path),
        format!("{}\n", common::line("10.0.0.1", "api.test"))
    );
}

#[test]
fn missing_file_fails_with_exit_1() {
    let dir = common::temp_dir();
    let hosts_path = dir.path().join("missing");

    Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--hostsfile", hosts_path.to_str().unwrap(), "-d", "10.0.0.1=a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: cannot access"));
}

#[test]
fn malformed_definition_fails_before_writing() {
    let dir = common::temp_dir();
    let hosts_path = common::hosts_with(&dir, "10.0.0.1 a\n");

    Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--hostsfile", hosts_path.to_str().unwrap()])
        .args(["-d", "10.0.0.2=b", "-d", "not-an-ip=c"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid definition"));

    assert_eq!(common::read(&hosts_path), "10.0.0.1 a\n");
}

#[test]
fn debuglog_records_edits() {
    let dir = common::temp_dir();
    let hosts_path = common::hosts_with(&dir, "");
    let log_path = dir.path().join("debug.log");

    Command::cargo_bin("hosts-file")
        .unwrap()
        .args(["--hostsfile", hosts_path.to_str().unwrap(), "-d", "10.0.0.1=api.test"])
        .args(["--debuglog", log_path.to_str().unwrap()])
        .assert()
        .success();

    let log = common::read(&log_path);
    assert!(log.contains("add hostname"));
    assert!(log.contains("api.test"));
    assert!(log.contains("hosts file written"));
}
