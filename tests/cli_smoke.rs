//! Behavioural smoke tests for the CLI entrypoint.

use std::io::Write as _;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn cli_without_arguments_prints_usage_and_fails() {
    let mut cmd = cargo_bin_cmd!("netreap");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_both_subcommands() {
    let mut cmd = cargo_bin_cmd!("netreap");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn delete_with_an_empty_request_exits_cleanly() {
    let mut request = tempfile::NamedTempFile::new().expect("temp file should create");
    request
        .write_all(b"{}")
        .expect("request file should be writable");

    let mut cmd = cargo_bin_cmd!("netreap");
    cmd.env_remove("NETREAP_WEBHOOK_URL");
    cmd.arg("delete")
        .arg("--request")
        .arg(request.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("succeeded=0, failed=0"));
}

#[test]
fn delete_reads_the_request_from_stdin() {
    let mut cmd = cargo_bin_cmd!("netreap");
    cmd.env_remove("NETREAP_WEBHOOK_URL");
    cmd.arg("delete").write_stdin("{}");
    cmd.assert().success();
}

#[test]
fn delete_rejects_a_malformed_request() {
    let mut cmd = cargo_bin_cmd!("netreap");
    cmd.arg("delete").write_stdin("not json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("request"));
}
