//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn help_lists_the_lifecycle_subcommands() {
    let mut cmd = cargo_bin_cmd!("volya");
    cmd.arg("--help");
    cmd.assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("attach"))
            .and(predicate::str::contains("detach"))
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("list")),
    );
}

#[test]
fn missing_subcommand_fails_with_usage() {
    let mut cmd = cargo_bin_cmd!("volya");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
