//! Argument-parsing and local-error-path tests that don't require network
//! access — every command below fails before a repository is ever touched.

use assert_cmd::Command;
use predicates::prelude::*;

fn jgo_cmd() -> Command {
    Command::cargo_bin("jgo").unwrap()
}

#[test]
fn no_subcommand_prints_usage_and_fails() {
    jgo_cmd().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn resolve_rejects_malformed_endpoint() {
    jgo_cmd()
        .args(["resolve", "not-a-coordinate"])
        .assert()
        .failure();
}

#[test]
fn build_with_missing_project_file_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    jgo_cmd()
        .current_dir(tmp.path())
        .args(["build"])
        .assert()
        .failure();
}

#[test]
fn sync_accepts_offline_and_verify_flags() {
    let tmp = tempfile::TempDir::new().unwrap();
    jgo_cmd()
        .current_dir(tmp.path())
        .args(["sync", "--offline", "--verify", "g:a:1.0"])
        .assert()
        .failure();
}

#[test]
fn run_requires_trailing_args_marker_for_program_arguments() {
    jgo_cmd()
        .args(["run", "g:a:1.0", "--", "--flag"])
        .assert()
        .failure();
}

#[test]
fn help_lists_all_five_subcommands() {
    let output = jgo_cmd().arg("--help").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    for subcommand in ["resolve", "build", "lock", "sync", "run"] {
        assert!(stdout.contains(subcommand), "missing subcommand '{subcommand}' in --help output");
    }
}
