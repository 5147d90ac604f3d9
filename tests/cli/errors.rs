//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "replicate");
    assert_stdout_contains(&output, "update-rule");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "envops");
}

#[test]
fn test_replicate_requires_workspace_dir() {
    let t = Test::new();
    let repos = t.repos_file(&[("svc/environments", "/unused.git")]);

    let mut args = t.replicate_args(&repos, &[]);
    let idx = args.iter().position(|a| a == "--workspace_dir").unwrap();
    args.drain(idx..idx + 2);

    let output = t.cmd().args(&args).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "--workspace_dir");
}

#[test]
fn test_replicate_rejects_empty_old_url() {
    let t = Test::new();
    let repos = t.repos_file(&[("svc/environments", "/unused.git")]);

    let output = t.replicate_with(&repos, &[("--old-url", "")], &[]);
    assert_failure(&output);
}

#[test]
fn test_token_from_environment() {
    let t = Test::new();
    std::fs::write(t.remotes.path().join("bad.toml"), "[[repo]]\npath = '../x'\nurl = 'u'\n")
        .unwrap();

    let mut args = t.replicate_args(&t.remotes.path().join("bad.toml"), &[]);
    let idx = args.iter().position(|a| a == "--token").unwrap();
    args.drain(idx..idx + 2);

    // parsing succeeds with ENVOPS_TOKEN, then the bad table is rejected
    let output = t.cmd().env("ENVOPS_TOKEN", "t").args(&args).output().unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "repository path must be relative");
}

#[test]
fn test_invalid_repo_table_fails() {
    let t = Test::new();
    let file = t.remotes.path().join("repos.toml");
    std::fs::write(&file, "this is = = not toml").unwrap();

    let output = t.replicate(&file, &[]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "invalid repository table");
}

#[test]
fn test_missing_repo_table_fails() {
    let t = Test::new();

    let output = t.replicate(&t.remotes.path().join("nope.toml"), &[]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "failed to read repository table");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_envops") || out.contains("complete"));
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "zsh"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "#compdef envops");
}
