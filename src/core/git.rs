//! Git plumbing for the replicator.
//!
//! Commands go through the [`CommandRunner`] trait so the clone/update
//! sequencing can be exercised without a network or a `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::core::config::{Credentials, RepoEntry};
use crate::error::{CommandError, Result};

/// Runs an external program to completion.
pub trait CommandRunner {
    /// Run `program args..` in `cwd` and return its trimmed stdout.
    ///
    /// A non-zero exit status is a [`CommandError::Failed`].
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String>;
}

/// Runs commands with `std::process::Command`, capturing output.
///
/// Git never prompts for credentials: a rejected token fails the command.
#[derive(Default)]
pub struct SystemRunner<'a> {
    credentials: Option<&'a Credentials>,
}

impl<'a> SystemRunner<'a> {
    /// Hide the credentials' token in logs and error messages.
    pub fn redacting(credentials: &'a Credentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    fn redact(&self, text: &str) -> String {
        match self.credentials {
            Some(credentials) => credentials.redact(text),
            None => text.to_string(),
        }
    }
}

impl CommandRunner for SystemRunner<'_> {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String> {
        let command = self.redact(&render(program, args));
        debug!(command = %command, cwd = %cwd.display(), "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CommandError::Failed {
                command,
                stderr: self.redact(stderr.trim_end()),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fail early when a required program is missing.
pub fn require(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| CommandError::NotInstalled(program.to_string()).into())
}

/// How a repository was brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Cloned,
    Updated,
}

/// Make sure `entry` is cloned under `workspace` and matches its remote.
///
/// Existing clones are hard-reset and cleaned before pulling, discarding any
/// local modifications. Returns the repository path and what was done.
pub fn ensure_cloned(
    runner: &dyn CommandRunner,
    credentials: &Credentials,
    workspace: &Path,
    entry: &RepoEntry,
) -> Result<(PathBuf, SyncAction)> {
    let repo_path = workspace.join(&entry.path);

    if !repo_path.exists() {
        info!(repo = entry.clone_dir(), "cloning");
        let url = credentials.render(&entry.url);
        runner.run("git", &["clone", url.as_str(), entry.clone_dir()], workspace)?;
        return Ok((repo_path, SyncAction::Cloned));
    }

    info!(repo = entry.clone_dir(), "already cloned, pulling latest");
    runner.run("git", &["reset", "--hard"], &repo_path)?;
    runner.run("git", &["clean", "-fd"], &repo_path)?;
    runner.run("git", &["pull"], &repo_path)?;
    Ok((repo_path, SyncAction::Updated))
}

/// Stage everything, commit with `message`, and push.
pub fn commit_and_push(runner: &dyn CommandRunner, repo_path: &Path, message: &str) -> Result<()> {
    info!(repo = %repo_path.display(), "committing new environment");
    runner.run("git", &["add", "-A"], repo_path)?;
    runner.run("git", &["commit", "-m", message], repo_path)?;
    runner.run("git", &["push"], repo_path)?;
    Ok(())
}

/// Records commands instead of running them.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingRunner {
    pub calls: std::cell::RefCell<Vec<(String, PathBuf)>>,
    /// Fail any command whose rendered form starts with this prefix.
    pub fail_on: Option<String>,
}

#[cfg(test)]
impl RecordingRunner {
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }
}

#[cfg(test)]
impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String> {
        let command = render(program, args);
        self.calls
            .borrow_mut()
            .push((command.clone(), cwd.to_path_buf()));
        if let Some(prefix) = &self.fail_on {
            if command.starts_with(prefix.as_str()) {
                return Err(CommandError::Failed {
                    command,
                    stderr: "fatal: simulated".to_string(),
                }
                .into());
            }
        }
        Ok(String::new())
    }
}
