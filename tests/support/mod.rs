//! Test support utilities for envops integration tests.
//!
//! Provides an isolated workspace plus local bare repositories standing in
//! for the real remotes.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// `workspace` receives the clones, `remotes` holds bare repositories and the
/// repository table. Child processes get explicit paths, so tests can run in
/// parallel.
pub struct Test {
    pub workspace: TempDir,
    pub remotes: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        let remotes = TempDir::new().expect("failed to create temp remotes");
        Self { workspace, remotes }
    }

    /// Create a bare repository named `name` holding `files`.
    pub fn remote(&self, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let work = self.remotes.path().join(format!("{}-work", name));
        for (path, content) in files {
            let file = work.join(path);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(&file, content).unwrap();
        }
        std::fs::create_dir_all(&work).unwrap();
        git(&work, &["init", "-q"]);
        git(&work, &["add", "-A"]);
        git(&work, &["commit", "-q", "-m", "seed"]);

        let bare = self.remotes.path().join(format!("{}.git", name));
        git(
            self.remotes.path(),
            &[
                "clone",
                "-q",
                "--bare",
                work.to_str().unwrap(),
                bare.to_str().unwrap(),
            ],
        );
        bare
    }

    /// Write a repository table and return its path.
    pub fn repos_file(&self, entries: &[(&str, &str)]) -> PathBuf {
        let mut text = String::new();
        for (path, url) in entries {
            text.push_str(&format!("[[repo]]\npath = '{}'\nurl = '{}'\n\n", path, url));
        }
        let file = self.remotes.path().join("repos.toml");
        std::fs::write(&file, text).unwrap();
        file
    }

    /// Path inside the workspace.
    pub fn ws(&self, relative: &str) -> PathBuf {
        self.workspace.path().join(relative)
    }

    /// Read a workspace file as text.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.ws(relative)).expect("failed to read workspace file")
    }

    /// Log of a bare remote's default branch, one subject per line.
    pub fn remote_log(&self, bare: &Path) -> String {
        let out = StdCommand::new("git")
            .args(["log", "--format=%s"])
            .current_dir(bare)
            .output()
            .expect("failed to run git log");
        String::from_utf8_lossy(&out.stdout).to_string()
    }
}

/// Run git with a fixed identity, panicking on failure.
pub fn git(cwd: &Path, args: &[&str]) {
    let out = StdCommand::new("git")
        .args(args)
        .current_dir(cwd)
        .envs(GIT_IDENTITY.iter().copied())
        .output()
        .expect("failed to run git");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}
