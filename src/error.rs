//! Error types for envops.
//!
//! Each concern gets its own enum; [`Error`] wraps them so every operation can
//! return the crate-wide [`Result`] and propagate with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by every envops operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("io error at {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// External command failures. Always fatal for the run.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} is not installed or not on PATH")]
    NotInstalled(String),

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed: {command}\n{stderr}")]
    Failed { command: String, stderr: String },
}

/// Invalid replicator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("failed to read repository table {}: {source}", path.display())]
    ReadRepoTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid repository table: {0}")]
    InvalidRepoTable(String),

    #[error("repository path must be relative and non-empty: {0}")]
    InvalidRepoPath(String),
}

/// Load-balancer rule lookup and update failures.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("error describing rules: {0}")]
    Describe(String),

    #[error("no rule found for host header: {0}")]
    NoMatch(String),

    #[error("rule has no ARN")]
    MissingArn,

    #[error("failed to update rule {rule_arn}: {reason}")]
    Modify { rule_arn: String, reason: String },

    #[error("failed to start AWS runtime: {0}")]
    Runtime(String),

    #[error("envops was built without AWS support (enable the `aws` feature)")]
    Unsupported,
}

impl Error {
    /// Attach a path to an io error.
    pub fn at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
