//! Command-line interface.

pub mod completions;
pub mod output;
pub mod replicate;
pub mod update_rule;

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::constants::DEFAULT_REGION;

/// envops - Environment replication and load-balancer rule rollout.
#[derive(Parser)]
#[command(
    name = "envops",
    about = "Replicate client environments and repoint load-balancer rules",
    version
)]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Copy an environment to a new client/env in every repository
    Replicate(ReplicateArgs),

    /// Point the listener rule for a host header at a new target group
    UpdateRule(UpdateRuleArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `envops replicate`.
#[derive(Args, Debug)]
pub struct ReplicateArgs {
    /// Git username used in repository URLs
    #[arg(long)]
    pub username: String,

    /// Git access token used in repository URLs
    #[arg(long, env = "ENVOPS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Client whose environment is copied
    #[arg(long)]
    pub base_client: String,

    /// Environment that is copied
    #[arg(long)]
    pub base_env: String,

    /// Client to create
    #[arg(long)]
    pub new_client: String,

    /// Environment to create
    #[arg(long)]
    pub new_env: String,

    /// Hostname to replace in copied files
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub old_hostname: String,

    /// Replacement hostname
    #[arg(long)]
    pub new_hostname: String,

    /// URL to replace in copied files
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub old_url: String,

    /// Replacement URL
    #[arg(long)]
    pub new_url: String,

    /// Directory holding the repository clones
    #[arg(long = "workspace_dir", alias = "workspace-dir")]
    pub workspace_dir: PathBuf,

    /// TOML file with [[repo]] entries replacing the built-in repository list
    #[arg(long)]
    pub repos: Option<PathBuf>,

    /// Commit and push the new environment in each repository
    #[arg(long)]
    pub commit: bool,
}

/// Arguments for `envops update-rule`.
#[derive(Args, Debug)]
pub struct UpdateRuleArgs {
    /// ARN of the load balancer listener
    #[arg(long)]
    pub listener_arn: String,

    /// Host header to match (e.g. demo.example.com)
    #[arg(long)]
    pub host_header: String,

    /// Target group ARN to forward traffic to
    #[arg(long)]
    pub target_group_arn: String,

    /// AWS region of the load balancer
    #[arg(long, env = "ENVOPS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    match command {
        Command::Replicate(args) => replicate::execute(args),
        Command::UpdateRule(args) => update_rule::execute(args),
        Command::Completions { shell } => completions::execute(shell),
    }
}
