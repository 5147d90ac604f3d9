//! envops - Environment replication and load-balancer rule rollout.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envops::cli::output;
use envops::cli::{execute, Cli};
use envops::error::{CommandError, Error, RuleError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("ENVOPS_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envops=debug")
        } else {
            EnvFilter::new("envops=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Command(CommandError::NotInstalled(_)) => Some("install git and retry"),
            Error::Rule(RuleError::NoMatch(_)) => {
                Some("check the host header against the listener's rules")
            }
            Error::Rule(RuleError::Unsupported) => Some("rebuild with: --features aws"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
