//! Replicate command - copy an environment to a new client/env.

use tracing::info;

use crate::cli::output;
use crate::cli::ReplicateArgs;
use crate::core::config::{self, Credentials, ReplicatorConfig, Substitutions};
use crate::core::git::{self, SyncAction, SystemRunner};
use crate::core::pipeline::PipelineOutcome;
use crate::core::replicate::{self, CopyOutcome, Progress, RepoReport};
use crate::error::Result;

impl ReplicateArgs {
    /// Build the replicator configuration from parsed arguments.
    pub fn into_config(self) -> Result<ReplicatorConfig> {
        let repos = match &self.repos {
            Some(path) => config::load_repos(path)?,
            None => config::default_repos(),
        };
        let substitutions = Substitutions::new(
            self.old_hostname,
            self.new_hostname,
            self.old_url,
            self.new_url,
        )?;

        Ok(ReplicatorConfig {
            workspace_dir: self.workspace_dir,
            credentials: Credentials::new(self.username, self.token),
            base_client: self.base_client,
            base_env: self.base_env,
            new_client: self.new_client,
            new_env: self.new_env,
            substitutions,
            repos,
            commit: self.commit,
        })
    }
}

/// Run the replicator over every configured repository.
pub fn execute(args: ReplicateArgs) -> Result<()> {
    let config = args.into_config()?;
    git::require("git")?;

    info!(
        from = %format!("{}/{}", config.base_client, config.base_env),
        to = %format!("{}/{}", config.new_client, config.new_env),
        repos = config.repos.len(),
        "replicating environment"
    );

    let runner = SystemRunner::redacting(&config.credentials);
    let reports = replicate::run(&config, &runner, |event| match event {
        Progress::Syncing(entry) => {
            output::section(entry.clone_dir());
            output::progress(&format!("syncing {}", entry.clone_dir()));
        }
        Progress::Finished(report) => {
            output::progress_done(true);
            print_report(&config, report);
        }
        Progress::Failed(_) => output::progress_done(false),
    })?;

    let created = reports.iter().filter(|r| r.copy.is_created()).count();
    let summary = format!(
        "{}/{} created in {} of {} repositories",
        config.new_client,
        config.new_env,
        created,
        reports.len()
    );
    println!();
    if created == 0 {
        output::warn(&summary);
    } else {
        output::success(&summary);
    }
    Ok(())
}

fn print_report(config: &ReplicatorConfig, report: &RepoReport) {
    let sync = match report.sync {
        SyncAction::Cloned => "cloned",
        SyncAction::Updated => "pulled latest",
    };
    output::kv("repo:", output::path(report.repo_path.display()));
    output::kv("sync:", sync);

    match &report.copy {
        CopyOutcome::Created {
            path,
            patched,
            skipped,
        } => {
            output::success(&format!(
                "created {} ({} files patched)",
                output::path(path.display()),
                patched
            ));
            if !skipped.is_empty() {
                output::warn("skipped non-text or non-UTF-8 files:");
                for file in skipped {
                    output::list_item(&file.display().to_string());
                }
            }
        }
        CopyOutcome::BaseMissing(base) => {
            output::warn(&format!(
                "base env not found: {}, skipping repo",
                base.display()
            ));
        }
        CopyOutcome::DestinationExists(dest) => {
            output::warn(&format!("env already exists: {}, skipping", dest.display()));
        }
    }

    if report.committed {
        output::success("committed and pushed");
    }

    match &report.pipeline {
        Some(PipelineOutcome::Updated(path)) => output::success(&format!(
            "{} updated with new client: {}",
            path.display(),
            config.new_client
        )),
        Some(PipelineOutcome::AlreadyPresent) => output::success(&format!(
            "{} already present in pipeline",
            config.new_client
        )),
        Some(PipelineOutcome::NoPipelineFile(dir)) => {
            output::warn(&format!("no pipeline file found in {}", dir.display()))
        }
        Some(PipelineOutcome::Unreadable(path)) => {
            output::warn(&format!("pipeline file is not UTF-8: {}", path.display()))
        }
        Some(PipelineOutcome::MarkerMissing(marker)) => {
            output::warn(&format!("could not find {} in pipeline file", marker))
        }
        Some(PipelineOutcome::SameClient) | None => {}
    }
}
