//! Environment replication.
//!
//! Copies `<base-client>/<base-env>` to `<new-client>/<new-env>` inside a
//! repository and rewrites hostname/URL tokens in the copy. An existing
//! destination is never touched.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::config::{RepoEntry, ReplicatorConfig, Substitutions};
use crate::core::git::{self, CommandRunner, SyncAction};
use crate::core::pipeline::{self, PipelineOutcome};
use crate::error::{Error, Result};

/// Result of substituting tokens in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePatch {
    Rewritten,
    Unchanged,
    /// Not valid UTF-8; left untouched.
    Skipped,
}

/// What copy-and-patch did for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Created {
        path: PathBuf,
        /// Files whose content changed.
        patched: usize,
        /// Non-UTF-8 files left as copied.
        skipped: Vec<PathBuf>,
    },
    BaseMissing(PathBuf),
    DestinationExists(PathBuf),
}

impl CopyOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CopyOutcome::Created { .. })
    }
}

/// Apply substitutions to a single file in place.
pub fn substitute_file(path: &Path, substitutions: &Substitutions) -> Result<FilePatch> {
    let bytes = std::fs::read(path).map_err(|e| Error::at(path, e))?;
    let Ok(content) = String::from_utf8(bytes) else {
        debug!(path = %path.display(), "skipping non-text or non-UTF-8 file");
        return Ok(FilePatch::Skipped);
    };

    let replaced = substitutions.apply(&content);
    if replaced == content {
        return Ok(FilePatch::Unchanged);
    }
    std::fs::write(path, replaced).map_err(|e| Error::at(path, e))?;
    Ok(FilePatch::Rewritten)
}

/// Recursively copy `src` to `dst`, following symlinks.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut files = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::at(path, e.into())
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| Error::at(&target, e))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| Error::at(&target, e))?;
            files += 1;
        }
    }
    Ok(files)
}

/// Copy the base environment to the new name and patch the copy.
pub fn copy_and_patch(config: &ReplicatorConfig, repo_path: &Path) -> Result<CopyOutcome> {
    let base = config.base_path(repo_path);
    let dest = config.new_path(repo_path);
    debug!(base = %base.display(), new = %dest.display(), "processing");

    if !base.exists() {
        info!(base = %base.display(), "base environment not found, skipping repository");
        return Ok(CopyOutcome::BaseMissing(base));
    }
    if dest.exists() {
        info!(new = %dest.display(), "environment already exists, skipping");
        return Ok(CopyOutcome::DestinationExists(dest));
    }

    let client_dir = repo_path.join(&config.new_client);
    std::fs::create_dir_all(&client_dir).map_err(|e| Error::at(&client_dir, e))?;
    let copied = copy_tree(&base, &dest)?;

    let mut patched = 0;
    let mut skipped = Vec::new();
    for entry in WalkDir::new(&dest) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&dest).to_path_buf();
            Error::at(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        match substitute_file(entry.path(), &config.substitutions)? {
            FilePatch::Rewritten => patched += 1,
            FilePatch::Unchanged => {}
            FilePatch::Skipped => skipped.push(entry.path().to_path_buf()),
        }
    }

    info!(
        new = %dest.display(),
        files = copied,
        patched,
        skipped = skipped.len(),
        "environment created"
    );
    Ok(CopyOutcome::Created {
        path: dest,
        patched,
        skipped,
    })
}

/// Everything that happened to one repository.
#[derive(Debug)]
pub struct RepoReport {
    pub entry: RepoEntry,
    pub repo_path: PathBuf,
    pub sync: SyncAction,
    pub copy: CopyOutcome,
    pub committed: bool,
    /// `None` when the copy was skipped.
    pub pipeline: Option<PipelineOutcome>,
}

/// Sync one repository and replicate the environment in it.
///
/// The pipeline update and the commit only run when the copy succeeded, so
/// the commit carries the pipeline change too.
pub fn process_repo(
    config: &ReplicatorConfig,
    runner: &dyn CommandRunner,
    entry: &RepoEntry,
) -> Result<RepoReport> {
    let (repo_path, sync) =
        git::ensure_cloned(runner, &config.credentials, &config.workspace_dir, entry)?;
    let copy = copy_and_patch(config, &repo_path)?;

    let mut committed = false;
    let mut pipeline = None;
    if copy.is_created() {
        pipeline = Some(pipeline::update_pipeline_file(
            &repo_path,
            &config.base_client,
            &config.new_client,
        )?);
        if config.commit {
            git::commit_and_push(runner, &repo_path, &config.commit_message())?;
            committed = true;
        }
    }

    Ok(RepoReport {
        entry: entry.clone(),
        repo_path,
        sync,
        copy,
        committed,
        pipeline,
    })
}

fn prepare_workspace(config: &ReplicatorConfig) -> Result<()> {
    std::fs::create_dir_all(&config.workspace_dir).map_err(|e| Error::at(&config.workspace_dir, e))
}

/// Per-repository progress reported while [`run`] works.
#[derive(Debug)]
pub enum Progress<'a> {
    Syncing(&'a RepoEntry),
    Finished(&'a RepoReport),
    Failed(&'a RepoEntry),
}

/// Process every configured repository in order.
///
/// The first fatal error stops the run; repositories already processed keep
/// their changes.
pub fn run(
    config: &ReplicatorConfig,
    runner: &dyn CommandRunner,
    mut on_progress: impl FnMut(Progress<'_>),
) -> Result<Vec<RepoReport>> {
    prepare_workspace(config)?;

    let mut reports = Vec::with_capacity(config.repos.len());
    for entry in &config.repos {
        on_progress(Progress::Syncing(entry));
        match process_repo(config, runner, entry) {
            Ok(report) => {
                on_progress(Progress::Finished(&report));
                reports.push(report);
            }
            Err(e) => {
                on_progress(Progress::Failed(entry));
                return Err(e);
            }
        }
    }
    Ok(reports)
}
