//! Pipeline file patching.
//!
//! The pipeline file declares the selectable clients as
//!
//! ```text
//! env.CLIENT=input message: 'Client', parameters: [choice(name: 'CLIENT', choices: ['acme', 'globex'])]
//! ```
//!
//! Adding a client inserts it into the first `choices: [...]` after the
//! sentinel, keeping the list sorted and unique. Every byte outside the list
//! interior is preserved. Missing markers are reported, never raised.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::config::pipeline_dir;
use crate::core::constants::{CHOICES_CLOSE, CHOICES_OPEN, CLIENT_SENTINEL, PIPELINE_FILE};
use crate::error::{Error, Result};

/// A text marker the patcher looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Sentinel,
    ChoicesOpen,
    ChoicesClose,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Sentinel => write!(f, "'{}' section", CLIENT_SENTINEL),
            Marker::ChoicesOpen => write!(f, "'{}' in the client block", CHOICES_OPEN),
            Marker::ChoicesClose => write!(f, "closing '{}' for the choices list", CHOICES_CLOSE),
        }
    }
}

/// Result of patching pipeline text in memory.
#[derive(Debug, PartialEq, Eq)]
pub enum ChoiceUpdate {
    /// New file content with the client added.
    Updated(String),
    AlreadyPresent,
    Missing(Marker),
}

/// Split a choice list interior into unquoted tokens.
pub fn parse_choices(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| c.trim_matches(|ch: char| ch == '\'' || ch == '"').to_string())
        .collect()
}

/// Render tokens as `'a', 'b', 'c'`.
pub fn render_choices<'a>(choices: impl IntoIterator<Item = &'a str>) -> String {
    choices
        .into_iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Add `client` to the choice list in `content`.
pub fn add_client_choice(content: &str, client: &str) -> ChoiceUpdate {
    let Some(sentinel) = content.find(CLIENT_SENTINEL) else {
        return ChoiceUpdate::Missing(Marker::Sentinel);
    };
    let Some(open) = content[sentinel..].find(CHOICES_OPEN) else {
        return ChoiceUpdate::Missing(Marker::ChoicesOpen);
    };
    let list_start = sentinel + open + CHOICES_OPEN.len();
    let Some(close) = content[list_start..].find(CHOICES_CLOSE) else {
        return ChoiceUpdate::Missing(Marker::ChoicesClose);
    };
    let list_end = list_start + close;

    let mut choices = parse_choices(&content[list_start..list_end]);
    if choices.iter().any(|c| c == client) {
        return ChoiceUpdate::AlreadyPresent;
    }
    choices.push(client.to_string());
    let sorted: BTreeSet<&str> = choices.iter().map(String::as_str).collect();

    let mut updated = String::with_capacity(content.len() + client.len() + 4);
    updated.push_str(&content[..list_start]);
    updated.push_str(&render_choices(sorted));
    updated.push_str(&content[list_end..]);
    ChoiceUpdate::Updated(updated)
}

/// What happened to a repository's pipeline file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// New and base client are the same; nothing to add.
    SameClient,
    NoPipelineFile(PathBuf),
    /// The file is not valid UTF-8.
    Unreadable(PathBuf),
    MarkerMissing(Marker),
    AlreadyPresent,
    Updated(PathBuf),
}

/// Register `new_client` in the pipeline file belonging to `repo_path`.
///
/// Only io failures while reading or writing an existing file are errors.
pub fn update_pipeline_file(
    repo_path: &Path,
    base_client: &str,
    new_client: &str,
) -> Result<PipelineOutcome> {
    if base_client == new_client {
        return Ok(PipelineOutcome::SameClient);
    }

    let dir = pipeline_dir(repo_path);
    let path = dir.join(PIPELINE_FILE);
    if !path.is_file() {
        info!(dir = %dir.display(), "no {} found", PIPELINE_FILE);
        return Ok(PipelineOutcome::NoPipelineFile(dir));
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            info!(path = %path.display(), "pipeline file is not UTF-8");
            return Ok(PipelineOutcome::Unreadable(path));
        }
        Err(e) => return Err(Error::at(&path, e)),
    };

    match add_client_choice(&content, new_client) {
        ChoiceUpdate::Updated(updated) => {
            std::fs::write(&path, updated).map_err(|e| Error::at(&path, e))?;
            debug!(path = %path.display(), client = new_client, "pipeline updated");
            Ok(PipelineOutcome::Updated(path))
        }
        ChoiceUpdate::AlreadyPresent => {
            debug!(client = new_client, "client already present in pipeline");
            Ok(PipelineOutcome::AlreadyPresent)
        }
        ChoiceUpdate::Missing(marker) => {
            info!(path = %path.display(), "could not find {}", marker);
            Ok(PipelineOutcome::MarkerMissing(marker))
        }
    }
}
