//! Change log synthesis
//!
//! Turns commit history since the last tag into `release-notes-v{version}.md`.
//! History problems never fail this pipeline: a missing repository, a missing
//! git binary or a failing query all degrade to an empty history and the note
//! is still written in full.

use crate::core::error::{FsAction, FsError, ReleaseError, ReleaseResult};
use crate::core::vcs::{CommitHistory, HistoryRange};
use crate::release::changelog::{ChangeCategory, PrefixRules, ReleaseNote};
use crate::release::metadata::ReleaseMetadata;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Outcome of a synthesizer run
#[derive(Debug, Clone, Serialize)]
pub struct NotesReport {
  pub path: PathBuf,
  pub range: String,
  pub features: usize,
  pub fixes: usize,
  pub docs_and_chores: usize,
  pub total: usize,
  /// True when history could not be read and the note was rendered empty
  pub history_unavailable: bool,
}

/// Release note synthesizer
pub struct NotesSynthesizer<'a> {
  metadata: &'a ReleaseMetadata,
  history: Option<&'a dyn CommitHistory>,
  fallback_commits: usize,
  rules: PrefixRules,
}

impl<'a> NotesSynthesizer<'a> {
  /// `history` is `None` when no repository could be opened
  pub fn new(metadata: &'a ReleaseMetadata, history: Option<&'a dyn CommitHistory>, fallback_commits: usize) -> Self {
    Self {
      metadata,
      history,
      fallback_commits,
      rules: PrefixRules::default(),
    }
  }

  /// Build the note without writing it
  pub fn synthesize(&self, date: &str) -> (ReleaseNote, bool) {
    let (range, subjects, unavailable) = self.collect();

    let mut note = ReleaseNote::new(&self.metadata.version, date, range.to_string());
    note.add_subjects(&self.rules, subjects);
    (note, unavailable)
  }

  /// Build the note and write it to the output directory, replacing any previous file
  pub fn run(&self, date: &str) -> ReleaseResult<(ReleaseNote, NotesReport)> {
    let (note, history_unavailable) = self.synthesize(date);
    let path = self.metadata.notes_path();

    fs::write(&path, note.to_markdown()).map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Write, &path, e)))?;
    tracing::info!(path = %path.display(), commits = note.total(), "wrote release notes");

    let report = NotesReport {
      path,
      range: note.range.clone(),
      features: note.entries(ChangeCategory::Features).len(),
      fixes: note.entries(ChangeCategory::Fixes).len(),
      docs_and_chores: note.entries(ChangeCategory::DocsAndChores).len(),
      total: note.total(),
      history_unavailable,
    };

    Ok((note, report))
  }

  /// Resolve the range and read subjects, absorbing every history failure
  fn collect(&self) -> (HistoryRange, Vec<String>, bool) {
    let fallback = HistoryRange::Recent(self.fallback_commits);

    let Some(history) = self.history else {
      tracing::warn!("no repository available; release notes will list no commits");
      return (fallback, Vec::new(), true);
    };

    let last_tag = match history.last_tag() {
      Ok(tag) => tag,
      Err(e) => {
        tracing::warn!(error = %e, "tag lookup failed; using fallback range");
        None
      }
    };

    let range = HistoryRange::resolve(last_tag, self.fallback_commits);
    match history.subjects(&range) {
      Ok(subjects) => {
        tracing::debug!(%range, count = subjects.len(), "collected commit subjects");
        (range, subjects, false)
      }
      Err(e) => {
        tracing::warn!(error = %e, %range, "history query failed; treating as empty");
        (range, Vec::new(), true)
      }
    }
  }
}

/// Today's date in the local timezone
pub fn today() -> String {
  chrono::Local::now().format("%Y-%m-%d").to_string()
}
