pub mod system_git;
mod system_git_ops;

use crate::core::error::ReleaseResult;

pub use system_git::SystemGit;

/// Range of history a release note covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRange {
  /// Everything after the given tag, up to and including HEAD
  SinceTag(String),
  /// The most recent `n` commits reachable from HEAD
  Recent(usize),
}

impl HistoryRange {
  /// Pick the range for a release: after the last tag if there is one, otherwise the fallback window
  pub fn resolve(last_tag: Option<String>, fallback: usize) -> Self {
    match last_tag {
      Some(tag) => HistoryRange::SinceTag(tag),
      None => HistoryRange::Recent(fallback),
    }
  }
}

impl std::fmt::Display for HistoryRange {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HistoryRange::SinceTag(tag) => write!(f, "{}..HEAD", tag),
      HistoryRange::Recent(n) => write!(f, "last {} commits (no tag found)", n),
    }
  }
}

/// Read access to commit history
///
/// Implemented by [`SystemGit`]; tests drive the notes pipeline with an in-memory history.
pub trait CommitHistory {
  /// Most recent tag reachable from HEAD, or `None` when there are no tags
  fn last_tag(&self) -> ReleaseResult<Option<String>>;

  /// Commit subjects in the range, most recent first, blank lines removed
  fn subjects(&self, range: &HistoryRange) -> ReleaseResult<Vec<String>>;
}
