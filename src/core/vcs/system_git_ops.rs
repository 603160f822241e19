//! History queries for SystemGit (tags, commit subjects)

use super::system_git::SystemGit;
use super::{CommitHistory, HistoryRange};
use crate::core::error::{GitError, ReleaseError, ReleaseResult};

impl SystemGit {
  /// Most recent tag reachable from HEAD
  ///
  /// `git describe` exits non-zero both when there are no tags and when HEAD
  /// is unborn; both mean "no tag" here.
  pub fn describe_last_tag(&self) -> ReleaseResult<Option<String>> {
    match self.run(&["describe", "--tags", "--abbrev=0"]) {
      Ok(output) => {
        let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if tag.is_empty() { None } else { Some(tag) })
      }
      Err(ReleaseError::Git(GitError::CommandFailed { stderr, .. })) => {
        tracing::debug!(%stderr, "no reachable tag");
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  /// Commit subjects across a range, most recent first
  pub fn log_subjects(&self, range: &HistoryRange) -> ReleaseResult<Vec<String>> {
    let output = match range {
      HistoryRange::SinceTag(tag) => {
        let revs = format!("{}..HEAD", tag);
        self.run(&["log", "--format=%s", &revs])?
      }
      HistoryRange::Recent(limit) => {
        let limit = format!("--max-count={}", limit);
        self.run(&["log", "--format=%s", &limit, "HEAD"])?
      }
    };

    Ok(parse_subjects(&String::from_utf8_lossy(&output.stdout)))
  }
}

impl CommitHistory for SystemGit {
  fn last_tag(&self) -> ReleaseResult<Option<String>> {
    self.describe_last_tag()
  }

  fn subjects(&self, range: &HistoryRange) -> ReleaseResult<Vec<String>> {
    self.log_subjects(range)
  }
}

/// Split `git log --format=%s` output into subjects, dropping blank lines
fn parse_subjects(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(|line| line.trim_end_matches('\r'))
    .filter(|line| !line.trim().is_empty())
    .map(str::to_string)
    .collect()
}
