//! System git backend
//!
//! Every query shells out to the `git` binary with an isolated environment so
//! user-level configuration (pagers, color, aliases) cannot change the output
//! the pipelines parse.

use crate::core::error::{GitError, ReleaseError, ReleaseResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working tree root; every command runs from here
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  ///
  /// This performs ONE subprocess call to get the repository metadata. A
  /// subdirectory resolves to its top-level working tree.
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .map_err(|e| {
        ReleaseError::Git(GitError::Unavailable {
          reason: e.to_string(),
        })
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ReleaseError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    tracing::debug!(work_tree, "opened git repository");

    Ok(Self {
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the work tree root
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
    cmd.arg("-c").arg("log.showSignature=false");
    cmd.arg("-c").arg("color.ui=never");

    cmd
  }

  /// Run a git command, mapping spawn failures and non-zero exits to `GitError`
  pub(crate) fn run(&self, args: &[&str]) -> ReleaseResult<Output> {
    let command = format!("git {}", args.join(" "));
    tracing::trace!(%command, "running git");

    let output = self.git_cmd().args(args).output().map_err(|e| {
      ReleaseError::Git(GitError::Unavailable {
        reason: e.to_string(),
      })
    })?;

    if !output.status.success() {
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(output)
  }
}
