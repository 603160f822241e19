//! Release context - build once, pass everywhere
//!
//! # Design
//!
//! ReleaseContext holds everything a release run needs: the repository root,
//! the merged configuration, and the resolved metadata. It is built once in
//! main.rs from explicit arguments; nothing downstream reads the current
//! directory or environment to find its inputs.
//!
//! ```text
//! main.rs:
//!   ReleaseContext::build(root, config, overrides) -> &ReleaseContext
//!   |
//!   v
//! commands/notes.rs, package.rs, all.rs:
//!   fn run_*(ctx: &ReleaseContext, ...)
//! ```

use crate::core::config::{ConfigOverrides, ReleaseConfig};
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::release::ReleaseMetadata;
use std::path::{Path, PathBuf};

/// Shared state for one invocation
#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Repository root (absolute when built from main)
  pub root: PathBuf,

  /// release.toml merged with command-line overrides
  pub config: ReleaseConfig,

  /// Version, app name and output directory
  pub metadata: ReleaseMetadata,
}

impl ReleaseContext {
  /// Load configuration, apply overrides, and resolve release metadata
  ///
  /// `config_path` replaces the release.toml search when given.
  pub fn build(root: &Path, config_path: Option<&Path>, overrides: &ConfigOverrides) -> ReleaseResult<Self> {
    let config = match config_path {
      Some(path) => ReleaseConfig::load_from(path)?,
      None => ReleaseConfig::load(root)?,
    }
    .with_overrides(overrides)?;

    let metadata = ReleaseMetadata::resolve(root, &config)?;

    Ok(Self {
      root: root.to_path_buf(),
      config,
      metadata,
    })
  }

  /// Build output directory resolved against the root
  pub fn build_dir(&self) -> PathBuf {
    ReleaseConfig::resolve(&self.root, &self.config.archive.build_dir)
  }

  /// Open the repository at the root, or `None` if history is unavailable
  ///
  /// Never fails: the notes pipeline treats a missing repository as empty history.
  pub fn open_git(&self) -> Option<SystemGit> {
    match SystemGit::open(&self.root) {
      Ok(git) => Some(git),
      Err(e) => {
        tracing::warn!(error = %e, root = %self.root.display(), "history unavailable");
        None
      }
    }
  }
}
