use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of commits to include when no tag is reachable
pub const DEFAULT_FALLBACK_COMMITS: usize = 30;

/// Configuration for bundle-release
/// Searched in order: release.toml, .release.toml, .config/release.toml
///
/// Every field is optional; a repository without a config file gets the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
  /// Name used in the archive file name (default: manifest `name`)
  pub app_name: Option<String>,

  /// Manifest declaring the version, relative to the repository root
  pub manifest: PathBuf,

  /// Directory receiving both artifacts, relative to the repository root
  pub output_dir: PathBuf,

  pub notes: NotesConfig,

  pub archive: ArchiveConfig,
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      app_name: None,
      manifest: PathBuf::from("package.json"),
      output_dir: PathBuf::from("release"),
      notes: NotesConfig::default(),
      archive: ArchiveConfig::default(),
    }
  }
}

/// Release notes settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
  /// Commits to walk back from HEAD when the repository has no tags
  pub fallback_commits: usize,
}

impl Default for NotesConfig {
  fn default() -> Self {
    Self {
      fallback_commits: DEFAULT_FALLBACK_COMMITS,
    }
  }
}

/// Web bundle archive settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
  /// Build output directory, relative to the repository root
  pub build_dir: PathBuf,

  /// File that must exist in the build output for it to count as built
  pub entry_point: String,

  /// Deflate level, 0-9
  pub compression_level: i64,
}

impl Default for ArchiveConfig {
  fn default() -> Self {
    Self {
      build_dir: PathBuf::from("dist"),
      entry_point: "index.html".to_string(),
      compression_level: 9,
    }
  }
}

/// Command-line values that take precedence over release.toml
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub output_dir: Option<PathBuf>,
  pub build_dir: Option<PathBuf>,
  pub fallback_commits: Option<usize>,
}

impl ReleaseConfig {
  /// Apply CLI overrides and re-validate
  pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> ReleaseResult<Self> {
    if let Some(dir) = &overrides.output_dir {
      self.output_dir = dir.clone();
    }
    if let Some(dir) = &overrides.build_dir {
      self.archive.build_dir = dir.clone();
    }
    if let Some(n) = overrides.fallback_commits {
      self.notes.fallback_commits = n;
    }
    self.validate()?;
    Ok(self)
  }

  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("release.toml"),
      root.join(".release.toml"),
      root.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the repository root, falling back to defaults when no file exists
  pub fn load(root: &Path) -> ReleaseResult<Self> {
    match Self::find_config_path(root) {
      Some(path) => Self::load_from(&path),
      None => Ok(Self::default()),
    }
  }

  /// Load config from an explicit path
  pub fn load_from(config_path: &Path) -> ReleaseResult<Self> {
    if !config_path.exists() {
      return Err(ReleaseError::with_help(
        format!("Config file not found: {}", config_path.display()),
        "Check the path passed to --config",
      ));
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Validate configuration values
  pub fn validate(&self) -> ReleaseResult<()> {
    if let Some(ref name) = self.app_name
      && (name.trim().is_empty() || name.contains(['/', '\\']))
    {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "app_name".to_string(),
        value: name.clone(),
        reason: "must be a non-empty file name component".to_string(),
      }));
    }

    if self.notes.fallback_commits == 0 {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "notes.fallback_commits".to_string(),
        value: "0".to_string(),
        reason: "must be at least 1".to_string(),
      }));
    }

    if !(0..=9).contains(&self.archive.compression_level) {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "archive.compression_level".to_string(),
        value: self.archive.compression_level.to_string(),
        reason: "must be between 0 and 9".to_string(),
      }));
    }

    if self.archive.entry_point.trim().is_empty() {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "archive.entry_point".to_string(),
        value: String::new(),
        reason: "must name a file in the build output".to_string(),
      }));
    }

    Ok(())
  }

  /// Resolve a configured path against the repository root
  pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      root.join(path)
    }
  }
}
