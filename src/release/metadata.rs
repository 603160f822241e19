//! Release metadata resolution
//!
//! Reads the version (and application name) from the project manifest and makes
//! sure the shared output directory exists. Both pipelines start from the
//! [`ReleaseMetadata`] produced here.

use crate::core::config::ReleaseConfig;
use crate::core::error::{ConfigError, FsAction, FsError, ReleaseError, ReleaseResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Version and output location for one release run
///
/// Immutable once resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseMetadata {
  pub version: String,
  pub app_name: String,
  pub output_dir: PathBuf,
  pub manifest_path: PathBuf,
}

impl ReleaseMetadata {
  /// Resolve metadata for the repository at `root`
  ///
  /// Fails with `ConfigError` before touching the filesystem if the manifest is
  /// unusable; only then is the output directory created.
  pub fn resolve(root: &Path, config: &ReleaseConfig) -> ReleaseResult<Self> {
    let manifest_path = ReleaseConfig::resolve(root, &config.manifest);
    let manifest = Manifest::read(&manifest_path)?;

    let version = manifest.version()?;
    let app_name = match &config.app_name {
      Some(name) => name.trim().to_string(),
      None => manifest.app_name()?,
    };

    let output_dir = ReleaseConfig::resolve(root, &config.output_dir);
    ensure_dir(&output_dir)?;

    tracing::debug!(%version, %app_name, output_dir = %output_dir.display(), "resolved release metadata");

    Ok(Self {
      version,
      app_name,
      output_dir,
      manifest_path,
    })
  }

  /// `{output_dir}/release-notes-v{version}.md`
  pub fn notes_path(&self) -> PathBuf {
    self.output_dir.join(format!("release-notes-v{}.md", self.version))
  }

  /// `{output_dir}/{app_name}-web-v{version}.zip`
  pub fn archive_path(&self) -> PathBuf {
    self
      .output_dir
      .join(format!("{}-web-v{}.zip", self.app_name, self.version))
  }
}

/// Create a directory and its parents; an existing directory is fine
pub fn ensure_dir(path: &Path) -> ReleaseResult<()> {
  fs::create_dir_all(path).map_err(|e| ReleaseError::Fs(FsError::new(FsAction::CreateDir, path, e)))
}

/// Parsed project manifest
enum Manifest {
  /// package.json and friends
  Json { path: PathBuf, doc: serde_json::Value },
  /// Cargo-style manifest with a `[package]` table
  Toml { path: PathBuf, doc: toml_edit::DocumentMut },
}

impl Manifest {
  fn read(path: &Path) -> ReleaseResult<Self> {
    let content = fs::read_to_string(path).map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        ReleaseError::Config(ConfigError::ManifestNotFound {
          path: path.to_path_buf(),
        })
      } else {
        ReleaseError::Fs(FsError::new(FsAction::Read, path, e))
      }
    })?;

    let invalid = |reason: String| {
      ReleaseError::Config(ConfigError::ManifestInvalid {
        path: path.to_path_buf(),
        reason,
      })
    };

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    if is_toml {
      let doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| invalid(e.to_string()))?;
      Ok(Manifest::Toml {
        path: path.to_path_buf(),
        doc,
      })
    } else {
      let doc: serde_json::Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
      if !doc.is_object() {
        return Err(invalid("top-level value must be an object".to_string()));
      }
      Ok(Manifest::Json {
        path: path.to_path_buf(),
        doc,
      })
    }
  }

  fn path(&self) -> &Path {
    match self {
      Manifest::Json { path, .. } | Manifest::Toml { path, .. } => path,
    }
  }

  fn field(&self, key: &str) -> Option<String> {
    match self {
      Manifest::Json { doc, .. } => doc.get(key).and_then(|v| v.as_str()).map(str::to_string),
      Manifest::Toml { doc, .. } => doc
        .get("package")
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string),
    }
  }

  fn required(&self, key: &str) -> ReleaseResult<String> {
    self
      .field(key)
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
      .ok_or_else(|| {
        ReleaseError::Config(ConfigError::MissingField {
          field: key.to_string(),
          source: self.path().to_path_buf(),
        })
      })
  }

  fn version(&self) -> ReleaseResult<String> {
    let version = self.required("version")?;
    if version.contains(['/', '\\']) || version.chars().any(char::is_whitespace) {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "version".to_string(),
        value: version,
        reason: "must not contain path separators or whitespace".to_string(),
      }));
    }
    Ok(version)
  }

  /// Manifest name without an npm scope (`@scope/app` becomes `app`)
  fn app_name(&self) -> ReleaseResult<String> {
    let name = self.required("name")?;
    let unscoped = match name.strip_prefix('@') {
      Some(scoped) => scoped.rsplit('/').next().unwrap_or(scoped).to_string(),
      None => name,
    };
    if unscoped.is_empty() || unscoped.contains(['/', '\\']) {
      return Err(ReleaseError::Config(ConfigError::InvalidValue {
        field: "name".to_string(),
        value: unscoped,
        reason: "cannot be used as a file name".to_string(),
      }));
    }
    Ok(unscoped)
  }
}
