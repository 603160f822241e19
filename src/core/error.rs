//! Error types for bundle-release with contextual messages and exit codes
//!
//! Every fatal error names the precondition that failed and, where possible,
//! carries a suggestion telling the user how to get the pipeline moving again.
//! History failures are deliberately absent from the fatal path: the notes
//! pipeline absorbs them (see `release::notes`).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for bundle-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, manifest, missing build output)
  User = 1,
  /// System error (git, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for bundle-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Manifest and configuration errors
  Config(ConfigError),

  /// Missing inputs a pipeline cannot run without
  Precondition(PreconditionError),

  /// Filesystem failures while creating or writing artifacts
  Fs(FsError),

  /// Git operation errors
  Git(GitError),

  /// Unclassified I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(err) => ReleaseError::Message {
        message: ctx_str,
        context: Some(err.to_string()),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Precondition(_) => ExitCode::User,
      ReleaseError::Fs(_) => ExitCode::System,
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Precondition(e) => e.help_message(),
      ReleaseError::Fs(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Precondition(e) => write!(f, "{}", e),
      ReleaseError::Fs(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      ReleaseError::Fs(e) => Some(&e.source),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

/// Manifest and configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// Manifest file does not exist
  ManifestNotFound { path: PathBuf },

  /// Manifest exists but could not be parsed
  ManifestInvalid { path: PathBuf, reason: String },

  /// Missing or empty required field
  MissingField { field: String, source: PathBuf },

  /// Field present but unusable
  InvalidValue { field: String, value: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::ManifestNotFound { .. } => {
        Some("Run from the repository root, pass --root, or set `manifest` in release.toml.".to_string())
      }
      ConfigError::MissingField { field, .. } if field == "name" => {
        Some("Add a `name` to the manifest or set `app_name` in release.toml.".to_string())
      }
      ConfigError::MissingField { field, .. } => Some(format!("Declare a non-empty `{}` in the manifest.", field)),
      ConfigError::InvalidValue { field, .. } if field == "version" => {
        Some("The version is used verbatim in file names; use something like 2.3.0.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::ManifestNotFound { path } => {
        write!(f, "Manifest not found: {}", path.display())
      }
      ConfigError::ManifestInvalid { path, reason } => {
        write!(f, "Failed to parse manifest {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field, source } => {
        write!(f, "Missing required field `{}` in {}", field, source.display())
      }
      ConfigError::InvalidValue { field, value, reason } => {
        write!(f, "Invalid {} '{}': {}", field, value, reason)
      }
    }
  }
}

/// Inputs a pipeline needs before it can start
#[derive(Debug)]
pub enum PreconditionError {
  /// Build output directory does not exist
  BuildDirMissing { path: PathBuf },

  /// Build output directory exists but lacks the entry point
  EntryPointMissing { build_dir: PathBuf, entry_point: String },

  /// A build output path cannot be stored as a UTF-8 archive entry name
  NonUtf8Name { path: PathBuf },
}

impl PreconditionError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreconditionError::BuildDirMissing { .. } | PreconditionError::EntryPointMissing { .. } => {
        Some("Run the web build step first, or point --build-dir at its output.".to_string())
      }
      PreconditionError::NonUtf8Name { .. } => {
        Some("Rename the file so its name is valid UTF-8; archive entry names cannot hold other bytes.".to_string())
      }
    }
  }
}

impl fmt::Display for PreconditionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreconditionError::BuildDirMissing { path } => {
        write!(
          f,
          "Build output directory missing: {} (run the build step first)",
          path.display()
        )
      }
      PreconditionError::EntryPointMissing { build_dir, entry_point } => {
        write!(
          f,
          "Build output in {} has no {} (run the build step first)",
          build_dir.display(),
          entry_point
        )
      }
      PreconditionError::NonUtf8Name { path } => {
        write!(f, "Build output path is not valid UTF-8: {}", path.display())
      }
    }
  }
}

/// Filesystem failure tied to the operation that was attempted
#[derive(Debug)]
pub struct FsError {
  pub action: FsAction,
  pub path: PathBuf,
  pub source: io::Error,
}

/// What the failed filesystem operation was trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAction {
  CreateDir,
  RemoveStale,
  Write,
  Read,
  Compress,
}

impl FsError {
  pub fn new(action: FsAction, path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self {
      action,
      path: path.into(),
      source,
    }
  }

  fn help_message(&self) -> Option<String> {
    match (self.source.kind(), self.action) {
      (io::ErrorKind::PermissionDenied, FsAction::Read | FsAction::Compress) => {
        Some(format!("Check read permissions for {}", self.path.display()))
      }
      (io::ErrorKind::PermissionDenied, _) => Some(format!("Check write permissions for {}", self.path.display())),
      (io::ErrorKind::NotFound, FsAction::Read | FsAction::Compress) => Some(format!(
        "{} vanished or is a dangling symlink; rebuild the web bundle and retry.",
        self.path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for FsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let action = match self.action {
      FsAction::CreateDir => "create output directory",
      FsAction::RemoveStale => "remove stale artifact",
      FsAction::Write => "write",
      FsAction::Read => "read",
      FsAction::Compress => "compress",
    };
    write!(f, "Failed to {} {}: {}", action, self.path.display(), self.source)
  }
}

impl From<FsError> for ReleaseError {
  fn from(err: FsError) -> Self {
    ReleaseError::Fs(err)
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command ran but exited non-zero
  CommandFailed { command: String, stderr: String },

  /// Not inside a git repository
  RepoNotFound { path: PathBuf },

  /// git executable could not be spawned
  Unavailable { reason: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
      GitError::Unavailable { .. } => Some("Install git and make sure it is on PATH.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::Unavailable { reason } => {
        write!(f, "Git is unavailable: {}", reason)
      }
    }
  }
}

/// Result type alias for bundle-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
