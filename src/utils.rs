//! Utility functions for cross-platform path handling

use crate::core::error::{PreconditionError, ReleaseError, ReleaseResult};
use std::path::{Component, Path};

/// Convert a relative path to an archive entry name (always forward slashes)
///
/// ZIP entry names use `/` on every platform. Only normal components are kept,
/// so `.` segments and roots never leak into the archive. A component that is
/// not valid UTF-8 is an error rather than a lossy rename.
pub fn archive_entry_name(path: &Path) -> ReleaseResult<String> {
  let mut parts = Vec::new();
  for component in path.components() {
    if let Component::Normal(part) = component {
      let part = part.to_str().ok_or_else(|| {
        ReleaseError::Precondition(PreconditionError::NonUtf8Name {
          path: path.to_path_buf(),
        })
      })?;
      parts.push(part);
    }
  }
  Ok(parts.join("/"))
}
