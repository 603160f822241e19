//! Web bundle packaging
//!
//! Zips the build output directory into `{app}-web-v{version}.zip`. Entries are
//! rooted at the build directory's children, visited in name order, and carry
//! a fixed timestamp and normalized permissions, so the same input always
//! produces the same bytes.
//!
//! # Write protocol
//!
//! 1. Remove any existing archive at the target path
//! 2. Stream entries into `{target}.partial`
//! 3. Finish the zip, `sync_all` the file, close it
//! 4. Rename the partial file onto the target
//!
//! Any failure removes the partial file, so the target is either absent or a
//! complete archive.
//!
//! Release artifacts in the output directory are never archived, including
//! when the output directory is the build directory itself.

use crate::core::error::{FsAction, FsError, PreconditionError, ReleaseError, ReleaseResult};
use crate::release::metadata::ReleaseMetadata;
use crate::ui::progress::FileProgress;
use crate::utils::archive_entry_name;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Outcome of a packaging run
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
  pub path: PathBuf,
  /// Files written (directories not counted)
  pub files: usize,
  /// Directory entries written
  pub directories: usize,
  pub bytes: u64,
  pub sha256: String,
}

/// One item found under the build directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
  /// Absolute path on disk
  pub source: PathBuf,
  /// Name inside the archive (forward slashes, no build-dir prefix)
  pub name: String,
  pub is_dir: bool,
}

/// Packager for the prebuilt web bundle
pub struct ArchivePackager<'a> {
  metadata: &'a ReleaseMetadata,
  build_dir: PathBuf,
  entry_point: String,
  compression_level: i64,
  show_progress: bool,
}

impl<'a> ArchivePackager<'a> {
  pub fn new(metadata: &'a ReleaseMetadata, build_dir: impl Into<PathBuf>, entry_point: impl Into<String>) -> Self {
    Self {
      metadata,
      build_dir: build_dir.into(),
      entry_point: entry_point.into(),
      compression_level: 9,
      show_progress: false,
    }
  }

  /// Deflate level (0-9)
  pub fn compression_level(mut self, level: i64) -> Self {
    self.compression_level = level;
    self
  }

  /// Draw a progress bar on stderr while compressing
  pub fn show_progress(mut self, show: bool) -> Self {
    self.show_progress = show;
    self
  }

  /// Check that a build has run: the directory exists and holds the entry point
  pub fn check_preconditions(&self) -> ReleaseResult<()> {
    if !self.build_dir.is_dir() {
      return Err(ReleaseError::Precondition(PreconditionError::BuildDirMissing {
        path: self.build_dir.clone(),
      }));
    }

    if !self.build_dir.join(&self.entry_point).is_file() {
      return Err(ReleaseError::Precondition(PreconditionError::EntryPointMissing {
        build_dir: self.build_dir.clone(),
        entry_point: self.entry_point.clone(),
      }));
    }

    Ok(())
  }

  /// Enumerate everything under the build directory in stable order
  ///
  /// The output directory is skipped when it sits inside the build directory,
  /// and release artifacts are skipped when it is the build directory, so an
  /// archive never contains itself or an earlier release.
  pub fn collect_entries(&self) -> ReleaseResult<Vec<BundleEntry>> {
    let output_dir = &self.metadata.output_dir;
    let mut entries = Vec::new();

    let walker = WalkDir::new(&self.build_dir)
      .min_depth(1)
      .follow_links(true)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|e| e.path() != output_dir.as_path() && !self.is_release_artifact(e.path()));

    for entry in walker {
      let entry = entry.map_err(|e| walk_error(e, &self.build_dir))?;
      let relative = entry
        .path()
        .strip_prefix(&self.build_dir)
        .map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Read, entry.path(), io::Error::other(e))))?;
      let is_dir = entry.file_type().is_dir();

      let mut name = archive_entry_name(relative)?;
      if is_dir {
        name.push('/');
      }

      entries.push(BundleEntry {
        source: entry.path().to_path_buf(),
        name,
        is_dir,
      });
    }

    Ok(entries)
  }

  /// Archives and notes written into the output directory, any version
  fn is_release_artifact(&self, path: &Path) -> bool {
    if path.parent() != Some(self.metadata.output_dir.as_path()) {
      return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      return false;
    };

    let archive_prefix = format!("{}-web-v", self.metadata.app_name);
    (name.starts_with(&archive_prefix) && (name.ends_with(".zip") || name.ends_with(".zip.partial")))
      || (name.starts_with("release-notes-v") && name.ends_with(".md"))
  }

  /// Package the build directory, replacing any previous archive for this version
  pub fn run(&self) -> ReleaseResult<ArchiveReport> {
    self.check_preconditions()?;

    let target = self.metadata.archive_path();
    let entries = self.collect_entries()?;

    remove_stale(&target)?;

    let partial = partial_path(&target);
    if let Err(e) = self.write_archive(&partial, &entries) {
      let _ = fs::remove_file(&partial);
      return Err(e);
    }

    if let Err(e) = fs::rename(&partial, &target) {
      let _ = fs::remove_file(&partial);
      return Err(ReleaseError::Fs(FsError::new(FsAction::Write, &target, e)));
    }

    let (bytes, sha256) = digest_file(&target)?;
    let directories = entries.iter().filter(|e| e.is_dir).count();

    tracing::info!(path = %target.display(), bytes, entries = entries.len(), "wrote web bundle archive");

    Ok(ArchiveReport {
      path: target,
      files: entries.len() - directories,
      directories,
      bytes,
      sha256,
    })
  }

  /// Write every entry to `path` and flush it to stable storage
  fn write_archive(&self, path: &Path, entries: &[BundleEntry]) -> ReleaseResult<()> {
    let file = File::create(path).map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Write, path, e)))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let file_options = SimpleFileOptions::default()
      .compression_method(CompressionMethod::Deflated)
      .compression_level(Some(self.compression_level))
      .last_modified_time(DateTime::default())
      .unix_permissions(0o644);
    let dir_options = SimpleFileOptions::default()
      .compression_method(CompressionMethod::Stored)
      .last_modified_time(DateTime::default())
      .unix_permissions(0o755);

    let mut progress = self
      .show_progress
      .then(|| FileProgress::new(entries.len(), "Compressing web bundle"));

    for entry in entries {
      if entry.is_dir {
        zip
          .add_directory(entry.name.as_str(), dir_options)
          .map_err(|e| zip_error(e, path))?;
      } else {
        tracing::trace!(name = %entry.name, "adding file");
        zip
          .start_file(entry.name.as_str(), file_options)
          .map_err(|e| zip_error(e, path))?;
        let mut source = File::open(&entry.source)
          .map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Read, &entry.source, e)))?;
        io::copy(&mut source, &mut zip)
          .map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Compress, &entry.source, e)))?;
      }

      if let Some(progress) = progress.as_mut() {
        progress.inc();
      }
    }

    let writer = zip.finish().map_err(|e| zip_error(e, path))?;
    let file = writer
      .into_inner()
      .map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Write, path, e.into_error())))?;
    file
      .sync_all()
      .map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Write, path, e)))?;

    Ok(())
  }
}

/// Walk failures keep the offending path; loop errors carry no io::Error
fn walk_error(err: walkdir::Error, build_dir: &Path) -> ReleaseError {
  let path = err
    .path()
    .map(Path::to_path_buf)
    .unwrap_or_else(|| build_dir.to_path_buf());
  let message = err.to_string();
  let source = err.into_io_error().unwrap_or_else(|| io::Error::other(message));
  ReleaseError::Fs(FsError::new(FsAction::Read, path, source))
}

fn zip_error(err: ZipError, archive: &Path) -> ReleaseError {
  match err {
    ZipError::Io(e) => ReleaseError::Fs(FsError::new(FsAction::Write, archive, e)),
    other => ReleaseError::message(format!("Failed to write archive {}: {}", archive.display(), other)),
  }
}

/// Delete an existing artifact; a missing file is fine
fn remove_stale(path: &Path) -> ReleaseResult<()> {
  match fs::remove_file(path) {
    Ok(()) => {
      tracing::debug!(path = %path.display(), "removed previous archive");
      Ok(())
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(ReleaseError::Fs(FsError::new(FsAction::RemoveStale, path, e))),
  }
}

/// `{target}.partial`, next to the target so the final rename stays on one filesystem
fn partial_path(target: &Path) -> PathBuf {
  let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".partial");
  target.with_file_name(name)
}

/// Size and SHA-256 of a finished artifact
fn digest_file(path: &Path) -> ReleaseResult<(u64, String)> {
  let mut file = File::open(path).map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Read, path, e)))?;
  let mut hasher = Sha256::new();
  let bytes = io::copy(&mut file, &mut hasher).map_err(|e| ReleaseError::Fs(FsError::new(FsAction::Read, path, e)))?;
  Ok((bytes, format!("{:x}", hasher.finalize())))
}
