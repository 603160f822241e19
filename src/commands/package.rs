//! Web bundle packaging command

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::release::{ArchivePackager, ArchiveReport};

/// Run the package command
pub fn run_package(ctx: &ReleaseContext, json: bool, quiet: bool) -> ReleaseResult<()> {
  let report = build_archive(ctx, !json && !quiet)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else if !quiet {
    print_archive_report(&report);
  }

  Ok(())
}

/// Package the build output for the context's version
pub fn build_archive(ctx: &ReleaseContext, show_progress: bool) -> ReleaseResult<ArchiveReport> {
  ArchivePackager::new(&ctx.metadata, ctx.build_dir(), ctx.config.archive.entry_point.as_str())
    .compression_level(ctx.config.archive.compression_level)
    .show_progress(show_progress)
    .run()
}

pub(crate) fn print_archive_report(report: &ArchiveReport) {
  println!("📦 Web bundle: {}", report.path.display());
  println!(
    "   Entries: {} file(s), {} director(y/ies)",
    report.files, report.directories
  );
  println!("   Size:    {} bytes", report.bytes);
  println!("   SHA-256: {}", report.sha256);
}
