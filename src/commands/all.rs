//! Run both release pipelines
//!
//! Notes and packaging write disjoint files, so they run concurrently. Each
//! result is reported on its own; one pipeline failing does not stop the other.

use super::notes::{generate_notes, print_notes_report};
use super::package::{build_archive, print_archive_report};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, print_error};

/// Run the all command
pub fn run_all(ctx: &ReleaseContext, quiet: bool) -> ReleaseResult<()> {
  // Progress bars would interleave with the notes pipeline's logging
  let (notes, archive) = rayon::join(|| generate_notes(ctx), || build_archive(ctx, false));

  if !quiet {
    if let Ok(report) = &notes {
      print_notes_report(report);
    }
    if let Ok(report) = &archive {
      print_archive_report(report);
    }
  }

  match (notes, archive) {
    (Ok(_), Ok(_)) => {
      if !quiet {
        println!();
        println!("✅ Release artifacts for v{} ready in {}", ctx.metadata.version, ctx.metadata.output_dir.display());
      }
      Ok(())
    }
    (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    (Err(notes_err), Err(archive_err)) => {
      print_error(&notes_err);
      Err(archive_err)
    }
  }
}
