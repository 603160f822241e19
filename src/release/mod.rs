//! Release artifact pipelines
//!
//! # Pipelines
//!
//! - **metadata**: resolves version, app name and output directory from the manifest
//! - **notes**: change log synthesizer, writes `release-notes-v{version}.md`
//! - **archive**: web bundle packager, writes `{app}-web-v{version}.zip`
//!
//! `changelog` holds the note model shared by the notes pipeline.
//!
//! # Invariants
//!
//! 1. **Metadata first**
//!    - Both pipelines start from one resolved `ReleaseMetadata`
//!    - A bad manifest fails before anything is written
//!
//! 2. **Pipelines are independent**
//!    - They write disjoint files in the same output directory
//!    - A failure in one never blocks or corrupts the other
//!
//! 3. **Notes never fail on history**
//!    - Missing tags, missing repository, failing git: all render an empty note
//!
//! 4. **Archives are all-or-nothing**
//!    - The target path holds either a complete archive or nothing

pub mod archive;
pub mod changelog;
pub mod metadata;
pub mod notes;

pub use archive::{ArchivePackager, ArchiveReport};
pub use metadata::ReleaseMetadata;
pub use notes::{NotesReport, NotesSynthesizer};
