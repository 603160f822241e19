//! CLI commands for bundle-release
//!
//! - **notes**: write `release-notes-v{version}.md` from history since the last tag
//! - **package**: zip the web build into `{app}-web-v{version}.zip`
//! - **all**: both pipelines side by side, each reported independently
//!
//! All commands accept `&ReleaseContext` so metadata is resolved once.

pub mod all;
pub mod notes;
pub mod package;

pub use all::run_all;
pub use notes::run_notes;
pub use package::run_package;
