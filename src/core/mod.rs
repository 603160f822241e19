//! Core building blocks shared by every command
//!
//! - **config**: release.toml parsing and validation
//! - **context**: per-invocation release context (root, config, metadata)
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git history access (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
