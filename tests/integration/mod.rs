//! Integration tests for bundle-release
//!
//! Each test builds a throwaway project (manifest, git history, web build)
//! and drives the compiled binary against it.

mod helpers;
mod test_all;
mod test_notes;
mod test_package;
