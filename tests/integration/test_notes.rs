//! Integration tests for `bundle-release notes`

use crate::helpers::{TestProject, git, run_release, run_release_raw};
use anyhow::Result;

fn bullets(markdown: &str) -> Vec<&str> {
  markdown
    .lines()
    .filter(|l| l.starts_with("- ") && !l.starts_with("- [ ]") && *l != "- (none)")
    .collect()
}

#[test]
fn test_notes_since_last_tag() -> Result<()> {
  let project = TestProject::new("appname", "2.3.0")?;
  project.commit("chore: prepare 2.2.0")?;
  project.tag("v2.2.0")?;

  project.commit("chore: bump deps")?;
  project.commit("fix: crash on save")?;
  project.commit("feat: add battle log")?;

  run_release(&project.path, &["notes"])?;

  assert!(project.file_exists("release/release-notes-v2.3.0.md"));
  let notes = project.read_file("release/release-notes-v2.3.0.md")?;

  assert!(notes.starts_with("# Release Notes - v2.3.0\n"));
  assert!(notes.contains("Range: v2.2.0..HEAD"));
  assert!(notes.contains("## Features\n\n- feat: add battle log\n"));
  assert!(notes.contains("## Fixes\n\n- fix: crash on save\n"));
  assert!(notes.contains("## Docs and Chores\n\n- chore: bump deps\n"));
  assert!(notes.contains("## QA Checklist"));

  // Commits at or before the tag are excluded
  assert!(!notes.contains("prepare 2.2.0"));
  assert_eq!(bullets(&notes).len(), 3);

  Ok(())
}

#[test]
fn test_notes_without_tags_use_recent_history() -> Result<()> {
  let project = TestProject::new("appname", "0.1.0")?;
  project.commit("feat: first screen")?;
  project.commit("Tweak colors")?;

  run_release(&project.path, &["notes"])?;
  let notes = project.read_file("release/release-notes-v0.1.0.md")?;

  assert!(notes.contains("Range: last 30 commits (no tag found)"));
  assert!(notes.contains("- feat: first screen"));
  // Uncategorized subjects are kept under Docs and Chores
  let docs = notes.split("## Docs and Chores").nth(1).unwrap_or_default();
  assert!(docs.contains("- Tweak colors"));
  assert!(docs.contains("- Initial commit"));

  Ok(())
}

#[test]
fn test_notes_fallback_bound_is_configurable() -> Result<()> {
  let project = TestProject::new("appname", "0.1.0")?;
  for i in 0..5 {
    project.commit(&format!("chore: step {}", i))?;
  }

  run_release(&project.path, &["notes", "--fallback-commits", "2"])?;
  let notes = project.read_file("release/release-notes-v0.1.0.md")?;

  assert_eq!(bullets(&notes), vec!["- chore: step 4", "- chore: step 3"]);
  assert!(notes.contains("Range: last 2 commits (no tag found)"));

  Ok(())
}

#[test]
fn test_notes_bound_from_config_file() -> Result<()> {
  let project = TestProject::new("appname", "0.1.0")?;
  project.commit("fix: one")?;
  project.commit("fix: two")?;
  project.write_file("release.toml", "[notes]\nfallback_commits = 1\n")?;

  run_release(&project.path, &["notes"])?;
  let notes = project.read_file("release/release-notes-v0.1.0.md")?;

  assert_eq!(bullets(&notes), vec!["- fix: two"]);

  Ok(())
}

#[test]
fn test_notes_outside_repository_still_written() -> Result<()> {
  let project = TestProject::without_git("appname", "1.0.0")?;

  let output = run_release(&project.path, &["notes"])?;
  assert!(output.status.success());

  let notes = project.read_file("release/release-notes-v1.0.0.md")?;
  assert_eq!(notes.matches("- (none)\n").count(), 3);
  assert!(notes.contains("## QA Checklist"));

  Ok(())
}

#[test]
fn test_notes_empty_repository() -> Result<()> {
  let project = TestProject::without_git("appname", "1.0.0")?;
  git(&project.path, &["init"])?;

  run_release(&project.path, &["notes"])?;
  let notes = project.read_file("release/release-notes-v1.0.0.md")?;

  assert_eq!(notes.matches("- (none)\n").count(), 3);

  Ok(())
}

#[test]
fn test_notes_json_report() -> Result<()> {
  let project = TestProject::new("appname", "2.0.0")?;
  project.tag("v1.9.0")?;
  project.commit("feat: new map")?;
  project.commit("docs: explain map")?;

  let output = run_release(&project.path, &["notes", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["features"], 1);
  assert_eq!(json["fixes"], 0);
  assert_eq!(json["docs_and_chores"], 1);
  assert_eq!(json["total"], 2);
  assert_eq!(json["range"], "v1.9.0..HEAD");
  assert_eq!(json["history_unavailable"], false);

  Ok(())
}

#[test]
fn test_notes_overwrite_previous_run() -> Result<()> {
  let project = TestProject::new("appname", "1.0.0")?;
  project.commit("feat: one")?;
  run_release(&project.path, &["notes", "--quiet"])?;

  project.commit("feat: two")?;
  run_release(&project.path, &["notes", "--quiet"])?;

  let notes = project.read_file("release/release-notes-v1.0.0.md")?;
  assert_eq!(notes.matches("# Release Notes").count(), 1);
  assert!(notes.contains("- feat: two"));

  Ok(())
}

#[test]
fn test_notes_missing_manifest_fails_before_writing() -> Result<()> {
  let project = TestProject::without_git("appname", "1.0.0")?;
  std::fs::remove_file(project.path.join("package.json"))?;

  let output = run_release_raw(&project.path, &["notes"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Manifest not found"), "stderr: {}", stderr);
  assert!(!project.file_exists("release"));

  Ok(())
}
