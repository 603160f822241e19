//! Integration tests for `bundle-release all`

use crate::helpers::{TestProject, read_zip, run_release, run_release_raw};
use anyhow::Result;

#[test]
fn test_all_writes_both_artifacts() -> Result<()> {
  let project = TestProject::new("appname", "2.3.0")?;
  project.tag("v2.2.0")?;
  project.commit("feat: add battle log")?;
  project.add_build_file("index.html", "<html></html>")?;
  project.add_build_file("assets/app.js", "console.log(1);")?;

  let output = run_release(&project.path, &["all"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("ready"), "stdout: {}", stdout);

  let notes = project.read_file("release/release-notes-v2.3.0.md")?;
  assert!(notes.contains("- feat: add battle log"));

  let contents = read_zip(&project.path.join("release/appname-web-v2.3.0.zip"))?;
  assert!(contents.contains_key("assets/app.js"));

  Ok(())
}

#[test]
fn test_all_package_failure_keeps_notes() -> Result<()> {
  let project = TestProject::new("appname", "2.3.0")?;
  project.commit("fix: crash on save")?;

  let output = run_release_raw(&project.path, &["all"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Build output directory missing"));

  let notes = project.read_file("release/release-notes-v2.3.0.md")?;
  assert!(notes.contains("- fix: crash on save"));
  assert!(!project.file_exists("release/appname-web-v2.3.0.zip"));

  Ok(())
}
