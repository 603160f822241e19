//! Integration tests for `bundle-release package`

use crate::helpers::{TestProject, read_zip, run_release, run_release_raw};
use anyhow::Result;

fn project_with_build() -> Result<TestProject> {
  let project = TestProject::without_git("appname", "2.3.0")?;
  project.add_build_file("index.html", "<!doctype html><div id=\"app\"></div>")?;
  project.add_build_file("assets/app.js", "import './style.css';\nconsole.log('ready');\n")?;
  Ok(project)
}

#[test]
fn test_package_strips_build_dir_name() -> Result<()> {
  let project = project_with_build()?;

  run_release(&project.path, &["package"])?;

  let archive = project.path.join("release/appname-web-v2.3.0.zip");
  assert!(archive.exists());

  let contents = read_zip(&archive)?;
  assert!(contents.contains_key("index.html"));
  assert!(contents.contains_key("assets/app.js"));
  assert!(contents.keys().all(|name| !name.starts_with("dist")));
  assert_eq!(
    contents["index.html"],
    std::fs::read(project.path.join("dist/index.html"))?
  );

  Ok(())
}

#[test]
fn test_package_twice_is_identical() -> Result<()> {
  let project = project_with_build()?;
  let archive = project.path.join("release/appname-web-v2.3.0.zip");

  run_release(&project.path, &["package", "--quiet"])?;
  let first = std::fs::read(&archive)?;

  run_release(&project.path, &["package", "--quiet"])?;
  let second = std::fs::read(&archive)?;

  assert_eq!(first, second);

  let artifacts: Vec<_> = std::fs::read_dir(project.path.join("release"))?
    .filter_map(|e| e.ok())
    .map(|e| e.file_name().to_string_lossy().to_string())
    .collect();
  assert_eq!(artifacts, vec!["appname-web-v2.3.0.zip"]);

  Ok(())
}

#[test]
fn test_package_into_build_dir_twice() -> Result<()> {
  let project = project_with_build()?;
  let archive = project.path.join("dist/appname-web-v2.3.0.zip");

  run_release(&project.path, &["all", "--quiet", "--output-dir", "dist"])?;
  let first = std::fs::read(&archive)?;

  run_release(&project.path, &["package", "--quiet", "--output-dir", "dist"])?;
  let second = std::fs::read(&archive)?;
  assert_eq!(first, second);

  let contents = read_zip(&archive)?;
  assert!(contents.keys().all(|name| !name.ends_with(".zip") && !name.starts_with("release-notes")));
  assert!(contents.contains_key("index.html"));

  Ok(())
}

#[test]
fn test_package_missing_build_dir() -> Result<()> {
  let project = TestProject::without_git("appname", "2.3.0")?;

  let output = run_release_raw(&project.path, &["package"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Build output directory missing"), "stderr: {}", stderr);
  assert!(stderr.contains("run the build step first"));
  assert!(!project.file_exists("release/appname-web-v2.3.0.zip"));

  Ok(())
}

#[test]
fn test_package_missing_entry_point() -> Result<()> {
  let project = TestProject::without_git("appname", "2.3.0")?;
  project.add_build_file("assets/app.js", "console.log(1);")?;

  let output = run_release_raw(&project.path, &["package"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("has no index.html"));
  assert!(!project.file_exists("release/appname-web-v2.3.0.zip"));

  Ok(())
}

#[test]
fn test_package_with_overrides() -> Result<()> {
  let project = TestProject::without_git("@studio/appname", "2.3.0")?;
  std::fs::create_dir_all(project.path.join("out/web"))?;
  std::fs::write(project.path.join("out/web/index.html"), "<html></html>")?;
  project.write_file("release.toml", "app_name = \"tactics\"\n")?;

  run_release(
    &project.path,
    &["package", "--build-dir", "out/web", "--output-dir", "artifacts", "--quiet"],
  )?;

  let contents = read_zip(&project.path.join("artifacts/tactics-web-v2.3.0.zip"))?;
  assert_eq!(contents.keys().collect::<Vec<_>>(), vec!["index.html"]);

  Ok(())
}

#[test]
fn test_package_json_report() -> Result<()> {
  let project = project_with_build()?;

  let output = run_release(&project.path, &["package", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["files"], 2);
  assert_eq!(json["directories"], 1);
  assert_eq!(json["sha256"].as_str().map(str::len), Some(64));
  let size = std::fs::metadata(project.path.join("release/appname-web-v2.3.0.zip"))?.len();
  assert_eq!(json["bytes"], size);

  Ok(())
}

#[test]
fn test_package_replaces_stale_archive() -> Result<()> {
  let project = project_with_build()?;
  std::fs::create_dir_all(project.path.join("release"))?;
  std::fs::write(project.path.join("release/appname-web-v2.3.0.zip"), "not a zip")?;

  run_release(&project.path, &["package", "--quiet"])?;

  let contents = read_zip(&project.path.join("release/appname-web-v2.3.0.zip"))?;
  assert!(contents.contains_key("index.html"));

  Ok(())
}
