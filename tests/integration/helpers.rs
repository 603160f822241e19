//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A desktop-app project with a package.json and git history
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project with a manifest and one initial commit
  pub fn new(name: &str, version: &str) -> Result<Self> {
    let project = Self::without_git(name, version)?;

    git(&project.path, &["init", "--initial-branch=main"])?;
    git(&project.path, &["config", "user.name", "Test User"])?;
    git(&project.path, &["config", "user.email", "test@example.com"])?;
    git(&project.path, &["config", "commit.gpgsign", "false"])?;
    git(&project.path, &["config", "tag.gpgsign", "false"])?;

    // Build output and artifacts stay out of history
    std::fs::write(project.path.join(".gitignore"), "dist/\nrelease/\n")?;
    project.commit("Initial commit")?;

    Ok(project)
  }

  /// Create a project directory that is not a git repository
  pub fn without_git(name: &str, version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("package.json"),
      format!(
        r#"{{
  "name": "{}",
  "version": "{}",
  "main": "main.js",
  "scripts": {{ "build": "vite build" }}
}}
"#,
        name, version
      ),
    )?;

    Ok(Self { _root: root, path })
  }

  /// Commit a change with the given subject
  pub fn commit(&self, message: &str) -> Result<String> {
    let log = self.path.join("CHANGES.txt");
    let mut content = std::fs::read_to_string(&log).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&log, content)?;

    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a lightweight tag at HEAD
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  /// Write a file into the build output directory (`dist/`)
  pub fn add_build_file(&self, relative: &str, content: &str) -> Result<()> {
    let path = self.path.join("dist").join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Write a file at the project root
  pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(relative), content)?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run bundle-release without checking the exit status
pub fn run_release_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_bundle-release");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run bundle-release")
}

/// Run bundle-release and fail on a non-zero exit
pub fn run_release(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_release_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "bundle-release command failed: bundle-release {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Read every entry of a zip archive into memory, keyed by entry name
pub fn read_zip(path: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
  let mut archive = zip::ZipArchive::new(File::open(path)?)?;
  let mut contents = BTreeMap::new();

  for i in 0..archive.len() {
    let mut entry = archive.by_index(i)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    contents.insert(entry.name().to_string(), buf);
  }

  Ok(contents)
}
