//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A workspace with two projects and git history
///
/// ```text
/// workspace.json   lib -> packages/lib, app -> packages/app
/// package.json     1.0.0
/// packages/lib     package.json 0.1.0
/// packages/app     package.json 0.1.0
/// ```
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().canonicalize()?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;

    let ws = Self { _root: root, path };
    ws.write_file(
      "workspace.json",
      r#"{
  "version": 1,
  "projects": {
    "lib": { "root": "packages/lib", "projectType": "library" },
    "app": { "root": "packages/app", "projectType": "application" }
  }
}
"#,
    )?;
    ws.write_file("package.json", &manifest("workspace", "1.0.0"))?;
    ws.write_file("packages/lib/package.json", &manifest("@demo/lib", "0.1.0"))?;
    ws.write_file("packages/lib/index.js", "module.exports = {};\n")?;
    ws.write_file("packages/app/package.json", &manifest("@demo/app", "0.1.0"))?;
    ws.write_file("packages/app/main.js", "require('@demo/lib');\n")?;
    ws.commit("chore: initial workspace")?;

    Ok(ws)
  }

  /// Write a file relative to the workspace root, creating parent directories
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file = self.path.join(path);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file, content)?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Change a file and commit it in one step
  pub fn change(&self, path: &str, content: &str, message: &str) -> Result<String> {
    self.write_file(path, content)?;
    self.commit(message)
  }

  pub fn tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(lines(&output))
  }

  /// Subject of the HEAD commit
  pub fn head_subject(&self) -> Result<String> {
    let output = git(&self.path, &["log", "-1", "--format=%s"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn is_clean(&self) -> Result<bool> {
    let output = git(&self.path, &["status", "--porcelain"])?;
    Ok(output.stdout.is_empty())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// `version` field of a package.json
  pub fn manifest_version(&self, path: &str) -> Result<String> {
    let manifest: serde_json::Value = serde_json::from_str(&self.read_file(path)?)?;
    manifest["version"]
      .as_str()
      .map(String::from)
      .context("manifest has no version")
  }

  /// Add a bare repository as `origin`; keep the returned dir alive
  pub fn add_bare_remote(&self) -> Result<TempDir> {
    let remote = TempDir::new()?;
    git(remote.path(), &["init", "--bare", "--initial-branch=main"])?;
    let url = remote.path().to_string_lossy().to_string();
    git(&self.path, &["remote", "add", "origin", &url])?;
    Ok(remote)
  }
}

fn manifest(name: &str, version: &str) -> String {
  format!("{{\n  \"name\": \"{}\",\n  \"version\": \"{}\",\n  \"private\": false\n}}\n", name, version)
}

fn lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(String::from)
    .collect()
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

/// Tags in a bare repository
pub fn remote_tags(remote: &Path) -> Result<Vec<String>> {
  Ok(lines(&git(remote, &["tag", "--list"])?))
}

/// Run workspace-semver, whatever its exit status
pub fn run_semver(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_workspace-semver");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .env("NO_COLOR", "1")
    .output()
    .context("Failed to run workspace-semver")
}

/// Run workspace-semver and require success
pub fn run_semver_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_semver(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "workspace-semver failed: workspace-semver {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
