//! Release-level git operations (tags, history, commits)
//!
//! Implemented once on top of [`GitRunner`] so the same code serves the system
//! backend and the scripted runners used in tests.

use super::{CommitInfo, GitOutput, GitRunner};
use crate::core::error::SemverResult;
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};

/// Separates commits in `git log` output
const RECORD_SEP: char = '\u{1e}';
/// Separates the sha from the message inside one record
const FIELD_SEP: char = '\u{1f}';

/// Format string matching `RECORD_SEP` / `FIELD_SEP`
const LOG_FORMAT: &str = "--format=%H%x1f%B%x1e";

pub trait GitOps {
  /// Tags whose name starts with `prefix`
  fn list_tags(&self, prefix: &str) -> SemverResult<Vec<String>>;

  /// Commits reachable from HEAD (and not from `since`) touching `path`, newest first
  fn commits_since(&self, since: Option<&str>, path: &Path) -> SemverResult<Vec<CommitInfo>>;

  /// Stage the given files
  fn add(&self, files: &[PathBuf]) -> SemverResult<GitOutput>;

  /// Commit staged changes
  fn commit(&self, message: &str, no_verify: bool) -> SemverResult<GitOutput>;

  /// Create an annotated tag at HEAD
  fn tag_annotated(&self, tag: &str, message: &str) -> SemverResult<GitOutput>;
}

impl<T: GitRunner + ?Sized> GitOps for T {
  fn list_tags(&self, prefix: &str) -> SemverResult<Vec<String>> {
    let pattern = format!("{}*", prefix);
    let output = self.run(&args(["tag", "--list", pattern.as_str()]))?;

    Ok(
      output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect(),
    )
  }

  fn commits_since(&self, since: Option<&str>, path: &Path) -> SemverResult<Vec<CommitInfo>> {
    let mut cmd = args(["log", LOG_FORMAT]);

    match since {
      Some(tag) => cmd.push(format!("{}..HEAD", tag)),
      None => cmd.push("HEAD".to_string()),
    }

    cmd.push("--".to_string());
    cmd.push(path_to_git_format(path));

    let output = self.run(&cmd)?;
    Ok(parse_log_output(&output.stdout))
  }

  fn add(&self, files: &[PathBuf]) -> SemverResult<GitOutput> {
    let mut cmd = args(["add", "--"]);
    cmd.extend(files.iter().map(|f| path_to_git_format(f)));
    self.run(&cmd)
  }

  fn commit(&self, message: &str, no_verify: bool) -> SemverResult<GitOutput> {
    let mut cmd = args(["commit"]);
    if no_verify {
      cmd.push("--no-verify".to_string());
    }
    cmd.push("-m".to_string());
    cmd.push(message.to_string());
    self.run(&cmd)
  }

  fn tag_annotated(&self, tag: &str, message: &str) -> SemverResult<GitOutput> {
    self.run(&args(["tag", "-a", tag, "-m", message]))
  }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
  parts.iter().map(|s| s.to_string()).collect()
}

/// Parse `git log` output produced with `LOG_FORMAT`
fn parse_log_output(output: &str) -> Vec<CommitInfo> {
  output
    .split(RECORD_SEP)
    .filter_map(|record| {
      let record = record.trim_start_matches(['\n', '\r']);
      let (sha, message) = record.split_once(FIELD_SEP)?;
      let sha = sha.trim();
      if sha.is_empty() {
        return None;
      }
      Some(CommitInfo {
        sha: sha.to_string(),
        message: message.trim().to_string(),
      })
    })
    .collect()
}
