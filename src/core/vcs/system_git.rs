//! System git backend
//!
//! Shells out to the `git` binary found on PATH. Local commands run with a
//! reduced environment: PATH/HOME for config lookup, identity overrides for
//! committing, and `GIT_REDIRECT_STDERR` so the push fallback sees the same
//! streams the user configured. Commands that talk to a remote inherit the
//! whole environment, since proxies, `GIT_CONFIG_*` overrides and credential
//! helper tokens all live there.

use super::{GitOutput, GitRunner};
use crate::core::error::{GitError, ResultExt, SemverError, SemverResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variables forwarded to git subprocesses
const FORWARDED_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "USERPROFILE",
  "XDG_CONFIG_HOME",
  "SSH_AUTH_SOCK",
  "SSH_AGENT_PID",
  "GIT_SSH",
  "GIT_SSH_COMMAND",
  "GIT_ASKPASS",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
  "GIT_REDIRECT_STDERR",
  "GIT_REDIRECT_STDOUT",
];

/// Subcommands that reach a remote
const REMOTE_COMMANDS: &[&str] = &["push", "fetch", "ls-remote"];

fn reaches_remote(args: &[String]) -> bool {
  args
    .first()
    .is_some_and(|command| REMOTE_COMMANDS.contains(&command.as_str()))
}

/// Git backend shelling out to the `git` binary
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> SemverResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(SemverError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(SemverError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root reported by git
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Create a git command
  ///
  /// - Runs from the working tree root, so pathspecs are root-relative
  /// - Forwards only the variables in `FORWARDED_ENV` unless `inherit_env`
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self, inherit_env: bool) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    if !inherit_env {
      cmd.env_clear();
      for key in FORWARDED_ENV {
        if let Ok(value) = std::env::var(key) {
          cmd.env(key, value);
        }
      }
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

impl GitRunner for SystemGit {
  fn run(&self, args: &[String]) -> SemverResult<GitOutput> {
    let command = format!("git {}", args.join(" "));
    tracing::debug!(%command, "running git");

    let output = self
      .git_cmd(reaches_remote(args))
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute {}", command))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
      return Err(SemverError::Git(GitError::CommandFailed { command, stdout, stderr }));
    }

    Ok(GitOutput { stdout, stderr })
  }
}
