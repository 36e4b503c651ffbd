//! Pushing the release commit and tags
//!
//! `git push --atomic` is tried first so the branch and the tag land together.
//! Git versions without atomic push support reject the flag; that one failure
//! is retried once without it. Every other failure is returned as-is.

use crate::core::env::Environment;
use crate::core::error::{ConfigError, GitError, SemverError, SemverResult};
use crate::core::vcs::{GitOutput, GitRunner};

/// Redirect value under which git may also write its errors to stdout
const STDERR_TO_STDOUT: &str = "2>&1";

/// Remote and branch to push to, both required
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget<'a> {
  pub remote: &'a str,
  pub branch: &'a str,
}

impl<'a> PushTarget<'a> {
  /// Validate the push configuration without running anything
  pub fn from_options(remote: Option<&'a str>, branch: Option<&'a str>) -> SemverResult<Self> {
    match (non_empty(remote), non_empty(branch)) {
      (Some(remote), Some(branch)) => Ok(Self { remote, branch }),
      _ => Err(ConfigError::MissingGitConfig.into()),
    }
  }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

/// Push to `remote`/`branch`, falling back to a non-atomic push on old git
pub fn try_push(
  remote: Option<&str>,
  branch: Option<&str>,
  no_verify: bool,
  git: &dyn GitRunner,
  env: &dyn Environment,
) -> SemverResult<GitOutput> {
  let target = PushTarget::from_options(remote, branch)?;

  match git.run(&push_args(&target, no_verify, true)) {
    Ok(output) => Ok(output),
    Err(err) if rejects_atomic(&err, env) => {
      tracing::warn!("{}", err);
      tracing::info!("git push --atomic failed, attempting non-atomic push");
      git.run(&push_args(&target, no_verify, false))
    }
    Err(err) => Err(err),
  }
}

fn push_args(target: &PushTarget<'_>, no_verify: bool, atomic: bool) -> Vec<String> {
  let mut args = vec!["push".to_string(), "--follow-tags".to_string()];
  if no_verify {
    args.push("--no-verify".to_string());
  }
  if atomic {
    args.push("--atomic".to_string());
  }
  args.push(target.remote.to_string());
  args.push(target.branch.to_string());
  args
}

/// Whether a failed push was git refusing the `--atomic` flag
fn rejects_atomic(err: &SemverError, env: &dyn Environment) -> bool {
  let SemverError::Git(GitError::CommandFailed { stdout, stderr, .. }) = err else {
    return false;
  };

  let redirected = env.var("GIT_REDIRECT_STDERR").as_deref() == Some(STDERR_TO_STDOUT);
  stderr.contains("atomic") || (redirected && stdout.contains("atomic"))
}
