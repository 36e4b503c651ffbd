//! Git access for release runs
//!
//! Everything that touches git goes through [`GitRunner`], so the release
//! pipeline can be driven by the system binary ([`SystemGit`]) or by a
//! scripted fake in tests. Higher-level helpers live in [`GitOps`].

pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;
pub use system_git_ops::GitOps;

use crate::core::error::SemverResult;

/// Captured output of a successful git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Runs `git <args>` in the repository
///
/// A non-zero exit must be reported as `GitError::CommandFailed` carrying both
/// output streams, since callers inspect them (see the atomic push fallback).
pub trait GitRunner: Send + Sync {
  fn run(&self, args: &[String]) -> SemverResult<GitOutput>;
}

/// Information about a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
  pub sha: String,
  pub message: String,
}
