//! Next-version resolution
//!
//! The resolver answers one question: which version, if any, should this
//! project be released as? `None` means nothing was committed since the last
//! release and the run has nothing to do.

use crate::core::config::Preset;
use crate::core::error::SemverResult;
use crate::core::vcs::GitRunner;
use crate::release::history::{self, LastRelease, VersionBump};
use crate::release::manifest;
use crate::utils::repo_relative;
use crate::workspace::MANIFEST_FILE;
use semver::Version;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Computes the next version for a project
pub trait VersionBumper: Send + Sync {
  fn next_version(&self, project_root: &Path, tag_prefix: &str, preset: Preset) -> SemverResult<Option<Version>>;
}

/// Everything the resolver learned, for previews
#[derive(Debug, Clone, Serialize)]
pub struct VersionPlan {
  pub project_root: PathBuf,
  pub tag_prefix: String,
  pub last_release: Option<LastRelease>,
  pub commit_count: usize,
  pub bump: Option<VersionBump>,
  pub next_version: Option<Version>,
  pub is_first_release: bool,
}

/// Resolver driven by tags and conventional commits in the repository
pub struct ConventionalBumper {
  git: Arc<dyn GitRunner>,
  repo_root: PathBuf,
}

impl ConventionalBumper {
  pub fn new(git: Arc<dyn GitRunner>, repo_root: &Path) -> Self {
    Self {
      git,
      repo_root: repo_root.to_path_buf(),
    }
  }

  /// Resolve with full detail
  pub fn plan(&self, project_root: &Path, tag_prefix: &str, preset: Preset) -> SemverResult<VersionPlan> {
    let last_release = history::last_release(self.git.as_ref(), tag_prefix)?;
    let pathspec = repo_relative(project_root, &self.repo_root);
    let commits = history::commits_since(self.git.as_ref(), last_release.as_ref(), &pathspec)?;

    let mut plan = VersionPlan {
      project_root: project_root.to_path_buf(),
      tag_prefix: tag_prefix.to_string(),
      is_first_release: last_release.is_none(),
      last_release,
      commit_count: commits.len(),
      bump: None,
      next_version: None,
    };

    if commits.is_empty() {
      return Ok(plan);
    }

    let bump = VersionBump::from_commits(&commits, preset);
    plan.bump = Some(bump);
    plan.next_version = Some(match &plan.last_release {
      Some(release) => bump.apply(&release.version),
      // First release ships the version already in the manifest
      None => match manifest::read_version(&project_root.join(MANIFEST_FILE))? {
        Some(current) => current,
        None => bump.apply(&Version::new(0, 0, 0)),
      },
    });

    Ok(plan)
  }
}

impl VersionBumper for ConventionalBumper {
  fn next_version(&self, project_root: &Path, tag_prefix: &str, preset: Preset) -> SemverResult<Option<Version>> {
    let plan = self.plan(project_root, tag_prefix, preset)?;
    tracing::debug!(
      tag_prefix,
      commits = plan.commit_count,
      last = ?plan.last_release.as_ref().map(|r| &r.tag),
      next = ?plan.next_version.as_ref().map(|v| v.to_string()),
      "resolved next version"
    );
    Ok(plan.next_version)
  }
}
