//! Release history: last tag for a prefix and the commits made since

use crate::core::config::Preset;
use crate::core::error::SemverResult;
use crate::core::vcs::{CommitInfo, GitOps, GitRunner};
use crate::release::changelog::{CommitType, ConventionalCommit};
use semver::Version;
use serde::Serialize;
use std::path::Path;

/// Most recent release tag for a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastRelease {
  pub tag: String,
  pub version: Version,
}

/// Find the greatest semver tag under `prefix`
///
/// Tags that do not parse after stripping the prefix are ignored, which keeps
/// `lib-` from matching tags of a sibling project like `lib-utils-1.0.0`.
pub fn last_release(git: &dyn GitRunner, prefix: &str) -> SemverResult<Option<LastRelease>> {
  let release = git
    .list_tags(prefix)?
    .into_iter()
    .filter_map(|tag| {
      let version = Version::parse(tag.strip_prefix(prefix)?).ok()?;
      Some(LastRelease { tag, version })
    })
    .max_by(|a, b| a.version.cmp(&b.version));

  Ok(release)
}

/// Commits since `since` touching `pathspec`, newest first
pub fn commits_since(git: &dyn GitRunner, since: Option<&LastRelease>, pathspec: &Path) -> SemverResult<Vec<CommitInfo>> {
  git.commits_since(since.map(|r| r.tag.as_str()), pathspec)
}

/// Version bump type based on conventional commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
  Major,
  Minor,
  Patch,
}

impl VersionBump {
  /// Decide the bump for a set of commits
  ///
  /// Non-conventional commits and hidden types still count as a patch: any
  /// change since the last release is worth releasing.
  pub fn from_commits(commits: &[CommitInfo], preset: Preset) -> Self {
    let parsed: Vec<_> = commits
      .iter()
      .filter_map(|c| ConventionalCommit::parse(&c.message, preset))
      .collect();

    if parsed.iter().any(|c| c.is_breaking()) {
      VersionBump::Major
    } else if parsed.iter().any(|c| c.commit_type == CommitType::Feat) {
      VersionBump::Minor
    } else {
      VersionBump::Patch
    }
  }

  /// Apply bump to a semver version
  pub fn apply(&self, version: &Version) -> Version {
    match self {
      VersionBump::Major => Version::new(version.major + 1, 0, 0),
      VersionBump::Minor => Version::new(version.major, version.minor + 1, 0),
      VersionBump::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
  }
}
