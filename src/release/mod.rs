//! Release pipeline building blocks
//!
//! # Stages
//!
//! ```text
//! resolver   tags + conventional commits -> next version (or nothing to do)
//! updater    manifests + CHANGELOG.md -> release commit -> annotated tag -> plugins
//! publish    git push --follow-tags --atomic, non-atomic fallback for old git
//! ```
//!
//! # Tags
//!
//! Independent projects are tagged `<project>-<version>`, a workspace versioned
//! in lockstep is tagged `v<version>`. The prefix also scopes which tags count
//! as the previous release.

pub mod changelog;
pub mod history;
pub mod manifest;
pub mod plugins;
pub mod publish;
pub mod resolver;
pub mod updater;

pub use plugins::PluginRegistry;
pub use resolver::{ConventionalBumper, VersionBumper, VersionPlan};
pub use updater::{ConventionalUpdater, ReleaseUpdater, UpdateRequest};

/// Tag prefix for lockstep workspace releases
pub const SYNC_TAG_PREFIX: &str = "v";

/// Tag prefix for a release of `project`
pub fn tag_prefix(project: &str, sync_versions: bool) -> String {
  if sync_versions {
    SYNC_TAG_PREFIX.to_string()
  } else {
    format!("{}-", project)
  }
}
