//! Release plugins
//!
//! Plugins are named in configuration and resolved against a static registry
//! when the run starts, so a typo fails before anything is written. The
//! updater hands every resolved plugin the finished release.

use crate::core::error::{ConfigError, SemverError, SemverResult};
use semver::Version;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

/// A release as seen by plugins
#[derive(Debug, Clone)]
pub struct PluginRelease {
  pub version: Version,
  pub tag: String,
  /// Directories of the projects that were released
  pub project_roots: Vec<PathBuf>,
  pub dry_run: bool,
}

pub trait ReleasePlugin: Send + Sync {
  fn name(&self) -> &str;

  /// Check preconditions before any file is touched
  fn validate(&self, _release: &PluginRelease) -> SemverResult<()> {
    Ok(())
  }

  /// Act on the tagged release
  fn publish(&self, release: &PluginRelease) -> SemverResult<()>;
}

type PluginFactory = fn() -> Arc<dyn ReleasePlugin>;

/// Name → plugin constructor
pub struct PluginRegistry {
  factories: BTreeMap<&'static str, PluginFactory>,
}

impl PluginRegistry {
  /// Empty registry
  pub fn new() -> Self {
    Self {
      factories: BTreeMap::new(),
    }
  }

  /// Registry with the plugins shipped in this crate
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    registry.register("npm", || Arc::new(NpmPublish));
    registry
  }

  pub fn register(&mut self, name: &'static str, factory: PluginFactory) {
    self.factories.insert(name, factory);
  }

  pub fn names(&self) -> Vec<String> {
    self.factories.keys().map(|n| n.to_string()).collect()
  }

  /// Instantiate plugins in the order they were requested
  pub fn resolve(&self, names: &[String]) -> SemverResult<Vec<Arc<dyn ReleasePlugin>>> {
    names
      .iter()
      .map(|name| {
        self
          .factories
          .get(name.as_str())
          .map(|factory| factory())
          .ok_or_else(|| {
            SemverError::Config(ConfigError::UnknownPlugin {
              name: name.clone(),
              available: self.names(),
            })
          })
      })
      .collect()
  }
}

impl Default for PluginRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

/// Publishes each released project with `npm publish`
pub struct NpmPublish;

impl ReleasePlugin for NpmPublish {
  fn name(&self) -> &str {
    "npm"
  }

  fn validate(&self, release: &PluginRelease) -> SemverResult<()> {
    if let Some(root) = release
      .project_roots
      .iter()
      .find(|root| !root.join("package.json").exists())
    {
      return Err(SemverError::with_help(
        format!("npm plugin: no package.json in {}", root.display()),
        "Remove \"npm\" from `plugins` for projects that are not published to a registry.",
      ));
    }
    Ok(())
  }

  fn publish(&self, release: &PluginRelease) -> SemverResult<()> {
    for root in &release.project_roots {
      let mut cmd = Command::new("npm");
      cmd.arg("publish").current_dir(root);
      if release.dry_run {
        cmd.arg("--dry-run");
      }

      tracing::info!(project = %root.display(), version = %release.version, tag = %release.tag, "npm publish");
      let output = cmd
        .output()
        .map_err(|e| SemverError::external("npm publish", e))?;

      if !output.status.success() {
        return Err(SemverError::external(
          "npm publish",
          String::from_utf8_lossy(&output.stderr).trim(),
        ));
      }
    }
    Ok(())
  }
}
