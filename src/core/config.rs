use crate::core::error::{ResultExt, SemverResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional-commit dialect used to read history and lay out changelogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
  /// Angular convention: `type(scope): subject`, breaking changes only via footer
  #[default]
  Angular,
  /// Conventional Commits 1.0: also accepts the `type!:` breaking marker
  #[value(name = "conventionalcommits")]
  ConventionalCommits,
}

impl Preset {
  /// Whether `feat!: ...` style headers mark a breaking change
  pub fn accepts_breaking_marker(self) -> bool {
    matches!(self, Preset::ConventionalCommits)
  }
}

/// Options for one `version` run
///
/// Built once from semver.toml and the command line, then passed by reference
/// through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOptions {
  /// Compute and log everything, write nothing, push nothing
  pub dry_run: bool,
  /// Skip git hooks on commit and push
  pub no_verify: bool,
  /// Push the release commit and tag
  pub push: bool,
  pub remote: Option<String>,
  pub base_branch: Option<String>,
  /// Version every project in lockstep with a single `v` tag
  pub sync_versions: bool,
  /// In sync mode, maintain CHANGELOG.md at the workspace root
  pub root_changelog: bool,
  pub preset: Preset,
  /// Plugin names, resolved against the registry at startup
  pub plugins: Vec<String>,
}

impl Default for VersionOptions {
  fn default() -> Self {
    Self {
      dry_run: false,
      no_verify: false,
      push: false,
      remote: None,
      base_branch: None,
      sync_versions: false,
      root_changelog: true,
      preset: Preset::default(),
      plugins: Vec::new(),
    }
  }
}

/// Command-line values layered over the config file
#[derive(Debug, Clone, Default)]
pub struct VersionOverrides {
  pub dry_run: bool,
  pub no_verify: bool,
  pub push: bool,
  pub remote: Option<String>,
  pub base_branch: Option<String>,
  pub sync_versions: bool,
  pub no_root_changelog: bool,
  pub preset: Option<Preset>,
  pub plugins: Vec<String>,
}

/// Configuration for workspace-semver
/// Searched in order: semver.toml, .semver.toml, .config/semver.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemverConfig {
  #[serde(default)]
  pub version: VersionSection,
}

/// `[version]` defaults for the `version` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSection {
  #[serde(default)]
  pub preset: Preset,
  #[serde(default)]
  pub remote: Option<String>,
  #[serde(default)]
  pub base_branch: Option<String>,
  #[serde(default)]
  pub push: bool,
  #[serde(default)]
  pub no_verify: bool,
  #[serde(default)]
  pub sync_versions: bool,
  #[serde(default = "default_root_changelog")]
  pub root_changelog: bool,
  #[serde(default)]
  pub plugins: Vec<String>,
}

fn default_root_changelog() -> bool {
  true
}

impl Default for VersionSection {
  fn default() -> Self {
    Self {
      preset: Preset::default(),
      remote: None,
      base_branch: None,
      push: false,
      no_verify: false,
      sync_versions: false,
      root_changelog: default_root_changelog(),
      plugins: Vec::new(),
    }
  }
}

impl SemverConfig {
  /// Find config file in search order: semver.toml, .semver.toml, .config/semver.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("semver.toml"),
      path.join(".semver.toml"),
      path.join(".config").join("semver.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> SemverResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: SemverConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded semver config");
    Ok(config)
  }

  /// Merge command-line values over the `[version]` defaults
  pub fn version_options(&self, cli: VersionOverrides) -> VersionOptions {
    let file = &self.version;
    let plugins = if cli.plugins.is_empty() {
      file.plugins.clone()
    } else {
      cli.plugins
    };

    VersionOptions {
      dry_run: cli.dry_run,
      no_verify: cli.no_verify || file.no_verify,
      push: cli.push || file.push,
      remote: cli.remote.or_else(|| file.remote.clone()),
      base_branch: cli.base_branch.or_else(|| file.base_branch.clone()),
      sync_versions: cli.sync_versions || file.sync_versions,
      root_changelog: file.root_changelog && !cli.no_root_changelog,
      preset: cli.preset.unwrap_or(file.preset),
      plugins,
    }
  }
}
