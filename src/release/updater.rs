//! Changelog and manifest updates, release commit and tag
//!
//! The updater receives a fully resolved [`UpdateRequest`]: which version,
//! which files, which tag. It never decides what to release, only how.

use crate::core::config::Preset;
use crate::core::error::{ResultExt, SemverResult};
use crate::core::vcs::{GitOps, GitRunner};
use crate::release::changelog::{self, Changelog, ConventionalCommit};
use crate::release::history;
use crate::release::manifest;
use crate::release::plugins::{PluginRelease, ReleasePlugin};
use crate::utils::repo_relative;
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One release to write
#[derive(Clone)]
pub struct UpdateRequest {
  /// Directory whose history feeds the changelog
  pub path: PathBuf,
  pub new_version: Version,
  pub tag_prefix: String,
  /// Changelog to write, if any
  pub infile: Option<PathBuf>,
  /// No changelog exists yet
  pub first_release: bool,
  /// Manifests whose version is the source of truth
  pub package_files: Vec<PathBuf>,
  /// Manifests rewritten to the new version
  pub bump_files: Vec<PathBuf>,
  pub preset: Preset,
  pub dry_run: bool,
  pub no_verify: bool,
  pub plugins: Vec<Arc<dyn ReleasePlugin>>,
}

impl UpdateRequest {
  pub fn tag(&self) -> String {
    format!("{}{}", self.tag_prefix, self.new_version)
  }

  fn plugin_release(&self) -> PluginRelease {
    PluginRelease {
      version: self.new_version.clone(),
      tag: self.tag(),
      project_roots: self
        .bump_files
        .iter()
        .filter_map(|f| f.parent().map(Path::to_path_buf))
        .collect(),
      dry_run: self.dry_run,
    }
  }
}

impl std::fmt::Debug for UpdateRequest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("UpdateRequest")
      .field("path", &self.path)
      .field("new_version", &self.new_version)
      .field("tag_prefix", &self.tag_prefix)
      .field("infile", &self.infile)
      .field("first_release", &self.first_release)
      .field("package_files", &self.package_files)
      .field("bump_files", &self.bump_files)
      .field("preset", &self.preset)
      .field("dry_run", &self.dry_run)
      .field("no_verify", &self.no_verify)
      .field("plugins", &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>())
      .finish()
  }
}

/// Applies an [`UpdateRequest`] to the working tree and repository
pub trait ReleaseUpdater: Send + Sync {
  fn update(&self, request: &UpdateRequest) -> SemverResult<()>;
}

/// Conventional-commit changelog writer backed by git
pub struct ConventionalUpdater {
  git: Arc<dyn GitRunner>,
  repo_root: PathBuf,
}

impl ConventionalUpdater {
  pub fn new(git: Arc<dyn GitRunner>, repo_root: &Path) -> Self {
    Self {
      git,
      repo_root: repo_root.to_path_buf(),
    }
  }

  /// Render the changelog entry for the commits since the previous tag
  pub fn render_entry(&self, request: &UpdateRequest) -> SemverResult<String> {
    let last = history::last_release(self.git.as_ref(), &request.tag_prefix)?;
    let pathspec = repo_relative(&request.path, &self.repo_root);
    let commits = history::commits_since(self.git.as_ref(), last.as_ref(), &pathspec)?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut entry = Changelog::new(request.new_version.to_string(), date, request.preset);
    if let Some(last) = &last
      && let Some(repository) = self.repository_url(request)?
    {
      entry = entry.with_compare(&repository, &last.tag, &request.tag());
    }
    for commit in &commits {
      if let Some(parsed) = ConventionalCommit::parse(&commit.message, request.preset) {
        entry.add_commit(parsed, &commit.sha);
      }
    }

    Ok(entry.to_markdown())
  }

  fn repository_url(&self, request: &UpdateRequest) -> SemverResult<Option<String>> {
    match request.package_files.first() {
      Some(file) => manifest::repository_url(file),
      None => Ok(None),
    }
  }

  fn bump_manifests(&self, request: &UpdateRequest) -> SemverResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for file in &request.bump_files {
      if !file.exists() {
        tracing::warn!(file = %file.display(), "manifest not found, skipping bump");
        continue;
      }
      if request.dry_run {
        tracing::info!(file = %file.display(), version = %request.new_version, "would bump");
        continue;
      }
      manifest::write_version(file, &request.new_version)?;
      tracing::info!(file = %file.display(), version = %request.new_version, "bumped");
      written.push(file.clone());
    }
    Ok(written)
  }

  fn write_changelog(&self, request: &UpdateRequest) -> SemverResult<Option<PathBuf>> {
    let Some(infile) = &request.infile else {
      return Ok(None);
    };

    let entry = self.render_entry(request)?;
    if request.dry_run {
      tracing::info!(file = %infile.display(), "would update changelog:\n{}", entry);
      return Ok(None);
    }

    changelog::write_entry(infile, &entry, request.first_release)
      .with_context(|| format!("Failed to write {}", infile.display()))?;
    tracing::info!(file = %infile.display(), first_release = request.first_release, "changelog updated");
    Ok(Some(infile.clone()))
  }

  fn commit_and_tag(&self, request: &UpdateRequest, files: &[PathBuf]) -> SemverResult<()> {
    let tag = request.tag();
    let message = format!("chore(release): {}", tag);

    if request.dry_run {
      tracing::info!(%tag, "would commit and tag");
      return Ok(());
    }

    if !files.is_empty() {
      let pathspecs: Vec<_> = files.iter().map(|f| repo_relative(f, &self.repo_root)).collect();
      self.git.add(&pathspecs)?;
      self.git.commit(&message, request.no_verify)?;
    }
    self.git.tag_annotated(&tag, &message)?;
    tracing::info!(%tag, "tagged");
    Ok(())
  }
}

impl ReleaseUpdater for ConventionalUpdater {
  fn update(&self, request: &UpdateRequest) -> SemverResult<()> {
    let release = request.plugin_release();
    for plugin in &request.plugins {
      plugin.validate(&release)?;
    }

    let current = match request.package_files.first() {
      Some(file) => manifest::read_version(file)?,
      None => None,
    };
    tracing::info!(
      from = %current.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string()),
      to = %request.new_version,
      tag = %request.tag(),
      "releasing"
    );

    let mut files = self.bump_manifests(request)?;
    files.extend(self.write_changelog(request)?);
    self.commit_and_tag(request, &files)?;

    for plugin in &request.plugins {
      tracing::debug!(plugin = plugin.name(), "running plugin");
      plugin.publish(&release)?;
    }
    Ok(())
  }
}
