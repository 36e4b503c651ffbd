//! Release context - build once, pass to the command
//!
//! # Architecture
//!
//! ```text
//! main.rs:
//!   ReleaseContext::build(root) -> &ReleaseContext
//!   |
//!   v
//! commands/version.rs, plan.rs:
//!   fn run(options, ctx: &ReleaseContext)
//! ```
//!
//! Every collaborator is a trait object, so tests assemble a context from
//! fakes with [`ReleaseContext::new`].

use crate::core::env::{Environment, ProcessEnvironment};
use crate::core::error::SemverResult;
use crate::core::vcs::{GitRunner, SystemGit};
use crate::release::{ConventionalBumper, ConventionalUpdater, PluginRegistry, ReleaseUpdater, VersionBumper};
use crate::workspace::{CachedWorkspaceReader, DefinitionLookup, JsonWorkspaceReader, ProjectLookup, WorkspaceReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Collaborators for one release run
#[derive(Clone)]
pub struct ReleaseContext {
  /// Workspace root directory (absolute path)
  pub root: PathBuf,

  /// Project name -> root directory
  pub projects: Arc<dyn ProjectLookup>,

  /// Workspace definition, read in sync mode
  pub workspace: Arc<dyn WorkspaceReader>,

  pub bumper: Arc<dyn VersionBumper>,
  pub updater: Arc<dyn ReleaseUpdater>,

  /// Used for pushing
  pub git: Arc<dyn GitRunner>,

  pub env: Arc<dyn Environment>,

  /// Plugins that `plugins = [...]` may name
  pub plugins: Arc<PluginRegistry>,
}

impl ReleaseContext {
  pub fn new(
    root: &Path,
    projects: Arc<dyn ProjectLookup>,
    workspace: Arc<dyn WorkspaceReader>,
    bumper: Arc<dyn VersionBumper>,
    updater: Arc<dyn ReleaseUpdater>,
    git: Arc<dyn GitRunner>,
    env: Arc<dyn Environment>,
  ) -> Self {
    Self {
      root: root.to_path_buf(),
      projects,
      workspace,
      bumper,
      updater,
      git,
      env,
      plugins: Arc::new(PluginRegistry::builtin()),
    }
  }

  /// Project lookup and workspace reader sharing one definition read
  pub fn definition_backed<R: WorkspaceReader + 'static>(
    workspace_root: &Path,
    reader: R,
  ) -> (Arc<dyn ProjectLookup>, Arc<dyn WorkspaceReader>) {
    let reader = Arc::new(CachedWorkspaceReader::new(reader));
    let lookup = DefinitionLookup::with_reader(workspace_root, reader.clone());
    (Arc::new(lookup), reader)
  }

  /// Build the context backed by system git and the workspace definition
  ///
  /// Fails when `workspace_root` is not inside a git repository.
  pub fn build(workspace_root: &Path) -> SemverResult<Self> {
    let git = SystemGit::open(workspace_root)?;
    let repo_root = git.work_tree().to_path_buf();
    let git: Arc<dyn GitRunner> = Arc::new(git);
    let (projects, workspace) = Self::definition_backed(workspace_root, JsonWorkspaceReader);

    Ok(Self::new(
      workspace_root,
      projects,
      workspace,
      Arc::new(ConventionalBumper::new(git.clone(), &repo_root)),
      Arc::new(ConventionalUpdater::new(git.clone(), &repo_root)),
      git,
      Arc::new(ProcessEnvironment),
    ))
  }
}
