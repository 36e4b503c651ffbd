use super::definition::{JsonWorkspaceReader, WorkspaceReader};
use crate::core::error::{ConfigError, SemverError, SemverResult};
use std::path::{Path, PathBuf};

/// Target name that stands for the workspace root itself
pub const WORKSPACE_TARGET: &str = "workspace";

/// Resolves a project name to its absolute root directory
///
/// This is the host's project metadata service. The CLI answers it from the
/// workspace definition; embedders can answer it from their own project graph.
pub trait ProjectLookup: Send + Sync {
  fn project_root(&self, project: &str) -> SemverResult<PathBuf>;
}

/// Project lookup backed by the workspace definition file
pub struct DefinitionLookup<R = JsonWorkspaceReader> {
  workspace_root: PathBuf,
  reader: R,
}

impl DefinitionLookup {
  pub fn new(workspace_root: &Path) -> Self {
    Self::with_reader(workspace_root, JsonWorkspaceReader)
  }
}

impl<R: WorkspaceReader> DefinitionLookup<R> {
  pub fn with_reader(workspace_root: &Path, reader: R) -> Self {
    Self {
      workspace_root: workspace_root.to_path_buf(),
      reader,
    }
  }
}

impl<R: WorkspaceReader> ProjectLookup for DefinitionLookup<R> {
  fn project_root(&self, project: &str) -> SemverResult<PathBuf> {
    let definition = match self.reader.load(&self.workspace_root) {
      Ok(definition) => Some(definition),
      // The workspace target needs no definition file
      Err(SemverError::Config(ConfigError::NotFound { .. })) if project == WORKSPACE_TARGET => None,
      Err(e) => return Err(e),
    };

    if let Some(root) = definition
      .as_ref()
      .and_then(|d| d.project_root(&self.workspace_root, project))
    {
      return Ok(root);
    }

    if project == WORKSPACE_TARGET {
      return Ok(self.workspace_root.clone());
    }

    Err(SemverError::Config(ConfigError::ProjectNotFound {
      name: project.to_string(),
    }))
  }
}
