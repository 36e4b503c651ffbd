use crate::core::error::{ConfigError, ResultExt, SemverError, SemverResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Conventional workspace definition files, tried in order
pub const DEFINITION_FILES: [&str; 2] = ["workspace.json", "angular.json"];

/// Manifest carrying each project's version
pub const MANIFEST_FILE: &str = "package.json";

/// Projects declared by the workspace
///
/// Projects are kept sorted by name so enumeration is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkspaceDefinition {
  pub projects: BTreeMap<String, ProjectDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectDefinition {
  /// Project root, relative to the workspace root
  pub root: PathBuf,
}

impl WorkspaceDefinition {
  /// Parse a definition from JSON text
  pub fn parse(content: &str, path: &Path) -> SemverResult<Self> {
    serde_json::from_str(content).map_err(|e| {
      SemverError::Config(ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
      })
    })
  }

  /// Absolute root of a declared project
  pub fn project_root(&self, workspace_root: &Path, name: &str) -> Option<PathBuf> {
    self.projects.get(name).map(|p| workspace_root.join(&p.root))
  }

  /// Manifest path of every declared project, in enumeration order
  pub fn manifest_paths(&self, workspace_root: &Path) -> Vec<PathBuf> {
    self
      .projects
      .values()
      .map(|p| workspace_root.join(&p.root).join(MANIFEST_FILE))
      .collect()
  }
}

/// Loads the workspace definition for a workspace root
pub trait WorkspaceReader: Send + Sync {
  fn load(&self, workspace_root: &Path) -> SemverResult<WorkspaceDefinition>;
}

/// Reads the first existing file of `DEFINITION_FILES`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWorkspaceReader;

impl JsonWorkspaceReader {
  /// Find the definition file in search order
  pub fn find_definition_path(workspace_root: &Path) -> Option<PathBuf> {
    DEFINITION_FILES
      .iter()
      .map(|name| workspace_root.join(name))
      .find(|p| p.exists())
  }
}

impl WorkspaceReader for JsonWorkspaceReader {
  fn load(&self, workspace_root: &Path) -> SemverResult<WorkspaceDefinition> {
    let path = Self::find_definition_path(workspace_root).ok_or_else(|| {
      SemverError::Config(ConfigError::NotFound {
        workspace_root: workspace_root.to_path_buf(),
      })
    })?;

    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read workspace definition {}", path.display()))?;

    let definition = WorkspaceDefinition::parse(&content, &path)?;
    tracing::debug!(path = %path.display(), projects = definition.projects.len(), "loaded workspace definition");
    Ok(definition)
  }
}

impl<R: WorkspaceReader + ?Sized> WorkspaceReader for Arc<R> {
  fn load(&self, workspace_root: &Path) -> SemverResult<WorkspaceDefinition> {
    (**self).load(workspace_root)
  }
}

/// Reads the definition once per workspace root and hands out copies
///
/// Failed reads are not cached.
pub struct CachedWorkspaceReader<R> {
  inner: R,
  cached: Mutex<Option<(PathBuf, WorkspaceDefinition)>>,
}

impl<R: WorkspaceReader> CachedWorkspaceReader<R> {
  pub fn new(inner: R) -> Self {
    Self {
      inner,
      cached: Mutex::new(None),
    }
  }
}

impl<R: WorkspaceReader> WorkspaceReader for CachedWorkspaceReader<R> {
  fn load(&self, workspace_root: &Path) -> SemverResult<WorkspaceDefinition> {
    // Held across the read so concurrent callers wait for the first one
    let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some((root, definition)) = cached.as_ref()
      && root == workspace_root
    {
      return Ok(definition.clone());
    }

    let definition = self.inner.load(workspace_root)?;
    *cached = Some((workspace_root.to_path_buf(), definition.clone()));
    Ok(definition)
  }
}
