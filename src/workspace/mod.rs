//! Workspace introspection
//!
//! - **definition**: `workspace.json` / `angular.json` loading and project enumeration
//! - **lookup**: host-side resolution of a project name to its root directory

pub mod definition;
pub mod lookup;

pub use definition::{CachedWorkspaceReader, JsonWorkspaceReader, MANIFEST_FILE, WorkspaceDefinition, WorkspaceReader};
pub use lookup::{DefinitionLookup, ProjectLookup, WORKSPACE_TARGET};
