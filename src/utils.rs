//! Utility functions for cross-platform path handling

use std::path::{Path, PathBuf};

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
/// This function converts backslashes to forward slashes for use in Git commands.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Express `path` relative to the repository root for use as a pathspec
///
/// Returns `.` for the root itself. Paths outside `base` are returned unchanged.
pub fn repo_relative(path: &Path, base: &Path) -> PathBuf {
  match path.strip_prefix(base) {
    Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
    Ok(rel) => rel.to_path_buf(),
    Err(_) => path.to_path_buf(),
  }
}
