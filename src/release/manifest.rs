//! package.json version reads and bumps
//!
//! serde_json is built with `preserve_order`, so rewriting a manifest keeps the
//! author's key order.

use crate::core::error::{ResultExt, SemverError, SemverResult};
use semver::Version;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read the `version` field of a manifest, if the file exists and has one
pub fn read_version(path: &Path) -> SemverResult<Option<Version>> {
  if !path.exists() {
    return Ok(None);
  }

  let manifest = read_manifest(path)?;
  match manifest.get("version").and_then(Value::as_str) {
    Some(v) => Ok(Some(
      Version::parse(v).with_context(|| format!("Invalid version in {}", path.display()))?,
    )),
    None => Ok(None),
  }
}

/// Rewrite the `version` field of a manifest
pub fn write_version(path: &Path, version: &Version) -> SemverResult<()> {
  let mut manifest = read_manifest(path)?;

  let object = manifest
    .as_object_mut()
    .ok_or_else(|| SemverError::message(format!("{} is not a JSON object", path.display())))?;
  object.insert("version".to_string(), Value::String(version.to_string()));

  let mut content = serde_json::to_string_pretty(&manifest)?;
  content.push('\n');
  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(())
}

/// Browsable URL of the manifest's `repository`, for changelog links
///
/// Accepts the string and `{ "url": ... }` forms, `git+`/`.git` decorated URLs,
/// `git@host:owner/repo` and the `github:owner/repo` or bare `owner/repo`
/// shorthands. Anything else yields None.
pub fn repository_url(path: &Path) -> SemverResult<Option<String>> {
  if !path.exists() {
    return Ok(None);
  }

  let manifest = read_manifest(path)?;
  let raw = match manifest.get("repository") {
    Some(Value::String(url)) => url.as_str(),
    Some(Value::Object(repo)) => match repo.get("url").and_then(Value::as_str) {
      Some(url) => url,
      None => return Ok(None),
    },
    _ => return Ok(None),
  };
  Ok(normalize_repository(raw))
}

fn normalize_repository(raw: &str) -> Option<String> {
  let url = raw.trim().trim_start_matches("git+");
  let url = url.strip_suffix(".git").unwrap_or(url);

  let url = if let Some(rest) = url.strip_prefix("git@") {
    let (host, path) = rest.split_once(':')?;
    format!("https://{}/{}", host, path)
  } else if let Some(rest) = url.strip_prefix("github:") {
    format!("https://github.com/{}", rest)
  } else if !url.contains(':') && url.matches('/').count() == 1 {
    format!("https://github.com/{}", url)
  } else {
    url.replacen("git://", "https://", 1)
  };

  (url.starts_with("https://") || url.starts_with("http://")).then(|| url.trim_end_matches('/').to_string())
}

fn read_manifest(path: &Path) -> SemverResult<Value> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
