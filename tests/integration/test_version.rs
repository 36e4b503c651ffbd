//! Integration tests for `workspace-semver version`

use crate::helpers::{TestWorkspace, remote_tags, run_semver, run_semver_ok};
use anyhow::Result;

#[test]
fn test_first_release_of_single_project() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.change("packages/lib/index.js", "exports.greet = () => 'hi';\n", "feat(lib): add greeting")?;

  run_semver_ok(&ws.path, &["version", "lib"])?;

  // First release ships the manifest version as-is
  assert_eq!(ws.tags()?, vec!["lib-0.1.0"]);
  assert_eq!(ws.manifest_version("packages/lib/package.json")?, "0.1.0");

  let changelog = ws.read_file("packages/lib/CHANGELOG.md")?;
  assert!(changelog.starts_with("# Changelog"));
  assert!(changelog.contains("## 0.1.0 ("));
  assert!(changelog.contains("### Features"));
  assert!(changelog.contains("* **lib:** add greeting ("));

  assert!(!ws.file_exists("CHANGELOG.md"));
  assert!(!ws.file_exists("packages/app/CHANGELOG.md"));
  assert_eq!(ws.head_subject()?, "chore(release): lib-0.1.0");
  assert!(ws.is_clean()?);

  Ok(())
}

#[test]
fn test_follow_up_release_bumps_from_tag() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;

  ws.change("packages/lib/index.js", "exports.greet = () => 'hello';\n", "fix(lib): friendlier greeting")?;
  run_semver_ok(&ws.path, &["version", "lib"])?;

  assert_eq!(ws.manifest_version("packages/lib/package.json")?, "0.1.1");
  assert!(ws.tags()?.contains(&"lib-0.1.1".to_string()));

  let changelog = ws.read_file("packages/lib/CHANGELOG.md")?;
  let newer = changelog.find("## 0.1.1").expect("new entry");
  let older = changelog.find("## 0.1.0").expect("previous entry");
  assert!(newer < older);
  assert!(changelog.contains("### Bug Fixes"));
  assert!(changelog.contains("friendlier greeting"));

  // Other projects are untouched
  assert_eq!(ws.manifest_version("packages/app/package.json")?, "0.1.0");

  Ok(())
}

#[test]
fn test_feature_bumps_minor() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;

  ws.change("packages/lib/extra.js", "exports.extra = 1;\n", "feat: extra export")?;
  ws.change("packages/lib/index.js", "exports.fixed = 1;\n", "fix: broken export")?;
  run_semver_ok(&ws.path, &["version", "lib"])?;

  assert_eq!(ws.manifest_version("packages/lib/package.json")?, "0.2.0");
  Ok(())
}

#[test]
fn test_changes_elsewhere_do_not_release_project() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;

  ws.change("packages/app/main.js", "// app only\n", "feat(app): app only change")?;
  let output = run_semver_ok(&ws.path, &["version", "lib"])?;

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Nothing changed since last release"), "stderr: {}", stderr);
  assert_eq!(ws.tags()?, vec!["lib-0.1.0"]);
  Ok(())
}

#[test]
fn test_nothing_to_release_is_success() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;
  let tags = ws.tags()?;

  let output = run_semver(&ws.path, &["version", "lib", "--push", "--remote", "origin", "--base-branch", "main"])?;

  // No release means no push, so the missing remote never matters
  assert!(output.status.success());
  assert_eq!(ws.tags()?, tags);
  Ok(())
}

#[test]
fn test_sync_versions_release() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.change("packages/app/main.js", "// v2\n", "feat: lockstep release")?;

  run_semver_ok(&ws.path, &["version", "--sync-versions"])?;

  assert_eq!(ws.tags()?, vec!["v1.0.0"]);
  assert_eq!(ws.manifest_version("packages/lib/package.json")?, "1.0.0");
  assert_eq!(ws.manifest_version("packages/app/package.json")?, "1.0.0");
  assert!(ws.read_file("CHANGELOG.md")?.contains("## 1.0.0 ("));
  assert!(!ws.file_exists("packages/lib/CHANGELOG.md"));
  assert_eq!(ws.head_subject()?, "chore(release): v1.0.0");

  ws.change("packages/lib/index.js", "exports.b = 1;\n", "fix: lib only fix")?;
  run_semver_ok(&ws.path, &["version", "--sync-versions"])?;

  assert!(ws.tags()?.contains(&"v1.0.1".to_string()));
  assert_eq!(ws.manifest_version("packages/app/package.json")?, "1.0.1");
  Ok(())
}

#[test]
fn test_sync_versions_without_root_changelog() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "--sync-versions", "--no-root-changelog"])?;

  assert_eq!(ws.tags()?, vec!["v1.0.0"]);
  assert!(!ws.file_exists("CHANGELOG.md"));
  assert_eq!(ws.manifest_version("packages/lib/package.json")?, "1.0.0");
  Ok(())
}

#[test]
fn test_sync_versions_from_config_file() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.change("semver.toml", "[version]\nsync_versions = true\n", "chore: configure releases")?;

  run_semver_ok(&ws.path, &["version"])?;

  assert_eq!(ws.tags()?, vec!["v1.0.0"]);
  Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.change("packages/lib/index.js", "exports.a = 1;\n", "feat: something")?;

  run_semver_ok(&ws.path, &["version", "lib", "--dry-run"])?;

  assert!(ws.tags()?.is_empty());
  assert!(!ws.file_exists("packages/lib/CHANGELOG.md"));
  assert!(ws.is_clean()?);
  assert_eq!(ws.head_subject()?, "feat: something");
  Ok(())
}

#[test]
fn test_push_to_remote() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let remote = ws.add_bare_remote()?;

  run_semver_ok(
    &ws.path,
    &["version", "lib", "--push", "--remote", "origin", "--base-branch", "main"],
  )?;

  assert_eq!(remote_tags(remote.path())?, vec!["lib-0.1.0"]);
  Ok(())
}

#[test]
fn test_push_without_remote_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.change("packages/lib/index.js", "exports.a = 1;\n", "feat: something")?;

  let output = run_semver(&ws.path, &["version", "lib", "--push"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Missing configuration"), "stderr: {}", stderr);

  // Fails before anything is written
  assert!(ws.tags()?.is_empty());
  assert!(!ws.file_exists("packages/lib/CHANGELOG.md"));
  Ok(())
}

#[test]
fn test_push_failure_reports_failure() -> Result<()> {
  let ws = TestWorkspace::new()?;

  // Remote "origin" does not exist
  let output = run_semver(
    &ws.path,
    &["version", "lib", "--push", "--remote", "origin", "--base-branch", "main"],
  )?;

  assert_eq!(output.status.code(), Some(1));
  // The release itself was made before the push
  assert_eq!(ws.tags()?, vec!["lib-0.1.0"]);
  Ok(())
}

#[test]
fn test_unknown_project_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_semver(&ws.path, &["version", "nope"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("nope"), "stderr: {}", stderr);
  Ok(())
}

#[test]
fn test_angular_json_fallback() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let definition = ws.read_file("workspace.json")?;
  std::fs::remove_file(ws.path.join("workspace.json"))?;
  ws.change("angular.json", &definition, "chore: move to angular.json")?;

  run_semver_ok(&ws.path, &["version", "lib"])?;

  assert_eq!(ws.tags()?, vec!["lib-0.1.0"]);
  Ok(())
}

#[test]
fn test_unknown_plugin_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_semver(&ws.path, &["version", "lib", "--plugin", "github-release"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(ws.tags()?.is_empty());
  Ok(())
}
