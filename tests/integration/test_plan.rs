//! Integration tests for `workspace-semver plan`

use crate::helpers::{TestWorkspace, run_semver, run_semver_ok};
use anyhow::Result;

#[test]
fn test_plan_first_release_json() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_semver_ok(&ws.path, &["plan", "lib", "--json"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["tag_prefix"], "lib-");
  assert_eq!(plan["next_version"], "0.1.0");
  assert_eq!(plan["is_first_release"], true);
  assert!(plan["last_release"].is_null());
  assert_eq!(plan["commit_count"], 1);

  // Read-only
  assert!(ws.tags()?.is_empty());
  assert!(ws.is_clean()?);
  Ok(())
}

#[test]
fn test_plan_after_release() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;
  ws.change("packages/lib/index.js", "exports.x = 1;\n", "feat(lib): new export")?;

  let output = run_semver_ok(&ws.path, &["plan", "lib", "--json"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["last_release"]["tag"], "lib-0.1.0");
  assert_eq!(plan["bump"], "minor");
  assert_eq!(plan["next_version"], "0.2.0");
  Ok(())
}

#[test]
fn test_plan_breaking_change_with_preset() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;
  ws.change("packages/lib/index.js", "module.exports = null;\n", "feat(lib)!: drop default export")?;

  let angular = run_semver_ok(&ws.path, &["plan", "lib", "--json"])?;
  let angular: serde_json::Value = serde_json::from_slice(&angular.stdout)?;
  assert_eq!(angular["next_version"], "0.1.1");

  let cc = run_semver_ok(&ws.path, &["plan", "lib", "--json", "--preset", "conventionalcommits"])?;
  let cc: serde_json::Value = serde_json::from_slice(&cc.stdout)?;
  assert_eq!(cc["next_version"], "1.0.0");
  Ok(())
}

#[test]
fn test_plan_human_output() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_semver_ok(&ws.path, &["version", "lib"])?;

  let output = run_semver_ok(&ws.path, &["plan", "lib"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Release plan for 'lib'"));
  assert!(stdout.contains("Last release: lib-0.1.0"));
  assert!(stdout.contains("Nothing changed since last release"));
  Ok(())
}

#[test]
fn test_plan_sync_versions() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_semver_ok(&ws.path, &["plan", "--sync-versions", "--json"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["tag_prefix"], "v");
  assert_eq!(plan["next_version"], "1.0.0");
  Ok(())
}

#[test]
fn test_plan_unknown_project() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_semver(&ws.path, &["plan", "nope"])?;

  assert!(!output.status.success());
  Ok(())
}
