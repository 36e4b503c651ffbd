//! `plan` command: preview the next release without writing anything

use crate::core::config::Preset;
use crate::core::error::SemverResult;
use crate::core::vcs::SystemGit;
use crate::release::{self, ConventionalBumper, VersionPlan};
use crate::workspace::{DefinitionLookup, ProjectLookup};
use std::path::Path;
use std::sync::Arc;

/// Run the plan command
pub fn run_plan(workspace_root: &Path, project: &str, sync_versions: bool, preset: Preset, json: bool) -> SemverResult<()> {
  let git = SystemGit::open(workspace_root)?;
  let repo_root = git.work_tree().to_path_buf();

  let project_root = DefinitionLookup::new(workspace_root).project_root(project)?;
  let release_root = if sync_versions {
    workspace_root.to_path_buf()
  } else {
    project_root
  };

  let bumper = ConventionalBumper::new(Arc::new(git), &repo_root);
  let tag_prefix = release::tag_prefix(project, sync_versions);
  let plan = bumper.plan(&release_root, &tag_prefix, preset)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
  } else {
    print_plan(project, &plan);
  }

  Ok(())
}

fn print_plan(project: &str, plan: &VersionPlan) {
  println!("📦 Release plan for '{}'", project);
  println!();
  println!("  Tag prefix:   {}", plan.tag_prefix);
  match &plan.last_release {
    Some(last) => println!("  Last release: {}", last.tag),
    None => println!("  Last release: none (first release)"),
  }
  println!("  Commits:      {}", plan.commit_count);
  println!();

  match (&plan.next_version, plan.bump) {
    (Some(next), Some(bump)) if plan.is_first_release => {
      println!("  Next: {}{} (first release, {:?} changes)", plan.tag_prefix, next, bump);
    }
    (Some(next), Some(bump)) => {
      println!("  Next: {}{} ({:?})", plan.tag_prefix, next, bump);
    }
    _ => println!("⚠️  Nothing changed since last release"),
  }
}
