//! `version` command: resolve, update, tag and optionally push a release
//!
//! ```text
//! ResolvingRoot -> ResolvingVersion -> NoOp
//!                                   -> Updating -> Publishing -> Done
//!                                               -> Done
//! ```
//!
//! Every failure ends the run with `success: false`; nothing escapes
//! [`run_version`].

use crate::core::config::VersionOptions;
use crate::core::context::ReleaseContext;
use crate::core::error::{SemverError, SemverResult};
use crate::release::publish::{self, PushTarget};
use crate::release::{self, UpdateRequest};
use crate::workspace::{MANIFEST_FILE, WorkspaceDefinition};
use semver::Version;
use serde::Serialize;
use std::path::{Path, PathBuf};

const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// What the caller learns about a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishResult {
  pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
  /// Nothing to release since the last tag
  NoChanges,
  Released { version: Version, tag: String },
}

/// Run the version command, converting every failure into `success: false`
pub fn run_version(project: &str, options: &VersionOptions, ctx: &ReleaseContext) -> PublishResult {
  match execute(project, options, ctx) {
    Ok(VersionOutcome::NoChanges) => PublishResult { success: true },
    Ok(VersionOutcome::Released { version, tag }) => {
      if options.dry_run {
        tracing::info!(%version, %tag, "dry run complete, nothing written");
      } else {
        tracing::info!(%version, %tag, "released");
      }
      PublishResult { success: true }
    }
    Err(err) => {
      tracing::error!("{}", err);
      if let Some(help) = err.help_message() {
        tracing::error!("{}", help);
      }
      PublishResult { success: false }
    }
  }
}

/// The release state machine
pub fn execute(project: &str, options: &VersionOptions, ctx: &ReleaseContext) -> SemverResult<VersionOutcome> {
  let publishing = options.push && !options.dry_run;
  if publishing {
    PushTarget::from_options(options.remote.as_deref(), options.base_branch.as_deref())?;
  }
  let plugins = ctx.plugins.resolve(&options.plugins)?;

  // ResolvingRoot: the lookup and the workspace read are independent
  let (project_root, definition) = rayon::join(
    || ctx.projects.project_root(project),
    || options.sync_versions.then(|| ctx.workspace.load(&ctx.root)),
  );
  let project_root = project_root?;
  let definition = definition.transpose()?;

  let tag_prefix = release::tag_prefix(project, options.sync_versions);
  let release_root = if options.sync_versions { ctx.root.clone() } else { project_root };
  tracing::debug!(project, root = %release_root.display(), %tag_prefix, "resolved project");

  // ResolvingVersion
  let Some(new_version) = ctx.bumper.next_version(&release_root, &tag_prefix, options.preset)? else {
    tracing::info!("Nothing changed since last release");
    return Ok(VersionOutcome::NoChanges);
  };
  tracing::info!(version = %new_version, "next version");

  // Updating
  let request = UpdateRequest {
    infile: changelog_path(&release_root, options),
    first_release: !release_root.join(CHANGELOG_FILE).exists(),
    package_files: vec![release_root.join(MANIFEST_FILE)],
    bump_files: bump_files(&release_root, definition.as_ref(), &ctx.root),
    path: release_root,
    new_version: new_version.clone(),
    tag_prefix,
    preset: options.preset,
    dry_run: options.dry_run,
    no_verify: options.no_verify,
    plugins,
  };
  let tag = request.tag();

  ctx
    .updater
    .update(&request)
    .map_err(|e| SemverError::external("changelog updater", e))?;

  // Publishing
  if publishing {
    publish::try_push(
      options.remote.as_deref(),
      options.base_branch.as_deref(),
      options.no_verify,
      ctx.git.as_ref(),
      ctx.env.as_ref(),
    )?;
    tracing::info!(%tag, "pushed");
  }

  Ok(VersionOutcome::Released {
    version: new_version,
    tag,
  })
}

fn changelog_path(release_root: &Path, options: &VersionOptions) -> Option<PathBuf> {
  if options.sync_versions && !options.root_changelog {
    None
  } else {
    Some(release_root.join(CHANGELOG_FILE))
  }
}

/// Every project manifest in sync mode, the project's own otherwise
fn bump_files(release_root: &Path, definition: Option<&WorkspaceDefinition>, workspace_root: &Path) -> Vec<PathBuf> {
  match definition {
    Some(definition) => definition.manifest_paths(workspace_root),
    None => vec![release_root.join(MANIFEST_FILE)],
  }
}
