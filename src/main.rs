mod commands;
mod core;
mod release;
mod ui;
mod utils;
mod workspace;

use clap::{Parser, Subcommand};
use core::config::{Preset, SemverConfig, VersionOverrides};
use core::context::ReleaseContext;
use core::error::{ResultExt, SemverError, SemverResult, print_error};
use std::path::PathBuf;
use ui::logging::{LogFormat, LogLevel};
use workspace::WORKSPACE_TARGET;

/// Semantic versioning for JavaScript monorepos: changelogs, manifests, tags
#[derive(Parser)]
#[command(name = "workspace-semver")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Workspace root (defaults to the current directory)
  #[arg(long, global = true, value_name = "DIR")]
  workspace_root: Option<PathBuf>,

  /// Minimum log level (RUST_LOG takes precedence)
  #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
  log_level: LogLevel,

  /// Log output format
  #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
  log_format: LogFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Bump versions, write changelogs, tag, and optionally push
  Version {
    /// Project to release (`workspace` for the workspace root)
    #[arg(default_value = WORKSPACE_TARGET)]
    project: String,

    /// Log what would happen without writing or pushing anything
    #[arg(long)]
    dry_run: bool,

    /// Skip git hooks on commit and push
    #[arg(long)]
    no_verify: bool,

    /// Push the release commit and tag
    #[arg(long)]
    push: bool,

    /// Remote to push to
    #[arg(long)]
    remote: Option<String>,

    /// Branch to push
    #[arg(long)]
    base_branch: Option<String>,

    /// Version every project together under one `v` tag
    #[arg(long)]
    sync_versions: bool,

    /// In sync mode, do not write CHANGELOG.md at the workspace root
    #[arg(long)]
    no_root_changelog: bool,

    /// Conventional-commit preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Plugin to run after tagging (repeatable)
    #[arg(long = "plugin", value_name = "NAME")]
    plugins: Vec<String>,
  },

  /// Show the next release without changing anything
  Plan {
    /// Project to inspect (`workspace` for the workspace root)
    #[arg(default_value = WORKSPACE_TARGET)]
    project: String,

    /// Plan a lockstep workspace release
    #[arg(long)]
    sync_versions: bool,

    /// Conventional-commit preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = ui::logging::init_tracing(cli.log_level, cli.log_format) {
    handle_error(err);
  }

  let workspace_root = match resolve_workspace_root(cli.workspace_root.clone()) {
    Ok(root) => root,
    Err(err) => handle_error(err),
  };

  let config = match SemverConfig::load(&workspace_root) {
    Ok(config) => config,
    Err(err) => handle_error(err),
  };

  match cli.command {
    Commands::Version {
      project,
      dry_run,
      no_verify,
      push,
      remote,
      base_branch,
      sync_versions,
      no_root_changelog,
      preset,
      plugins,
    } => {
      let options = config.version_options(VersionOverrides {
        dry_run,
        no_verify,
        push,
        remote,
        base_branch,
        sync_versions,
        no_root_changelog,
        preset,
        plugins,
      });

      let ctx = match ReleaseContext::build(&workspace_root) {
        Ok(ctx) => ctx,
        Err(err) => handle_error(err),
      };

      let result = commands::version::run_version(&project, &options, &ctx);
      std::process::exit(if result.success { 0 } else { 1 });
    }
    Commands::Plan {
      project,
      sync_versions,
      preset,
      json,
    } => {
      let options = config.version_options(VersionOverrides {
        sync_versions,
        preset,
        ..VersionOverrides::default()
      });

      if let Err(err) =
        commands::plan::run_plan(&workspace_root, &project, options.sync_versions, options.preset, json)
      {
        handle_error(err);
      }
    }
  }
}

/// Absolute, symlink-free workspace root, so paths line up with git's view
fn resolve_workspace_root(arg: Option<PathBuf>) -> SemverResult<PathBuf> {
  let root = match arg {
    Some(root) => root,
    None => std::env::current_dir().context("Failed to get current directory")?,
  };
  std::fs::canonicalize(&root).with_context(|| format!("Workspace root not found: {}", root.display()))
}

fn handle_error(err: SemverError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
