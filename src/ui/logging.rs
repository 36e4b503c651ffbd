//! Tracing subscriber setup
//!
//! Logs go to stderr so `plan --json` output on stdout stays machine-readable.

use crate::core::error::{SemverError, SemverResult};
use std::io;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
  /// Single-line human-readable output
  #[default]
  Compact,
  /// One JSON object per event
  Json,
}

/// Minimum level shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
  Trace,
  Debug,
  #[default]
  Info,
  Warn,
  Error,
}

impl LogLevel {
  fn as_str(self) -> &'static str {
    match self {
      LogLevel::Trace => "trace",
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    }
  }
}

/// Filter directive for this crate at `level`
fn directive(level: LogLevel) -> String {
  format!("workspace_semver={}", level.as_str())
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: LogLevel, format: LogFormat) -> SemverResult<()> {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(directive(level)))
    .map_err(|e| SemverError::message(format!("Failed to create tracing filter: {}", e)))?;

  let registry = tracing_subscriber::registry().with(filter);

  match format {
    LogFormat::Compact => {
      let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();
      registry.with(layer).try_init()
    }
    LogFormat::Json => {
      let layer = tracing_subscriber::fmt::layer().json().with_writer(io::stderr);
      registry.with(layer).try_init()
    }
  }
  .map_err(|e| SemverError::message(format!("Failed to install tracing subscriber: {}", e)))
}
