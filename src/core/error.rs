//! Error types for workspace-semver with contextual messages and exit codes
//!
//! Every failure of a release run is one of these. The orchestrator never lets
//! them escape: they are logged and folded into a `PublishResult`. The CLI uses
//! the exit code classification for everything that fails before that point.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for workspace-semver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, external tools, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for workspace-semver
#[derive(Debug)]
pub enum SemverError {
  /// Configuration errors (workspace definition, options, plugins)
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// The changelog/manifest updater failed
  ExternalTool { tool: String, reason: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl SemverError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    SemverError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    SemverError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Wrap a failure of an external collaborator (changelog updater, plugin)
  pub fn external(tool: impl Into<String>, err: impl fmt::Display) -> Self {
    SemverError::ExternalTool {
      tool: tool.into(),
      reason: err.to_string(),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      SemverError::Message { message, context, help } => SemverError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      SemverError::Io(err) => SemverError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      SemverError::Config(_) => ExitCode::User,
      SemverError::Git(_) => ExitCode::System,
      SemverError::ExternalTool { .. } => ExitCode::System,
      SemverError::Io(_) => ExitCode::System,
      SemverError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      SemverError::Config(e) => e.help_message(),
      SemverError::Git(e) => e.help_message(),
      SemverError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for SemverError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SemverError::Config(e) => write!(f, "{}", e),
      SemverError::Git(e) => write!(f, "{}", e),
      SemverError::ExternalTool { tool, reason } => write!(f, "{} failed: {}", tool, reason),
      SemverError::Io(e) => write!(f, "I/O error: {}", e),
      SemverError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for SemverError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      SemverError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ConfigError> for SemverError {
  fn from(err: ConfigError) -> Self {
    SemverError::Config(err)
  }
}

impl From<GitError> for SemverError {
  fn from(err: GitError) -> Self {
    SemverError::Git(err)
  }
}

impl From<io::Error> for SemverError {
  fn from(err: io::Error) -> Self {
    SemverError::Io(err)
  }
}

impl From<String> for SemverError {
  fn from(msg: String) -> Self {
    SemverError::message(msg)
  }
}

impl From<&str> for SemverError {
  fn from(msg: &str) -> Self {
    SemverError::message(msg)
  }
}

impl From<toml_edit::de::Error> for SemverError {
  fn from(err: toml_edit::de::Error) -> Self {
    SemverError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for SemverError {
  fn from(err: serde_json::Error) -> Self {
    SemverError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for SemverError {
  fn from(err: semver::Error) -> Self {
    SemverError::message(format!("Invalid semantic version: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for SemverError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    SemverError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Neither workspace.json nor angular.json exists
  NotFound { workspace_root: PathBuf },

  /// Workspace definition is not valid JSON of the expected shape
  Parse { path: PathBuf, reason: String },

  /// Host lookup did not know the project
  ProjectNotFound { name: String },

  /// Push requested without a remote or branch
  MissingGitConfig,

  /// Plugin name not present in the registry
  UnknownPlugin { name: String, available: Vec<String> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Run from the workspace root or pass --workspace-root <DIR>.".to_string())
      }
      ConfigError::ProjectNotFound { name } => Some(format!(
        "Check that '{}' is listed under \"projects\" in workspace.json.",
        name
      )),
      ConfigError::MissingGitConfig => {
        Some("Set `remote` and `base_branch` under [version] in semver.toml, or pass the flags.".to_string())
      }
      ConfigError::UnknownPlugin { available, .. } => Some(format!("Available plugins: {}", available.join(", "))),
      ConfigError::Parse { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No workspace definition found.\nExpected file: {root}/workspace.json or {root}/angular.json",
          root = workspace_root.display()
        )
      }
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse workspace definition {}: {}", path.display(), reason)
      }
      ConfigError::ProjectNotFound { name } => {
        write!(f, "Project '{}' not found in workspace", name)
      }
      ConfigError::MissingGitConfig => {
        write!(
          f,
          "Missing configuration for Git push, please provide --remote and --base-branch options\nSkipping git push..."
        )
      }
      ConfigError::UnknownPlugin { name, .. } => {
        write!(f, "Unknown plugin '{}'", name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command exited unsuccessfully
  CommandFailed {
    command: String,
    stdout: String,
    stderr: String,
  },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") || stderr.contains("rejected") {
          Some("The remote has commits you don't have. Pull and re-run the release.".to_string())
        } else if stderr.contains("already exists") {
          Some("A tag for this version already exists. Delete it or commit new changes first.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr, .. } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for workspace-semver
pub type SemverResult<T> = Result<T, SemverError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> SemverResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> SemverResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<SemverError>,
{
  fn context(self, ctx: impl Into<String>) -> SemverResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> SemverResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &SemverError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
