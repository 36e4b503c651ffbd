//! Changelog generation from conventional commits
//!
//! Headers are parsed with winnow (not regex). Rendering follows the layout
//! conventional-changelog tools produce, so existing CHANGELOG.md files keep a
//! consistent shape when this tool takes over.

use crate::core::config::Preset;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Header written to a changelog created by a first release
pub const CHANGELOG_HEADER: &str = "# Changelog\n\nAll notable changes to this project will be documented in this file. See [Conventional Commits](https://conventionalcommits.org) for commit guidelines.\n";

/// A parsed conventional commit
///
/// Format: `<type>(<scope>): <description>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
  pub commit_type: CommitType,
  pub scope: Option<String>,
  pub description: String,
  /// Breaking change note; empty when only the `!` marker was present
  pub breaking_change: Option<String>,
  /// Other footers (e.g., "Closes #123")
  pub footers: Vec<(String, String)>,
}

/// Footer keys whose values are issue references
const REFERENCE_KEYS: [&str; 3] = ["closes", "fixes", "resolves"];

/// Conventional commit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitType {
  Feat,
  Fix,
  Perf,
  Revert,
  Docs,
  Style,
  Refactor,
  Test,
  Build,
  Ci,
  Chore,
  Other,
}

impl CommitType {
  /// Parse commit type from string
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "feat" | "feature" => Self::Feat,
      "fix" => Self::Fix,
      "perf" => Self::Perf,
      "revert" => Self::Revert,
      "docs" => Self::Docs,
      "style" => Self::Style,
      "refactor" => Self::Refactor,
      "test" | "tests" => Self::Test,
      "build" => Self::Build,
      "ci" => Self::Ci,
      "chore" => Self::Chore,
      _ => Self::Other,
    }
  }

  /// Section title, or None when the type is hidden from the changelog
  pub fn section_title(&self) -> Option<&'static str> {
    match self {
      Self::Feat => Some("Features"),
      Self::Fix => Some("Bug Fixes"),
      Self::Perf => Some("Performance Improvements"),
      Self::Revert => Some("Reverts"),
      _ => None,
    }
  }
}

impl fmt::Display for CommitType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Feat => "feat",
      Self::Fix => "fix",
      Self::Perf => "perf",
      Self::Revert => "revert",
      Self::Docs => "docs",
      Self::Style => "style",
      Self::Refactor => "refactor",
      Self::Test => "test",
      Self::Build => "build",
      Self::Ci => "ci",
      Self::Chore => "chore",
      Self::Other => "other",
    };
    f.write_str(name)
  }
}

impl ConventionalCommit {
  pub fn is_breaking(&self) -> bool {
    self.breaking_change.is_some()
  }

  /// Issues this commit closes, from `Closes:`/`Fixes:`/`Resolves:` footers
  pub fn references(&self) -> Vec<&str> {
    self
      .footers
      .iter()
      .filter(|(key, _)| REFERENCE_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k)))
      .flat_map(|(_, value)| value.split([',', ' ']))
      .map(str::trim)
      .filter(|r| !r.is_empty())
      .collect()
  }

  /// Parse a conventional commit from a git commit message
  ///
  /// Returns None if the message doesn't follow the preset's header format.
  /// Not all commits need to be conventional.
  pub fn parse(message: &str, preset: Preset) -> Option<Self> {
    use winnow::ascii::{alphanumeric1, space0};
    use winnow::combinator::{opt, preceded, terminated};
    use winnow::prelude::*;
    use winnow::token::take_till;

    let (first_line, rest) = message.split_once('\n').unwrap_or((message, ""));

    // type(scope)!: description
    let mut parser = (
      alphanumeric1::<_, ()>.map(|s: &str| CommitType::from_str(s)),
      opt(preceded('(', terminated(take_till(1.., ')'), ')'))),
      opt('!'),
      ':',
      space0,
      take_till(0.., ['\n', '\r']),
    );

    let Ok((commit_type, scope, breaking_indicator, _, _, description)) = parser.parse(first_line.trim_end()) else {
      return None;
    };

    if breaking_indicator.is_some() && !preset.accepts_breaking_marker() {
      return None;
    }

    let mut breaking_change = None;
    let mut footers = Vec::new();
    let mut seen_empty_line = false;

    // Footers are `key: value` lines starting after a blank line; body text is skipped
    for line in rest.lines() {
      let trimmed = line.trim();
      if trimmed.is_empty() {
        seen_empty_line = true;
        continue;
      }

      let footer = trimmed
        .split_once(':')
        .filter(|_| seen_empty_line)
        .map(|(key, value)| (key.trim(), value.trim()));

      match footer {
        Some((key, value)) if key.eq_ignore_ascii_case("BREAKING CHANGE") || key.eq_ignore_ascii_case("BREAKING-CHANGE") => {
          breaking_change = Some(value.to_string());
        }
        Some((key, value)) if key.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') => {
          footers.push((key.to_string(), value.to_string()));
        }
        // Body line: a footer block has to start after the next blank line
        _ if footers.is_empty() && breaking_change.is_none() => seen_empty_line = false,
        _ => {}
      }
    }

    if breaking_change.is_none() && breaking_indicator.is_some() {
      breaking_change = Some(String::new());
    }

    Some(Self {
      commit_type,
      scope: scope.map(|s: &str| s.to_string()),
      description: description.trim().to_string(),
      breaking_change,
      footers,
    })
  }
}

/// One release's changelog entry
#[derive(Debug, Clone)]
pub struct Changelog {
  pub version: String,
  /// Release date (YYYY-MM-DD)
  pub date: String,
  pub preset: Preset,
  /// Link from the previous release tag to this one
  pub compare_url: Option<String>,
  /// Visible commits grouped by type, each with its short sha
  pub commits_by_type: BTreeMap<CommitType, Vec<(ConventionalCommit, String)>>,
  pub breaking: Vec<(ConventionalCommit, String)>,
}

impl Changelog {
  pub fn new(version: String, date: String, preset: Preset) -> Self {
    Self {
      version,
      date,
      preset,
      compare_url: None,
      commits_by_type: BTreeMap::new(),
      breaking: Vec::new(),
    }
  }

  /// Add a commit to the changelog
  pub fn add_commit(&mut self, commit: ConventionalCommit, sha: &str) {
    let short = sha.chars().take(7).collect::<String>();
    if commit.is_breaking() {
      self.breaking.push((commit.clone(), short.clone()));
    }
    if commit.commit_type.section_title().is_some() {
      self.commits_by_type.entry(commit.commit_type).or_default().push((commit, short));
    }
  }

  /// Link the heading to `<repository>/compare/<previous>...<tag>`
  pub fn with_compare(mut self, repository: &str, previous_tag: &str, tag: &str) -> Self {
    self.compare_url = Some(format!("{}/compare/{}...{}", repository, previous_tag, tag));
    self
  }

  /// Patch releases get a smaller heading, like conventional-changelog does
  fn heading(&self) -> String {
    let is_patch = semver::Version::parse(&self.version).is_ok_and(|v| v.patch != 0);
    let level = if is_patch { "###" } else { "##" };
    match &self.compare_url {
      Some(url) => format!("{} [{}]({}) ({})\n\n", level, self.version, url, self.date),
      None => format!("{} {} ({})\n\n", level, self.version, self.date),
    }
  }

  fn breaking_title(&self) -> &'static str {
    match self.preset {
      Preset::Angular => "BREAKING CHANGES",
      Preset::ConventionalCommits => "⚠ BREAKING CHANGES",
    }
  }

  /// Render as markdown
  pub fn to_markdown(&self) -> String {
    let mut output = String::new();

    output.push_str(&self.heading());

    if !self.breaking.is_empty() {
      output.push_str(&format!("### {}\n\n", self.breaking_title()));
      for (commit, sha) in &self.breaking {
        let note = commit
          .breaking_change
          .as_deref()
          .filter(|n| !n.is_empty())
          .unwrap_or(&commit.description);
        output.push_str(&format!("* {}{} ({})\n", scope_prefix(commit), note, sha));
      }
      output.push('\n');
    }

    for (commit_type, commits) in &self.commits_by_type {
      let Some(title) = commit_type.section_title() else {
        continue;
      };

      output.push_str(&format!("### {}\n\n", title));
      for (commit, sha) in commits {
        output.push_str(&format!(
          "* {}{} ({}){}\n",
          scope_prefix(commit),
          commit.description,
          sha,
          closes_suffix(commit)
        ));
      }
      output.push('\n');
    }

    output
  }
}

fn scope_prefix(commit: &ConventionalCommit) -> String {
  commit
    .scope
    .as_ref()
    .map(|s| format!("**{}:** ", s))
    .unwrap_or_default()
}

fn closes_suffix(commit: &ConventionalCommit) -> String {
  let references = commit.references();
  if references.is_empty() {
    String::new()
  } else {
    format!(", closes {}", references.join(" "))
  }
}

/// Insert a rendered entry into existing changelog content
///
/// The entry goes right above the most recent release heading, below whatever
/// header the file carries. Content without any release heading gets the entry
/// appended after it.
pub fn insert_entry(existing: &str, entry: &str) -> String {
  if existing.trim().is_empty() {
    return format!("{}\n{}", CHANGELOG_HEADER, entry);
  }

  let release_heading = existing
    .match_indices('\n')
    .map(|(i, _)| i + 1)
    .chain(std::iter::once(0))
    .filter(|&i| {
      let line = &existing[i..];
      line.starts_with("## ") || is_patch_heading(line) || line.starts_with("<a name=")
    })
    .min();

  match release_heading {
    Some(i) => format!("{}{}{}", &existing[..i], entry, &existing[i..]),
    None => {
      let sep = if existing.ends_with("\n\n") {
        ""
      } else if existing.ends_with('\n') {
        "\n"
      } else {
        "\n\n"
      };
      format!("{}{}{}", existing, sep, entry)
    }
  }
}

/// `### 1.0.1 (...)` or `### [1.0.1](...)`, as opposed to a section like `### Features`
fn is_patch_heading(line: &str) -> bool {
  line
    .strip_prefix("### ")
    .and_then(|rest| rest.chars().next())
    .is_some_and(|c| c == '[' || c.is_ascii_digit())
}

/// Write an entry into the changelog at `path`
///
/// A first release starts the file from `CHANGELOG_HEADER`, replacing nothing.
pub fn write_entry(path: &Path, entry: &str, first_release: bool) -> std::io::Result<()> {
  let existing = if !first_release && path.exists() {
    fs::read_to_string(path)?
  } else {
    String::new()
  };

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, insert_entry(&existing, entry))
}
