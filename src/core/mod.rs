//! Core building blocks shared by every command
//!
//! - **config**: semver.toml parsing and option merging
//! - **context**: collaborators for a release run, built once in main.rs
//! - **env**: environment variable access behind a trait
//! - **error**: error types with contextual help messages
//! - **vcs**: git operations abstraction (SystemGit)

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod vcs;
