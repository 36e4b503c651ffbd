//! CLI commands for workspace-semver
//!
//! - **version**: resolve the next version, write changelog and manifests,
//!   tag, and optionally push
//! - **plan**: preview what `version` would release

pub mod plan;
pub mod version;
