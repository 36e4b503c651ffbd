//! Terminal-facing setup

pub mod logging;
