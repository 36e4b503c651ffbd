//! Process environment access
//!
//! Decisions that depend on environment variables read them through
//! [`Environment`] so tests can supply their own values.

#[cfg(test)]
use std::collections::HashMap;

pub trait Environment: Send + Sync {
  fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
  fn var(&self, name: &str) -> Option<String> {
    std::env::var(name).ok()
  }
}

/// Fixed set of variables
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct StaticEnvironment {
  vars: HashMap<String, String>,
}

#[cfg(test)]
impl StaticEnvironment {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: &str, value: &str) -> Self {
    self.vars.insert(name.to_string(), value.to_string());
    self
  }
}

#[cfg(test)]
impl Environment for StaticEnvironment {
  fn var(&self, name: &str) -> Option<String> {
    self.vars.get(name).cloned()
  }
}
