//! Environment variable management for testing
//!
//! Tests that touch process-wide variables should hold an [`EnvVarGuard`] so
//! the original value comes back when the test ends.

use std::env;

/// Restores a single environment variable to its original state on drop
pub struct EnvVarGuard {
  key: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Remember the current value of `key`
  pub fn new(key: &str) -> Self {
    Self {
      key: key.to_string(),
      original: env::var(key).ok(),
    }
  }

  /// Set the variable for the lifetime of the guard
  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.key, value);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.key, val);
      },
      None => unsafe {
        env::remove_var(&self.key);
      },
    }
  }
}
