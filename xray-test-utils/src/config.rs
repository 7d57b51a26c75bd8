//! Temporary configuration directories for testing

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary configuration directory holding a `config.toml`
pub struct ConfigDirsTestGuard {
  temp_dir: TempDir,
  config_path: PathBuf,
}

impl ConfigDirsTestGuard {
  /// Create a config directory whose `config.toml` contains `content`
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, content).expect("Failed to write test config.toml");

    Self { temp_dir, config_path }
  }

  /// Get the configuration directory
  pub fn config_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to `config.toml`
  pub fn config_path(&self) -> &Path {
    &self.config_path
  }

  /// Write an additional file next to the configuration, returning its path
  pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
    let path = self.temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
  }
}
