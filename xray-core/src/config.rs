//! # Configuration Management
//!
//! Loads the jira-xray configuration file (`config.toml` in the XDG config
//! directory) and layers environment variable overrides on top of it.
//!
//! ```toml
//! host = "https://jira.example.com/jira"
//! xray_version = "1.0"
//! strict_ssl = true
//! timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::host::{ENV_JIRA_HOST, JiraConnection};

/// Xray REST API version used when none is configured.
pub const DEFAULT_XRAY_VERSION: &str = "1.0";

/// Environment variable overriding [`XrayConfig::xray_version`].
pub const ENV_XRAY_VERSION: &str = "XRAY_VERSION";

/// Environment variable overriding [`XrayConfig::intermediate_path`].
pub const ENV_XRAY_INTERMEDIATE_PATH: &str = "XRAY_INTERMEDIATE_PATH";

/// Represents the configuration directories for jira-xray
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Resolve the platform configuration directory
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "jira-xray").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the path to the main configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join("config.toml")
  }
}

/// Settings describing which Jira instance to talk to and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XrayConfig {
  /// Jira host, either a bare hostname or a URL including scheme, port and
  /// context path.
  pub host: Option<String>,
  /// Overrides the scheme derived from `host`.
  pub protocol: Option<String>,
  /// Overrides the port derived from `host`.
  pub port: Option<u16>,
  /// Overrides the context path derived from `host`.
  pub base_path: Option<String>,
  /// Replaces the `/rest/raven/{version}` segment of every Xray URI.
  pub intermediate_path: Option<String>,
  /// Version of the "Xray for Jira" REST API.
  pub xray_version: String,
  /// Verify TLS certificates.
  pub strict_ssl: bool,
  /// Request timeout in seconds.
  pub timeout_secs: Option<u64>,
}

impl Default for XrayConfig {
  fn default() -> Self {
    Self {
      host: None,
      protocol: None,
      port: None,
      base_path: None,
      intermediate_path: None,
      xray_version: DEFAULT_XRAY_VERSION.to_string(),
      strict_ssl: true,
      timeout_secs: None,
    }
  }
}

impl XrayConfig {
  /// Parse configuration from TOML text.
  pub fn from_toml_str(content: &str) -> Result<Self> {
    toml::from_str(content).context("Failed to parse jira-xray configuration")
  }

  /// Load configuration from `path`, falling back to defaults when the file
  /// does not exist.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::from_toml_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
  }

  /// Apply overrides from the process environment.
  pub fn apply_env_overrides(&mut self) {
    self.apply_overrides(|key| std::env::var(key).ok());
  }

  /// Apply overrides from an arbitrary variable lookup. Blank values are
  /// ignored.
  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(host) = non_blank(ENV_JIRA_HOST) {
      self.host = Some(host);
    }
    if let Some(version) = non_blank(ENV_XRAY_VERSION) {
      self.xray_version = version;
    }
    if let Some(path) = non_blank(ENV_XRAY_INTERMEDIATE_PATH) {
      self.intermediate_path = Some(path);
    }
  }

  /// Resolve the configured host into a [`JiraConnection`].
  ///
  /// Explicit `protocol`, `port` and `base_path` settings win over the parts
  /// derived from `host`.
  pub fn connection(&self) -> Result<JiraConnection> {
    let host = self.host.as_deref().ok_or_else(|| {
      anyhow::anyhow!("No Jira host configured. Set '{ENV_JIRA_HOST}' or 'host' in the configuration file.")
    })?;

    let mut connection = JiraConnection::from_host(host)?;
    if let Some(protocol) = &self.protocol {
      connection.protocol = protocol.clone();
    }
    if let Some(port) = self.port {
      connection.port = Some(port);
    }
    if let Some(base_path) = &self.base_path {
      connection.base_path = base_path.trim_end_matches('/').to_string();
    }
    connection.intermediate_path = self.intermediate_path.clone();

    Ok(connection)
  }
}
