//! # Credential Management
//!
//! Credentials for the Jira instance hosting Xray. Only `.netrc` storage is
//! supported; environment-based tokens are resolved by the client crate.

pub mod netrc;

/// Fallback `.netrc` machine shared by Atlassian Cloud sites.
pub const ATLASSIAN_CLOUD_MACHINE: &str = "atlassian.net";

/// Username and password (or API token) for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}
