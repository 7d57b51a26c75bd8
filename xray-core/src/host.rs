//! Jira host parsing.
//!
//! A Jira instance is addressed by protocol, host, optional port and a base
//! path (for instances served under a context path such as `/jira`). Every
//! Xray URI is assembled from a [`JiraConnection`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Location of a Jira instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConnection {
  /// `http` or `https`. A trailing `:` is tolerated.
  pub protocol: String,
  /// Hostname without scheme or port.
  pub host: String,
  /// Only needed for non-standard ports.
  pub port: Option<u16>,
  /// Path segments in front of `/rest/...`, e.g. `/jira`. Empty for none.
  pub base_path: String,
  /// Replaces the `/rest/raven/{version}` segment when set.
  pub intermediate_path: Option<String>,
}

impl JiraConnection {
  /// Create a connection with no port, base path or intermediate path.
  pub fn new(protocol: &str, host: &str) -> Self {
    Self {
      protocol: protocol.to_string(),
      host: host.to_string(),
      port: None,
      base_path: String::new(),
      intermediate_path: None,
    }
  }

  /// Parse a connection from a host string such as `jira.example.com`,
  /// `http://localhost:8080` or `https://example.com/jira/`.
  ///
  /// Hosts without a scheme are assumed to be served over https.
  pub fn from_host(input: &str) -> Result<Self> {
    let normalized = ensure_url_scheme(input)?;
    let url = Url::parse(&normalized).with_context(|| format!("Failed to parse Jira host '{input}'"))?;
    let host = url
      .host_str()
      .with_context(|| format!("Jira host '{input}' does not contain a hostname"))?;

    Ok(Self {
      protocol: url.scheme().to_string(),
      host: host.to_string(),
      port: url.port(),
      base_path: url.path().trim_end_matches('/').to_string(),
      intermediate_path: None,
    })
  }

  /// `protocol://host[:port]`
  pub fn origin(&self) -> String {
    let protocol = self.protocol.trim_end_matches(['/', ':']);
    match self.port {
      Some(port) => format!("{protocol}://{}:{port}", self.host),
      None => format!("{protocol}://{}", self.host),
    }
  }

  /// Origin followed by the base path.
  pub fn base_url(&self) -> String {
    format!("{}{}", self.origin(), self.base_path)
  }
}

/// Ensure a host has an http(s) scheme, assuming https when none is given.
///
/// Malformed schemes such as `http:/example.com` are repaired.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  for scheme in ["https", "http"] {
    let prefix = format!("{scheme}:");
    if lowered.starts_with(&prefix) {
      let remainder = trimmed[prefix.len()..].trim_start_matches('/');
      if remainder.is_empty() {
        return Err(anyhow::anyhow!("Host '{input}' is missing a hostname"));
      }
      return Ok(format!("{scheme}://{remainder}"));
    }
  }

  Ok(format!("https://{trimmed}"))
}

/// Strip scheme and trailing slash so a host can be matched against `.netrc`
/// machine entries.
pub fn normalize_host(raw_host: &str) -> String {
  raw_host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://")
    .trim_end_matches('/')
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_url_scheme_keeps_existing_scheme() {
    assert_eq!(
      ensure_url_scheme("http://jira.example.com").unwrap(),
      "http://jira.example.com"
    );
    assert_eq!(
      ensure_url_scheme("HTTPS://jira.example.com").unwrap(),
      "https://jira.example.com"
    );
  }

  #[test]
  fn test_ensure_url_scheme_defaults_to_https() {
    assert_eq!(
      ensure_url_scheme("  company.atlassian.net ").unwrap(),
      "https://company.atlassian.net"
    );
  }

  #[test]
  fn test_ensure_url_scheme_repairs_missing_slash() {
    assert_eq!(ensure_url_scheme("http:/example.com").unwrap(), "http://example.com");
    assert_eq!(ensure_url_scheme("https:example.com").unwrap(), "https://example.com");
  }

  #[test]
  fn test_ensure_url_scheme_rejects_empty() {
    assert!(ensure_url_scheme("   ").is_err());
    assert!(ensure_url_scheme("https://").is_err());
  }

  #[test]
  fn test_from_host_bare_hostname() {
    let connection = JiraConnection::from_host("jira.example.com").unwrap();
    assert_eq!(connection.protocol, "https");
    assert_eq!(connection.host, "jira.example.com");
    assert_eq!(connection.port, None);
    assert_eq!(connection.base_path, "");
    assert_eq!(connection.base_url(), "https://jira.example.com");
  }

  #[test]
  fn test_from_host_with_port_and_context_path() {
    let connection = JiraConnection::from_host("http://localhost:8080/jira/").unwrap();
    assert_eq!(connection.protocol, "http");
    assert_eq!(connection.host, "localhost");
    assert_eq!(connection.port, Some(8080));
    assert_eq!(connection.base_path, "/jira");
    assert_eq!(connection.base_url(), "http://localhost:8080/jira");
  }

  #[test]
  fn test_from_host_drops_default_port() {
    let connection = JiraConnection::from_host("https://jira.example.com:443").unwrap();
    assert_eq!(connection.port, None);
  }

  #[test]
  fn test_origin_tolerates_protocol_colon() {
    let mut connection = JiraConnection::new("https:", "jira.example.com");
    connection.port = Some(8443);
    assert_eq!(connection.origin(), "https://jira.example.com:8443");
  }

  #[test]
  fn test_normalize_host() {
    assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
    assert_eq!(normalize_host("http://jira.local"), "jira.local");
    assert_eq!(normalize_host("jira.local"), "jira.local");
  }
}
