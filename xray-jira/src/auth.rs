//! Authentication helpers for the Xray client.
//!
//! These helpers centralize credential lookup and client construction so the
//! CLI and any other front end resolve Jira credentials the same way.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use xray_core::XrayConfig;
use xray_core::creds::ATLASSIAN_CLOUD_MACHINE;
use xray_core::creds::netrc::find_jira_credentials;
use xray_core::host::normalize_host;

use crate::client::JiraClient;
use crate::models::JiraAuth;
use crate::xray_client::XrayClient;

/// Environment variable holding a bearer / personal access token.
pub const ENV_JIRA_BEARER_TOKEN: &str = "JIRA_BEARER_TOKEN";

/// Environment variable holding the Jira username.
pub const ENV_JIRA_USERNAME: &str = "JIRA_USERNAME";

/// Environment variable holding the Jira password or API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Resolve Jira credentials from the process environment and `.netrc`.
pub fn get_jira_auth(home: &Path, jira_host: &str) -> Result<JiraAuth> {
  resolve_jira_auth(home, jira_host, |key| std::env::var(key).ok())
}

/// Resolve Jira credentials, reading variables through `lookup`.
///
/// Order: bearer token, username plus API token, `.netrc` entry for the host,
/// `.netrc` entry for `atlassian.net`.
pub fn resolve_jira_auth<F>(home: &Path, jira_host: &str, lookup: F) -> Result<JiraAuth>
where
  F: Fn(&str) -> Option<String>,
{
  let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

  if let Some(token) = non_blank(ENV_JIRA_BEARER_TOKEN) {
    return Ok(JiraAuth::Bearer(token));
  }

  if let (Some(username), Some(api_token)) = (non_blank(ENV_JIRA_USERNAME), non_blank(ENV_JIRA_API_TOKEN)) {
    return Ok(JiraAuth::Basic { username, api_token });
  }

  if let Some(creds) = find_jira_credentials(home, jira_host)? {
    return Ok(JiraAuth::Basic {
      username: creds.username,
      api_token: creds.password,
    });
  }

  Err(anyhow::anyhow!(
    "Jira credentials not found. Set '{ENV_JIRA_USERNAME}' and '{ENV_JIRA_API_TOKEN}', or add credentials for machine '{}' or '{ATLASSIAN_CLOUD_MACHINE}' to your .netrc file.",
    normalize_host(jira_host)
  ))
}

/// Creates an authenticated Jira client from configuration.
pub fn create_jira_client_from_config(home: &Path, config: &XrayConfig) -> Result<JiraClient> {
  let connection = config.connection()?;
  let auth = get_jira_auth(home, &connection.host).context("Failed to get credentials")?;

  JiraClient::with_settings(
    connection,
    auth,
    config.strict_ssl,
    config.timeout_secs.map(Duration::from_secs),
  )
}

/// Creates an authenticated Xray client from configuration.
pub fn create_xray_client(home: &Path, config: &XrayConfig) -> Result<XrayClient<JiraClient>> {
  let jira = create_jira_client_from_config(home, config)?;
  Ok(XrayClient::with_version(jira, &config.xray_version))
}

/// Creates a tokio runtime and an authenticated Xray client.
pub fn create_xray_runtime_and_client(home: &Path, config: &XrayConfig) -> Result<(Runtime, XrayClient<JiraClient>)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_xray_client(home, config)?;
  Ok((rt, client))
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use xray_test_utils::{EnvVarGuard, NetrcGuard};

  use super::*;

  const NETRC: &str = r#"machine jira.example.com
  login netrc-user
  password netrc-token

machine atlassian.net
  login cloud@example.com
  password cloud-token
"#;

  fn lookup(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<&str, &str> = vars.iter().copied().collect();
    move |key| vars.get(key).map(|value| value.to_string())
  }

  fn basic(auth: JiraAuth) -> Option<(String, String)> {
    match auth {
      JiraAuth::Basic { username, api_token } => Some((username, api_token)),
      JiraAuth::Bearer(_) => None,
    }
  }

  #[test]
  fn test_bearer_token_wins() {
    let guard = NetrcGuard::new(NETRC);
    let auth = resolve_jira_auth(
      guard.home_dir(),
      "jira.example.com",
      lookup(&[
        (ENV_JIRA_BEARER_TOKEN, "pat"),
        (ENV_JIRA_USERNAME, "env-user"),
        (ENV_JIRA_API_TOKEN, "env-token"),
      ]),
    )
    .unwrap();

    assert!(matches!(auth, JiraAuth::Bearer(token) if token == "pat"));
  }

  #[test]
  fn test_env_credentials_before_netrc() {
    let guard = NetrcGuard::new(NETRC);
    let auth = resolve_jira_auth(
      guard.home_dir(),
      "jira.example.com",
      lookup(&[(ENV_JIRA_USERNAME, "env-user"), (ENV_JIRA_API_TOKEN, "env-token")]),
    )
    .unwrap();

    assert_eq!(basic(auth), Some(("env-user".to_string(), "env-token".to_string())));
  }

  #[test]
  fn test_partial_env_credentials_fall_through_to_netrc() {
    let guard = NetrcGuard::new(NETRC);
    let auth = resolve_jira_auth(
      guard.home_dir(),
      "https://jira.example.com",
      lookup(&[(ENV_JIRA_USERNAME, "env-user"), (ENV_JIRA_BEARER_TOKEN, "  ")]),
    )
    .unwrap();

    assert_eq!(basic(auth), Some(("netrc-user".to_string(), "netrc-token".to_string())));
  }

  #[test]
  fn test_netrc_atlassian_fallback() {
    let guard = NetrcGuard::new(NETRC);
    let auth = resolve_jira_auth(guard.home_dir(), "company.atlassian.net", lookup(&[])).unwrap();

    assert_eq!(basic(auth), Some(("cloud@example.com".to_string(), "cloud-token".to_string())));
  }

  #[test]
  fn test_missing_credentials_error_names_host() {
    let guard = NetrcGuard::new("");
    let Err(error) = resolve_jira_auth(guard.home_dir(), "https://jira.internal/", lookup(&[])) else {
      panic!("expected missing credentials");
    };
    let error = error.to_string();

    assert!(error.contains("jira.internal"));
    assert!(error.contains(ATLASSIAN_CLOUD_MACHINE));
    assert!(error.contains(ENV_JIRA_USERNAME));
  }

  #[test]
  fn test_get_jira_auth_reads_process_environment() {
    let guard = NetrcGuard::new("");
    let bearer = EnvVarGuard::new(ENV_JIRA_BEARER_TOKEN);
    bearer.set("process-token");

    let auth = get_jira_auth(guard.home_dir(), "jira.example.com").unwrap();
    assert!(matches!(auth, JiraAuth::Bearer(token) if token == "process-token"));
  }

  #[test]
  fn test_create_xray_client_from_config() {
    let guard = NetrcGuard::new(NETRC);
    let config = XrayConfig {
      host: Some("https://jira.example.com/jira".to_string()),
      xray_version: "2.0".to_string(),
      timeout_secs: Some(5),
      ..Default::default()
    };

    let client = create_xray_client(guard.home_dir(), &config).unwrap();
    assert_eq!(client.xray_version(), "2.0");
    assert_eq!(
      client.make_uri("/import/execution", None).unwrap(),
      "https://jira.example.com/jira/rest/raven/2.0/import/execution"
    );
  }
}
