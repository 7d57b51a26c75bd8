//! Reading credentials from `.netrc` files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::{ATLASSIAN_CLOUD_MACHINE, Credentials};
use crate::host::normalize_host;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// ```
/// use std::path::Path;
/// use xray_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Parses `.netrc` content and returns credentials for the requested machine.
///
/// Both single-line (`machine host login user password pass`) and multi-line
/// layouts are accepted since the format is whitespace-delimited. Entries
/// missing a login or password are treated as absent.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut in_target = false;
  let mut username: Option<String> = None;
  let mut password: Option<String> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if in_target {
          break;
        }
        in_target = tokens.next() == Some(target_machine);
      }
      "default" => {
        if in_target {
          break;
        }
      }
      "login" => {
        let value = tokens.next();
        if in_target {
          username = value.map(str::to_string);
        }
      }
      "password" => {
        let value = tokens.next();
        if in_target {
          password = value.map(str::to_string);
        }
      }
      _ => {}
    }
  }

  match (username, password) {
    (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
      Some(Credentials { username, password })
    }
    _ => None,
  }
}

/// Reads a `.netrc` file and returns credentials for the requested machine.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(parse_netrc(&content, target_machine))
}

/// Look up Jira credentials in `<home>/.netrc`.
///
/// The normalized Jira host is tried first, then the shared Atlassian Cloud
/// machine entry. A missing `.netrc` file yields `Ok(None)`.
pub fn find_jira_credentials(home: &Path, jira_host: &str) -> Result<Option<Credentials>> {
  let path = get_netrc_path(home);
  if !path.exists() {
    return Ok(None);
  }

  let host = normalize_host(jira_host);
  match parse_netrc_file(&path, &host)? {
    Some(creds) => Ok(Some(creds)),
    None => parse_netrc_file(&path, ATLASSIAN_CLOUD_MACHINE),
  }
}
