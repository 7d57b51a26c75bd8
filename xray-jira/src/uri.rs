//! URI assembly for the "Xray for Jira" REST API.

use xray_core::JiraConnection;

use crate::consts::XRAY_REST_PREFIX;
use crate::error::XrayError;

/// Path of an Xray endpoint, before percent-decoding.
///
/// The intermediate segment is the connection's configured intermediate
/// path, else `override_path`, else `/rest/raven/{xray_version}`. The base
/// path is always prepended.
pub fn api_path(
  connection: &JiraConnection,
  xray_version: &str,
  path_suffix: &str,
  override_path: Option<&str>,
) -> String {
  let intermediate = match connection.intermediate_path.as_deref().or(override_path) {
    Some(path) => path.to_string(),
    None => format!("{XRAY_REST_PREFIX}/{xray_version}"),
  };

  format!("{}{}{}", connection.base_path, intermediate, path_suffix)
}

/// Absolute, percent-decoded URI of an Xray endpoint.
///
/// The connection's base path is kept when `override_path` is given; the
/// override only replaces the `/rest/raven/{xray_version}` segment.
///
/// # Errors
///
/// Returns [`XrayError::MalformedUri`] if decoding yields invalid UTF-8.
pub fn make_uri(
  connection: &JiraConnection,
  xray_version: &str,
  path_suffix: &str,
  override_path: Option<&str>,
) -> Result<String, XrayError> {
  let uri = format!(
    "{}{}",
    connection.origin(),
    api_path(connection, xray_version, path_suffix, override_path)
  );

  let decoded = urlencoding::decode(&uri).map(|decoded| decoded.into_owned());
  decoded.map_err(|_| XrayError::MalformedUri(uri))
}
