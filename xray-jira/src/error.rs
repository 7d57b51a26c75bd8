//! Errors raised while building Xray requests.

use thiserror::Error;

/// Errors raised synchronously by request building and URI assembly.
///
/// Transport, authentication and response failures are reported through
/// `anyhow` by the client instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XrayError {
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),
  #[error("Malformed URI '{0}': percent-encoded bytes do not form valid UTF-8")]
  MalformedUri(String),
}
