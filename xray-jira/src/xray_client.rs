//! # Xray Client
//!
//! Wraps an [`HttpExecutor`] with the "Xray for Jira" API version and turns
//! built [`ImportRequest`]s into sent requests.

use anyhow::Result;
use tracing::{instrument, trace};
use xray_core::config::DEFAULT_XRAY_VERSION;

use crate::client::JiraClient;
use crate::error::XrayError;
use crate::executor::{ExecutorResponse, HttpExecutor};
use crate::models::ImportRequest;
use crate::uri::make_uri;

/// Client for the "Xray for Jira" REST API
pub struct XrayClient<E = JiraClient> {
  pub(crate) executor: E,
  pub(crate) xray_version: String,
}

impl<E: HttpExecutor> XrayClient<E> {
  /// Create a client for the default Xray API version
  pub fn new(executor: E) -> Self {
    Self::with_version(executor, DEFAULT_XRAY_VERSION)
  }

  /// Create a client for a specific Xray API version
  pub fn with_version(executor: E, xray_version: &str) -> Self {
    Self {
      executor,
      xray_version: xray_version.to_string(),
    }
  }

  pub fn executor(&self) -> &E {
    &self.executor
  }

  pub fn xray_version(&self) -> &str {
    &self.xray_version
  }

  /// Absolute URI for an Xray endpoint
  pub fn make_uri(&self, path_suffix: &str, override_path: Option<&str>) -> Result<String, XrayError> {
    make_uri(self.executor.connection(), &self.xray_version, path_suffix, override_path)
  }

  /// Send a prebuilt request
  #[instrument(skip_all, fields(path = request.path()), level = "debug")]
  pub async fn send(&self, request: ImportRequest) -> Result<ExecutorResponse> {
    let uri = self.make_uri(request.path(), None)?;
    trace!("Xray API URL: {}", uri);
    self.executor.send(&uri, request).await
  }
}
