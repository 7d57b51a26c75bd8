//! # HTTP Executor
//!
//! The seam between request building and transport. [`XrayClient`] only
//! needs something that knows where Jira lives and can send an
//! [`ImportRequest`] to an absolute URI; [`JiraClient`] is the reqwest-backed
//! implementation.
//!
//! [`XrayClient`]: crate::XrayClient
//! [`JiraClient`]: crate::JiraClient

use std::future::Future;

use anyhow::Result;
use reqwest::StatusCode;
use xray_core::JiraConnection;

use crate::models::ImportRequest;

/// Raw outcome of a request: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorResponse {
  pub status: StatusCode,
  pub body: String,
}

/// Capability to execute [`ImportRequest`]s against a Jira instance
pub trait HttpExecutor {
  /// Location of the Jira instance, used to assemble request URIs
  fn connection(&self) -> &JiraConnection;

  /// Send `request` to `uri`.
  ///
  /// Transport failures are returned as errors; any HTTP status, including
  /// error statuses, is returned as a response.
  fn send(&self, uri: &str, request: ImportRequest) -> impl Future<Output = Result<ExecutorResponse>> + Send;
}
