//! # Xray for Jira API Client
//!
//! Builds and sends requests to the import endpoints of the "Xray for Jira"
//! test management add-on. Requests are described by [`ImportRequest`]
//! values built in [`request`], addressed with [`uri`], and executed by any
//! [`HttpExecutor`]; [`JiraClient`] is the reqwest-backed executor.

pub mod auth;
mod client;
pub mod consts;
mod endpoints;
mod error;
pub mod executor;
pub mod models;
pub mod request;
pub mod uri;
mod xray_client;

// Re-export the clients
pub use client::{JiraClient, create_jira_client};
pub use error::XrayError;
pub use executor::{ExecutorResponse, HttpExecutor};
// Re-export models
pub use models::{
  FormFields, FormValue, HttpMethod, ImportPayload, ImportRequest, ImportResponse, ImportedTestIssues,
  IssueCreationMetadata, IssueReference, JiraAuth, JsonFormat, QueryParams, RequestMode, TestEnvironments,
  XmlFormat, XrayImportQuery,
};
pub use xray_client::XrayClient;
