//! # Xray Import Endpoints
//!
//! Import of Test Execution results in the Xray JSON, Cucumber, Behave,
//! JUnit, TestNG, NUnit and Robot Framework formats, and of compressed
//! bundles holding several result files.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use crate::executor::HttpExecutor;
use crate::models::{
  FormValue, ImportRequest, ImportResponse, IssueCreationMetadata, JsonFormat, XmlFormat, XrayImportQuery,
};
use crate::request::{
  build_bundle_import_request, build_json_import_request, build_raw_json_import_request, build_xml_import_request,
};
use crate::xray_client::XrayClient;

impl<E: HttpExecutor> XrayClient<E> {
  /// Import results in the Xray JSON format
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_xray(&self, results: Value) -> Result<ImportResponse> {
    info!("Importing Xray JSON results");
    self.import(build_raw_json_import_request(results)).await
  }

  /// Import results in the Cucumber JSON format, optionally creating the Test
  /// Execution from `issue_metadata`
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_cucumber(
    &self,
    results: Value,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    self.import_json(JsonFormat::Cucumber, results, issue_metadata).await
  }

  /// Import results in the Behave JSON format, optionally creating the Test
  /// Execution from `issue_metadata`
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_behave(
    &self,
    results: Value,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    self.import_json(JsonFormat::Behave, results, issue_metadata).await
  }

  /// Import results in the JUnit XML format.
  ///
  /// # Errors
  ///
  /// Fails with [`XrayError::InvalidArgument`](crate::XrayError) unless
  /// exactly one of `query` and `issue_metadata` is given.
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_junit(
    &self,
    results: impl Into<FormValue>,
    query: Option<XrayImportQuery>,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    self.import_xml(XmlFormat::Junit, results.into(), query, issue_metadata).await
  }

  /// Import results in the TestNG XML format
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_testng(
    &self,
    results: impl Into<FormValue>,
    query: Option<XrayImportQuery>,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    self.import_xml(XmlFormat::Testng, results.into(), query, issue_metadata).await
  }

  /// Import results in the NUnit (2.6 or 3.0) XML format
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_nunit(
    &self,
    results: impl Into<FormValue>,
    query: Option<XrayImportQuery>,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    self.import_xml(XmlFormat::Nunit, results.into(), query, issue_metadata).await
  }

  /// Import results in the Robot Framework XML format
  #[instrument(skip_all, level = "debug")]
  pub async fn import_exec_results_from_robot(
    &self,
    results: impl Into<FormValue>,
    query: Option<XrayImportQuery>,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    self.import_xml(XmlFormat::Robot, results.into(), query, issue_metadata).await
  }

  /// Import a compressed bundle (e.g. ZIP) of several result files.
  ///
  /// Xray answers with one entry per Test Execution it touched.
  #[instrument(skip_all, level = "debug")]
  pub async fn import_multiple_exec_results(&self, results: impl Into<FormValue>) -> Result<Vec<ImportResponse>> {
    info!("Importing bundled results");
    self.import(build_bundle_import_request(results)).await
  }

  /// Import results in any JSON format
  pub async fn import_json(
    &self,
    kind: JsonFormat,
    results: Value,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    info!("Importing {} results", kind);
    self.import(build_json_import_request(kind, results, issue_metadata)).await
  }

  /// Import results in any XML format
  pub async fn import_xml(
    &self,
    kind: XmlFormat,
    results: FormValue,
    query: Option<XrayImportQuery>,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<ImportResponse> {
    info!("Importing {} results", kind);
    let request = build_xml_import_request(kind, results, query, issue_metadata)?;
    self.import(request).await
  }

  async fn import<T: DeserializeOwned>(&self, request: ImportRequest) -> Result<T> {
    let response = self.send(request).await?;
    let status = response.status;
    debug!("Xray API response status: {}", status);

    match status {
      _ if status.is_success() => {
        trace!("Xray import response: {}", response.body);
        serde_json::from_str::<T>(&response.body)
          .with_context(|| format!("Failed to parse Xray import response: {}", response.body))
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        warn!("Authentication failed when accessing the Xray API");
        Err(anyhow::anyhow!(
          "Authentication failed. Please check your Jira credentials."
        ))
      }
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Xray rejected the import: {}",
        error_message(&response.body)
      )),
      _ => {
        warn!("Unexpected Xray API error: HTTP {} - {}", status, response.body);
        Err(anyhow::anyhow!("Unexpected error: HTTP {status} - {}", response.body))
      }
    }
  }
}

/// Pull a human readable message out of an Xray or Jira error body
fn error_message(body: &str) -> String {
  if let Ok(json) = serde_json::from_str::<Value>(body) {
    for key in ["error", "message"] {
      if let Some(message) = json.get(key).and_then(Value::as_str) {
        return message.to_string();
      }
    }
    if let Some(message) = json
      .get("errorMessages")
      .and_then(Value::as_array)
      .and_then(|messages| messages.first())
      .and_then(Value::as_str)
    {
      return message.to_string();
    }
  }

  body.trim().to_string()
}
