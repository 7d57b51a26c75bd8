use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::XrayError;
use crate::request::normalize_test_environments;

/// Represents Jira authentication credentials
#[derive(Clone)]
pub enum JiraAuth {
  /// Username with a password or API token
  Basic { username: String, api_token: String },
  /// OAuth bearer or personal access token
  Bearer(String),
}

/// JSON result formats accepted by Xray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonFormat {
  Cucumber,
  Behave,
}

impl JsonFormat {
  /// Name used in the import endpoint path
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Cucumber => "cucumber",
      Self::Behave => "behave",
    }
  }
}

impl fmt::Display for JsonFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for JsonFormat {
  type Err = XrayError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "cucumber" => Ok(Self::Cucumber),
      "behave" => Ok(Self::Behave),
      other => Err(XrayError::InvalidArgument(format!(
        "unsupported JSON format '{other}', expected one of: cucumber, behave"
      ))),
    }
  }
}

/// XML result formats accepted by Xray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlFormat {
  Junit,
  Testng,
  Nunit,
  Robot,
}

impl XmlFormat {
  /// Name used in the import endpoint path
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Junit => "junit",
      Self::Testng => "testng",
      Self::Nunit => "nunit",
      Self::Robot => "robot",
    }
  }
}

impl fmt::Display for XmlFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for XmlFormat {
  type Err = XrayError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "junit" => Ok(Self::Junit),
      "testng" => Ok(Self::Testng),
      "nunit" => Ok(Self::Nunit),
      "robot" => Ok(Self::Robot),
      other => Err(XrayError::InvalidArgument(format!(
        "unsupported XML format '{other}', expected one of: junit, testng, nunit, robot"
      ))),
    }
  }
}

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
  Get,
  Post,
}

impl fmt::Display for HttpMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Get => f.write_str("GET"),
      Self::Post => f.write_str("POST"),
    }
  }
}

/// Value of a single multipart form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
  /// Serialized as JSON with an `application/json` content type
  Json(Value),
  /// Plain text, e.g. an XML document held in memory
  Text(String),
  /// Binary content uploaded as a file. The field name is used when no file
  /// name is given.
  Bytes { data: Vec<u8>, file_name: Option<String> },
}

impl FormValue {
  /// Binary content with an explicit file name
  pub fn file(file_name: impl Into<String>, data: Vec<u8>) -> Self {
    Self::Bytes {
      data,
      file_name: Some(file_name.into()),
    }
  }
}

impl From<String> for FormValue {
  fn from(text: String) -> Self {
    Self::Text(text)
  }
}

impl From<&str> for FormValue {
  fn from(text: &str) -> Self {
    Self::Text(text.to_string())
  }
}

impl From<Vec<u8>> for FormValue {
  fn from(data: Vec<u8>) -> Self {
    Self::Bytes { data, file_name: None }
  }
}

impl From<Value> for FormValue {
  fn from(value: Value) -> Self {
    Self::Json(value)
  }
}

impl From<IssueCreationMetadata> for FormValue {
  fn from(metadata: IssueCreationMetadata) -> Self {
    Self::Json(metadata.0)
  }
}

/// Multipart fields keyed by field name
pub type FormFields = BTreeMap<String, FormValue>;

/// Query parameters keyed by parameter name
pub type QueryParams = BTreeMap<String, String>;

/// What an [`ImportRequest`] carries besides its path and query
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPayload {
  None,
  Json(Value),
  Multipart(FormFields),
}

/// A fully formed request, ready to hand to an executor.
///
/// Requests are immutable once built and consumed by value when sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
  method: HttpMethod,
  path: String,
  payload: ImportPayload,
  query: Option<QueryParams>,
}

impl ImportRequest {
  pub(crate) fn post(path: String, payload: ImportPayload) -> Self {
    Self {
      method: HttpMethod::Post,
      path,
      payload,
      query: None,
    }
  }

  pub(crate) fn with_query(mut self, query: QueryParams) -> Self {
    self.query = Some(query);
    self
  }

  /// A bodiless GET request
  pub fn get(path: impl Into<String>) -> Self {
    Self {
      method: HttpMethod::Get,
      path: path.into(),
      payload: ImportPayload::None,
      query: None,
    }
  }

  pub fn method(&self) -> HttpMethod {
    self.method
  }

  /// Path relative to the Xray REST root
  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn payload(&self) -> &ImportPayload {
    &self.payload
  }

  /// The JSON body, if the request carries one
  pub fn body(&self) -> Option<&Value> {
    match &self.payload {
      ImportPayload::Json(body) => Some(body),
      _ => None,
    }
  }

  /// The multipart fields, if the request carries a form
  pub fn form_fields(&self) -> Option<&FormFields> {
    match &self.payload {
      ImportPayload::Multipart(fields) => Some(fields),
      _ => None,
    }
  }

  pub fn query_params(&self) -> Option<&QueryParams> {
    self.query.as_ref()
  }

  /// Split the request into method, path, payload and query
  pub fn into_parts(self) -> (HttpMethod, String, ImportPayload, Option<QueryParams>) {
    (self.method, self.path, self.payload, self.query)
  }
}

/// Test environments as supplied by the caller: a `;`-delimited string or a
/// list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestEnvironments {
  Delimited(String),
  List(Vec<String>),
}

impl From<&str> for TestEnvironments {
  fn from(value: &str) -> Self {
    Self::Delimited(value.to_string())
  }
}

impl From<String> for TestEnvironments {
  fn from(value: String) -> Self {
    Self::Delimited(value)
  }
}

impl From<Vec<String>> for TestEnvironments {
  fn from(values: Vec<String>) -> Self {
    Self::List(values)
  }
}

impl From<Vec<&str>> for TestEnvironments {
  fn from(values: Vec<&str>) -> Self {
    Self::List(values.into_iter().map(str::to_string).collect())
  }
}

/// Fields of a new Jira issue to create for the Test Execution.
///
/// Passed through to Xray untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueCreationMetadata(pub Value);

impl From<Value> for IssueCreationMetadata {
  fn from(value: Value) -> Self {
    Self(value)
  }
}

/// Query parameters for XML imports that do not create a customized issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XrayImportQuery {
  /// Existing Test Execution to update. Either this or `project_key` must be
  /// set.
  pub test_exec_key: Option<String>,
  /// Project in which a new Test Execution is created
  pub project_key: Option<String>,
  /// Test Plan to associate with the Test Execution
  pub test_plan_key: Option<String>,
  /// Environments the tests ran in
  pub test_environments: Option<TestEnvironments>,
  /// Source code revision under test
  pub revision: Option<String>,
  /// Jira "Fix Version" to associate with the Test Execution
  pub fix_version: Option<String>,
}

impl XrayImportQuery {
  /// Render the query as request parameters.
  ///
  /// Absent fields are omitted, and test environments are normalized into a
  /// single `;`-joined value (omitted when nothing remains).
  pub fn to_params(&self) -> QueryParams {
    let mut params = QueryParams::new();
    let mut insert = |key: &str, value: Option<String>| {
      if let Some(value) = value {
        params.insert(key.to_string(), value);
      }
    };

    insert("testExecKey", self.test_exec_key.clone());
    insert("projectKey", self.project_key.clone());
    insert("testPlanKey", self.test_plan_key.clone());
    insert(
      "testEnvironments",
      normalize_test_environments(self.test_environments.as_ref()),
    );
    insert("revision", self.revision.clone());
    insert("fixVersion", self.fix_version.clone());

    params
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// How an XML import identifies its Test Execution: by query parameters or
/// by issue creation metadata, never both
#[derive(Debug, Clone, PartialEq)]
pub enum RequestMode {
  ByQuery(XrayImportQuery),
  ByIssueMetadata(IssueCreationMetadata),
}

impl RequestMode {
  /// Build a mode from two optional inputs, exactly one of which must be set.
  pub fn from_options(
    query: Option<XrayImportQuery>,
    issue_metadata: Option<IssueCreationMetadata>,
  ) -> Result<Self, XrayError> {
    match (query, issue_metadata) {
      (Some(query), None) => Ok(Self::ByQuery(query)),
      (None, Some(metadata)) => Ok(Self::ByIssueMetadata(metadata)),
      (Some(_), Some(_)) => Err(XrayError::InvalidArgument(
        "provide either the query or the issue metadata, not both".to_string(),
      )),
      (None, None) => Err(XrayError::InvalidArgument(
        "must provide either the query or the issue metadata".to_string(),
      )),
    }
  }
}

/// Reference to a Jira issue returned by Xray
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueReference {
  pub id: String,
  pub key: String,
  #[serde(rename = "self")]
  pub self_url: Option<String>,
}

/// Tests Xray created or failed to create during an import
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ImportedTestIssues {
  #[serde(default)]
  pub success: Vec<IssueReference>,
  #[serde(default)]
  pub error: Vec<Value>,
}

/// Xray's reply to an execution import
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
  pub test_exec_issue: IssueReference,
  #[serde(default)]
  pub test_issues: Option<ImportedTestIssues>,
  #[serde(default)]
  pub info_messages: Vec<String>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_format_round_trip_names() {
    assert_eq!("Cucumber".parse::<JsonFormat>().unwrap(), JsonFormat::Cucumber);
    assert_eq!(JsonFormat::Behave.to_string(), "behave");
    assert_eq!(" robot ".parse::<XmlFormat>().unwrap(), XmlFormat::Robot);
    assert_eq!(XmlFormat::Testng.to_string(), "testng");
  }

  #[test]
  fn test_format_rejects_unknown() {
    let error = "xunit".parse::<XmlFormat>().unwrap_err();
    assert!(matches!(error, XrayError::InvalidArgument(_)));
    assert!(error.to_string().contains("xunit"));
    assert!("junit".parse::<JsonFormat>().is_err());
  }

  #[test]
  fn test_request_mode_requires_exactly_one() {
    let query = XrayImportQuery {
      project_key: Some("DEMO".to_string()),
      ..Default::default()
    };
    let metadata = IssueCreationMetadata(json!({"fields": {}}));

    assert!(matches!(
      RequestMode::from_options(Some(query.clone()), None),
      Ok(RequestMode::ByQuery(_))
    ));
    assert!(matches!(
      RequestMode::from_options(None, Some(metadata.clone())),
      Ok(RequestMode::ByIssueMetadata(_))
    ));
    assert!(matches!(
      RequestMode::from_options(Some(query), Some(metadata)),
      Err(XrayError::InvalidArgument(_))
    ));
    assert!(matches!(
      RequestMode::from_options(None, None),
      Err(XrayError::InvalidArgument(_))
    ));
  }

  #[test]
  fn test_query_to_params_omits_absent_fields() {
    let query = XrayImportQuery {
      project_key: Some("DEMO".to_string()),
      test_environments: Some(" chrome ;; firefox ".into()),
      fix_version: Some("1.2".to_string()),
      ..Default::default()
    };

    let params = query.to_params();
    assert_eq!(params.len(), 3);
    assert_eq!(params["projectKey"], "DEMO");
    assert_eq!(params["testEnvironments"], "chrome;firefox");
    assert_eq!(params["fixVersion"], "1.2");
    assert!(!params.contains_key("testExecKey"));
  }

  #[test]
  fn test_query_to_params_drops_blank_environments() {
    let query = XrayImportQuery {
      test_exec_key: Some("DEMO-7".to_string()),
      test_environments: Some(vec![" ", ""].into()),
      ..Default::default()
    };

    let params = query.to_params();
    assert_eq!(params.len(), 1);
    assert!(!params.contains_key("testEnvironments"));
  }

  #[test]
  fn test_query_deserializes_camel_case() {
    let query: XrayImportQuery = serde_json::from_value(json!({
      "testExecKey": "DEMO-1",
      "testEnvironments": ["linux", "mac"],
      "revision": "abc123"
    }))
    .unwrap();

    assert_eq!(query.test_exec_key.as_deref(), Some("DEMO-1"));
    assert_eq!(
      query.test_environments,
      Some(TestEnvironments::List(vec!["linux".to_string(), "mac".to_string()]))
    );
    assert!(!query.is_empty());
    assert!(XrayImportQuery::default().is_empty());
  }

  #[test]
  fn test_request_accessors() {
    let request = ImportRequest::post("/import/execution".to_string(), ImportPayload::Json(json!({"tests": []})));
    assert_eq!(request.method(), HttpMethod::Post);
    assert_eq!(request.body(), Some(&json!({"tests": []})));
    assert!(request.form_fields().is_none());
    assert!(request.query_params().is_none());

    let get = ImportRequest::get("/rest/api/2/myself");
    assert_eq!(get.method(), HttpMethod::Get);
    assert_eq!(get.payload(), &ImportPayload::None);
    assert!(get.body().is_none());
  }

  #[test]
  fn test_import_response_deserialization() {
    let response: ImportResponse = serde_json::from_value(json!({
      "testExecIssue": {
        "id": "10100",
        "key": "DEMO-42",
        "self": "https://jira.example.com/rest/api/2/issue/10100"
      },
      "testIssues": {
        "success": [{"id": "10101", "key": "DEMO-43", "self": "https://jira.example.com/rest/api/2/issue/10101"}]
      }
    }))
    .unwrap();

    assert_eq!(response.test_exec_issue.key, "DEMO-42");
    let tests = response.test_issues.unwrap();
    assert_eq!(tests.success.len(), 1);
    assert!(tests.error.is_empty());
    assert!(response.info_messages.is_empty());
  }
}
