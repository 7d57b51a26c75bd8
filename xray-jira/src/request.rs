//! # Import Request Builder
//!
//! Turns an import format, a results payload and the caller's options into an
//! [`ImportRequest`] describing the endpoint, body or multipart form, and
//! query parameters Xray expects. Nothing here performs I/O.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::consts::{BUNDLE_SEGMENT, FILE_FIELD, IMPORT_EXECUTION_PATH, INFO_FIELD, MULTIPART_SUFFIX, RESULT_FIELD};
use crate::error::XrayError;
use crate::models::{
  FormFields, FormValue, ImportPayload, ImportRequest, IssueCreationMetadata, JsonFormat, RequestMode,
  TestEnvironments, XmlFormat, XrayImportQuery,
};

// Semicolons with any surrounding whitespace
static ENVIRONMENT_SEPARATOR: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s*;\s*").expect("Failed to compile test environment separator regex"));

/// Build a request importing Cucumber or Behave JSON results.
///
/// Without metadata the results are posted as the JSON body. With metadata
/// the `multipart` endpoint is used with `result` and `info` fields.
pub fn build_json_import_request(
  kind: JsonFormat,
  results: Value,
  issue_metadata: Option<IssueCreationMetadata>,
) -> ImportRequest {
  match issue_metadata {
    None => ImportRequest::post(format!("{IMPORT_EXECUTION_PATH}/{kind}"), ImportPayload::Json(results)),
    Some(metadata) => {
      let mut form = FormFields::new();
      form.insert(RESULT_FIELD.to_string(), FormValue::Json(results));
      form.insert(INFO_FIELD.to_string(), metadata.into());
      ImportRequest::post(
        format!("{IMPORT_EXECUTION_PATH}/{kind}{MULTIPART_SUFFIX}"),
        ImportPayload::Multipart(form),
      )
    }
  }
}

/// Build a request importing JUnit, TestNG, NUnit or Robot Framework XML
/// results.
///
/// Exactly one of `query` and `issue_metadata` must be given.
///
/// # Errors
///
/// Returns [`XrayError::InvalidArgument`] when both or neither are given.
pub fn build_xml_import_request(
  kind: XmlFormat,
  results: impl Into<FormValue>,
  query: Option<XrayImportQuery>,
  issue_metadata: Option<IssueCreationMetadata>,
) -> Result<ImportRequest, XrayError> {
  let mode = RequestMode::from_options(query, issue_metadata)?;
  Ok(build_xml_import_request_with_mode(kind, results, mode))
}

/// Build an XML import request from an already validated [`RequestMode`].
pub fn build_xml_import_request_with_mode(
  kind: XmlFormat,
  results: impl Into<FormValue>,
  mode: RequestMode,
) -> ImportRequest {
  let mut form = FormFields::new();
  form.insert(FILE_FIELD.to_string(), results.into());

  match mode {
    RequestMode::ByQuery(query) => ImportRequest::post(
      format!("{IMPORT_EXECUTION_PATH}/{kind}"),
      ImportPayload::Multipart(form),
    )
    .with_query(query.to_params()),
    RequestMode::ByIssueMetadata(metadata) => {
      form.insert(INFO_FIELD.to_string(), metadata.into());
      ImportRequest::post(
        format!("{IMPORT_EXECUTION_PATH}/{kind}{MULTIPART_SUFFIX}"),
        ImportPayload::Multipart(form),
      )
    }
  }
}

/// Build a request importing a compressed bundle of result files.
pub fn build_bundle_import_request(results: impl Into<FormValue>) -> ImportRequest {
  let mut form = FormFields::new();
  form.insert(FILE_FIELD.to_string(), results.into());
  ImportRequest::post(
    format!("{IMPORT_EXECUTION_PATH}/{BUNDLE_SEGMENT}"),
    ImportPayload::Multipart(form),
  )
}

/// Build a request importing results in the Xray JSON format.
pub fn build_raw_json_import_request(results: Value) -> ImportRequest {
  ImportRequest::post(IMPORT_EXECUTION_PATH.to_string(), ImportPayload::Json(results))
}

/// Trimmed, non-empty environment names in input order.
///
/// Duplicates are kept.
pub fn test_environment_list(value: &TestEnvironments) -> Vec<String> {
  let entries: Vec<&str> = match value {
    TestEnvironments::Delimited(text) => ENVIRONMENT_SEPARATOR.split(text).collect(),
    TestEnvironments::List(items) => items.iter().map(String::as_str).collect(),
  };

  entries
    .into_iter()
    .map(str::trim)
    .filter(|entry| !entry.is_empty())
    .map(str::to_string)
    .collect()
}

/// Normalize test environments into the single `;`-joined value Xray
/// expects.
///
/// Returns `None` when the input is absent or nothing is left after trimming,
/// so the parameter is omitted instead of sent empty.
pub fn normalize_test_environments(value: Option<&TestEnvironments>) -> Option<String> {
  let environments = test_environment_list(value?);
  if environments.is_empty() {
    None
  } else {
    Some(environments.join(";"))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::models::HttpMethod;

  fn metadata() -> IssueCreationMetadata {
    IssueCreationMetadata(json!({
      "fields": {
        "project": {"key": "DEMO"},
        "summary": "Nightly regression",
        "issuetype": {"name": "Test Execution"}
      }
    }))
  }

  #[test]
  fn test_delimited_and_list_normalize_identically() {
    let cases = [
      ("chrome;firefox", vec!["chrome", "firefox"]),
      ("  chrome  ;  firefox  ", vec!["chrome", "firefox"]),
      (";chrome;;\tfirefox ; ", vec!["", "chrome", "", "firefox", ""]),
      ("ios 17 ; android 14", vec!["ios 17", "android 14"]),
      ("edge;edge", vec!["edge", "edge"]),
    ];

    for (delimited, list) in cases {
      let from_string = normalize_test_environments(Some(&delimited.into()));
      let from_list = normalize_test_environments(Some(&list.clone().into()));
      assert_eq!(from_string, from_list, "input: {delimited:?}");
    }

    assert_eq!(
      normalize_test_environments(Some(&"ios 17 ; android 14".into())).as_deref(),
      Some("ios 17;android 14")
    );
  }

  #[test]
  fn test_normalize_preserves_order_and_duplicates() {
    let value: TestEnvironments = vec!["windows", " linux", "windows "].into();
    assert_eq!(test_environment_list(&value), vec!["windows", "linux", "windows"]);
    assert_eq!(
      normalize_test_environments(Some(&value)).as_deref(),
      Some("windows;linux;windows")
    );
  }

  #[test]
  fn test_normalize_omits_empty_results() {
    assert_eq!(normalize_test_environments(None), None);
    assert_eq!(normalize_test_environments(Some(&"".into())), None);
    assert_eq!(normalize_test_environments(Some(&" ; ;".into())), None);
    assert_eq!(normalize_test_environments(Some(&vec![" ", ""].into())), None);
    assert_eq!(normalize_test_environments(Some(&Vec::<String>::new().into())), None);
  }

  #[test]
  fn test_json_import_without_metadata() {
    let payload = json!([{"id": "feature", "elements": []}]);
    let request = build_json_import_request(JsonFormat::Cucumber, payload.clone(), None);

    assert_eq!(request.method(), HttpMethod::Post);
    assert_eq!(request.path(), "/import/execution/cucumber");
    assert_eq!(request.body(), Some(&payload));
    assert!(request.form_fields().is_none());
    assert!(request.query_params().is_none());
  }

  #[test]
  fn test_json_import_with_metadata() {
    let payload = json!([{"name": "behave feature"}]);
    let request = build_json_import_request(JsonFormat::Behave, payload.clone(), Some(metadata()));

    assert_eq!(request.path(), "/import/execution/behave/multipart");
    assert!(request.body().is_none());

    let form = request.form_fields().unwrap();
    assert_eq!(form.len(), 2);
    assert_eq!(form["result"], FormValue::Json(payload));
    assert_eq!(form["info"], FormValue::Json(metadata().0));
  }

  #[test]
  fn test_xml_import_requires_exactly_one_option() {
    let neither = build_xml_import_request(XmlFormat::Junit, "<testsuites/>", None, None);
    assert!(matches!(neither, Err(XrayError::InvalidArgument(_))));

    let query = XrayImportQuery {
      project_key: Some("DEMO".to_string()),
      ..Default::default()
    };
    let both = build_xml_import_request(XmlFormat::Junit, "<testsuites/>", Some(query), Some(metadata()));
    assert!(matches!(both, Err(XrayError::InvalidArgument(_))));
  }

  #[test]
  fn test_xml_import_with_query() {
    let query = XrayImportQuery {
      test_exec_key: Some("DEMO-12".to_string()),
      test_plan_key: Some("DEMO-3".to_string()),
      test_environments: Some("linux ; ; chrome".into()),
      revision: Some("4f2a9c".to_string()),
      ..Default::default()
    };
    let request = build_xml_import_request(XmlFormat::Testng, "<testng-results/>", Some(query), None).unwrap();

    assert_eq!(request.method(), HttpMethod::Post);
    assert_eq!(request.path(), "/import/execution/testng");

    let form = request.form_fields().unwrap();
    assert_eq!(form.len(), 1);
    assert_eq!(form["file"], FormValue::Text("<testng-results/>".to_string()));

    let params = request.query_params().unwrap();
    assert_eq!(params["testExecKey"], "DEMO-12");
    assert_eq!(params["testPlanKey"], "DEMO-3");
    assert_eq!(params["testEnvironments"], "linux;chrome");
    assert_eq!(params["revision"], "4f2a9c");
    assert_eq!(params.len(), 4);
  }

  #[test]
  fn test_xml_import_with_metadata() {
    let data = b"<robot/>".to_vec();
    let request = build_xml_import_request(XmlFormat::Robot, data.clone(), None, Some(metadata())).unwrap();

    assert_eq!(request.path(), "/import/execution/robot/multipart");
    assert!(request.query_params().is_none());

    let form = request.form_fields().unwrap();
    assert_eq!(form["file"], FormValue::Bytes { data, file_name: None });
    assert_eq!(form["info"], FormValue::Json(metadata().0));
  }

  #[test]
  fn test_xml_import_with_mode_for_every_format() {
    for kind in [XmlFormat::Junit, XmlFormat::Testng, XmlFormat::Nunit, XmlFormat::Robot] {
      let request = build_xml_import_request_with_mode(
        kind,
        "<results/>",
        RequestMode::ByQuery(XrayImportQuery::default()),
      );
      assert_eq!(request.path(), format!("/import/execution/{kind}"));
      assert_eq!(request.query_params().map(|params| params.len()), Some(0));
    }
  }

  #[test]
  fn test_bundle_import_accepts_text_and_bytes() {
    let from_bytes = build_bundle_import_request(FormValue::file("results.zip", vec![0x50, 0x4b, 0x03, 0x04]));
    assert_eq!(from_bytes.path(), "/import/execution/bundle");
    assert_eq!(
      from_bytes.form_fields().unwrap()["file"],
      FormValue::file("results.zip", vec![0x50, 0x4b, 0x03, 0x04])
    );

    let from_text = build_bundle_import_request("zip-as-text");
    assert_eq!(from_text.path(), "/import/execution/bundle");
    assert_eq!(
      from_text.form_fields().unwrap()["file"],
      FormValue::Text("zip-as-text".to_string())
    );
    assert!(from_text.body().is_none());
  }

  #[test]
  fn test_raw_json_import() {
    let payload = json!({
      "testExecutionKey": "DEMO-1",
      "tests": [{"testKey": "DEMO-2", "status": "PASS"}]
    });
    let request = build_raw_json_import_request(payload.clone());

    assert_eq!(request.method(), HttpMethod::Post);
    assert_eq!(request.path(), "/import/execution");
    assert_eq!(request.body(), Some(&payload));
  }
}
