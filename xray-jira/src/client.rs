//! # Jira HTTP Client
//!
//! reqwest-backed [`HttpExecutor`] handling authentication, TLS settings and
//! the translation of [`ImportRequest`] payloads into JSON bodies or
//! multipart forms.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, header};
use tracing::{debug, trace};
use xray_core::JiraConnection;

use crate::consts::{MYSELF_PATH, USER_AGENT};
use crate::executor::{ExecutorResponse, HttpExecutor};
use crate::models::{FormFields, FormValue, HttpMethod, ImportPayload, ImportRequest, JiraAuth};

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) connection: JiraConnection,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client
  pub fn new(connection: JiraConnection, auth: JiraAuth) -> Self {
    Self {
      client: Client::new(),
      connection,
      auth,
    }
  }

  /// Create a Jira client with TLS verification and timeout settings.
  ///
  /// `strict_ssl = false` accepts invalid certificates, for self-hosted
  /// instances with self-signed certificates.
  pub fn with_settings(
    connection: JiraConnection,
    auth: JiraAuth,
    strict_ssl: bool,
    timeout: Option<Duration>,
  ) -> Result<Self> {
    let mut builder = Client::builder().danger_accept_invalid_certs(!strict_ssl);
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().context("Failed to build HTTP client")?;

    Ok(Self {
      client,
      connection,
      auth,
    })
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let url = format!("{}{}", self.connection.base_url(), MYSELF_PATH);

    let response = self
      .send(&url, ImportRequest::get(MYSELF_PATH))
      .await
      .context("Failed to connect to Jira")?;

    Ok(response.status.is_success())
  }

  fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
    match &self.auth {
      JiraAuth::Basic { username, api_token } => builder.basic_auth(username, Some(api_token)),
      JiraAuth::Bearer(token) => builder.bearer_auth(token),
    }
  }
}

impl HttpExecutor for JiraClient {
  fn connection(&self) -> &JiraConnection {
    &self.connection
  }

  async fn send(&self, uri: &str, request: ImportRequest) -> Result<ExecutorResponse> {
    let (method, _path, payload, query) = request.into_parts();
    trace!("{} {}", method, uri);

    let builder = match method {
      HttpMethod::Get => self.client.get(uri),
      HttpMethod::Post => self.client.post(uri),
    };
    let mut builder = self.authorize(builder).header(header::USER_AGENT, USER_AGENT);

    if let Some(query) = &query {
      trace!("Query parameters: {:?}", query);
      builder = builder.query(query);
    }

    builder = match payload {
      ImportPayload::None => builder,
      ImportPayload::Json(body) => builder.json(&body),
      ImportPayload::Multipart(fields) => builder.multipart(build_form(fields)?),
    };

    let response = builder.send().await.with_context(|| format!("{method} {uri} failed"))?;
    let status = response.status();
    debug!("Jira response status: {}", status);

    let body = response.text().await.context("Failed to read response body")?;
    trace!("Jira response body: {}", body);

    Ok(ExecutorResponse { status, body })
  }
}

/// Convert form fields into a multipart form.
///
/// JSON fields are sent as `application/json` parts; binary fields are sent
/// as files named after the field unless a file name is given.
fn build_form(fields: FormFields) -> Result<Form> {
  let mut form = Form::new();

  for (name, value) in fields {
    let part = match value {
      FormValue::Json(value) => {
        let json = serde_json::to_string(&value).with_context(|| format!("Failed to serialize form field '{name}'"))?;
        Part::text(json)
          .mime_str("application/json")
          .context("Invalid MIME type for JSON form field")?
      }
      FormValue::Text(text) => Part::text(text),
      FormValue::Bytes { data, file_name } => {
        let file_name = file_name.unwrap_or_else(|| name.clone());
        Part::bytes(data).file_name(file_name)
      }
    };
    form = form.part(name, part);
  }

  Ok(form)
}

/// Create a Jira client from a host and credentials
pub fn create_jira_client(jira_host: &str, username: &str, api_token: &str) -> Result<JiraClient> {
  let connection = JiraConnection::from_host(jira_host)?;
  let auth = JiraAuth::Basic {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  Ok(JiraClient::new(connection, auth))
}
