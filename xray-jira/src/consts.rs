//! Constants for the xray-jira client.

/// User-Agent header value for the Xray API client
pub const USER_AGENT: &str = concat!("jira-xray/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Prefix of the "Xray for Jira" REST API; the API version follows it.
pub const XRAY_REST_PREFIX: &str = "/rest/raven";

/// Endpoint shared by every execution import.
pub const IMPORT_EXECUTION_PATH: &str = "/import/execution";

/// Appended to an import endpoint when issue creation metadata is sent.
pub const MULTIPART_SUFFIX: &str = "/multipart";

/// Endpoint segment for compressed bundles of result files.
pub const BUNDLE_SEGMENT: &str = "bundle";

/// Jira endpoint used to verify credentials.
pub const MYSELF_PATH: &str = "/rest/api/2/myself";

/// Multipart field carrying JSON results.
pub const RESULT_FIELD: &str = "result";

/// Multipart field carrying a results file.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying issue creation metadata.
pub const INFO_FIELD: &str = "info";
