//! # xray-core
//!
//! Shared building blocks for the jira-xray workspace: connection
//! configuration, `.netrc` credential lookup and Jira host parsing. The
//! Xray client crate and the CLI both build on these so that every entry
//! point resolves the same Jira instance the same way.

pub mod config;
pub mod creds;
pub mod host;

pub use config::{ConfigDirs, XrayConfig};
pub use creds::Credentials;
pub use host::{ENV_JIRA_HOST, JiraConnection, ensure_url_scheme};
