//! # Check Command
//!
//! Verifies that the configured Jira host is reachable with the resolved
//! credentials.

use std::path::Path;

use anyhow::Result;
use xray_core::XrayConfig;
use xray_jira::HttpExecutor;
use xray_jira::auth::create_xray_runtime_and_client;
use xray_jira::consts::IMPORT_EXECUTION_PATH;

use crate::output::{format_url, print_error, print_info, print_success};

pub(super) fn handle_check_command(home: &Path, config: &XrayConfig) -> Result<()> {
  let (rt, client) = create_xray_runtime_and_client(home, config)?;
  let jira = client.executor();

  print_info(&format!(
    "Checking connection to {}",
    format_url(&jira.connection().base_url())
  ));

  if rt.block_on(jira.test_connection())? {
    print_success("Jira accepted the credentials");
    print_info(&format!(
      "Xray {} imports go to {}",
      client.xray_version(),
      format_url(&client.make_uri(IMPORT_EXECUTION_PATH, None)?)
    ));
    Ok(())
  } else {
    print_error("Jira rejected the credentials");
    Err(anyhow::anyhow!("Connection check failed"))
  }
}
