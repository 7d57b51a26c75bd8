//! # Import Command
//!
//! Reads result files from disk and imports them through the Xray client.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;
use tokio::runtime::Runtime;
use xray_core::XrayConfig;
use xray_jira::auth::create_xray_runtime_and_client;
use xray_jira::{
  FormValue, ImportResponse, IssueCreationMetadata, JsonFormat, TestEnvironments, XmlFormat, XrayClient,
  XrayImportQuery,
};

use crate::output::{format_issue_key, print_info, print_success, print_warning};

/// Command for importing test results
#[derive(Args)]
pub struct ImportArgs {
  /// The results format to import
  #[command(subcommand)]
  pub subcommand: ImportSubcommands,
}

/// Supported result formats
#[derive(Subcommand)]
pub enum ImportSubcommands {
  /// Import results in the Xray JSON format
  Xray {
    /// Results file
    #[arg(index = 1, value_name = "FILE")]
    file: PathBuf,
  },

  /// Import Cucumber JSON results
  Cucumber(JsonImportArgs),

  /// Import Behave JSON results
  Behave(JsonImportArgs),

  /// Import JUnit XML results
  Junit(XmlImportArgs),

  /// Import TestNG XML results
  Testng(XmlImportArgs),

  /// Import NUnit XML results
  Nunit(XmlImportArgs),

  /// Import Robot Framework XML results
  Robot(XmlImportArgs),

  /// Import a compressed bundle of result files
  #[command(long_about = "Import a compressed bundle (e.g. ZIP) of several result files.\n\n\
                         Xray reports one Test Execution per imported file.")]
  Bundle {
    /// Bundle file
    #[arg(index = 1, value_name = "FILE")]
    file: PathBuf,
  },
}

/// Arguments for JSON result formats
#[derive(Args)]
pub struct JsonImportArgs {
  /// Results file
  #[arg(index = 1, value_name = "FILE")]
  file: PathBuf,

  /// JSON file with the fields of the Test Execution issue to create
  #[arg(long, value_name = "FILE")]
  info: Option<PathBuf>,
}

/// Arguments for XML result formats
#[derive(Args)]
pub struct XmlImportArgs {
  /// Results file
  #[arg(index = 1, value_name = "FILE")]
  file: PathBuf,

  /// Existing Test Execution to update
  #[arg(long, value_name = "KEY")]
  test_exec_key: Option<String>,

  /// Project in which a new Test Execution is created
  #[arg(long, value_name = "KEY")]
  project_key: Option<String>,

  /// Test Plan to associate with the Test Execution
  #[arg(long, value_name = "KEY")]
  test_plan_key: Option<String>,

  #[arg(
    long,
    value_name = "ENVS",
    long_help = "Environments the tests ran in.\n\n\
             Accepts a ';'-delimited list and may be repeated."
  )]
  test_environments: Vec<String>,

  /// Source code revision under test
  #[arg(long)]
  revision: Option<String>,

  /// Fix Version to associate with the Test Execution
  #[arg(long)]
  fix_version: Option<String>,

  /// JSON file with the fields of the Test Execution issue to create
  #[arg(long, value_name = "FILE")]
  info: Option<PathBuf>,
}

impl XmlImportArgs {
  /// Query built from the flags, `None` when no flag was given
  fn query(&self) -> Option<XrayImportQuery> {
    let test_environments =
      (!self.test_environments.is_empty()).then(|| TestEnvironments::Delimited(self.test_environments.join(";")));

    let query = XrayImportQuery {
      test_exec_key: self.test_exec_key.clone(),
      project_key: self.project_key.clone(),
      test_plan_key: self.test_plan_key.clone(),
      test_environments,
      revision: self.revision.clone(),
      fix_version: self.fix_version.clone(),
    };

    (!query.is_empty()).then_some(query)
  }
}

pub(super) fn handle_import_command(home: &Path, config: &XrayConfig, import: ImportArgs) -> Result<()> {
  let (rt, client) = create_xray_runtime_and_client(home, config)?;

  match import.subcommand {
    ImportSubcommands::Xray { file } => {
      let results = read_json(&file)?;
      let response = rt.block_on(client.import_exec_results_from_xray(results))?;
      report(&response);
    }
    ImportSubcommands::Cucumber(args) => import_json(&rt, &client, JsonFormat::Cucumber, args)?,
    ImportSubcommands::Behave(args) => import_json(&rt, &client, JsonFormat::Behave, args)?,
    ImportSubcommands::Junit(args) => import_xml(&rt, &client, XmlFormat::Junit, args)?,
    ImportSubcommands::Testng(args) => import_xml(&rt, &client, XmlFormat::Testng, args)?,
    ImportSubcommands::Nunit(args) => import_xml(&rt, &client, XmlFormat::Nunit, args)?,
    ImportSubcommands::Robot(args) => import_xml(&rt, &client, XmlFormat::Robot, args)?,
    ImportSubcommands::Bundle { file } => {
      let responses = rt.block_on(client.import_multiple_exec_results(read_file(&file)?))?;
      if responses.is_empty() {
        print_warning("Xray did not report any Test Execution");
      }
      for response in &responses {
        report(response);
      }
    }
  }

  Ok(())
}

fn import_json(rt: &Runtime, client: &XrayClient, kind: JsonFormat, args: JsonImportArgs) -> Result<()> {
  let results = read_json(&args.file)?;
  let issue_metadata = args.info.as_deref().map(read_metadata).transpose()?;

  let response = rt.block_on(client.import_json(kind, results, issue_metadata))?;
  report(&response);
  Ok(())
}

fn import_xml(rt: &Runtime, client: &XrayClient, kind: XmlFormat, args: XmlImportArgs) -> Result<()> {
  let query = args.query();
  let issue_metadata = args.info.as_deref().map(read_metadata).transpose()?;
  let results = read_file(&args.file)?;

  let response = rt.block_on(client.import_xml(kind, results, query, issue_metadata))?;
  report(&response);
  Ok(())
}

/// Read a results file as bytes, keeping its file name for the upload
fn read_file(path: &Path) -> Result<FormValue> {
  let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let file_name = path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| "results".to_string());

  Ok(FormValue::file(file_name, data))
}

fn read_json(path: &Path) -> Result<Value> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn read_metadata(path: &Path) -> Result<IssueCreationMetadata> {
  read_json(path).map(IssueCreationMetadata)
}

fn report(response: &ImportResponse) {
  print_success(&format!(
    "Imported results into Test Execution {}",
    format_issue_key(&response.test_exec_issue.key)
  ));

  if let Some(tests) = &response.test_issues {
    if !tests.success.is_empty() {
      let keys: Vec<String> = tests.success.iter().map(|issue| format_issue_key(&issue.key)).collect();
      print_info(&format!("Tests: {}", keys.join(", ")));
    }
    if !tests.error.is_empty() {
      print_warning(&format!("{} test(s) could not be imported", tests.error.len()));
    }
  }

  for message in &response.info_messages {
    print_info(message);
  }
}
