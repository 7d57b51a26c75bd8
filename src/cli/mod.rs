//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for jira-xray: checking
//! the Jira connection and importing test results into Xray.

mod check;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use directories::BaseDirs;
use tracing::debug;
use xray_core::{ConfigDirs, XrayConfig};

use crate::output::ColorMode;

/// Top-level CLI command for jira-xray
#[derive(Parser)]
#[command(name = "jira-xray")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Import test execution results into Xray for Jira")]
#[command(
  long_about = "jira-xray sends test execution results to the \"Xray for Jira\" test management add-on.\n\n\
        It supports the Xray JSON, Cucumber, Behave, JUnit, TestNG, NUnit and Robot Framework\n\
        formats as well as compressed bundles of several result files."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Path to the configuration file
  #[arg(
    long,
    global = true,
    value_name = "PATH",
    long_help = "Path to the configuration file.\n\n\
             Defaults to config.toml in the jira-xray configuration directory.\n\
             JIRA_HOST, XRAY_VERSION and XRAY_INTERMEDIATE_PATH override its settings."
  )]
  pub config: Option<PathBuf>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for jira-xray
#[derive(Subcommand)]
pub enum Commands {
  /// Check the Jira connection and credentials
  #[command(long_about = "Check the Jira connection and credentials.\n\n\
            Resolves the configured host and credentials, fetches the current Jira user\n\
            and shows the Xray endpoint imports will be sent to.")]
  Check,

  /// Import test execution results
  #[command(long_about = "Import test execution results into Xray.\n\n\
            XML formats (JUnit, TestNG, NUnit, Robot) identify their Test Execution either by\n\
            query flags (--test-exec-key, --project-key, ...) or by an --info file holding the\n\
            fields of a new Test Execution issue. Exactly one of the two must be given.")]
  #[command(arg_required_else_help = true)]
  Import(import::ImportArgs),
}

/// Handle the parsed CLI command
pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  let config = load_config(cli.config.as_deref())?;
  let home = home_dir()?;

  match cli.command {
    Commands::Check => check::handle_check_command(&home, &config),
    Commands::Import(import) => import::handle_import_command(&home, &config, import),
  }
}

/// Load the configuration file and apply environment overrides
fn load_config(path: Option<&Path>) -> Result<XrayConfig> {
  let path = match path {
    Some(path) => path.to_path_buf(),
    None => ConfigDirs::new()?.config_path(),
  };
  debug!("Loading configuration from {}", path.display());

  let mut config = XrayConfig::load(&path)?;
  config.apply_env_overrides();
  Ok(config)
}

fn home_dir() -> Result<PathBuf> {
  BaseDirs::new()
    .map(|dirs| dirs.home_dir().to_path_buf())
    .context("Failed to determine home directory")
}
