//! Command-line interface module for docs-reorganizer.
//!
//! This module handles all CLI-related functionality including:
//! - Argument definitions
//! - Configuration loading and base path overrides
//! - Run orchestration and final reporting

use crate::config::{ConfigError, ReorganizeConfig};
use crate::output::OutputFormatter;
use crate::reorganizer::{ReorganizeError, Reorganizer, RunReport};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

/// Reorganize a documentation tree into its new folder layout.
///
/// With no arguments the built-in base path and mapping tables are used.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "docs-reorganizer", version, about)]
pub struct CliArgs {
    /// Base directory to reorganize (overrides the configured one)
    #[arg(short, long, value_name = "DIR")]
    pub base_path: Option<PathBuf>,

    /// TOML file with the base path and mapping tables
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Errors that stop the CLI before or during a run.
#[derive(Debug)]
pub enum CliError {
    /// The configuration could not be loaded.
    Config(ConfigError),
    /// The run aborted on an unexpected filesystem error.
    Reorganize(ReorganizeError),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Reorganize(_) => 1,
            Self::Config(_) => 2,
        }
    }

    /// Renders the error followed by every underlying cause, one per line.
    pub fn diagnostic(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut cause = self.source();
        while let Some(error) = cause {
            lines.push(format!("  caused by: {}", error));
            cause = error.source();
        }
        lines.join("\n")
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(_) => write!(f, "Error loading configuration"),
            Self::Reorganize(_) => write!(f, "An error occurred"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Reorganize(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<ReorganizeError> for CliError {
    fn from(error: ReorganizeError) -> Self {
        Self::Reorganize(error)
    }
}

/// Builds the effective configuration from the arguments.
///
/// `--base-path` wins over the base path found in the configuration.
pub fn resolve_config(args: &CliArgs) -> Result<ReorganizeConfig, ConfigError> {
    let config = ReorganizeConfig::load(args.config.as_deref())?;
    Ok(match &args.base_path {
        Some(base_path) => config.with_base_path(base_path),
        None => config,
    })
}

/// Runs the CLI application with the given arguments.
///
/// # Examples
///
/// ```no_run
/// use docs_reorganizer::cli::{run_cli, CliArgs};
///
/// match run_cli(&CliArgs::default()) {
///     Ok(report) => println!("{} operations", report.operations),
///     Err(e) => eprintln!("{}", e.diagnostic()),
/// }
/// ```
pub fn run_cli(args: &CliArgs) -> Result<RunReport, CliError> {
    let config = resolve_config(args)?;
    let report = Reorganizer::new(config).with_dry_run(args.dry_run).run()?;

    if report.dry_run {
        OutputFormatter::plain("\nRun again without --dry-run to apply these copies.");
    } else {
        OutputFormatter::next_steps();
    }

    Ok(report)
}
