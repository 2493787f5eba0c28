//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// titanic-eda - passenger survival dashboard
///
/// Loads the Titanic passenger list, computes survival and fare statistics,
/// and writes a dashboard page with three charts.
///
/// Examples:
///   titanic-eda
///   titanic-eda --local ./titanic.csv --output dashboard.html
///   titanic-eda --format markdown --output summary.md
///   titanic-eda --dry-run
///   titanic-eda --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// URL of the passenger CSV
    ///
    /// Defaults to the value in .titanic-eda.toml, or the public dataset.
    #[arg(short, long, value_name = "URL", env = "TITANIC_EDA_SOURCE")]
    pub source: Option<String>,

    /// Read the dataset from a local CSV file instead of downloading it
    #[arg(long, value_name = "FILE", conflicts_with = "source")]
    pub local: Option<PathBuf>,

    /// Output file path for the dashboard
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (html, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .titanic-eda.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of most common last names to list (0 to hide)
    #[arg(long, value_name = "COUNT")]
    pub top_names: Option<usize>,

    /// Page title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Dry run: load and validate the dataset, print counts, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .titanic-eda.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone HTML page with charts (default)
    #[default]
    Html,
    /// Markdown tables, no charts
    Markdown,
    /// JSON with Vega-Lite chart specifications
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref source) = self.source {
            if !source.starts_with("http://") && !source.starts_with("https://") {
                return Err("Source URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref local_path) = self.local {
            if !local_path.exists() {
                return Err(format!("Local dataset does not exist: {}", local_path.display()));
            }
            if !local_path.is_file() {
                return Err(format!("Local dataset is not a file: {}", local_path.display()));
            }
        }

        Ok(())
    }
}
