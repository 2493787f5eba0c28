//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.titanic-eda.toml` files.

use crate::cli::OutputFormat;
use crate::dataset::DEFAULT_SOURCE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".titanic-eda.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Page settings.
    #[serde(default)]
    pub page: PageConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "titanic_dashboard.html".to_string()
}

/// Where the dataset comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the passenger CSV.
    #[serde(default = "default_url")]
    pub url: String,

    /// Download timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Dashboard page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Number of most common last names to list.
    #[serde(default = "default_top_names")]
    pub top_names: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            top_names: default_top_names(),
        }
    }
}

fn default_title() -> String {
    "Titanic Passenger Dashboard".to_string()
}

fn default_top_names() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.source {
            self.source.url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.to_string_lossy().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }
        if args.quiet {
            self.general.verbose = false;
        }

        if let Some(ref title) = args.title {
            self.page.title = title.clone();
        }
        if let Some(top_names) = args.top_names {
            self.page.top_names = top_names;
        }
    }

    /// Validate the merged configuration, file values included.
    pub fn validate(&self) -> Result<(), String> {
        let url = &self.source.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!(
                "Source URL must start with 'http://' or 'https://': {}",
                url
            ));
        }

        if self.source.timeout_seconds == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Returns the log level for the merged settings. `quiet` wins.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.general.format, OutputFormat::Html);
        assert_eq!(config.page.top_names, 10);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "summary.md"
format = "markdown"
verbose = true

[source]
url = "https://example.com/titanic.csv"

[page]
top_names = 3
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "summary.md");
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert!(config.general.verbose);
        assert_eq!(config.source.url, "https://example.com/titanic.csv");
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.page.top_names, 3);
        assert_eq!(config.page.title, "Titanic Passenger Dashboard");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[page]\ntitle = \"Voyage\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.page.title, "Voyage");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[page\ntitle =").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let args = Args::try_parse_from([
            "titanic-eda",
            "--timeout",
            "5",
            "--format",
            "json",
            "--top-names",
            "0",
        ])
        .unwrap();

        config.merge_with_args(&args);

        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.page.top_names, 0);
        // Untouched settings keep their values.
        assert_eq!(config.general.output, "titanic_dashboard.html");
        assert_eq!(config.page.title, "Titanic Passenger Dashboard");
    }

    #[test]
    fn test_validate_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\ntimeout_seconds = 0").unwrap();

        let mut config = Config::load(file.path()).unwrap();
        config.merge_with_args(&Args::try_parse_from(["titanic-eda"]).unwrap());
        assert!(config.validate().is_err());

        // A timeout flag replaces the bad file value.
        let args = Args::try_parse_from(["titanic-eda", "--timeout", "10"]).unwrap();
        config.merge_with_args(&args);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_url_scheme_from_file() {
        let mut config = Config::default();
        config.source.url = "ftp://example.com/titanic.csv".to_string();
        assert!(config.validate().is_err());

        config.source.url = "http://example.com/titanic.csv".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut config = Config::default();
        assert_eq!(config.log_level(false), tracing::Level::INFO);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);

        config.general.verbose = true;
        assert_eq!(config.log_level(false), tracing::Level::DEBUG);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_verbose_from_file() {
        let config: Config = toml::from_str("[general]\nverbose = true").unwrap();
        assert_eq!(config.log_level(false), tracing::Level::DEBUG);

        // --quiet overrides the file setting.
        let mut quiet = config.clone();
        quiet.merge_with_args(&Args::try_parse_from(["titanic-eda", "-q"]).unwrap());
        assert!(!quiet.general.verbose);
        assert_eq!(quiet.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[page]"));
    }
}
