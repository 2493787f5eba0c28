//! Dataset retrieval.
//!
//! The dataset is fetched once per run, either over HTTP or from a local
//! copy, and handed to the aggregators as an in-memory [`Dataset`].

use super::parser::parse_passengers;
use crate::models::Passenger;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default location of the passenger CSV.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/leontoddjohnson/datasets/main/data/titanic.csv";

/// Where to load the dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Fetch over HTTP(S).
    Remote(String),
    /// Read a local CSV file.
    Local(PathBuf),
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Remote(url) => write!(f, "{}", url),
            DatasetSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for fetching a remote dataset.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while downloading.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// A loaded passenger table.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the records came from.
    pub source: DatasetSource,
    /// The parsed records, in file order.
    pub passengers: Vec<Passenger>,
}

impl Dataset {
    /// Load and parse the dataset from `source`.
    pub async fn load(source: DatasetSource, options: &FetchOptions) -> Result<Self> {
        let text = match &source {
            DatasetSource::Remote(url) => fetch_csv(url, options).await?,
            DatasetSource::Local(path) => read_local(path).await?,
        };

        let passengers = parse_passengers(&text)
            .with_context(|| format!("Failed to parse dataset from {}", source))?;

        info!("Loaded {} passengers from {}", passengers.len(), source);

        Ok(Self { source, passengers })
    }

    /// Number of passengers.
    pub fn len(&self) -> usize {
        self.passengers.len()
    }
}

/// Download the CSV text at `url`.
pub async fn fetch_csv(url: &str, options: &FetchOptions) -> Result<String> {
    info!("Fetching dataset: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()
        .context("Failed to create HTTP client")?;

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb.set_message(format!("Downloading {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch dataset: {}", url))?
        .error_for_status()
        .with_context(|| format!("Dataset request failed: {}", url))?;

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read dataset body: {}", url))?;

    if let Some(pb) = spinner {
        pb.finish_with_message("Download complete");
    }

    debug!("Fetched {} bytes", text.len());
    Ok(text)
}

/// Read a local copy of the CSV.
pub async fn read_local(path: &Path) -> Result<String> {
    info!("Reading dataset from: {}", path.display());

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))
}
