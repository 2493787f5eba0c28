//! titanic-eda - Titanic passenger survival dashboard
//!
//! A CLI tool that loads the Titanic passenger list once, computes grouped
//! survival and fare statistics, and writes a dashboard page with charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, fetch or parse failure, write failure)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dataset::{Dataset, DatasetSource, FetchOptions};
use report::DashboardOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first; it can turn on verbose logging
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    init_logging(config.log_level(args.quiet));

    info!("titanic-eda v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(args, config).await {
        error!("Dashboard generation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .titanic-eda.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the dataset URL, output, or page title.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset once, aggregate it, and write the dashboard.
async fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let source = match args.local {
        Some(ref path) => DatasetSource::Local(path.clone()),
        None => DatasetSource::Remote(config.source.url.clone()),
    };

    let fetch_options = FetchOptions {
        timeout_seconds: config.source.timeout_seconds,
        show_progress: !args.quiet,
    };

    // Step 1: Load the dataset
    println!("📥 Loading dataset: {}", source);
    let dataset = Dataset::load(source, &fetch_options).await?;

    if args.dry_run {
        return handle_dry_run(&dataset);
    }

    // Step 2: Aggregate and build the charts
    println!("📊 Computing statistics...");
    let options = DashboardOptions {
        title: config.page.title.clone(),
        top_names: config.page.top_names,
    };
    let elapsed = start_time.elapsed().as_secs_f64();
    let dashboard = report::build_dashboard(&dataset, &options, elapsed);

    // Step 3: Render and save
    let format = config.general.format;
    let output_path = output_path(&args, &config);

    let output = match format {
        OutputFormat::Html => report::generate_html_page(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
    };

    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write dashboard to {}", output_path.display()))?;
    info!("Wrote {} bytes to {}", output.len(), output_path.display());

    // Print summary
    println!("\n📋 Summary:");
    println!("   Passengers: {}", dashboard.metadata.passengers);
    println!("   Unknown age: {}", dashboard.metadata.unknown_age);
    println!("   Family groups: {}", dashboard.families.len());
    for section in &dashboard.sections {
        println!("   - {}", section.explanation);
    }
    println!(
        "\n✅ Dashboard saved to: {} ({:.1}s)",
        output_path.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Handle --dry-run: report what was loaded, write nothing.
fn handle_dry_run(dataset: &Dataset) -> Result<()> {
    let passengers = &dataset.passengers;
    let survivors = passengers.iter().filter(|p| p.survived).count();
    let missing_age = passengers.iter().filter(|p| p.age.is_none()).count();
    let missing_fare = passengers.iter().filter(|p| p.fare.is_none()).count();

    println!("\n🔍 Dry run: dataset loaded and validated.\n");
    println!("   Passengers: {}", dataset.len());
    println!("   Survivors: {}", survivors);
    println!("   Missing age: {}", missing_age);
    println!("   Missing fare: {}", missing_fare);
    println!("\n✅ Dry run complete. Nothing was written.");

    Ok(())
}

/// Resolve the output path, matching the default file name to the format.
fn output_path(args: &Args, config: &Config) -> PathBuf {
    let configured = PathBuf::from(&config.general.output);

    if args.output.is_some() || config.general.output != Config::default().general.output {
        return configured;
    }

    configured.with_extension(config.general.format.extension())
}

/// Load configuration from file or use defaults.
///
/// Runs before the subscriber is installed, so problems go to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load config, using defaults: {:#}", e);
            Ok(Config::default())
        }
    }
}
