// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};
use std::path::PathBuf;

use yomidict::app_config::{FetcherConfig, LogLevel};
use yomidict::errors::AppError;
use yomidict::fetcher::DictionaryFetcher;
use yomidict::logging::CustomLogger;
use yomidict::releases::GithubClient;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Download the latest Yomitan dictionaries from their GitHub releases
///
/// Files already present in the target directory are never downloaded again.
#[derive(Parser, Debug)]
#[command(name = "fetch_dicts")]
#[command(version)]
#[command(about = "Download the latest Yomitan dictionary releases")]
struct CommandLineOptions {
    /// Configuration file path (built-in defaults when the file does not exist)
    #[arg(short, long, default_value = "fetch_dicts.json")]
    config_path: PathBuf,

    /// Data root; dictionaries are saved under <DATA_ROOT>/dicts/yomitan
    #[arg(short, long, env = "YOMIDICT_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Do not draw progress bars
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    CustomLogger::init(LevelFilter::Info).map_err(|e| AppError::Unknown(e.to_string()))?;

    let options = CommandLineOptions::parse();

    let mut config = FetcherConfig::load(&options.config_path)?;
    if let Some(data_root) = options.data_root {
        config.data_root = data_root;
    }
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
    if options.no_progress {
        config.show_progress = false;
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.clone().into());

    info!("Saving dictionaries to: {}", config.target_dir().display());

    let client = GithubClient::new(&config)?;
    let fetcher = DictionaryFetcher::new(client, config);
    let reports = fetcher.run().await;

    info!("Summary:");
    for report in &reports {
        if report.is_failure() {
            error!("  {}", report.summary());
        } else {
            info!("  {}", report.summary());
        }
    }

    Ok(())
}
