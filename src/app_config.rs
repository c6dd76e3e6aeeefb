use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Fetcher configuration module
/// This module handles the dictionary fetcher configuration including loading,
/// validating and the built-in table of tracked release sources.
/// Represents the fetcher configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetcherConfig {
    /// Root of the shared data area; assets land in `<data_root>/dicts/yomitan`
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// User-Agent header sent with every request (GitHub rejects requests without one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Capacity in bytes of the file writer used while streaming downloads.
    /// Network reads are not fixed-size; chunks arrive as the transport delivers them.
    #[serde(default = "default_write_buffer_size", alias = "chunk_size")]
    pub write_buffer_size: usize,

    /// Whether to draw progress bars
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Tracked release sources, processed in order
    #[serde(default = "default_sources")]
    pub sources: Vec<ReleaseDescriptor>,
}

/// One tracked upstream dictionary repository
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReleaseDescriptor {
    /// Repository identifier (owner/name)
    pub repo: String,

    /// Substrings matched against asset names
    #[serde(alias = "files")]
    pub keywords: Vec<String>,

    /// Append the release tag to saved filenames
    #[serde(default)]
    pub add_tag: bool,
}

impl ReleaseDescriptor {
    /// Descriptor from string slices
    pub fn new(repo: &str, keywords: &[&str], add_tag: bool) -> Self {
        Self {
            repo: repo.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            add_tag,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// The dictionary repositories tracked by default
pub fn default_sources() -> Vec<ReleaseDescriptor> {
    vec![
        ReleaseDescriptor::new("MarvNC/wikipedia-yomitan", &["ja.Wikipedia"], false),
        ReleaseDescriptor::new(
            "MarvNC/jmdict-yomitan",
            &[
                "JMdict_english.zip",
                "JMdict_english_with_examples.zip",
                "JMnedict.zip",
                "KANJIDIC_english.zip",
            ],
            true,
        ),
        ReleaseDescriptor::new("stephenmk/stephenmk.github.io", &["jitendex-yomitan.zip"], true),
        ReleaseDescriptor::new("MarvNC/pixiv-yomitan", &["PixivLight_", "Pixiv_"], false),
    ]
}

fn default_data_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_write_buffer_size() -> usize {
    8192
}

fn default_true() -> bool {
    true
}

impl FetcherConfig {
    /// Load the configuration from a JSON file, or the defaults when the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: FetcherConfig = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;

        if self.write_buffer_size == 0 {
            return Err(anyhow!("Write buffer size must be greater than zero"));
        }

        for source in &self.sources {
            let mut parts = source.repo.split('/');
            let valid = matches!(
                (parts.next(), parts.next(), parts.next()),
                (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
            );
            if !valid {
                return Err(anyhow!("Repository must be in owner/name form: {}", source.repo));
            }
            if source.keywords.iter().any(|k| k.is_empty()) {
                return Err(anyhow!("Empty keyword configured for {}", source.repo));
            }
        }

        Ok(())
    }

    /// Directory that downloaded dictionaries are written to
    pub fn target_dir(&self) -> PathBuf {
        self.data_root.join("dicts").join("yomitan")
    }

    /// Latest-release endpoint for a repository
    pub fn latest_release_url(&self, repo: &str) -> Result<Url> {
        let base = self.api_base_url.trim_end_matches('/');
        let url = format!("{}/repos/{}/releases/latest", base, repo);
        Url::parse(&url).with_context(|| format!("Invalid release URL: {}", url))
    }
}

/// Default implementation for FetcherConfig
impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            data_root: default_data_root(),
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            write_buffer_size: default_write_buffer_size(),
            show_progress: default_true(),
            log_level: LogLevel::default(),
            sources: default_sources(),
        }
    }
}
