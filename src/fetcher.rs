/*!
 * Dictionary fetcher.
 *
 * Walks the configured release sources one at a time, matches release
 * assets by keyword and downloads whatever is not on disk yet. Each source
 * produces a `SourceReport`; a failure inside one source never reaches the
 * others.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::app_config::{FetcherConfig, ReleaseDescriptor};
use crate::errors::FetchError;
use crate::file_utils::FileManager;
use crate::releases::{DownloadStream, Release, ReleaseClient};

/// An asset selected by keyword
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMatch {
    /// Asset file name as published
    pub name: String,
    /// Download URL, if the API provided one
    pub download_url: Option<String>,
}

/// What happened to one asset
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// Fetched and written to the path
    Downloaded(PathBuf),
    /// The path already existed, nothing was transferred
    Skipped(PathBuf),
}

/// Final state of one release source
#[derive(Debug)]
pub enum SourceOutcome {
    /// Every matched asset was downloaded or skipped
    Completed,
    /// The release had no asset matching any keyword
    NoMatchingAssets,
    /// Processing stopped at this error
    Failed(FetchError),
}

/// Result of processing one release source
#[derive(Debug)]
pub struct SourceReport {
    /// Repository identifier (owner/name)
    pub repo: String,
    /// Release tag, when the release query succeeded
    pub tag: Option<String>,
    /// Files written during this pass
    pub downloaded: Vec<PathBuf>,
    /// Files left untouched because they already existed
    pub skipped: Vec<PathBuf>,
    /// How processing ended
    pub outcome: SourceOutcome,
}

impl SourceReport {
    fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            tag: None,
            downloaded: Vec::new(),
            skipped: Vec::new(),
            outcome: SourceOutcome::Completed,
        }
    }

    /// Whether processing of this source ended in an error
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Failed(_))
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        let tag = self.tag.as_deref().unwrap_or("-");
        match &self.outcome {
            SourceOutcome::Completed => format!(
                "{} ({}): {} downloaded, {} skipped",
                self.repo,
                tag,
                self.downloaded.len(),
                self.skipped.len()
            ),
            SourceOutcome::NoMatchingAssets => {
                format!("{} ({}): no matching assets", self.repo, tag)
            }
            SourceOutcome::Failed(e) => format!(
                "{} ({}): failed after {} downloaded, {} skipped: {}",
                self.repo,
                tag,
                self.downloaded.len(),
                self.skipped.len(),
                e
            ),
        }
    }
}

/// Select the assets whose names contain any keyword.
///
/// Keywords are tried in order and each scans the whole asset list, so an
/// asset matching two keywords is listed twice.
pub fn find_matching_assets(release: &Release, keywords: &[String]) -> Vec<AssetMatch> {
    keywords
        .iter()
        .flat_map(move |keyword| {
            release
                .assets
                .iter()
                .filter(move |asset| asset.name.contains(keyword.as_str()))
        })
        .map(|asset| AssetMatch {
            name: asset.name.clone(),
            download_url: asset.browser_download_url.clone(),
        })
        .collect()
}

/// File name an asset is saved under
pub fn saved_filename(asset_name: &str, tag: &str, add_tag: bool) -> String {
    if add_tag {
        FileManager::tagged_filename(asset_name, tag)
    } else {
        asset_name.to_string()
    }
}

/// Downloads dictionary releases into the configured target directory
pub struct DictionaryFetcher<C: ReleaseClient> {
    client: C,
    config: FetcherConfig,
}

impl<C: ReleaseClient> DictionaryFetcher<C> {
    /// Create a fetcher over a release client and configuration
    pub fn new(client: C, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    /// The client used for requests
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Process every configured source in order
    pub async fn run(&self) -> Vec<SourceReport> {
        let mut reports = Vec::with_capacity(self.config.sources.len());
        for source in &self.config.sources {
            reports.push(self.process_source(source).await);
        }
        reports
    }

    /// Query, match and download for a single source
    pub async fn process_source(&self, source: &ReleaseDescriptor) -> SourceReport {
        info!("Processing repository: {}", source.repo);
        let mut report = SourceReport::new(&source.repo);

        if let Err(e) = self.fetch_source(source, &mut report).await {
            error!("Error processing {}: {}", source.repo, e);
            report.outcome = SourceOutcome::Failed(e);
        }

        report
    }

    async fn fetch_source(
        &self,
        source: &ReleaseDescriptor,
        report: &mut SourceReport,
    ) -> Result<(), FetchError> {
        let release = self.client.latest_release(&source.repo).await?;
        info!("Latest release: {}", release.tag_name);
        report.tag = Some(release.tag_name.clone());

        let assets = find_matching_assets(&release, &source.keywords);
        if assets.is_empty() {
            info!("No matching assets found in {}", source.repo);
            report.outcome = SourceOutcome::NoMatchingAssets;
            return Ok(());
        }

        for asset in assets {
            let Some(url) = asset.download_url.as_deref() else {
                warn!("No download URL for asset: {}", asset.name);
                continue;
            };

            info!("Found asset: {}", asset.name);
            let filename = saved_filename(&asset.name, &release.tag_name, source.add_tag);
            match self.download_asset(url, &filename).await? {
                DownloadOutcome::Downloaded(path) => report.downloaded.push(path),
                DownloadOutcome::Skipped(path) => report.skipped.push(path),
            }
        }

        Ok(())
    }

    /// Download `url` into the target directory as `filename`, unless it is already there
    pub async fn download_asset(
        &self,
        url: &str,
        filename: &str,
    ) -> Result<DownloadOutcome, FetchError> {
        let target_dir = self.config.target_dir();
        FileManager::ensure_dir(&target_dir)?;

        let filepath = target_dir.join(filename);
        if fs::try_exists(&filepath).await? {
            info!("File already exists, skipping: {}", filepath.display());
            return Ok(DownloadOutcome::Skipped(filepath));
        }

        info!("Downloading from: {}, saving file to: {}", url, filepath.display());
        let mut stream = self.client.open_download(url).await?;

        let partial = FileManager::partial_download_path(&filepath);
        let progress = self.progress_bar(stream.content_length(), filename);
        let result = self.write_stream(stream.as_mut(), &partial, &progress).await;
        progress.finish_and_clear();

        if let Err(e) = result {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        fs::rename(&partial, &filepath).await?;
        info!("Downloaded: {}", filepath.display());
        Ok(DownloadOutcome::Downloaded(filepath))
    }

    async fn write_stream(
        &self,
        stream: &mut dyn DownloadStream,
        path: &Path,
        progress: &ProgressBar,
    ) -> Result<(), FetchError> {
        let file = fs::File::create(path).await?;
        let mut writer = BufWriter::with_capacity(self.config.write_buffer_size, file);

        while let Some(chunk) = stream.next_chunk().await? {
            writer.write_all(&chunk).await?;
            progress.inc(chunk.len() as u64);
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;
        Ok(())
    }

    // @creates: Byte progress bar, or a spinner when the size is unknown
    fn progress_bar(&self, total: Option<u64>, filename: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress = match total {
            Some(len) => {
                let style = ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                    .or_else(|_| ProgressStyle::default_bar().template("{msg} [{bar:40}] {bytes}/{total_bytes}"))
                    .unwrap_or_else(|_| ProgressStyle::default_bar());
                ProgressBar::new(len).with_style(style.progress_chars("█▓▒░"))
            }
            None => {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                ProgressBar::new_spinner().with_style(style)
            }
        };
        progress.set_message(filename.to_string());
        progress
    }
}
