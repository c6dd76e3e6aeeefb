/*!
 * Release metadata clients.
 *
 * This module contains the release-metadata seam used by the fetcher:
 * - `github`: GitHub REST API client built on reqwest
 * - `mock`: in-memory client for tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::fmt::Debug;

use crate::errors::FetchError;

pub mod github;
pub mod mock;

pub use github::GithubClient;
pub use mock::MockReleaseClient;

/// Latest-release metadata
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Release {
    /// Version label of the release
    pub tag_name: String,
    /// Files attached to the release, in API order
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReleaseAsset {
    /// File name of the asset
    pub name: String,
    /// Direct download URL, absent for assets that are still uploading
    #[serde(default)]
    pub browser_download_url: Option<String>,
    /// Size in bytes as reported by the API
    #[serde(default)]
    pub size: Option<u64>,
}

/// Common trait for release metadata and asset transports
///
/// Implementations report non-success HTTP statuses as
/// `FetchError::ReleaseQuery` and `FetchError::Download` respectively.
#[async_trait]
pub trait ReleaseClient: Send + Sync + Debug {
    /// Fetch the latest release of `repo` (owner/name)
    async fn latest_release(&self, repo: &str) -> Result<Release, FetchError>;

    /// Start downloading `url`, returning a chunked body stream
    async fn open_download(&self, url: &str) -> Result<Box<dyn DownloadStream>, FetchError>;
}

/// A response body read chunk by chunk
#[async_trait]
pub trait DownloadStream: Send {
    /// Declared size of the body, if the server sent one
    fn content_length(&self) -> Option<u64>;

    /// Next chunk of the body, `None` once the body is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError>;
}
