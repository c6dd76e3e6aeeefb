/*!
 * Mock release client for testing.
 *
 * Releases and download bodies are registered up front; anything not
 * registered answers with a 404. Every download request is recorded so
 * tests can assert how much network traffic a pass generated.
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::errors::FetchError;
use crate::releases::{DownloadStream, Release, ReleaseAsset, ReleaseClient};

/// Canned response for a download URL
#[derive(Debug, Clone)]
enum MockDownload {
    Body {
        data: Vec<u8>,
        declare_length: bool,
    },
    Status(u16),
}

/// In-memory `ReleaseClient`
#[derive(Debug, Default)]
pub struct MockReleaseClient {
    releases: HashMap<String, Result<Release, u16>>,
    downloads: HashMap<String, MockDownload>,
    release_requests: Mutex<Vec<String>>,
    download_requests: Mutex<Vec<String>>,
}

impl MockReleaseClient {
    /// Create an empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a release for `repo`
    pub fn with_release(mut self, repo: &str, release: Release) -> Self {
        self.releases.insert(repo.to_string(), Ok(release));
        self
    }

    /// Make the release query for `repo` answer with `status`
    pub fn with_release_status(mut self, repo: &str, status: u16) -> Self {
        self.releases.insert(repo.to_string(), Err(status));
        self
    }

    /// Register a download body that declares its content length
    pub fn with_download(mut self, url: &str, data: &[u8]) -> Self {
        self.downloads.insert(
            url.to_string(),
            MockDownload::Body {
                data: data.to_vec(),
                declare_length: true,
            },
        );
        self
    }

    /// Register a download body served without a content length
    pub fn with_unsized_download(mut self, url: &str, data: &[u8]) -> Self {
        self.downloads.insert(
            url.to_string(),
            MockDownload::Body {
                data: data.to_vec(),
                declare_length: false,
            },
        );
        self
    }

    /// Make the download of `url` answer with `status`
    pub fn with_download_status(mut self, url: &str, status: u16) -> Self {
        self.downloads
            .insert(url.to_string(), MockDownload::Status(status));
        self
    }

    /// Repositories queried so far, in order
    pub fn release_requests(&self) -> Vec<String> {
        self.release_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// URLs downloaded so far, in order
    pub fn download_requests(&self) -> Vec<String> {
        self.download_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Build a release from a tag and (name, url) pairs
    pub fn release(tag: &str, assets: &[(&str, &str)]) -> Release {
        Release {
            tag_name: tag.to_string(),
            assets: assets
                .iter()
                .map(|(name, url)| ReleaseAsset {
                    name: name.to_string(),
                    browser_download_url: Some(url.to_string()),
                    size: None,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ReleaseClient for MockReleaseClient {
    async fn latest_release(&self, repo: &str) -> Result<Release, FetchError> {
        if let Ok(mut requests) = self.release_requests.lock() {
            requests.push(repo.to_string());
        }

        match self.releases.get(repo) {
            Some(Ok(release)) => Ok(release.clone()),
            Some(Err(status)) => Err(FetchError::ReleaseQuery {
                repo: repo.to_string(),
                status: *status,
            }),
            None => Err(FetchError::ReleaseQuery {
                repo: repo.to_string(),
                status: 404,
            }),
        }
    }

    async fn open_download(&self, url: &str) -> Result<Box<dyn DownloadStream>, FetchError> {
        if let Ok(mut requests) = self.download_requests.lock() {
            requests.push(url.to_string());
        }

        match self.downloads.get(url) {
            Some(MockDownload::Body {
                data,
                declare_length,
            }) => Ok(Box::new(MockStream::new(data, *declare_length))),
            Some(MockDownload::Status(status)) => Err(FetchError::Download {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Download {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Body split into small chunks to exercise the streaming path
struct MockStream {
    chunks: VecDeque<Bytes>,
    length: Option<u64>,
}

impl MockStream {
    const CHUNK: usize = 4;

    fn new(data: &[u8], declare_length: bool) -> Self {
        Self {
            chunks: data
                .chunks(Self::CHUNK)
                .map(Bytes::copy_from_slice)
                .collect(),
            length: declare_length.then_some(data.len() as u64),
        }
    }
}

#[async_trait]
impl DownloadStream for MockStream {
    fn content_length(&self) -> Option<u64> {
        self.length
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError> {
        Ok(self.chunks.pop_front())
    }
}
