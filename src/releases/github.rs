use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};

use crate::app_config::FetcherConfig;
use crate::errors::FetchError;
use crate::releases::{DownloadStream, Release, ReleaseClient};

/// GitHub client for the latest-release endpoint and asset downloads
#[derive(Debug, Clone)]
pub struct GithubClient {
    /// HTTP client for making requests
    client: Client,
    /// Fetcher configuration (API base URL)
    config: FetcherConfig,
}

impl GithubClient {
    /// Create a new client from the fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl ReleaseClient for GithubClient {
    async fn latest_release(&self, repo: &str) -> Result<Release, FetchError> {
        let url = self
            .config
            .latest_release_url(repo)
            .map_err(|e| FetchError::Request(e.to_string()))?;
        debug!("Querying latest release: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ReleaseQuery {
                repo: repo.to_string(),
                status: status.as_u16(),
            });
        }

        let release = response
            .json::<Release>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        Ok(release)
    }

    async fn open_download(&self, url: &str) -> Result<Box<dyn DownloadStream>, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Box::new(ResponseStream { response }))
    }
}

/// Streaming body of a reqwest response
struct ResponseStream {
    response: Response,
}

#[async_trait]
impl DownloadStream for ResponseStream {
    fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError> {
        Ok(self.response.chunk().await?)
    }
}
