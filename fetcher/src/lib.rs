//! Remote job source
//!
//! Fetches paginated job postings from the listing API. Every call is a
//! live round trip: no caching and no retries happen at this layer.

use async_trait::async_trait;
use common::Job;
use log::{debug, error};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Listing endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://testapi.getlokalapp.com/common/jobs";

/// Failures while talking to the listing API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API returned status {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),
}

impl ApiError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            ApiError::Transport(e) | ApiError::Decode(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidPage(_) => None,
        }
    }
}

/// Anything that can hand out pages of jobs.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch one 1-based page. An empty vector means there are no more pages.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Job>, ApiError>;
}

/// Response envelope of the listing endpoint.
#[derive(Debug, Deserialize)]
struct JobsEnvelope {
    #[serde(default)]
    results: Option<Vec<Job>>,
}

/// [`JobSource`] backed by `GET <base_url>?page=<n>`.
#[derive(Debug, Clone)]
pub struct HttpJobSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpJobSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Build a source whose requests give up after `timeout`.
    /// `None` leaves requests unbounded.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Transport)?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Job>, ApiError> {
        if page == 0 {
            return Err(ApiError::InvalidPage(page));
        }

        debug!("Fetching jobs for page: {}", page);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching jobs (page {}): {}", page, e);
                ApiError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Error fetching jobs (page {}): status {}", page, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: JobsEnvelope = response.json().await.map_err(|e| {
            error!("Error decoding jobs (page {}): {}", page, e);
            ApiError::Decode(e)
        })?;

        let jobs = envelope.results.unwrap_or_default();
        debug!("Fetched jobs: {} (page {})", jobs.len(), page);
        Ok(jobs)
    }
}
