pub mod http_fetcher;

use async_trait::async_trait;
use thiserror::Error;

pub use http_fetcher::HttpFetcher;

/// Transport-level failures while retrieving the schedule page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[async_trait]
pub trait Fetcher {
    /// Fetch the raw markup at `url`. Single attempt, no retries.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
