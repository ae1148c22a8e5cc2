use thiserror::Error;

use crate::config::ConfigError;
use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum MatchcastError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Content region not found (selector: {0})")]
    ContentNotFound(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("A refresh is already in progress")]
    RefreshInProgress,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MatchcastError>;
