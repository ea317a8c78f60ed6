use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Failures raised while fetching, parsing, normalizing or persisting books.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network error while fetching {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("unexpected page markup: {0}")]
    Parse(String),

    #[error("no numeric value in price {0:?}")]
    PriceFormat(String),

    #[error("{path}: {message}")]
    FileFormat { path: PathBuf, message: String },

    #[error("no page could be scraped ({failed} failed)")]
    AllPagesFailed { failed: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Whether a new attempt at the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Network { .. } => true,
            ScrapeError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
