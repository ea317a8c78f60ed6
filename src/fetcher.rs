use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::HttpConfig;
use crate::config::config::MAX_RETRY_ATTEMPTS;
use crate::error::{Result, ScrapeError};

/// Source of raw page HTML.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Builds the listing URL for page `page` from a template holding `{n}`.
pub fn page_url(template: &str, page: u32) -> String {
    template.replace("{n}", &page.to_string())
}

/// `reqwest` backed fetcher with a per-request timeout and capped retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    attempts: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self {
            client,
            attempts: config.retry_attempts.clamp(1, MAX_RETRY_ATTEMPTS),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let network = |source| ScrapeError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(network)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() && attempt < self.attempts => {
                    let wait = self.backoff * 2u32.pow(attempt - 1);
                    tracing::debug!(url, attempt, wait_ms = wait.as_millis() as u64, error = %err, "retrying");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
