use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use anyhow::{ensure, Context, Result};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://books.toscrape.com/catalogue/page-{n}.html";
pub const DEFAULT_PAGE_COUNT: u32 = 50;
pub const DEFAULT_OUTPUT_PATH: &str = "all_books_50_pages.csv";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Upper bound on attempts per request, retries included.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scrape: ScrapeConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Listing URL with a `{n}` placeholder for the page number.
    pub base_url: String,
    pub page_count: u32,
    pub output_path: PathBuf,
    pub on_page_error: PageErrorPolicy,
    pub save_mode: SaveMode,
    pub stop_on_empty_page: bool,
    pub max_concurrency: usize,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_count: DEFAULT_PAGE_COUNT,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            on_page_error: PageErrorPolicy::Skip,
            save_mode: SaveMode::Overwrite,
            stop_on_empty_page: false,
            max_concurrency: 1,
            delay_min_ms: 500,
            delay_max_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retry_attempts: MAX_RETRY_ATTEMPTS,
            retry_backoff_ms: 2000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// What the run does when a page cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageErrorPolicy {
    Skip,
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    Overwrite,
    Append,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let scrape = &self.scrape;
        ensure!(scrape.page_count >= 1, "scrape.page_count must be at least 1");
        ensure!(
            scrape.base_url.contains("{n}"),
            "scrape.base_url must contain a {{n}} page placeholder: {}",
            scrape.base_url
        );
        ensure!(scrape.max_concurrency >= 1, "scrape.max_concurrency must be at least 1");
        ensure!(
            scrape.delay_min_ms <= scrape.delay_max_ms,
            "scrape.delay_min_ms ({}) is greater than scrape.delay_max_ms ({})",
            scrape.delay_min_ms,
            scrape.delay_max_ms
        );
        ensure!(
            (1..=MAX_RETRY_ATTEMPTS).contains(&self.http.retry_attempts),
            "http.retry_attempts must be between 1 and {}",
            MAX_RETRY_ATTEMPTS
        );
        Ok(())
    }
}

/// Loads settings from the optional TOML file, then `APP_<SECTION>__<KEY>` variables.
///
/// The result is not validated; callers apply their overrides first.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    settings
        .try_deserialize()
        .context("Failed to deserialize settings")
}
