use std::error::Error as _;
use std::path::PathBuf;
use std::pin::pin;

use chrono::{DateTime, SubsecRound, Utc};
use futures::stream::{self, StreamExt};
use url::Url;

use crate::config::{PageErrorPolicy, ScrapeConfig};
use crate::error::{Result, ScrapeError};
use crate::fetcher::{page_url, Fetch};
use crate::record::{BookTable, PartialRecord};
use crate::saver;
use crate::scraping::{normalize, parse_book_details, parse_listing, BookDetails};
use crate::utilities::generate_random_delay::generate_random_delay;

/// A listing page that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub url: String,
    pub reason: String,
}

/// A row kept without a numeric price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpricedRecord {
    pub page: u32,
    pub title: String,
    pub raw_price: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub table: BookTable,
    pub scraped_at: DateTime<Utc>,
    pub pages_attempted: u32,
    pub pages_succeeded: u32,
    pub failed_pages: Vec<PageFailure>,
    pub unpriced: Vec<UnpricedRecord>,
    /// Absolute detail page links, in table order.
    pub detail_urls: Vec<Url>,
    pub saved_to: Option<PathBuf>,
}

impl RunReport {
    fn new(scraped_at: DateTime<Utc>) -> Self {
        Self {
            table: BookTable::new(),
            scraped_at,
            pages_attempted: 0,
            pages_succeeded: 0,
            failed_pages: Vec::new(),
            unpriced: Vec::new(),
            detail_urls: Vec::new(),
            saved_to: None,
        }
    }

    pub fn failed_page_numbers(&self) -> Vec<u32> {
        self.failed_pages.iter().map(|f| f.page).collect()
    }
}

/// Drives pagination: fetch, parse and normalize every listing page, then save.
pub struct Scraper<F> {
    config: ScrapeConfig,
    fetcher: F,
}

impl<F: Fetch> Scraper<F> {
    pub fn new(config: ScrapeConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrapes every page and writes the table once. Fails when no page could be scraped.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = self.scrape().await?;

        if report.pages_succeeded == 0 {
            return Err(ScrapeError::AllPagesFailed {
                failed: report.failed_pages.len(),
            });
        }

        saver::save(&report.table, &self.config.output_path, self.config.save_mode)?;
        report.saved_to = Some(self.config.output_path.clone());

        Ok(report)
    }

    /// Scrapes pages `1..=page_count` without saving.
    ///
    /// Pages may be fetched concurrently up to `max_concurrency`, but are
    /// consumed in page order. The politeness delay is taken before each
    /// page is queued, so requests start spaced out at any concurrency.
    pub async fn scrape(&self) -> Result<RunReport> {
        let mut report = RunReport::new(Utc::now().trunc_subsecs(0));

        let mut pages = pin!(stream::iter(1..=self.config.page_count)
            .then(|page| async move {
                if page > 1 {
                    generate_random_delay(self.config.delay_min_ms, self.config.delay_max_ms).await;
                }
                page
            })
            .map(|page| async move { (page, self.scrape_page(page).await) })
            .buffered(self.config.max_concurrency.max(1)));

        while let Some((page, outcome)) = pages.next().await {
            report.pages_attempted += 1;

            let (url, entries) = match outcome {
                Ok(scraped) => scraped,
                Err(err) => match self.config.on_page_error {
                    PageErrorPolicy::Abort => {
                        tracing::error!(page, error = %error_chain(&err), "aborting run");
                        return Err(err);
                    }
                    PageErrorPolicy::Skip => {
                        let reason = error_chain(&err);
                        tracing::warn!(page, %reason, "skipping page");
                        report.failed_pages.push(PageFailure {
                            page,
                            url: page_url(&self.config.base_url, page),
                            reason,
                        });
                        continue;
                    }
                },
            };

            report.pages_succeeded += 1;
            tracing::info!(page, books = entries.len(), "scraped page");

            if entries.is_empty() && self.config.stop_on_empty_page {
                tracing::info!(page, "empty listing page, stopping");
                break;
            }

            self.collect_entries(&mut report, page, &url, entries);
        }

        Ok(report)
    }

    async fn scrape_page(&self, page: u32) -> Result<(String, Vec<PartialRecord>)> {
        let url = page_url(&self.config.base_url, page);
        let html = self.fetcher.fetch(&url).await?;
        let entries = parse_listing(&html)?;

        Ok((url, entries))
    }

    fn collect_entries(
        &self,
        report: &mut RunReport,
        page: u32,
        page_url: &str,
        entries: Vec<PartialRecord>,
    ) {
        let base = Url::parse(page_url).ok();

        for entry in entries {
            match base.as_ref().map(|base| base.join(&entry.detail_url)) {
                Some(Ok(link)) => report.detail_urls.push(link),
                _ => tracing::debug!(page, href = %entry.detail_url, "unresolvable detail link"),
            }

            let normalized = normalize(entry, report.scraped_at);
            if let Some(err) = normalized.price_error {
                tracing::warn!(page, title = %normalized.record.title, error = %err, "keeping record without numeric price");
                report.unpriced.push(UnpricedRecord {
                    page,
                    title: normalized.record.title.clone(),
                    raw_price: normalized.record.raw_price.clone(),
                });
            }
            report.table.push(normalized.record);
        }
    }

    /// Fetches and parses up to `limit` book detail pages, one at a time.
    pub async fn fetch_details(&self, urls: &[Url], limit: usize) -> Vec<(Url, Result<BookDetails>)> {
        let mut details = Vec::new();

        for (index, url) in urls.iter().take(limit).enumerate() {
            if index > 0 {
                generate_random_delay(self.config.delay_min_ms, self.config.delay_max_ms).await;
            }

            let parsed = match self.fetcher.fetch(url.as_str()).await {
                Ok(html) => parse_book_details(&html),
                Err(err) => Err(err),
            };
            if let Err(err) = &parsed {
                tracing::warn!(url = %url, error = %error_chain(err), "book details unavailable");
            }
            details.push((url.clone(), parsed));
        }

        details
    }
}

/// Renders an error followed by its sources.
pub fn error_chain(err: &ScrapeError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
