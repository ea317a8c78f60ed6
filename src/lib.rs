#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod orchestrator;
pub mod record;
pub mod saver;
pub mod scraping;
pub mod utilities;

pub use error::{Result, ScrapeError};
pub use fetcher::{Fetch, HttpFetcher};
pub use orchestrator::{RunReport, Scraper};
pub use record::{BookRecord, BookTable, PartialRecord};
