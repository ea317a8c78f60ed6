use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names of the CSV output, in order.
pub const COLUMNS: [&str; 4] = ["Title", "Price", "Price_Numeric", "Scraped_At"];

/// A book summary as it appears on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub title: String,
    pub raw_price: String,
    /// `href` of the title link, relative to the listing page.
    pub detail_url: String,
}

/// One row of the output table.
///
/// `scraped_at` is taken once at the start of a run and shared by all its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub raw_price: String,
    #[serde(rename = "Price_Numeric")]
    pub numeric_price: Option<f64>,
    #[serde(rename = "Scraped_At")]
    pub scraped_at: DateTime<Utc>,
}

/// Rows in page-then-position order. Duplicates are kept as scraped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookTable {
    records: Vec<BookRecord>,
}

impl BookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BookRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BookRecord> {
        self.records.iter()
    }

    pub fn summary(&self) -> TableSummary {
        let prices: Vec<f64> = self.iter().filter_map(|r| r.numeric_price).collect();
        let fold = |init: f64, f: fn(f64, f64) -> f64| {
            if prices.is_empty() {
                None
            } else {
                Some(prices.iter().copied().fold(init, f))
            }
        };

        TableSummary {
            total: self.len(),
            priced: prices.len(),
            unpriced: self.len() - prices.len(),
            min_price: fold(f64::INFINITY, f64::min),
            max_price: fold(f64::NEG_INFINITY, f64::max),
            mean_price: fold(0.0, |acc, p| acc + p).map(|sum| sum / prices.len() as f64),
        }
    }
}

impl From<Vec<BookRecord>> for BookTable {
    fn from(records: Vec<BookRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<BookRecord> for BookTable {
    fn from_iter<I: IntoIterator<Item = BookRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<BookRecord> for BookTable {
    fn extend<I: IntoIterator<Item = BookRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl IntoIterator for BookTable {
    type Item = BookRecord;
    type IntoIter = std::vec::IntoIter<BookRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a BookTable {
    type Item = &'a BookRecord;
    type IntoIter = std::slice::Iter<'a, BookRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Row counts and price statistics of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub total: usize,
    pub priced: usize,
    pub unpriced: usize,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub mean_price: Option<f64>,
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({} priced, {} without numeric price)",
            self.total, self.priced, self.unpriced
        )?;
        if let (Some(min), Some(max), Some(mean)) = (self.min_price, self.max_price, self.mean_price) {
            write!(f, ", price min {min:.2} / mean {mean:.2} / max {max:.2}")?;
        }
        Ok(())
    }
}
