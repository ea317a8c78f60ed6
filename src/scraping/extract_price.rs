use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::{Result, ScrapeError};
use crate::record::{BookRecord, PartialRecord};

fn price_regex() -> &'static Regex {
    static PRICE: OnceLock<Regex> = OnceLock::new();
    PRICE.get_or_init(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("price pattern is valid"))
}

/// Parses the first decimal number of a price such as `£51.77` or `Â£1,024.00`.
///
/// Currency symbols, mojibake and whitespace are ignored, so the result never
/// carries a sign.
pub fn parse_price(raw_price: &str) -> Result<f64> {
    let digits = price_regex()
        .find(raw_price)
        .ok_or_else(|| ScrapeError::PriceFormat(raw_price.to_string()))?
        .as_str()
        .replace(',', "");

    digits
        .parse::<f64>()
        .map_err(|_| ScrapeError::PriceFormat(raw_price.to_string()))
}

/// A normalized record; `price_error` is set when the price was left empty.
#[derive(Debug)]
pub struct Normalized {
    pub record: BookRecord,
    pub price_error: Option<ScrapeError>,
}

/// Converts an extracted entry into a table row stamped with `scraped_at`.
///
/// Unparsable prices keep the row with an empty numeric price.
pub fn normalize(partial: PartialRecord, scraped_at: DateTime<Utc>) -> Normalized {
    let (numeric_price, price_error) = match parse_price(&partial.raw_price) {
        Ok(value) => (Some(value), None),
        Err(err) => (None, Some(err)),
    };

    Normalized {
        record: BookRecord {
            title: partial.title,
            raw_price: partial.raw_price,
            numeric_price,
            scraped_at,
        },
        price_error,
    }
}
