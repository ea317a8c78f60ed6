use scraper::Html;

use crate::error::{Result, ScrapeError};
use crate::record::PartialRecord;
use crate::scraping::element_query::ElementQuery;

const LISTING_CONTAINER: &str = "ol.row";
const BOOK_ENTRY: &str = "article.product_pod";

/// Extracts every book summary of a listing page, in page order.
pub fn parse_listing(html_content: &str) -> Result<Vec<PartialRecord>> {
    let document = Html::parse_document(html_content);
    extract_entries(&document.root_element())
}

/// Listing extraction over any markup backend.
pub fn extract_entries<E: ElementQuery>(root: &E) -> Result<Vec<PartialRecord>> {
    let entries = root.find_all(BOOK_ENTRY)?;

    // An empty page is only valid when the listing container is still there.
    if entries.is_empty() && root.find_first(LISTING_CONTAINER)?.is_none() {
        return Err(ScrapeError::Parse(format!(
            "neither {LISTING_CONTAINER:?} nor {BOOK_ENTRY:?} found on listing page"
        )));
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| extract_entry(entry, index + 1))
        .collect()
}

fn extract_entry<E: ElementQuery>(entry: &E, position: usize) -> Result<PartialRecord> {
    let missing = |what: &str| ScrapeError::Parse(format!("book #{position} on page has no {what}"));

    let link = entry.find_first("h3 a")?.ok_or_else(|| missing("title link"))?;

    // The anchor text is truncated on long titles, the attribute is not.
    let title = link
        .attr("title")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| link.text().trim().to_string());
    if title.is_empty() {
        return Err(missing("title"));
    }

    let raw_price = entry
        .find_first("p.price_color")?
        .ok_or_else(|| missing("price element"))?
        .text()
        .trim()
        .to_string();
    if raw_price.is_empty() {
        return Err(missing("price text"));
    }

    let detail_url = link.attr("href").unwrap_or_default();

    Ok(PartialRecord {
        title,
        raw_price,
        detail_url,
    })
}
