use scraper::{ElementRef, Selector};

use crate::error::{Result, ScrapeError};

/// Read-only view of a markup element, as needed by the page extractors.
pub trait ElementQuery: Sized {
    /// All descendants matching a CSS selector, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self>>;

    /// Concatenated text of the element and its descendants.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    fn find_first(&self, selector: &str) -> Result<Option<Self>> {
        Ok(self.find_all(selector)?.into_iter().next())
    }
}

impl<'a> ElementQuery for ElementRef<'a> {
    fn find_all(&self, selector: &str) -> Result<Vec<Self>> {
        let selector = Selector::parse(selector)
            .map_err(|e| ScrapeError::Parse(format!("invalid selector {selector:?}: {e}")))?;
        Ok(self.select(&selector).collect())
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect::<Vec<_>>().join("")
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}
