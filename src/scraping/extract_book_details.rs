use scraper::Html;

use crate::error::{Result, ScrapeError};
use crate::scraping::element_query::ElementQuery;

const RATINGS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

/// Fields of a single book's detail page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDetails {
    pub title: String,
    pub price: Option<String>,
    pub availability: Option<String>,
    /// Rows of the "Product Information" table (UPC, Product Type, Tax, ...).
    pub product_information: Vec<(String, String)>,
    pub description: Option<String>,
    /// Star rating from 1 to 5.
    pub rating: Option<u8>,
}

impl BookDetails {
    pub fn information(&self, key: &str) -> Option<&str> {
        self.product_information
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub fn parse_book_details(html_content: &str) -> Result<BookDetails> {
    let document = Html::parse_document(html_content);
    extract_details(&document.root_element())
}

pub fn extract_details<E: ElementQuery>(root: &E) -> Result<BookDetails> {
    let title = root
        .find_first("h1")?
        .map(|h1| h1.text().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ScrapeError::Parse("book detail page has no <h1> title".to_string()))?;

    let price = first_text(root, "p.price_color")?;
    let availability = first_text(root, "p.instock.availability")?
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "));
    let description = first_text(root, "#product_description + p")?;

    let mut product_information = Vec::new();
    for row in root.find_all("table.table-striped tr")? {
        if let (Some(header), Some(data)) = (row.find_first("th")?, row.find_first("td")?) {
            product_information.push((header.text().trim().to_string(), data.text().trim().to_string()));
        }
    }

    let rating = root
        .find_first("p.star-rating")?
        .and_then(|p| p.attr("class"))
        .and_then(|classes| {
            classes
                .split_whitespace()
                .find_map(|class| RATINGS.iter().position(|word| *word == class))
        })
        .map(|index| index as u8 + 1);

    Ok(BookDetails {
        title,
        price,
        availability,
        product_information,
        description,
        rating,
    })
}

fn first_text<E: ElementQuery>(root: &E, selector: &str) -> Result<Option<String>> {
    Ok(root
        .find_first(selector)?
        .map(|element| element.text().trim().to_string())
        .filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"<html><body>
<article class="product_page">
  <div class="row">
    <div class="col-sm-6 product_main">
      <h1>A Light in the Attic</h1>
      <p class="price_color">£51.77</p>
      <p class="instock availability">
        <i class="icon-ok"></i>
          In stock (22 available)
      </p>
      <p class="star-rating Three">
        <i class="icon-star"></i>
      </p>
    </div>
  </div>
  <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
  <p>It's hard to imagine a world without A Light in the Attic.</p>
  <div class="sub-header"><h2>Product Information</h2></div>
  <table class="table table-striped">
    <tr><th>UPC</th><td>a897fe39b1053632</td></tr>
    <tr><th>Product Type</th><td>Books</td></tr>
    <tr><th>Number of reviews</th><td>0</td></tr>
  </table>
</article>
</body></html>"#;

    #[test]
    fn extracts_detail_fields() {
        let details = parse_book_details(DETAIL_PAGE).unwrap();
        assert_eq!(details.title, "A Light in the Attic");
        assert_eq!(details.price.as_deref(), Some("£51.77"));
        assert_eq!(details.availability.as_deref(), Some("In stock (22 available)"));
        assert_eq!(details.rating, Some(3));
        assert_eq!(
            details.description.as_deref(),
            Some("It's hard to imagine a world without A Light in the Attic.")
        );
        assert_eq!(details.product_information.len(), 3);
        assert_eq!(details.information("UPC"), Some("a897fe39b1053632"));
        assert_eq!(details.information("Tax"), None);
    }

    #[test]
    fn page_without_title_is_rejected() {
        let err = parse_book_details("<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }
}
