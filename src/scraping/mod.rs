pub mod element_query;
pub mod extract_book_details;
pub mod extract_listing;
pub mod extract_price;

pub use element_query::ElementQuery;
pub use extract_book_details::{parse_book_details, BookDetails};
pub use extract_listing::parse_listing;
pub use extract_price::{normalize, parse_price, Normalized};
