#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use books_scrape::config::{HttpConfig, ScrapeConfig};

pub fn book_entry(title: &str, price: &str, href: &str) -> String {
    format!(
        r#"<li class="col-xs-6 col-sm-4 col-md-3 col-lg-3">
  <article class="product_pod">
    <div class="image_container"><a href="{href}"><img src="../media/cache/x.jpg" alt="{title}" class="thumbnail"></a></div>
    <p class="star-rating Two"><i class="icon-star"></i></p>
    <h3><a href="{href}" title="{title}">{title}</a></h3>
    <div class="product_price">
      <p class="price_color">{price}</p>
      <p class="instock availability"><i class="icon-ok"></i> In stock</p>
    </div>
  </article>
</li>"#
    )
}

/// A listing page shaped like books.toscrape.com, with `count` books.
pub fn listing_page(page: u32, count: usize) -> String {
    let entries: String = (1..=count)
        .map(|i| {
            book_entry(
                &format!("Book {page}-{i}"),
                &format!("£{}.{:02}", 10 + i, page),
                &format!("book-{page}-{i}_{i}/index.html"),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en-us"><head><title>All products | Books to Scrape - Sandbox</title></head>
<body><div class="page_inner"><div class="page-header action"><h1>All products</h1></div>
<section><div></div><div><ol class="row">{entries}</ol></div></section>
</div></body></html>"#
    )
}

pub fn detail_page(title: &str) -> String {
    format!(
        r#"<html><body><article class="product_page">
<div class="col-sm-6 product_main"><h1>{title}</h1><p class="price_color">£11.01</p>
<p class="instock availability"><i class="icon-ok"></i> In stock (19 available) </p>
<p class="star-rating Four"></p></div>
<div id="product_description" class="sub-header"><h2>Product Description</h2></div>
<p>A synthetic description.</p>
<table class="table table-striped"><tr><th>UPC</th><td>abc123</td></tr></table>
</article></body></html>"#
    )
}

/// Serves fixed responses by path; unknown paths answer 404.
pub fn spawn_site(routes: HashMap<String, (u16, String)>) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());
    let routes = Arc::new(routes);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let (status, body) = routes
                .get(request.url())
                .cloned()
                .unwrap_or((404, "<html><body><h1>Not Found</h1></body></html>".to_string()));

            let header = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"text/html; charset=utf-8"[..],
            )
            .expect("valid header");
            let _ = request.respond(
                tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header),
            );
        }
    });

    base_url
}

/// Answers every request with the next status of `statuses`, repeating the
/// last one, and counts the requests received.
pub fn spawn_sequence(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let index = counter.fetch_add(1, Ordering::SeqCst);
            let status = statuses[index.min(statuses.len() - 1)];
            let body = if status == 200 { listing_page(1, 1) } else { String::new() };
            let _ = request.respond(tiny_http::Response::from_string(body).with_status_code(status));
        }
    });

    (base_url, hits)
}

pub fn scrape_config(base_url: &str, page_count: u32, output_path: &std::path::Path) -> ScrapeConfig {
    ScrapeConfig {
        base_url: format!("{base_url}/catalogue/page-{{n}}.html"),
        page_count,
        output_path: output_path.to_path_buf(),
        delay_min_ms: 0,
        delay_max_ms: 0,
        ..ScrapeConfig::default()
    }
}

pub fn http_config() -> HttpConfig {
    HttpConfig {
        timeout_secs: 5,
        retry_attempts: 1,
        retry_backoff_ms: 0,
        ..HttpConfig::default()
    }
}
