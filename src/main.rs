use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use books_scrape::cli::Cli;
use books_scrape::config::load_config;
use books_scrape::orchestrator::{error_chain, RunReport};
use books_scrape::{HttpFetcher, Scraper};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{} {err:#}", "error:".red().bold());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    books_scrape::logging::init()?;

    let cli = Cli::parse();

    // Load configuration settings
    let mut config = load_config(&cli.config)?;
    cli.apply(&mut config);
    config.validate()?;
    tracing::debug!(?config, "loaded configuration");

    let fetcher = HttpFetcher::new(&config.http).context("Failed to build HTTP client")?;
    let scraper = Scraper::new(config.scrape, fetcher);

    let report = scraper.run().await.context("Scrape failed")?;
    print_summary(&report);

    if cli.details > 0 {
        for (url, details) in scraper.fetch_details(&report.detail_urls, cli.details).await {
            match details {
                Ok(details) => {
                    println!("\n{}", details.title.bold());
                    println!("  url: {url}");
                    if let Some(price) = &details.price {
                        println!("  price: {price}");
                    }
                    if let Some(availability) = &details.availability {
                        println!("  availability: {availability}");
                    }
                    if let Some(rating) = details.rating {
                        println!("  rating: {rating}/5");
                    }
                    for (key, value) in &details.product_information {
                        println!("  {key}: {value}");
                    }
                    if let Some(description) = &details.description {
                        let short: String = description.chars().take(100).collect();
                        println!("  description: {short}...");
                    }
                }
                Err(err) => println!("{} {url}: {}", "failed".red(), error_chain(&err)),
            }
        }
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "{}",
        format!(
            "Scraped {} of {} pages",
            report.pages_succeeded, report.pages_attempted
        )
        .green()
    );
    println!("{}", report.table.summary());

    if let Some(path) = &report.saved_to {
        println!("Saved to {}", path.display().to_string().bold());
    }

    if !report.failed_pages.is_empty() {
        println!(
            "{}",
            format!("{} page(s) skipped:", report.failed_pages.len()).yellow()
        );
        for failure in &report.failed_pages {
            println!("  page {} ({}): {}", failure.page, failure.url, failure.reason);
        }
    }

    if !report.unpriced.is_empty() {
        println!(
            "{}",
            format!("{} record(s) kept without numeric price:", report.unpriced.len()).yellow()
        );
        for record in &report.unpriced {
            println!("  page {}: {} ({:?})", record.page, record.title, record.raw_price);
        }
    }
}
