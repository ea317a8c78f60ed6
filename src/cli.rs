use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, SaveMode};

/// Scrape the books.toscrape.com listing into a CSV table.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Settings file; missing files fall back to built-in defaults.
    #[arg(long, default_value = "Settings.toml")]
    pub config: PathBuf,

    /// Number of listing pages to scrape.
    #[arg(long)]
    pub pages: Option<u32>,

    /// Output CSV path.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of replacing it.
    #[arg(long)]
    pub append: bool,

    /// Print the detail page of the first N books after the run.
    #[arg(long, default_value_t = 0)]
    pub details: usize,
}

impl Cli {
    /// Applies command line overrides on top of the loaded settings.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(pages) = self.pages {
            config.scrape.page_count = pages;
        }
        if let Some(output) = &self.output {
            config.scrape.output_path = output.clone();
        }
        if self.append {
            config.scrape.save_mode = SaveMode::Append;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_without_flags() {
        let cli = Cli::try_parse_from(["books_scrape"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.config, PathBuf::from("Settings.toml"));
        assert_eq!(cli.details, 0);
        assert_eq!(config.scrape.page_count, 50);
        assert_eq!(config.scrape.save_mode, SaveMode::Overwrite);
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "books_scrape",
            "--pages",
            "3",
            "--output",
            "out.csv",
            "--append",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.scrape.page_count, 3);
        assert_eq!(config.scrape.output_path, PathBuf::from("out.csv"));
        assert_eq!(config.scrape.save_mode, SaveMode::Append);
    }
}
