//! Command-line interface definitions for Manila Business News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The recency policy itself (window and staleness threshold) is fixed by
//! design and deliberately has no flags.

use clap::Parser;

/// Command-line arguments for the Manila Business News scraper.
///
/// # Examples
///
/// ```sh
/// # Basic usage
/// manila_business_news -j ./json
///
/// # Listing-only run (no per-article fallback fetches)
/// manila_business_news -j ./json --skip-article-fetch
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON news sheets
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Disable the per-article page fetch used when a listing carries no
    /// usable date signal (faster, but undated listings are dropped)
    #[arg(long)]
    pub skip_article_fetch: bool,

    /// Per-request fetch timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&["manila_business_news", "--json-output-dir", "./json"]);

        assert_eq!(cli.json_output_dir, "./json");
        assert!(!cli.skip_article_fetch);
        assert_eq!(cli.fetch_timeout_secs, 10);
    }

    #[test]
    fn test_cli_short_flags_and_switches() {
        let cli = Cli::parse_from(&[
            "manila_business_news",
            "-j",
            "/tmp/json",
            "--skip-article-fetch",
            "--fetch-timeout-secs",
            "30",
        ]);

        assert_eq!(cli.json_output_dir, "/tmp/json");
        assert!(cli.skip_article_fetch);
        assert_eq!(cli.fetch_timeout_secs, 30);
    }
}
