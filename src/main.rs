//! # Manila Business News
//!
//! A scraping pipeline that collects fresh business headlines from three
//! Philippine broadsheets (Inquirer Business, BusinessMirror, and Philstar
//! Business), resolves each article's publish date from whatever signals
//! the page offers, keeps only stories from today and yesterday, and
//! exports the survivors as JSON news sheets.
//!
//! ## Features
//!
//! - Multi-strategy publish-date resolution (URL path, meta tags,
//!   structured date elements, free-text dates, relative phrases)
//! - Strict recency filtering: a {today, yesterday} window with a 7-day
//!   staleness cutoff, captured once per run
//! - Run-scoped title deduplication per source
//! - Keyword categorization and lexicon sentiment scoring
//! - JSON news sheets per source under a date-keyed directory
//!
//! ## Usage
//!
//! ```sh
//! manila_business_news -j ./json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Listing fetch**: Download each source's section listings
//! 2. **Discovery**: Pull candidate articles out of the listing markup
//! 3. **Resolution**: Derive a calendar date per article and apply the
//!    recency policy, one article at a time
//! 4. **Output**: Write one JSON news sheet per source

use chrono::Local;
use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analyze;
mod cli;
mod fetch;
mod models;
mod outputs;
mod recency;
mod resolve;
mod scrapers;
mod utils;

use cli::Cli;
use fetch::{HttpFetcher, RetryFetch};
use models::{ArticleRecord, NewsSheet};
use recency::RecencyWindow;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("manila_business_news starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, args.skip_article_fetch, args.fetch_timeout_secs, "Parsed CLI arguments");

    // Early check: ensure JSON output dir is writable
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetcher and recency window ----
    let http = HttpFetcher::new(StdDuration::from_secs(args.fetch_timeout_secs))?;
    let fetcher = RetryFetch::new(http, 3, StdDuration::from_secs(1));

    // Reference "now" is captured exactly once so the window and every
    // relative-time resolution in this run agree.
    let reference_now = Local::now();
    let window = RecencyWindow::capture(reference_now);
    let scraped_at = reference_now.format("%Y-%m-%d %H:%M:%S").to_string();
    let local_date = window.today().to_string();
    info!(
        %local_date,
        today = %window.today(),
        yesterday = %window.yesterday(),
        "Recency window captured"
    );

    // ---- Scrape each source ----
    let fetch_article_pages = !args.skip_article_fetch;

    let inquirer_articles =
        scrapers::inquirer::scrape(&fetcher, window, fetch_article_pages, &scraped_at).await;
    let businessmirror_articles =
        scrapers::businessmirror::scrape(&fetcher, window, fetch_article_pages, &scraped_at).await;
    let philstar_articles =
        scrapers::philstar::scrape(&fetcher, window, fetch_article_pages, &scraped_at).await;

    let total_admitted =
        inquirer_articles.len() + businessmirror_articles.len() + philstar_articles.len();
    info!(
        total = total_admitted,
        inquirer_count = inquirer_articles.len(),
        businessmirror_count = businessmirror_articles.len(),
        philstar_count = philstar_articles.len(),
        "Scraping completed"
    );

    // ---- Write news sheets ----
    let sheets = [
        (scrapers::inquirer::SOURCE, inquirer_articles),
        (scrapers::businessmirror::SOURCE, businessmirror_articles),
        (scrapers::philstar::SOURCE, philstar_articles),
    ];

    for (source, articles) in sheets {
        if articles.is_empty() {
            warn!(source, "No fresh articles; skipping sheet");
            continue;
        }
        log_distributions(source, &articles);

        let sheet = NewsSheet {
            source: source.to_string(),
            local_date: local_date.clone(),
            scraped_at: scraped_at.clone(),
            articles,
        };
        if let Err(e) = outputs::json::write_news_sheet(&sheet, &args.json_output_dir).await {
            error!(source, error = %e, "Failed to write news sheet");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Log per-source category and sentiment distributions.
fn log_distributions(source: &str, articles: &[ArticleRecord]) {
    let categories = articles
        .iter()
        .map(|article| article.category.as_str())
        .counts();
    let sentiments = articles
        .iter()
        .map(|article| article.sentiment_label.as_str())
        .counts();

    info!(
        source,
        articles = articles.len(),
        categories = categories.len(),
        positive = sentiments.get("Positive").copied().unwrap_or(0),
        negative = sentiments.get("Negative").copied().unwrap_or(0),
        neutral = sentiments.get("Neutral").copied().unwrap_or(0),
        "Source summary"
    );
    for (category, count) in categories.iter().sorted_by_key(|(_, count)| std::cmp::Reverse(**count)) {
        debug!(source, category = %category, count = *count, "Category count");
    }
}
