//! Site scrapers for the Philippine business-news sources.
//!
//! Each scraper follows a consistent pattern:
//!
//! 1. **Listing fetch**: Download the source's section listing pages
//! 2. **Discovery**: Pull candidate articles out of the listing markup
//! 3. **Resolution**: Run every candidate through the shared
//!    [`ArticleResolver`](crate::resolve::ArticleResolver) (date signal,
//!    recency verdict, title dedup), one article at a time
//!
//! # Supported Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Inquirer Business | [`inquirer`] | Homepage + latest-stories category listings |
//! | BusinessMirror | [`businessmirror`] | Article-element listings; section-name categories |
//! | Philstar Business | [`philstar`] | Paged section listings; relative timestamps |
//!
//! Scrapers share no state with each other: each builds its own resolver,
//! so title dedup is per-source and per-run.
//!
//! Section listing pages are fetched concurrently; failed sections are
//! logged and skipped without failing the source.

pub mod businessmirror;
pub mod inquirer;
pub mod philstar;

use crate::analyze;
use crate::fetch::PageFetch;
use crate::models::{ArticleCandidate, ArticleRecord};
use crate::utils::clean_whitespace;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::{error, warn};
use url::Url;

/// How many section listings to download at once.
const LISTING_FETCH_CONCURRENCY: usize = 4;

/// Hosts and schemes that are never article links.
const JUNK_LINK_MARKERS: &[&str] = &[
    "javascript:",
    "mailto:",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "youtube.com",
    "intent/tweet",
    "dialog/feed",
];

static DESCRIPTION_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        ".excerpt",
        ".summary",
        ".description",
        ".lead",
        ".entry-content",
        ".post-excerpt",
        "p",
    ]
    .into_iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect()
});

static AUTHOR_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [".author", ".byline", r#"[rel="author"]"#, ".writer", ".post-author"]
        .into_iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});

/// Fetch a set of listing pages concurrently.
///
/// Returns `(url, body)` pairs for the pages that came back; failures are
/// logged and skipped so one blocked section never sinks the source.
pub(crate) async fn fetch_listings<F: PageFetch>(
    fetcher: &F,
    urls: &[String],
) -> Vec<(String, String)> {
    stream::iter(urls.iter().cloned())
        .map(|url| async move {
            match fetcher.fetch(&url).await {
                Ok(page) => Some((url, page.body)),
                Err(e) => {
                    error!(%url, error = %e, "Listing fetch failed; skipping section");
                    None
                }
            }
        })
        .buffer_unordered(LISTING_FETCH_CONCURRENCY)
        .filter_map(std::future::ready)
        .collect()
        .await
}

/// Resolve an href into an absolute http(s) URL against the site base.
pub(crate) fn absolute_url(base: &Url, href: &str) -> Option<String> {
    if is_junk_link(href) {
        return None;
    }
    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// Whether an href points somewhere that cannot be an article.
pub(crate) fn is_junk_link(href: &str) -> bool {
    if href.is_empty() || href == "#" {
        return true;
    }
    let lower = href.to_lowercase();
    JUNK_LINK_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Walk up from an anchor to the listing entry that contains it.
///
/// Listing markup nests the anchor a few levels below the element carrying
/// the snippet and byline, so climb a bounded number of parents.
pub(crate) fn listing_entry<'a>(anchor: ElementRef<'a>, levels: usize) -> ElementRef<'a> {
    let mut entry = anchor;
    for _ in 0..levels {
        match entry.parent().and_then(ElementRef::wrap) {
            Some(parent) => entry = parent,
            None => break,
        }
    }
    entry
}

/// Pull a plausible snippet out of a listing entry.
///
/// Tries the description selectors in order; accepts text between 20 and
/// 300 characters and truncates to 200 with an ellipsis.
pub(crate) fn extract_description(entry: ElementRef<'_>) -> Option<String> {
    for selector in DESCRIPTION_SELECTORS.iter() {
        let Some(element) = entry.select(selector).next() else {
            continue;
        };
        let text = clean_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        if text.len() > 20 && text.len() < 300 {
            return Some(truncate_description(&text));
        }
    }
    None
}

fn truncate_description(text: &str) -> String {
    if text.len() > 200 {
        let cut = (0..=200).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &text[..cut])
    } else {
        text.to_string()
    }
}

/// Pull a byline out of a listing entry, if one is marked up.
pub(crate) fn extract_author(entry: ElementRef<'_>) -> Option<String> {
    for selector in AUTHOR_SELECTORS.iter() {
        let Some(element) = entry.select(selector).next() else {
            continue;
        };
        let text = clean_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

/// Titles that mean the site served an error shell instead of an article.
pub(crate) fn looks_like_error_page(title: &str) -> bool {
    const ERROR_MARKERS: &[&str] = &[
        "JavaScript is not available",
        "JavaScript is disabled",
        "Error 404",
        "Page not found",
    ];
    ERROR_MARKERS.iter().any(|marker| title.contains(marker))
}

/// Build the export record for an admitted candidate.
pub(crate) fn build_record(
    candidate: &ArticleCandidate,
    date: NaiveDate,
    default_author: &str,
    category: Option<String>,
    scraped_at: &str,
) -> ArticleRecord {
    let description = candidate.description.clone().unwrap_or_default();
    let category = category
        .unwrap_or_else(|| analyze::categorize(&candidate.title, &description));
    let sentiment = analyze::sentiment(&format!("{} {}", candidate.title, description));

    ArticleRecord {
        title: candidate.title.clone(),
        category,
        description: if description.is_empty() {
            "No description available".to_string()
        } else {
            description
        },
        link: candidate.url.clone(),
        author: candidate
            .author
            .clone()
            .unwrap_or_else(|| default_author.to_string()),
        published_date: date,
        sentiment_score: sentiment.score,
        sentiment_label: sentiment.label.to_string(),
        emotion: sentiment.emotion.to_string(),
        scraped_at: scraped_at.to_string(),
    }
}

/// Log a source's run totals in one place.
pub(crate) fn log_source_totals(source: &str, discovered: usize, admitted: usize) {
    if discovered == 0 {
        warn!(source, "No candidates discovered; selectors may be stale");
    }
    tracing::info!(source, discovered, admitted, "Source scrape complete");
}
