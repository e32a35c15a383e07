//! Inquirer Business listing scraper.
//!
//! Scrapes the Inquirer Business homepage and its latest-stories category
//! listings. Inquirer markup shifts between template revisions, so article
//! links are located with an ordered selector fallback list; the first
//! selector that yields usable candidates wins for that page.

use super::{
    absolute_url, build_record, extract_author, extract_description, fetch_listings,
    is_junk_link, listing_entry, log_source_totals,
};
use crate::fetch::PageFetch;
use crate::models::{ArticleCandidate, ArticleRecord};
use crate::recency::RecencyWindow;
use crate::resolve::ArticleResolver;
use crate::utils::clean_whitespace;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

pub const SOURCE: &str = "inquirer";

const SECTION_URLS: &[&str] = &[
    "https://business.inquirer.net/",
    "https://business.inquirer.net/category/latest-stories",
    "https://business.inquirer.net/property",
    "https://business.inquirer.net/category/latest-stories/industries",
    "https://business.inquirer.net/category/latest-stories/consumer-retail",
    "https://business.inquirer.net/category/latest-stories/tourism-and-transportation",
    "https://business.inquirer.net/category/latest-stories/economy",
    "https://business.inquirer.net/category/latest-stories/communications",
    "https://business.inquirer.net/category/latest-stories/movements",
];

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://business.inquirer.net/").unwrap());

/// Link selectors in fallback order; the first that yields candidates wins.
static LINK_SELECTORS: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        r#"a[href*="/business/"]"#,
        "h2 a",
        "h3 a",
        "h4 a",
        ".entry-title a",
        ".post-title a",
        "article a",
        ".headline a",
        ".title a",
    ]
    .into_iter()
    .map(|css| (Selector::parse(css).unwrap(), css))
    .collect()
});

/// Scrape Inquirer Business and return the run's admitted articles.
///
/// Section listings are fetched up front; candidates are then resolved one
/// at a time through a source-scoped [`ArticleResolver`]. When
/// `fetch_article_pages` is false the remote-fetch fallback is disabled and
/// only listing-side date signals are used.
#[instrument(level = "info", skip_all)]
pub async fn scrape<F: PageFetch>(
    fetcher: &F,
    window: RecencyWindow,
    fetch_article_pages: bool,
    scraped_at: &str,
) -> Vec<ArticleRecord> {
    let urls: Vec<String> = SECTION_URLS.iter().map(|s| s.to_string()).collect();
    let listings = fetch_listings(fetcher, &urls).await;

    let mut resolver = ArticleResolver::new(window, fetch_article_pages.then_some(fetcher));
    let mut records = Vec::new();
    let mut discovered_total = 0usize;

    for (section_url, body) in &listings {
        let doc = Html::parse_document(body);
        let found = discover(&doc);
        discovered_total += found.len();
        debug!(%section_url, count = found.len(), "Discovered Inquirer candidates");

        for (title, url, entry) in found {
            let candidate = ArticleCandidate {
                source: SOURCE.to_string(),
                title,
                url,
                description: extract_description(entry),
                author: extract_author(entry),
            };
            if let Some(date) = resolver.admit(&candidate, Some(entry)).await {
                records.push(build_record(&candidate, date, "Inquirer", None, scraped_at));
            }
        }
    }

    log_source_totals(SOURCE, discovered_total, resolver.admitted());
    records
}

/// Pull `(title, url, entry)` candidates out of one listing page.
fn discover(doc: &Html) -> Vec<(String, String, ElementRef<'_>)> {
    for (selector, css) in LINK_SELECTORS.iter() {
        let mut found = Vec::new();
        for anchor in doc.select(selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if is_junk_link(href) {
                continue;
            }
            let lower = href.to_lowercase();
            if !(lower.contains("business") || lower.contains("inquirer.net") || href.starts_with('/'))
            {
                continue;
            }

            let title = clean_whitespace(&anchor.text().collect::<Vec<_>>().join(" "));
            if title.len() <= 10 {
                continue;
            }
            let Some(url) = absolute_url(&BASE, href) else {
                continue;
            };
            found.push((title, url, listing_entry(anchor, 2)));
        }

        let found: Vec<_> = found
            .into_iter()
            .unique_by(|(title, _, _)| title.clone())
            .collect();
        if !found.is_empty() {
            debug!(selector = css, count = found.len(), "Inquirer selector matched");
            return found;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, FetchedPage};
    use chrono::{Local, NaiveDate, TimeZone};
    use reqwest::StatusCode;

    const LISTING: &str = r#"<html><body>
        <div class="item">
            <h2><a href="https://business.inquirer.net/2025/08/12/psei-rallies-anew">PSEi rallies anew on strong earnings</a></h2>
            <p class="excerpt">The benchmark index climbed for a third straight session as banks reported record income.</p>
        </div>
        <div class="item">
            <h2><a href="https://business.inquirer.net/2025/06/01/old-feature-story">A long look back at an old feature</a></h2>
        </div>
        <div class="item">
            <h2><a href="https://twitter.com/intent/tweet?url=x">Share this story with friends</a></h2>
        </div>
        <div class="item">
            <h2><a href="/2025/08/12/peso-firms-up-vs-dollar">Peso firms up against the dollar</a></h2>
        </div>
        <div class="item">
            <h2><a href="/short">Short</a></h2>
        </div>
    </body></html>"#;

    struct StubFetcher;

    impl PageFetch for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            Ok(FetchedPage {
                status: StatusCode::OK,
                body: LISTING.to_string(),
            })
        }
    }

    struct FailingFetcher;

    impl PageFetch for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            Err(FetchError::Status(StatusCode::FORBIDDEN))
        }
    }

    #[test]
    fn test_discover_filters_and_resolves() {
        let doc = Html::parse_document(LISTING);
        let found = discover(&doc);

        let urls: Vec<&str> = found.iter().map(|(_, url, _)| url.as_str()).collect();
        assert!(urls.contains(&"https://business.inquirer.net/2025/08/12/psei-rallies-anew"));
        assert!(urls.contains(&"https://business.inquirer.net/2025/08/12/peso-firms-up-vs-dollar"));
        // Social share link and short title are filtered out.
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn test_scrape_admits_only_fresh_and_dedups_across_sections() {
        // Reference date matches the fresh listings' URL dates.
        let window =
            RecencyWindow::capture(Local.with_ymd_and_hms(2025, 8, 12, 9, 0, 0).unwrap());

        // The stub serves the same listing for every section URL, so each
        // article is discovered many times; dedup admits each once.
        let records = scrape(&StubFetcher, window, false, "2025-08-12 09:00:00").await;

        assert_eq!(records.len(), 2);
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert!(titles.contains(&"PSEi rallies anew on strong earnings"));
        assert!(titles.contains(&"Peso firms up against the dollar"));
        for record in &records {
            assert_eq!(
                record.published_date,
                NaiveDate::from_ymd_opt(2025, 8, 12).unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_scrape_survives_total_fetch_failure() {
        let window =
            RecencyWindow::capture(Local.with_ymd_and_hms(2025, 8, 12, 9, 0, 0).unwrap());
        let records = scrape(&FailingFetcher, window, false, "2025-08-12 09:00:00").await;
        assert!(records.is_empty());
    }

    #[test]
    fn test_discover_description_context() {
        let doc = Html::parse_document(LISTING);
        let found = discover(&doc);
        let (_, _, entry) = found
            .iter()
            .find(|(title, _, _)| title.starts_with("PSEi"))
            .unwrap();
        let description = extract_description(*entry).unwrap();
        assert!(description.contains("benchmark index"));
    }
}
