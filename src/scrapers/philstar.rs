//! Philstar Business listing scraper.
//!
//! Philstar paginates its section listings and stamps many entries with
//! relative times ("2 hours ago") rather than dates, so this scraper leans
//! hardest on the resolver's relative-phrase handling and the URL date
//! segment. Listing URLs outside the business sections are skipped.

use super::{
    absolute_url, build_record, extract_author, extract_description, fetch_listings,
    is_junk_link, listing_entry, log_source_totals, looks_like_error_page,
};
use crate::fetch::PageFetch;
use crate::models::{ArticleCandidate, ArticleRecord};
use crate::recency::RecencyWindow;
use crate::resolve::ArticleResolver;
use crate::utils::clean_whitespace;
use chrono::Datelike;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

pub const SOURCE: &str = "philstar";

const SECTION_URLS: &[&str] = &[
    "https://www.philstar.com/business",
    "https://www.philstar.com/business/technology",
    "https://www.philstar.com/business/real-estate",
    "https://www.philstar.com/business/telecoms",
];

/// Extra listing pages requested per section.
const PAGES_PER_SECTION: u32 = 3;

/// If the dated selectors surface fewer links than this on a page, the
/// broad business selector is consulted as well.
const BROAD_SEARCH_THRESHOLD: usize = 5;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.philstar.com/").unwrap());

static BROAD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="/business/"]"#).unwrap());

/// Scrape Philstar Business and return the run's admitted articles.
#[instrument(level = "info", skip_all)]
pub async fn scrape<F: PageFetch>(
    fetcher: &F,
    window: RecencyWindow,
    fetch_article_pages: bool,
    scraped_at: &str,
) -> Vec<ArticleRecord> {
    let urls = listing_urls();
    let listings = fetch_listings(fetcher, &urls).await;

    let dated_selectors = dated_link_selectors(&window);

    let mut resolver = ArticleResolver::new(window, fetch_article_pages.then_some(fetcher));
    let mut records = Vec::new();
    let mut discovered_total = 0usize;

    for (page_url, body) in &listings {
        let doc = Html::parse_document(body);
        let found = discover(&doc, &dated_selectors);
        discovered_total += found.len();
        debug!(%page_url, count = found.len(), "Discovered Philstar candidates");

        for (title, url, entry) in found {
            let candidate = ArticleCandidate {
                source: SOURCE.to_string(),
                title,
                url,
                description: extract_description(entry),
                author: extract_author(entry),
            };
            if let Some(date) = resolver.admit(&candidate, Some(entry)).await {
                records.push(build_record(&candidate, date, "Philstar", None, scraped_at));
            }
        }
    }

    log_source_totals(SOURCE, discovered_total, resolver.admitted());
    records
}

/// Section URLs plus their paginated variants.
fn listing_urls() -> Vec<String> {
    SECTION_URLS
        .iter()
        .flat_map(|base| {
            (1..=PAGES_PER_SECTION).map(move |page| {
                if page == 1 {
                    (*base).to_string()
                } else {
                    format!("{}?page={}", base, page)
                }
            })
        })
        .collect()
}

/// Anchors under dated business paths for the window's years.
fn dated_link_selectors(window: &RecencyWindow) -> Vec<Selector> {
    let mut years = vec![window.today().year()];
    if window.yesterday().year() != window.today().year() {
        years.push(window.yesterday().year());
    }
    years
        .into_iter()
        .map(|year| Selector::parse(&format!(r#"a[href*="/business/"][href*="/{}/"]"#, year)).unwrap())
        .collect()
}

/// Pull `(title, url, entry)` candidates out of one listing page.
///
/// Dated selectors are collected first; if they surface too few links the
/// broad business selector fills in, and the URL filter decides what
/// survives. Links are deduplicated by URL before resolution.
fn discover<'a>(
    doc: &'a Html,
    dated_selectors: &[Selector],
) -> Vec<(String, String, ElementRef<'a>)> {
    let mut anchors: Vec<ElementRef<'a>> = Vec::new();
    for selector in dated_selectors {
        anchors.extend(doc.select(selector));
    }
    if anchors.len() < BROAD_SEARCH_THRESHOLD {
        anchors.extend(doc.select(&BROAD_SELECTOR));
    }

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            if is_junk_link(href) {
                return None;
            }
            let url = absolute_url(&BASE, href)?;
            if !is_business_article_url(&url) {
                return None;
            }
            let title = clean_whitespace(&anchor.text().collect::<Vec<_>>().join(" "));
            if title.len() <= 10 || looks_like_error_page(&title) {
                return None;
            }
            Some((title, url, listing_entry(anchor, 2)))
        })
        .unique_by(|(_, url, _)| url.clone())
        .collect()
}

/// Only URLs under the scraped business sections are articles we want.
fn is_business_article_url(url: &str) -> bool {
    const VALID_PREFIXES: &[&str] = &[
        "https://www.philstar.com/business/",
        "https://www.philstar.com/business/technology/",
        "https://www.philstar.com/business/real-estate/",
        "https://www.philstar.com/business/telecoms/",
    ];
    VALID_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}
