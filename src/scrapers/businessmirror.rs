//! BusinessMirror listing scraper.
//!
//! BusinessMirror section pages render each story as a self-contained
//! article element, so discovery walks article blocks instead of bare
//! anchors. Categories combine the section name with keyword
//! categorization, avoiding redundant labels like "Economy - Economy".

use super::{
    absolute_url, build_record, extract_author, extract_description, fetch_listings,
    is_junk_link, log_source_totals,
};
use crate::analyze;
use crate::fetch::PageFetch;
use crate::models::{ArticleCandidate, ArticleRecord};
use crate::recency::RecencyWindow;
use crate::resolve::ArticleResolver;
use crate::utils::clean_whitespace;
use chrono::Datelike;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

pub const SOURCE: &str = "businessmirror";

const SECTION_URLS: &[&str] = &[
    "https://businessmirror.com.ph/business/",
    "https://businessmirror.com.ph/business/companies/",
    "https://businessmirror.com.ph/news/economy/",
    "https://businessmirror.com.ph/business/export-unlimited/",
];

/// At most this many stories are taken from each section listing.
const PER_SECTION_CAP: usize = 20;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://businessmirror.com.ph/").unwrap());

/// Article-block selectors in fallback order.
static ARTICLE_SELECTORS: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        "article",
        ".post",
        ".entry",
        r#"[class*="post"]"#,
        r#"[class*="article"]"#,
    ]
    .into_iter()
    .map(|css| (Selector::parse(css).unwrap(), css))
    .collect()
});

static TITLE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["h2 a", "h3 a", ".entry-title a"]
        .into_iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});

static CATEGORY_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [r#"[class*="category"]"#, ".cat-links a"]
        .into_iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});

/// Scrape BusinessMirror and return the run's admitted articles.
#[instrument(level = "info", skip_all)]
pub async fn scrape<F: PageFetch>(
    fetcher: &F,
    window: RecencyWindow,
    fetch_article_pages: bool,
    scraped_at: &str,
) -> Vec<ArticleRecord> {
    let urls: Vec<String> = SECTION_URLS.iter().map(|s| s.to_string()).collect();
    let listings = fetch_listings(fetcher, &urls).await;

    // Stories are often filed under dated paths; accept anchors for the
    // window's years (covers a run on January 1).
    let year_selectors = year_title_selectors(&window);

    let mut resolver = ArticleResolver::new(window, fetch_article_pages.then_some(fetcher));
    let mut records = Vec::new();
    let mut discovered_total = 0usize;

    for (section_url, body) in &listings {
        let doc = Html::parse_document(body);
        let section = section_category(section_url);
        let found = discover(&doc, &year_selectors);
        discovered_total += found.len();
        debug!(%section_url, count = found.len(), "Discovered BusinessMirror candidates");

        for (title, url, entry) in found {
            let candidate = ArticleCandidate {
                source: SOURCE.to_string(),
                title,
                url,
                description: extract_description(entry),
                author: extract_author(entry),
            };
            if let Some(date) = resolver.admit(&candidate, Some(entry)).await {
                let category = combined_category(&section, entry, &candidate);
                records.push(build_record(
                    &candidate,
                    date,
                    "Business Mirror",
                    Some(category),
                    scraped_at,
                ));
            }
        }
    }

    log_source_totals(SOURCE, discovered_total, resolver.admitted());
    records
}

fn year_title_selectors(window: &RecencyWindow) -> Vec<Selector> {
    let mut years = vec![window.today().year()];
    if window.yesterday().year() != window.today().year() {
        years.push(window.yesterday().year());
    }
    years
        .into_iter()
        .map(|year| Selector::parse(&format!(r#"a[href*="/{}/"]"#, year)).unwrap())
        .collect()
}

/// Pull `(title, url, entry)` candidates out of one listing page. The
/// entry is the article block itself, which carries the byline and date
/// markup the resolver needs.
fn discover<'a>(
    doc: &'a Html,
    year_selectors: &[Selector],
) -> Vec<(String, String, ElementRef<'a>)> {
    for (selector, css) in ARTICLE_SELECTORS.iter() {
        let blocks: Vec<ElementRef<'a>> = doc.select(selector).collect();
        if blocks.is_empty() {
            continue;
        }
        debug!(selector = css, count = blocks.len(), "BusinessMirror selector matched");

        let mut found = Vec::new();
        for block in blocks.into_iter().take(PER_SECTION_CAP) {
            let Some((title, url)) = title_and_url(block, year_selectors) else {
                continue;
            };
            found.push((title, url, block));
        }
        return found;
    }
    Vec::new()
}

fn title_and_url(
    block: ElementRef<'_>,
    year_selectors: &[Selector],
) -> Option<(String, String)> {
    let anchor = TITLE_SELECTORS
        .iter()
        .chain(year_selectors.iter())
        .find_map(|selector| block.select(selector).next())?;

    let href = anchor.value().attr("href")?;
    if is_junk_link(href) {
        return None;
    }
    let title = clean_whitespace(&anchor.text().collect::<Vec<_>>().join(" "));
    if title.len() <= 10 {
        return None;
    }
    let url = absolute_url(&BASE, href)?;
    Some((title, url))
}

/// Map a section URL to its display category.
fn section_category(section_url: &str) -> String {
    let segment = section_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    match segment {
        "business" => "General Business".to_string(),
        "economy" => "Economy".to_string(),
        "companies" => "Companies".to_string(),
        "export-unlimited" => "International Trade".to_string(),
        "banking-finance" => "Banking & Finance".to_string(),
        "stock-market-outlook" => "Stock Market".to_string(),
        "agri-commodities" => "Agriculture".to_string(),
        other => {
            let mut pretty = String::new();
            for word in other.split('-') {
                if !pretty.is_empty() {
                    pretty.push(' ');
                }
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    pretty.extend(first.to_uppercase());
                    pretty.push_str(chars.as_str());
                }
            }
            pretty
        }
    }
}

/// Combine the section name with the article's own category, skipping the
/// prefix when it would repeat itself.
fn combined_category(
    section: &str,
    entry: ElementRef<'_>,
    candidate: &ArticleCandidate,
) -> String {
    let base = element_category(entry).unwrap_or_else(|| {
        analyze::categorize(
            &candidate.title,
            candidate.description.as_deref().unwrap_or_default(),
        )
    });

    if base.to_lowercase().contains(&section.to_lowercase()) {
        base
    } else {
        format!("{} - {}", section, base)
    }
}

fn element_category(entry: ElementRef<'_>) -> Option<String> {
    for selector in CATEGORY_SELECTORS.iter() {
        let Some(element) = entry.select(selector).next() else {
            continue;
        };
        let text = clean_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        if !text.is_empty() && !matches!(text.to_lowercase().as_str(), "business" | "news") {
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, FetchedPage};
    use chrono::{Local, TimeZone};
    use reqwest::StatusCode;

    fn window() -> RecencyWindow {
        RecencyWindow::capture(Local.with_ymd_and_hms(2025, 8, 12, 9, 0, 0).unwrap())
    }

    const LISTING: &str = r#"<html><body>
        <article>
            <h2><a href="/2025/08/12/meralco-rates-steady/">Meralco keeps power rates steady</a></h2>
            <span class="cat-links"><a href="/energy/">Energy</a></span>
            <div class="excerpt">The utility said generation charges were unchanged for the billing month of August.</div>
            <span class="byline">Lenie Lectura</span>
        </article>
        <article>
            <h2><a href="/2025/08/05/week-old-report/">A week-old report on commodity flows</a></h2>
        </article>
        <article>
            <h2><a href="/2024/02/01/very-old-report/">A very old report from the archive</a></h2>
        </article>
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

    #[test]
    fn test_discover_reads_article_blocks() {
        let doc = Html::parse_document(LISTING);
        let found = discover(&doc, &year_title_selectors(&window()));
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].0, "Meralco keeps power rates steady");
        assert!(found[0].1.ends_with("/2025/08/12/meralco-rates-steady/"));
    }

    #[test]
    fn test_section_category_mapping() {
        assert_eq!(
            section_category("https://businessmirror.com.ph/news/economy/"),
            "Economy"
        );
        assert_eq!(
            section_category("https://businessmirror.com.ph/business/export-unlimited/"),
            "International Trade"
        );
        assert_eq!(
            section_category("https://businessmirror.com.ph/business/monday-morning/"),
            "Monday Morning"
        );
    }

    #[tokio::test]
    async fn test_scrape_applies_window_and_section_categories() {
        let records = scrape(&StubFetcher, window(), false, "2025-08-12 09:00:00").await;

        // Only the Aug 12 story survives; the week-old and archive stories
        // are rejected as stale. The same listing is served for all four
        // sections, so dedup keeps a single copy.
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Meralco keeps power rates steady");
        assert_eq!(record.author, "Lenie Lectura");
        // Element category "Energy" prefixed with the first section's name.
        assert!(record.category.contains("Energy"));
    }

    #[test]
    fn test_combined_category_avoids_redundancy() {
        let doc = Html::parse_document("<html><body><article></article></body></html>");
        let entry = doc
            .select(&Selector::parse("article").unwrap())
            .next()
            .unwrap();
        let candidate = ArticleCandidate {
            source: SOURCE.to_string(),
            title: "GDP growth beats forecasts".to_string(),
            url: "https://businessmirror.com.ph/x/".to_string(),
            description: None,
            author: None,
        };

        // Keyword category "Economic Indicators" does not contain
        // "Economy", so the section prefix applies.
        assert_eq!(
            combined_category("Economy", entry, &candidate),
            "Economy - Economic Indicators"
        );
        // A repeated name collapses.
        let candidate_companies = ArticleCandidate {
            title: "Holding company posts higher income".to_string(),
            ..candidate
        };
        assert_eq!(
            combined_category("Companies", entry, &candidate_companies),
            "Companies"
        );
    }
}
