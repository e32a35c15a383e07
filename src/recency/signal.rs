//! Date-signal extraction from URLs and page markup.
//!
//! Every article's publish date arrives in a different place depending on
//! the site and the template revision it happens to be serving: a
//! `/YYYY/MM/DD/` path segment, an ISO timestamp in a meta tag, the text of
//! a byline element, or a date buried in the page body. This module tries
//! an ordered list of strategies and returns the first plausible signal.
//!
//! # Strategy order
//!
//! 1. [`from_url_path`] - cheapest and most reliable when present
//! 2. [`from_machine_metadata`] - ISO timestamps in meta tags and `datetime` attributes
//! 3. [`from_date_elements`] - text of date-labeled elements, absolute or relative
//! 4. [`from_free_text`] - month-name date anywhere in the text
//!
//! [`from_document`] composes 2-4 for a fetched article page;
//! [`from_listing`] composes 1 and the element-scoped strategies for a
//! listing entry. The remote-fetch fallback (strategy 5) lives in the
//! article resolver, which re-runs [`from_document`] against the fetched
//! page.
//!
//! Strategy failure is silent: each falls through to the next, and total
//! failure yields `None`. No strategy ever substitutes the current date.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Where a raw date signal was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// A `/YYYY/MM/DD/` segment in the article URL.
    UrlPath,
    /// A machine-readable timestamp attribute (meta tag or `datetime`).
    MetaTag,
    /// Absolute-date text inside a date-labeled element.
    StructuredElement,
    /// Absolute-date text found by scanning the whole page.
    FreeText,
    /// A relative phrase such as "2 hours ago".
    RelativePhrase,
}

/// A raw, unvalidated date-ish finding. Immutable once created; parsing
/// and validation happen downstream.
#[derive(Debug, Clone)]
pub struct DateSignal {
    pub kind: SignalKind,
    /// The raw text or attribute value, exactly as found.
    pub raw: String,
    /// A human-readable description of where the signal came from,
    /// usually the selector that matched.
    pub location: String,
}

static URL_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d{4})/(\d{2})/(\d{2})/").unwrap());

static ISO_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

const MONTHS: &str = "Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";

/// Absolute-date text patterns, in precedence order.
static ABSOLUTE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // August 6, 2025 / Aug 6, 2025
        Regex::new(&format!(r"(?i)\b(?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}}")).unwrap(),
        // 6 August 2025
        Regex::new(&format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTHS})\s+\d{{4}}")).unwrap(),
        // 2025-08-06
        Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap(),
        // 08/06/2025
        Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap(),
    ]
});

/// Relative-time phrasing: "2 hours ago", "yesterday", "today".
static RELATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:\d+\s*(?:minute|hour|day|week)s?\s+ago|a day ago|yesterday|today)\b")
        .unwrap()
});

/// Month-name date pattern used for the free-text scan.
static FREE_TEXT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b(?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}}")).unwrap());

/// Meta tags and timestamp attributes checked by strategy 2, in order.
static META_SELECTORS: Lazy<Vec<(Selector, &'static str, &'static str)>> = Lazy::new(|| {
    [
        (r#"meta[property="article:published_time"]"#, "content"),
        (r#"meta[name="date"]"#, "content"),
        (r#"meta[name="publish_date"]"#, "content"),
        (r#"meta[property="og:published_time"]"#, "content"),
        (r#"meta[name="publication_date"]"#, "content"),
        (r#"meta[name="pubdate"]"#, "content"),
        ("time[datetime]", "datetime"),
        ("[data-date]", "data-date"),
    ]
    .into_iter()
    .map(|(css, attr)| (Selector::parse(css).unwrap(), css, attr))
    .collect()
});

/// Date-labeled elements checked by strategy 3, in order.
static DATE_ELEMENT_SELECTORS: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        ".byline time",
        ".article-date",
        ".published-date",
        ".post-date",
        ".entry-date",
        ".date-published",
        ".publish-date",
        ".published",
        ".date",
        ".timestamp",
        ".time-ago",
        ".relative-time",
        "time",
    ]
    .into_iter()
    .map(|css| (Selector::parse(css).unwrap(), css))
    .collect()
});

/// Strategy 1: a `/YYYY/MM/DD/` segment in the article URL.
///
/// The segment is validated as a real calendar date at extraction time so
/// that an implausible path (month 13, February 30) falls through to the
/// next strategy instead of poisoning the pipeline.
pub fn from_url_path(url: &str) -> Option<DateSignal> {
    let caps = URL_DATE.captures(url)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, month, day)?;

    Some(DateSignal {
        kind: SignalKind::UrlPath,
        raw: format!("{:04}-{:02}-{:02}", year, month, day),
        location: "url".to_string(),
    })
}

/// Strategy 2: machine-readable timestamps in document metadata.
///
/// Accepts only values that open with an ISO `YYYY-MM-DD` prefix; anything
/// else is treated as absent.
pub fn from_machine_metadata(doc: &Html) -> Option<DateSignal> {
    for (selector, css, attr) in META_SELECTORS.iter() {
        for element in doc.select(selector) {
            let Some(value) = element.value().attr(attr) else {
                continue;
            };
            let value = value.trim();
            if ISO_PREFIX.is_match(value) {
                return Some(DateSignal {
                    kind: SignalKind::MetaTag,
                    raw: value.to_string(),
                    location: (*css).to_string(),
                });
            }
        }
    }
    None
}

/// Strategy 3: text content of known date-labeled elements.
///
/// Each selector's first match is tested against the absolute-date
/// patterns, then the relative-phrase pattern. The scope may be a whole
/// document (`doc.root_element()`) or a single listing entry.
pub fn from_date_elements(scope: ElementRef<'_>) -> Option<DateSignal> {
    for (selector, css) in DATE_ELEMENT_SELECTORS.iter() {
        let Some(element) = scope.select(selector).next() else {
            continue;
        };
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        for pattern in ABSOLUTE_PATTERNS.iter() {
            if let Some(found) = pattern.find(text) {
                return Some(DateSignal {
                    kind: SignalKind::StructuredElement,
                    raw: found.as_str().to_string(),
                    location: (*css).to_string(),
                });
            }
        }
        if let Some(found) = RELATIVE_PATTERN.find(text) {
            return Some(DateSignal {
                kind: SignalKind::RelativePhrase,
                raw: found.as_str().to_string(),
                location: (*css).to_string(),
            });
        }
    }
    None
}

/// Strategy 4: scan arbitrary text for a month-name date.
pub fn from_free_text(text: &str) -> Option<DateSignal> {
    let found = FREE_TEXT_DATE.find(text)?;
    Some(DateSignal {
        kind: SignalKind::FreeText,
        raw: found.as_str().to_string(),
        location: "free-text".to_string(),
    })
}

/// Run strategies 2-4 against a full article page, in order.
pub fn from_document(doc: &Html) -> Option<DateSignal> {
    if let Some(signal) = from_machine_metadata(doc) {
        return Some(signal);
    }
    let root = doc.root_element();
    if let Some(signal) = from_date_elements(root) {
        return Some(signal);
    }
    let text = root.text().collect::<Vec<_>>().join(" ");
    from_free_text(&text)
}

/// Run the listing-side strategies for one discovered article: URL path
/// first, then the date elements and free text of the listing entry.
pub fn from_listing(url: &str, entry: Option<ElementRef<'_>>) -> Option<DateSignal> {
    if let Some(signal) = from_url_path(url) {
        return Some(signal);
    }
    let entry = entry?;
    if let Some(signal) = from_date_elements(entry) {
        return Some(signal);
    }
    let text = entry.text().collect::<Vec<_>>().join(" ");
    from_free_text(&text)
}
