//! Per-article orchestration: extract a date signal, resolve it, apply the
//! recency policy, and deduplicate admitted titles.
//!
//! One resolver is created per site per run. It owns the run-scoped title
//! set and a reference to the shared recency window; articles are resolved
//! one at a time, in listing order. A candidate is emitted only when its
//! verdict is accept and its title has not been admitted earlier in the
//! run.
//!
//! The remote-fetch fallback is wired through the [`PageFetch`]
//! collaborator: when the listing carried no usable signal and a fetcher is
//! present, the article page itself is fetched and the document strategies
//! re-run against it. Any network failure collapses to "no signal" here;
//! the classifier then reports the article unparseable and the run moves
//! on.

use crate::fetch::PageFetch;
use crate::models::ArticleCandidate;
use crate::recency::{self, DateSignal, RecencyVerdict, RecencyWindow, signal};
use crate::utils::{normalize_title, truncate_for_log};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Resolves candidates for a single site within a single run.
pub struct ArticleResolver<'a, F> {
    window: RecencyWindow,
    /// `None` disables the remote-fetch fallback (strategy 5).
    fetcher: Option<&'a F>,
    seen_titles: HashSet<String>,
}

impl<'a, F> ArticleResolver<'a, F>
where
    F: PageFetch,
{
    pub fn new(window: RecencyWindow, fetcher: Option<&'a F>) -> Self {
        Self {
            window,
            fetcher,
            seen_titles: HashSet::new(),
        }
    }

    /// Resolve one candidate. Returns the publish date when the article is
    /// admitted, `None` when it is dropped for any reason.
    ///
    /// Order of checks: extract → classify → (if accept) dedup → emit.
    pub async fn admit(
        &mut self,
        candidate: &ArticleCandidate,
        entry: Option<ElementRef<'_>>,
    ) -> Option<NaiveDate> {
        let signal = self.extract(candidate, entry).await;
        if let Some(ref signal) = signal {
            debug!(
                url = %candidate.url,
                kind = ?signal.kind,
                location = %signal.location,
                raw = %signal.raw,
                "Date signal found"
            );
        }

        let date = signal
            .as_ref()
            .and_then(|signal| recency::resolve_signal(signal, &self.window));

        match self.window.classify(date) {
            RecencyVerdict::Accept(date) => {
                let key = normalize_title(&candidate.title);
                if !self.seen_titles.insert(key) {
                    debug!(
                        source = %candidate.source,
                        url = %candidate.url,
                        title = %truncate_for_log(&candidate.title, 50),
                        "Duplicate title; dropping"
                    );
                    return None;
                }
                debug!(source = %candidate.source, url = %candidate.url, %date, "Article admitted");
                Some(date)
            }
            verdict @ (RecencyVerdict::RejectStale(_) | RecencyVerdict::RejectUnparseable) => {
                debug!(
                    source = %candidate.source,
                    url = %candidate.url,
                    title = %truncate_for_log(&candidate.title, 50),
                    %verdict,
                    "Article dropped"
                );
                None
            }
        }
    }

    /// Number of titles admitted so far this run.
    pub fn admitted(&self) -> usize {
        self.seen_titles.len()
    }

    /// Strategies 1-4 against the listing, then strategy 5: fetch the
    /// article page and re-run the document strategies against it.
    async fn extract(
        &self,
        candidate: &ArticleCandidate,
        entry: Option<ElementRef<'_>>,
    ) -> Option<DateSignal> {
        if let Some(signal) = signal::from_listing(&candidate.url, entry) {
            return Some(signal);
        }

        let fetcher = self.fetcher?;
        debug!(url = %candidate.url, "No listing signal; fetching article page");
        match fetcher.fetch(&candidate.url).await {
            Ok(page) => {
                debug!(url = %candidate.url, status = %page.status, bytes = page.body.len(), "Fetched article page");
                let doc = Html::parse_document(&page.body);
                signal::from_document(&doc)
            }
            Err(e) => {
                warn!(url = %candidate.url, error = %e, "Article fetch failed; treating as no signal");
                None
            }
        }
    }
}
