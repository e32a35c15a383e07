//! Temporal resolution and recency filtering.
//!
//! This module derives a calendar publish-date for an article from
//! inconsistent, partially-missing signals and applies the run's recency
//! policy. It is the one piece of logic every scraper shares.
//!
//! # Pipeline
//!
//! ```text
//! URL / listing HTML ──▶ signal (ordered strategies)
//!                          │
//!            relative phrase│absolute text / ISO timestamp
//!                          ▼
//!       relative resolver / date normalizer ──▶ canonical NaiveDate
//!                          │
//!                          ▼
//!             recency window ──▶ accept / reject-stale / reject-unparseable
//! ```
//!
//! # Submodules
//!
//! - [`signal`]: Ordered extraction strategies producing a raw [`DateSignal`]
//! - [`relative`]: "2 hours ago" → absolute instant
//! - [`normalize`]: heterogeneous absolute-date text → canonical date
//! - [`classify`]: the {today, yesterday} window and 7-day staleness cutoff

pub mod classify;
pub mod normalize;
pub mod relative;
pub mod signal;

pub use classify::{RecencyVerdict, RecencyWindow, STALENESS_DAYS};
pub use signal::{DateSignal, SignalKind};

use chrono::{Datelike, NaiveDate};

/// Resolve a raw signal into a canonical calendar date.
///
/// Dispatches on the signal kind: ISO-shaped raws (URL path, machine
/// metadata) take their date prefix, relative phrases resolve against the
/// window's reference instant and are truncated to a calendar date, and
/// free-form absolute text goes through the normalizer.
///
/// Returns `None` when the signal cannot be resolved; the classifier turns
/// that into a reject-unparseable verdict.
pub fn resolve_signal(signal: &DateSignal, window: &RecencyWindow) -> Option<NaiveDate> {
    match signal.kind {
        SignalKind::UrlPath | SignalKind::MetaTag => normalize::iso_prefix(&signal.raw),
        SignalKind::RelativePhrase => {
            relative::resolve(&signal.raw, window.reference()).map(|instant| instant.date_naive())
        }
        SignalKind::StructuredElement | SignalKind::FreeText => {
            normalize::normalize(&signal.raw, window.today().year())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn window() -> RecencyWindow {
        RecencyWindow::capture(Local.with_ymd_and_hms(2025, 8, 12, 14, 0, 0).unwrap())
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_resolve_url_path_signal() {
        let signal = DateSignal {
            kind: SignalKind::UrlPath,
            raw: "2025-08-12".to_string(),
            location: "url".to_string(),
        };
        assert_eq!(resolve_signal(&signal, &window()), Some(d(2025, 8, 12)));
    }

    #[test]
    fn test_resolve_meta_timestamp_signal() {
        let signal = DateSignal {
            kind: SignalKind::MetaTag,
            raw: "2025-08-11T22:15:00+08:00".to_string(),
            location: "meta".to_string(),
        };
        assert_eq!(resolve_signal(&signal, &window()), Some(d(2025, 8, 11)));
    }

    #[test]
    fn test_resolve_relative_signal_uses_window_reference() {
        let signal = DateSignal {
            kind: SignalKind::RelativePhrase,
            raw: "3 hours ago".to_string(),
            location: ".time-ago".to_string(),
        };
        // 14:00 minus 3 hours is still Aug 12.
        assert_eq!(resolve_signal(&signal, &window()), Some(d(2025, 8, 12)));

        let signal = DateSignal {
            kind: SignalKind::RelativePhrase,
            raw: "20 hours ago".to_string(),
            location: ".time-ago".to_string(),
        };
        assert_eq!(resolve_signal(&signal, &window()), Some(d(2025, 8, 11)));
    }

    #[test]
    fn test_resolve_free_text_signal() {
        let signal = DateSignal {
            kind: SignalKind::FreeText,
            raw: "January 3, 2025".to_string(),
            location: "free-text".to_string(),
        };
        assert_eq!(resolve_signal(&signal, &window()), Some(d(2025, 1, 3)));
    }

    #[test]
    fn test_resolve_garbage_signal() {
        let signal = DateSignal {
            kind: SignalKind::StructuredElement,
            raw: "whenever".to_string(),
            location: ".date".to_string(),
        };
        assert_eq!(resolve_signal(&signal, &window()), None);
    }
}
