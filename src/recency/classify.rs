//! Recency window and admit/drop policy.
//!
//! The pipeline only forwards stories published today or yesterday. The
//! window is captured once per run from a single reference instant so every
//! article in the run is judged against the same pair of dates; recomputing
//! "now" per article would make the window drift across a midnight boundary
//! mid-run.

use chrono::{DateTime, Duration, Local, NaiveDate};
use std::fmt;

/// Maximum age in days beyond which a parsed date is rejected regardless of
/// window membership.
pub const STALENESS_DAYS: i64 = 7;

/// The run's frozen reference instant and the calendar dates it admits.
#[derive(Debug, Clone, Copy)]
pub struct RecencyWindow {
    reference: DateTime<Local>,
    today: NaiveDate,
    yesterday: NaiveDate,
}

impl RecencyWindow {
    /// Capture a window from a reference instant. Call once per run.
    pub fn capture(reference: DateTime<Local>) -> Self {
        let today = reference.date_naive();
        Self {
            reference,
            today,
            yesterday: today - Duration::days(1),
        }
    }

    /// The instant the window was captured from; relative phrases resolve
    /// against this.
    pub fn reference(&self) -> DateTime<Local> {
        self.reference
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.yesterday
    }

    /// Apply the recency policy to a resolved date.
    ///
    /// - No date ⇒ [`RecencyVerdict::RejectUnparseable`]
    /// - Older than [`STALENESS_DAYS`] ⇒ [`RecencyVerdict::RejectStale`]
    /// - Today or yesterday ⇒ [`RecencyVerdict::Accept`]
    /// - Anything else, including future dates ⇒ [`RecencyVerdict::RejectStale`]
    ///
    /// Age is computed once, from the same reference day the window was
    /// built from.
    pub fn classify(&self, date: Option<NaiveDate>) -> RecencyVerdict {
        let Some(date) = date else {
            return RecencyVerdict::RejectUnparseable;
        };

        let age_days = (self.today - date).num_days();
        if age_days > STALENESS_DAYS {
            return RecencyVerdict::RejectStale(date);
        }
        if date == self.today || date == self.yesterday {
            RecencyVerdict::Accept(date)
        } else {
            RecencyVerdict::RejectStale(date)
        }
    }
}

/// Outcome of classifying one article's resolved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyVerdict {
    /// Published today or yesterday; forward to the sink.
    Accept(NaiveDate),
    /// A real date outside the window; dropped.
    RejectStale(NaiveDate),
    /// No signal, or a signal nothing could parse; dropped.
    RejectUnparseable,
}

impl RecencyVerdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, RecencyVerdict::Accept(_))
    }
}

impl fmt::Display for RecencyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecencyVerdict::Accept(date) => write!(f, "accept ({})", date),
            RecencyVerdict::RejectStale(date) => write!(f, "reject-stale ({})", date),
            RecencyVerdict::RejectUnparseable => write!(f, "reject-unparseable"),
        }
    }
}
