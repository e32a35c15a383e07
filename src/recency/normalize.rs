//! Absolute-date normalization.
//!
//! Byline and listing text carries publish dates in half a dozen shapes:
//! "August 6, 2025", "Aug 6, 2025", "2025-08-06", "08/06/2025",
//! "6 August 2025", sometimes wrapped in byline noise like
//! "@inquirerdotnet" or "Philippine Daily Inquirer / 02:01 AM". This module
//! parses all of them into a single canonical [`NaiveDate`].
//!
//! Parsing never panics and never aborts the caller; malformed input yields
//! `None` and the article is handled by the recency classifier's
//! unparseable branch.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted formats, in tie-break order. The first format that parses wins;
/// ambiguous inputs (month/day vs day/month) are settled by this order and
/// nothing else.
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // August 12, 2025
    "%b %d, %Y", // Aug 12, 2025
    "%Y-%m-%d",  // 2025-08-12
    "%m/%d/%Y",  // 08/12/2025
    "%d %B %Y",  // 12 August 2025
];

/// Byline noise stripped before parsing: reporter handles, publication
/// names, and the " / " separator between date and time-of-day.
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@\w+|Philippine Daily Inquirer|BusinessMirror|The Philippine Star|\s/\s").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Loose fallback: a month word, a day, and a year, anywhere in the text.
static LOOSE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]+)\s+(\d{1,2}),?\s*(\d{4})").unwrap());

/// Parse a raw absolute-date string into a canonical calendar date.
///
/// Tries the accepted formats in declared order, then falls back to a loose
/// "word day, year" extraction whose year must be plausible: within one
/// year of `reference_year`. Far-future and far-past years are rejected as
/// corrupted rather than parsed.
///
/// # Arguments
///
/// * `raw` - The date text as extracted from the page
/// * `reference_year` - The run's current year, bounding the loose parse
///
/// # Returns
///
/// The canonical date, or `None` if nothing plausible could be parsed.
pub fn normalize(raw: &str, reference_year: i32) -> Option<NaiveDate> {
    let cleaned = NOISE.replace_all(raw, " ");
    let cleaned = WHITESPACE.replace_all(cleaned.trim(), " ").into_owned();
    if cleaned.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Some(date);
        }
    }

    loose_parse(&cleaned, reference_year)
}

/// Parse the `YYYY-MM-DD` prefix of an ISO-8601-like timestamp.
///
/// Machine metadata carries full timestamps ("2025-08-06T02:01:00+08:00");
/// only the date part matters downstream.
pub fn iso_prefix(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn loose_parse(cleaned: &str, reference_year: i32) -> Option<NaiveDate> {
    let caps = LOOSE_DATE.captures(cleaned)?;
    let month = &caps[1];
    let day = &caps[2];
    let year: i32 = caps[3].parse().ok()?;

    if (year - reference_year).abs() > 1 {
        return None;
    }

    let rebuilt = format!("{} {}, {}", month, day, year);
    NaiveDate::parse_from_str(&rebuilt, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(&rebuilt, "%b %d, %Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_accepted_formats() {
        assert_eq!(normalize("August 12, 2025", 2025), Some(d(2025, 8, 12)));
        assert_eq!(normalize("Aug 12, 2025", 2025), Some(d(2025, 8, 12)));
        assert_eq!(normalize("2025-08-12", 2025), Some(d(2025, 8, 12)));
        assert_eq!(normalize("08/12/2025", 2025), Some(d(2025, 8, 12)));
        assert_eq!(normalize("12 August 2025", 2025), Some(d(2025, 8, 12)));
    }

    #[test]
    fn test_unpadded_day() {
        assert_eq!(normalize("August 6, 2025", 2025), Some(d(2025, 8, 6)));
        assert_eq!(normalize("8/6/2025", 2025), Some(d(2025, 8, 6)));
    }

    #[test]
    fn test_slash_format_is_month_first() {
        // 01/02/2025 parses as January 2 by declared format order, not February 1.
        assert_eq!(normalize("01/02/2025", 2025), Some(d(2025, 1, 2)));
    }

    #[test]
    fn test_byline_noise_stripped() {
        assert_eq!(
            normalize("By Jane Cruz @inquirerdotnet August 6, 2025", 2025),
            Some(d(2025, 8, 6))
        );
        assert_eq!(
            normalize("Philippine Daily Inquirer / August 6, 2025", 2025),
            Some(d(2025, 8, 6))
        );
        assert_eq!(
            normalize("August 06, 2025 / 02:01 AM", 2025),
            Some(d(2025, 8, 6))
        );
    }

    #[test]
    fn test_loose_parse_without_comma() {
        assert_eq!(normalize("August 6 2025", 2025), Some(d(2025, 8, 6)));
    }

    #[test]
    fn test_loose_parse_year_bound() {
        assert_eq!(normalize("Posted August 6 2019 archive", 2025), None);
        assert_eq!(normalize("August 6 2125", 2025), None);
        // Adjacent years stay valid across the New Year boundary.
        assert_eq!(normalize("December 31 2024", 2025), Some(d(2024, 12, 31)));
    }

    #[test]
    fn test_impossible_dates_rejected() {
        assert_eq!(normalize("February 30, 2025", 2025), None);
        assert_eq!(normalize("13/13/2025", 2025), None);
    }

    #[test]
    fn test_garbage_and_empty() {
        assert_eq!(normalize("", 2025), None);
        assert_eq!(normalize("   ", 2025), None);
        assert_eq!(normalize("read more", 2025), None);
        assert_eq!(normalize("@inquirerdotnet", 2025), None);
    }

    #[test]
    fn test_iso_prefix() {
        assert_eq!(iso_prefix("2025-08-06T02:01:00+08:00"), Some(d(2025, 8, 6)));
        assert_eq!(iso_prefix("2025-08-06 02:01:00"), Some(d(2025, 8, 6)));
        assert_eq!(iso_prefix("2025-08-06"), Some(d(2025, 8, 6)));
        assert_eq!(iso_prefix("2025-8-6"), None);
        assert_eq!(iso_prefix("not a date"), None);
        assert_eq!(iso_prefix(""), None);
    }

    #[test]
    fn test_idempotent_on_canonical_rendering() {
        let date = normalize("August 12, 2025", 2025).unwrap();
        let rendered = date.format("%Y-%m-%d").to_string();
        assert_eq!(normalize(&rendered, 2025), Some(date));
        let rendered_long = date.format("%B %d, %Y").to_string();
        assert_eq!(normalize(&rendered_long, 2025), Some(date));
    }
}
