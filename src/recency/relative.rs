//! Relative-time phrase resolution.
//!
//! Philstar listing pages timestamp stories with phrases like "2 hours ago"
//! or "Yesterday" instead of calendar dates. This module converts those
//! phrases into an absolute instant relative to the run's reference "now".
//! Unrecognized phrasing yields no match, never a guessed date.

use chrono::{DateTime, Duration, Local};
use once_cell::sync::Lazy;
use regex::Regex;

static UNITS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(minute|hour|day|week)s?\s+ago").unwrap());

/// Resolve a relative phrase against a reference instant.
///
/// Recognized families: `N minutes|hours|days|weeks ago` (singular or
/// plural), `a day ago`, and the literals `today` (the reference instant)
/// and `yesterday` (reference minus one day). Matching is case-insensitive.
///
/// Unit arithmetic is exact; downstream logic truncates the returned
/// instant to its calendar date.
///
/// # Returns
///
/// The resolved instant, or `None` if the phrase is not a recognized
/// relative-time form.
pub fn resolve(phrase: &str, reference: DateTime<Local>) -> Option<DateTime<Local>> {
    let phrase = phrase.trim().to_lowercase();

    if let Some(caps) = UNITS_AGO.captures(&phrase) {
        let magnitude: i64 = caps[1].parse().ok()?;
        let delta = match &caps[2] {
            "minute" => Duration::try_minutes(magnitude),
            "hour" => Duration::try_hours(magnitude),
            "day" => Duration::try_days(magnitude),
            "week" => Duration::try_weeks(magnitude),
            _ => None,
        }?;
        return reference.checked_sub_signed(delta);
    }

    if phrase.contains("a day ago") || phrase.contains("yesterday") {
        return reference.checked_sub_signed(Duration::days(1));
    }
    if phrase.contains("today") {
        return Some(reference);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Local> {
        // Aug 12 2025, 14:00 local
        Local.with_ymd_and_hms(2025, 8, 12, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_hours_ago_exact_arithmetic() {
        let resolved = resolve("2 hours ago", reference()).unwrap();
        assert_eq!(resolved, reference() - Duration::hours(2));
        assert_eq!(resolved.date_naive(), reference().date_naive());
    }

    #[test]
    fn test_hours_ago_crossing_midnight() {
        let resolved = resolve("15 hours ago", reference()).unwrap();
        assert_eq!(
            resolved.date_naive(),
            reference().date_naive() - Duration::days(1)
        );
    }

    #[test]
    fn test_singular_unit() {
        let resolved = resolve("1 hour ago", reference()).unwrap();
        assert_eq!(resolved, reference() - Duration::hours(1));
    }

    #[test]
    fn test_minutes_days_weeks() {
        assert_eq!(
            resolve("30 minutes ago", reference()).unwrap(),
            reference() - Duration::minutes(30)
        );
        assert_eq!(
            resolve("3 days ago", reference()).unwrap(),
            reference() - Duration::days(3)
        );
        assert_eq!(
            resolve("2 weeks ago", reference()).unwrap(),
            reference() - Duration::weeks(2)
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(resolve("Today", reference()).unwrap(), reference());
        assert_eq!(
            resolve("yesterday", reference()).unwrap(),
            reference() - Duration::days(1)
        );
        assert_eq!(
            resolve("a day ago", reference()).unwrap(),
            reference() - Duration::days(1)
        );
    }

    #[test]
    fn test_unrecognized_yields_none() {
        assert!(resolve("last Tuesday", reference()).is_none());
        assert!(resolve("soon", reference()).is_none());
        assert!(resolve("ago", reference()).is_none());
        assert!(resolve("", reference()).is_none());
        assert!(resolve("2 fortnights ago", reference()).is_none());
    }

    #[test]
    fn test_absurd_magnitude_does_not_panic() {
        assert!(resolve("99999999999999999999999 hours ago", reference()).is_none());
    }
}
