//! Data models for scraped candidates and admitted articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleCandidate`]: Raw per-article extraction from a listing page
//! - [`ArticleRecord`]: An admitted article with date, category, and sentiment attached
//! - [`NewsSheet`]: Collection of admitted articles for a single source and run
//!
//! Candidates are created by the site scrapers, resolved (date + recency
//! verdict) by the article resolver, and discarded unless the verdict is
//! accept. Records never outlive the run that created them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw article candidate as discovered on a listing page.
///
/// This struct represents an article before its publish date has been
/// resolved. Description and author are best-effort: listing markup often
/// omits one or both.
#[derive(Debug, Clone)]
pub struct ArticleCandidate {
    /// Short tag of the site that produced this candidate (e.g. "inquirer").
    pub source: String,
    /// The headline text as it appeared in the listing.
    pub title: String,
    /// Absolute URL of the article.
    pub url: String,
    /// Snippet or summary text, if the listing carried one.
    pub description: Option<String>,
    /// Byline, if the listing carried one.
    pub author: Option<String>,
}

/// A fully resolved, admitted news article.
///
/// Produced only for candidates whose publish date fell inside the recency
/// window and whose title had not been seen earlier in the run. The field
/// set matches the exported JSON row.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub category: String,
    pub description: String,
    pub link: String,
    pub author: String,
    /// Resolved calendar publish date.
    pub published_date: NaiveDate,
    /// Combined lexicon polarity in [-1.0, 1.0].
    pub sentiment_score: f64,
    /// "Positive", "Negative", or "Neutral".
    pub sentiment_label: String,
    /// Refined tone: "Optimistic", "Positive", "Neutral", "Negative", or "Concerning".
    pub emotion: String,
    /// Timestamp of the run that scraped this article, `YYYY-MM-DD HH:MM:SS`.
    pub scraped_at: String,
}

/// All admitted articles from one source for one run.
///
/// Each execution produces one `NewsSheet` per source, serialized to a JSON
/// file under a date-keyed directory.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewsSheet {
    /// Source tag (e.g. "businessmirror").
    pub source: String,
    /// The run's reference date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Timestamp of the run, `YYYY-MM-DD HH:MM:SS`.
    pub scraped_at: String,
    /// The admitted articles, in emission order.
    pub articles: Vec<ArticleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ArticleRecord {
        ArticleRecord {
            title: "PSEi rallies on rate cut hopes".to_string(),
            category: "Stock Market".to_string(),
            description: "The local bourse climbed for a third day".to_string(),
            link: "https://business.inquirer.net/2025/08/06/psei-rallies".to_string(),
            author: "Inquirer".to_string(),
            published_date: NaiveDate::from_ymd_opt(2025, 8, 6).unwrap(),
            sentiment_score: 0.42,
            sentiment_label: "Positive".to_string(),
            emotion: "Optimistic".to_string(),
            scraped_at: "2025-08-06 09:15:00".to_string(),
        }
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("2025-08-06"));
        assert!(json.contains("PSEi rallies"));

        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.published_date, record.published_date);
        assert_eq!(back.sentiment_label, "Positive");
    }

    #[test]
    fn test_news_sheet_serialization() {
        let sheet = NewsSheet {
            source: "inquirer".to_string(),
            local_date: "2025-08-06".to_string(),
            scraped_at: "2025-08-06 09:15:00".to_string(),
            articles: vec![sample_record()],
        };

        let json = serde_json::to_string(&sheet).unwrap();
        assert!(json.contains("\"source\":\"inquirer\""));
        assert!(json.contains("\"articles\""));
    }

    #[test]
    fn test_news_sheet_deserialization_empty() {
        let json = r#"{
            "source": "philstar",
            "local_date": "2025-08-06",
            "scraped_at": "2025-08-06 09:15:00",
            "articles": []
        }"#;

        let sheet: NewsSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.source, "philstar");
        assert_eq!(sheet.articles.len(), 0);
    }

    #[test]
    fn test_candidate_creation() {
        let candidate = ArticleCandidate {
            source: "businessmirror".to_string(),
            title: "Peso steadies against dollar".to_string(),
            url: "https://businessmirror.com.ph/2025/08/06/peso-steadies/".to_string(),
            description: None,
            author: None,
        };
        assert_eq!(candidate.source, "businessmirror");
        assert!(candidate.description.is_none());
    }
}
