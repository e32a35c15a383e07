//! Keyword categorization and lexicon sentiment scoring for admitted articles.
//!
//! Both analyses run over the title plus description only; article bodies
//! are never fetched for this. Categorization is a first-match-wins keyword
//! table. Sentiment is a small hand-tuned lexicon with negation handling;
//! the label thresholds are ±0.1 with a stronger-tone refinement at ±0.3.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Category keyword table, checked in declared order; the first category
/// with any keyword present in the text wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Banking & Finance",
        &[
            "bank", "financial", "loan", "credit", "investment", "fund", "bsp", "interest rate",
            "monetary", "finance", "budget", "tax", "bir", "dbm", "gsis",
        ],
    ),
    (
        "Stock Market",
        &[
            "stock", "share", "psei", "market", "trading", "equity", "index", "surge", "rally",
            "decline", "navps",
        ],
    ),
    (
        "Energy & Utilities",
        &[
            "fuel", "oil", "gas", "energy", "power", "electricity", "meralco", "utility",
            "renewable", "erc",
        ],
    ),
    (
        "Real Estate",
        &[
            "property", "real estate", "housing", "construction", "development", "land",
            "residential", "megaworld", "filinvest",
        ],
    ),
    (
        "Technology",
        &[
            "tech", "digital", "innovation", "software", "app", "platform", "online", "cyber",
            "ai", "artificial intelligence",
        ],
    ),
    (
        "Infrastructure",
        &[
            "infrastructure", "transport", "road", "bridge", "airport", "port", "railway", "bcda",
        ],
    ),
    (
        "Retail & Consumer",
        &[
            "retail", "consumer", "shopping", "mall", "store", "sales", "product", "brand",
            "puregold",
        ],
    ),
    (
        "Manufacturing",
        &[
            "manufacturing", "factory", "production", "industrial", "goods", "smfb",
        ],
    ),
    (
        "Agriculture",
        &[
            "agriculture", "farming", "crop", "rice", "food", "agricultural", "fishery", "agri",
            "coconut",
        ],
    ),
    (
        "Government & Policy",
        &[
            "government", "policy", "regulation", "law", "sec", "dof", "congress", "senate",
            "marcos", "president",
        ],
    ),
    (
        "International Trade",
        &[
            "trade", "export", "import", "international", "global", "foreign", "overseas",
            "tariff",
        ],
    ),
    (
        "Economic Indicators",
        &[
            "gdp", "inflation", "growth", "economy", "economic", "recession", "recovery",
        ],
    ),
    (
        "Companies",
        &[
            "corp", "corporation", "inc", "company", "business", "profit", "earnings", "revenue",
            "income", "stockholders",
        ],
    ),
    (
        "Health & Medical",
        &[
            "health", "medical", "hospital", "healthcare", "medicine", "pharmaceutical", "doh",
        ],
    ),
];

/// Fallback category when no keyword matches.
const DEFAULT_CATEGORY: &str = "General Business";

/// Categorize a headline by keywords in the title and description.
pub fn categorize(title: &str, description: &str) -> String {
    let text = format!("{} {}", title, description).to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return (*category).to_string();
        }
    }
    DEFAULT_CATEGORY.to_string()
}

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // positive
        ("gain", 0.5),
        ("gains", 0.5),
        ("rally", 0.6),
        ("rallies", 0.6),
        ("surge", 0.7),
        ("surges", 0.7),
        ("rise", 0.4),
        ("rises", 0.4),
        ("climb", 0.4),
        ("climbs", 0.4),
        ("growth", 0.5),
        ("grows", 0.4),
        ("profit", 0.5),
        ("profits", 0.5),
        ("record", 0.3),
        ("strong", 0.4),
        ("stronger", 0.4),
        ("boost", 0.5),
        ("boosts", 0.5),
        ("recovery", 0.5),
        ("recovers", 0.5),
        ("rebound", 0.5),
        ("rebounds", 0.5),
        ("upbeat", 0.5),
        ("optimistic", 0.6),
        ("expands", 0.4),
        ("expansion", 0.4),
        ("wins", 0.4),
        ("approves", 0.3),
        ("improves", 0.4),
        ("higher", 0.3),
        ("up", 0.2),
        // negative
        ("loss", -0.5),
        ("losses", -0.5),
        ("decline", -0.5),
        ("declines", -0.5),
        ("drop", -0.4),
        ("drops", -0.4),
        ("fall", -0.4),
        ("falls", -0.4),
        ("slump", -0.6),
        ("slumps", -0.6),
        ("plunge", -0.7),
        ("plunges", -0.7),
        ("crash", -0.8),
        ("weak", -0.4),
        ("weaker", -0.4),
        ("concern", -0.4),
        ("concerns", -0.4),
        ("risk", -0.3),
        ("risks", -0.3),
        ("deficit", -0.5),
        ("debt", -0.3),
        ("cut", -0.3),
        ("cuts", -0.3),
        ("warns", -0.5),
        ("warning", -0.5),
        ("fears", -0.5),
        ("crisis", -0.7),
        ("shortage", -0.5),
        ("slowdown", -0.5),
        ("downturn", -0.6),
        ("default", -0.6),
        ("lower", -0.3),
        ("down", -0.2),
    ]
    .into_iter()
    .collect()
});

fn is_negator(token: &str) -> bool {
    matches!(token, "not" | "no" | "never" | "without" | "despite")
}

/// Sentiment of one headline: combined polarity plus coarse labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    /// Mean lexicon polarity over matched tokens, rounded to 3 decimals.
    pub score: f64,
    pub label: &'static str,
    pub emotion: &'static str,
}

impl Sentiment {
    const NEUTRAL: Sentiment = Sentiment {
        score: 0.0,
        label: "Neutral",
        emotion: "Neutral",
    };
}

/// Score the sentiment of a piece of headline text.
///
/// Tokens are matched against the lexicon; a negator within the three
/// preceding tokens inverts a token's polarity ("no growth" scores
/// negative). The final score is the mean over matched tokens, so a single
/// strong word is not diluted by headline length.
pub fn sentiment(text: &str) -> Sentiment {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
        .collect();

    let mut sum = 0.0;
    let mut matched = 0usize;
    for i in 0..tokens.len() {
        let Some(base) = LEXICON.get(tokens[i].as_str()) else {
            continue;
        };
        let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
        sum += if negated { -base } else { *base };
        matched += 1;
    }

    if matched == 0 {
        return Sentiment::NEUTRAL;
    }

    let score = (sum / matched as f64).clamp(-1.0, 1.0);
    let score = (score * 1000.0).round() / 1000.0;

    let (label, emotion) = if score >= 0.1 {
        ("Positive", if score > 0.3 { "Optimistic" } else { "Positive" })
    } else if score <= -0.1 {
        ("Negative", if score < -0.3 { "Concerning" } else { "Negative" })
    } else {
        ("Neutral", "Neutral")
    };

    Sentiment { score, label, emotion }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_first_match_wins() {
        // "bank" (Banking & Finance) appears before "stock" in table order.
        assert_eq!(
            categorize("Bank stocks rally", ""),
            "Banking & Finance"
        );
        assert_eq!(categorize("PSEi index climbs", ""), "Stock Market");
    }

    #[test]
    fn test_categorize_uses_description() {
        assert_eq!(
            categorize("Quiet day", "Meralco announces new power rates"),
            "Energy & Utilities"
        );
    }

    #[test]
    fn test_categorize_fallback() {
        assert_eq!(categorize("Misc headline", ""), "General Business");
    }

    #[test]
    fn test_sentiment_positive() {
        let s = sentiment("PSEi rallies as profits surge");
        assert_eq!(s.label, "Positive");
        assert_eq!(s.emotion, "Optimistic");
        assert!(s.score > 0.3);
    }

    #[test]
    fn test_sentiment_negative() {
        let s = sentiment("Peso slumps on debt fears");
        assert_eq!(s.label, "Negative");
        assert_eq!(s.emotion, "Concerning");
        assert!(s.score < -0.3);
    }

    #[test]
    fn test_sentiment_neutral_when_no_lexicon_hits() {
        let s = sentiment("BSP announces schedule of meetings");
        assert_eq!(s, Sentiment::NEUTRAL);
    }

    #[test]
    fn test_sentiment_negation_inverts() {
        let positive = sentiment("growth ahead");
        let negated = sentiment("no growth ahead");
        assert!(positive.score > 0.0);
        assert!(negated.score < 0.0);
    }

    #[test]
    fn test_sentiment_score_bounds() {
        let s = sentiment("crash crash crash crash crash");
        assert!(s.score >= -1.0);
        let s = sentiment("surge rally boost gain growth");
        assert!(s.score <= 1.0);
    }
}
