//! Data models shared by the extraction, scoring and reporting stages.
//!
//! - [`SentimentDistribution`]: three-way classifier output for one article
//! - [`Recommendation`]: the Buy / Hold / Sell call derived from net sentiment
//! - [`ArticleReport`]: what happened to a single candidate URL
//! - [`TopicReport`]: the full result of evaluating one topic
//!
//! Nothing here is persisted; the report exists so callers can print it as
//! a labelled line or as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probabilities for the `positive`, `negative` and `neutral` labels.
///
/// The classifier is a zero-shot multi-label model, so the three values are
/// each in `[0, 1]` but are not required to sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub negative: f64,
    #[serde(default)]
    pub neutral: f64,
}

impl SentimentDistribution {
    /// The "no signal" distribution used for blocked scrapes and failed calls.
    pub const ZERO: SentimentDistribution = SentimentDistribution {
        positive: 0.0,
        negative: 0.0,
        neutral: 0.0,
    };

    /// Fixture returned when live classification is disabled.
    pub const CANNED: SentimentDistribution = SentimentDistribution {
        positive: 0.20099657773971558,
        negative: 0.7393637895584106,
        neutral: 0.8971490263938904,
    };
}

/// Trading call derived from net sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy Stocks!",
            Recommendation::Hold => "Hold Stocks",
            Recommendation::Sell => "Sell Stocks!",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of processing one candidate URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    /// Text was extracted and handed to the sentiment adapter.
    Classified,
    /// Too few text blocks survived extraction; likely bot protection.
    Blocked,
    /// The page source provider returned an error.
    FetchFailed,
}

/// Per-article line item of a [`TopicReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleReport {
    pub url: String,
    pub status: ArticleStatus,
    /// Blocks kept by the extractor, headline included.
    pub kept: usize,
    /// Paragraphs discarded as too short.
    pub dropped: usize,
    pub distribution: SentimentDistribution,
    pub recommendation: Recommendation,
}

/// Result of evaluating a single topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    pub topic: String,
    /// RFC 3339 local timestamp of when the evaluation finished.
    pub evaluated_at: String,
    /// Whether live discovery and live classification were used.
    pub live: bool,
    pub articles: Vec<ArticleReport>,
    pub totals: SentimentDistribution,
    pub recommendation: Recommendation,
}

impl fmt::Display for TopicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Final Stock Assessment: {}", self.recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_fixture_values() {
        let canned = SentimentDistribution::CANNED;
        assert_eq!(canned.neutral, 0.8971490263938904);
        assert_eq!(canned.negative, 0.7393637895584106);
        assert_eq!(canned.positive, 0.20099657773971558);
        assert!(canned.positive - canned.negative < -0.5);
    }

    #[test]
    fn test_distribution_missing_labels_default_to_zero() {
        let d: SentimentDistribution = serde_json::from_str(r#"{"positive": 0.4}"#).unwrap();
        assert_eq!(d.positive, 0.4);
        assert_eq!(d.negative, 0.0);
        assert_eq!(d.neutral, 0.0);
    }

    #[test]
    fn test_recommendation_labels() {
        assert_eq!(Recommendation::Buy.to_string(), "Buy Stocks!");
        assert_eq!(Recommendation::Hold.to_string(), "Hold Stocks");
        assert_eq!(Recommendation::Sell.to_string(), "Sell Stocks!");
    }

    #[test]
    fn test_topic_report_display_and_serialization() {
        let report = TopicReport {
            topic: "dow jones".to_string(),
            evaluated_at: "2024-04-04T09:30:00+00:00".to_string(),
            live: false,
            articles: vec![ArticleReport {
                url: "https://example.com/a".to_string(),
                status: ArticleStatus::Blocked,
                kept: 2,
                dropped: 9,
                distribution: SentimentDistribution::ZERO,
                recommendation: Recommendation::Hold,
            }],
            totals: SentimentDistribution::ZERO,
            recommendation: Recommendation::Hold,
        };

        assert_eq!(report.to_string(), "Final Stock Assessment: Hold Stocks");

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""status":"blocked""#));
        assert!(json.contains(r#""recommendation":"hold""#));
    }
}
