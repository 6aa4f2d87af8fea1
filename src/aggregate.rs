//! Folding per-article sentiment into a topic-level decision.
//!
//! Totals are plain elementwise sums: every article counts the same no
//! matter how long it was or how confident the classifier felt. The decision
//! looks only at net sentiment (`positive - negative`).

use crate::models::{Recommendation, SentimentDistribution};

/// |net| strictly below this is a Hold.
pub const HOLD_BAND: f64 = 0.3;

/// Add `distribution` into `totals`.
pub fn update(
    totals: SentimentDistribution,
    distribution: &SentimentDistribution,
) -> SentimentDistribution {
    SentimentDistribution {
        positive: totals.positive + distribution.positive,
        negative: totals.negative + distribution.negative,
        neutral: totals.neutral + distribution.neutral,
    }
}

/// Decide Buy / Hold / Sell from the three scores.
///
/// `_neutral` is accepted so callers can pass a whole distribution's worth of
/// scores, but it plays no part in the decision.
pub fn assess(_neutral: f64, negative: f64, positive: f64) -> Recommendation {
    let net = positive - negative;
    if net.abs() < HOLD_BAND {
        Recommendation::Hold
    } else if net > 0.0 {
        Recommendation::Buy
    } else {
        Recommendation::Sell
    }
}

/// [`assess`] applied to a distribution.
pub fn assess_distribution(d: &SentimentDistribution) -> Recommendation {
    assess(d.neutral, d.negative, d.positive)
}
