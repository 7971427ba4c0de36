//! Confidence score derived from a review summary.
//!
//! Weighted blend of four components, each on a 0–100 scale before
//! weighting:
//!
//! | Component   | Weight | Source                                        |
//! |-------------|--------|-----------------------------------------------|
//! | sentiment   | 0.5    | `(sentiment_score + 1) * 50`                  |
//! | review count| 0.3    | `log10(n + 1) / log10(11)`, capped at 1       |
//! | specificity | 0.1    | average pro/con length and count              |
//! | balance     | 0.1    | pros share of pros+cons, best around 0.6      |

use buywise_core::ConfidenceComponents;

use crate::summary::ReviewSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScore {
    /// Integer score in `0..=100`.
    pub score: f64,
    pub level: &'static str,
    pub explanation: String,
    pub components: ConfidenceComponents,
}

/// Calculates the confidence score for a summary.
#[must_use]
pub fn calculate_confidence(summary: &ReviewSummary) -> ConfidenceScore {
    let sentiment = summary.sentiment_score;
    let base = (sentiment + 1.0) * 50.0;

    #[allow(clippy::cast_precision_loss)]
    let review_factor = if summary.review_count > 0 {
        ((summary.review_count as f64 + 1.0).log10() / 11_f64.log10()).min(1.0)
    } else {
        0.0
    };

    let pros_specificity = item_specificity(&summary.pros);
    let cons_specificity = item_specificity(&summary.cons);
    let specificity = match (summary.pros.is_empty(), summary.cons.is_empty()) {
        (false, false) => (pros_specificity + cons_specificity) / 2.0,
        // Only pros, or only cons, reads as one-sided.
        (false, true) => pros_specificity * 0.8,
        (true, false) => cons_specificity * 0.7,
        (true, true) => 0.0,
    };

    let balance = balance_factor(summary.pros.len(), summary.cons.len());

    let components = ConfidenceComponents {
        sentiment_component: round1(0.5 * base),
        review_count_component: round1(0.3 * review_factor * 100.0),
        specificity_component: round1(0.1 * specificity * 100.0),
        balance_component: round1(0.1 * balance * 100.0),
    };

    let raw = 0.5 * base
        + 0.3 * review_factor * 100.0
        + 0.1 * specificity * 100.0
        + 0.1 * balance * 100.0;
    let score = raw.clamp(0.0, 100.0).round();

    let explanation = format!(
        "Confidence score of {score}% calculated based on:\n\
         • {} points from sentiment score ({sentiment:.2})\n\
         • {} points from review count ({} reviews)\n\
         • {} points from review specificity\n\
         • {} points from pros/cons balance",
        components.sentiment_component,
        components.review_count_component,
        summary.review_count,
        components.specificity_component,
        components.balance_component,
    );

    ConfidenceScore {
        score,
        level: confidence_level(score),
        explanation,
        components,
    }
}

/// Text interpretation of a confidence score.
#[must_use]
pub fn confidence_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "Very High Confidence: Reviews strongly suggest this is a reliable product"
    } else if score >= 65.0 {
        "High Confidence: Reviews indicate this is likely a good product"
    } else if score >= 50.0 {
        "Moderate Confidence: Reviews show mixed but generally positive signals"
    } else if score >= 35.0 {
        "Low Confidence: Reviews raise some concerns about this product"
    } else {
        "Very Low Confidence: Reviews suggest significant issues with this product"
    }
}

#[allow(clippy::cast_precision_loss)]
fn item_specificity(items: &[String]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let total_chars: usize = items.iter().map(|i| i.chars().count()).sum();
    let average_len = total_chars as f64 / items.len() as f64;
    (average_len / 100.0).min(1.0) * 0.7 + (items.len() as f64 / 5.0).min(1.0) * 0.3
}

#[allow(clippy::cast_precision_loss)]
fn balance_factor(pros: usize, cons: usize) -> f64 {
    if pros == 0 || cons == 0 {
        return 0.0;
    }
    let ratio = pros as f64 / (pros + cons) as f64;
    (1.0 - (0.6 - ratio).abs() * 1.25).clamp(0.0, 1.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(sentiment: f64, reviews: usize, pros: &[&str], cons: &[&str]) -> ReviewSummary {
        ReviewSummary {
            overall_sentiment: "Positive".to_owned(),
            sentiment_score: sentiment,
            sentiments: Vec::new(),
            pros: pros.iter().map(|p| (*p).to_owned()).collect(),
            cons: cons.iter().map(|c| (*c).to_owned()).collect(),
            review_count: reviews,
        }
    }

    #[test]
    fn no_reviews_scores_on_sentiment_alone() {
        let result = calculate_confidence(&summary(0.0, 0, &[], &[]));
        assert!((result.score - 25.0).abs() < f64::EPSILON);
        assert!((result.components.review_count_component - 0.0).abs() < f64::EPSILON);
        assert!(result.level.starts_with("Very Low Confidence"));
    }

    #[test]
    fn ten_reviews_earn_full_review_component() {
        let result = calculate_confidence(&summary(0.0, 10, &[], &[]));
        assert!((result.components.review_count_component - 30.0).abs() < 1e-9);
        // 25 from sentiment + 30 from review count
        assert!((result.score - 55.0).abs() < f64::EPSILON);
        assert!(result.level.starts_with("Moderate Confidence"));
    }

    #[test]
    fn review_component_caps_beyond_ten_reviews() {
        let ten = calculate_confidence(&summary(0.5, 10, &[], &[]));
        let thousand = calculate_confidence(&summary(0.5, 1000, &[], &[]));
        assert!((ten.score - thousand.score).abs() < f64::EPSILON);
    }

    #[test]
    fn balance_peaks_near_sixty_percent_pros() {
        assert!((balance_factor(3, 2) - 1.0).abs() < 1e-9);
        assert!(balance_factor(1, 4) < balance_factor(3, 2));
        assert!((balance_factor(4, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_sided_items_are_discounted() {
        let pros_only = calculate_confidence(&summary(0.0, 0, &["Great camera"], &[]));
        let cons_only = calculate_confidence(&summary(0.0, 0, &[], &["Great camera"]));
        assert!(
            pros_only.components.specificity_component
                > cons_only.components.specificity_component
        );
    }

    #[test]
    fn score_is_clamped_and_rounded() {
        let long = "A very detailed and specific observation about the build quality and the hinge mechanism over months";
        let result = calculate_confidence(&summary(1.0, 500, &[long; 5], &[long; 3]));
        assert!(result.score <= 100.0);
        assert!((result.score - result.score.round()).abs() < f64::EPSILON);
        assert!(result.level.starts_with("Very High Confidence"));
    }

    #[test]
    fn explanation_mentions_review_count() {
        let result = calculate_confidence(&summary(0.25, 7, &["Nice"], &["Slow"]));
        assert!(result.explanation.contains("(7 reviews)"));
        assert!(result.explanation.contains("(0.25)"));
    }
}
