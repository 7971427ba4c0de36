//! Reliability self-check over a finished analysis.

use crate::summary::ReviewSummary;

const BASE_RELIABILITY: f64 = 70.0;
const ISSUE_PENALTY: f64 = 25.0;
const WARNING_PENALTY: f64 = 10.0;
const INSIGHT_BONUS: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfCheck {
    pub reliability_score: f64,
    pub reliability_level: &'static str,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub insights: Vec<String>,
}

/// Inspects a summary and its confidence score for weak spots.
///
/// Issues cost 25 reliability points, warnings 10; insights add 5 back.
#[must_use]
pub fn self_check(summary: &ReviewSummary, confidence_score: f64) -> SelfCheck {
    let mut check = SelfCheck::default();

    match summary.review_count {
        0 => check
            .issues
            .push("No reviews available for analysis".to_owned()),
        n @ 1..=2 => check.warnings.push(format!(
            "Very small sample size ({n} reviews) may lead to unreliable results"
        )),
        n @ 3..=9 => check.warnings.push(format!(
            "Limited sample size ({n} reviews) may affect confidence"
        )),
        n => check
            .insights
            .push(format!("Good sample size ({n} reviews) for reliable analysis")),
    }

    let sentiment = summary.sentiment_score;
    if sentiment > 0.8 {
        check.warnings.push(
            "Extremely positive sentiment may indicate biased or promotional reviews".to_owned(),
        );
    } else if sentiment < -0.8 {
        check
            .warnings
            .push("Extremely negative sentiment may indicate a review campaign or outliers".to_owned());
    } else if sentiment.abs() < 0.1 && summary.review_count > 0 {
        check
            .insights
            .push("Neutral sentiment suggests mixed or balanced opinions".to_owned());
    }

    if summary.review_count > 0 {
        let pros = summary.pros.len();
        let cons = summary.cons.len();
        if pros == 0 {
            check
                .warnings
                .push("No pros identified in the reviews".to_owned());
        }
        if cons == 0 {
            check
                .warnings
                .push("No cons identified in the reviews".to_owned());
        }
        if pros > 0 && cons > 0 {
            if pros > cons * 3 || cons > pros * 3 {
                check
                    .warnings
                    .push(format!("Significant imbalance between pros ({pros}) and cons ({cons})"));
            } else {
                check
                    .insights
                    .push("Balanced mix of pros and cons identified".to_owned());
            }
        }
    }

    if confidence_score < 30.0 {
        check
            .warnings
            .push("Very low confidence score indicates significant uncertainty".to_owned());
    } else if confidence_score < 50.0 {
        check
            .warnings
            .push("Low confidence score suggests caution when relying on this analysis".to_owned());
    } else if confidence_score > 90.0 {
        check
            .insights
            .push("Very high confidence score indicates strong consensus".to_owned());
    }

    #[allow(clippy::cast_precision_loss)]
    let score = BASE_RELIABILITY - ISSUE_PENALTY * check.issues.len() as f64
        - WARNING_PENALTY * check.warnings.len() as f64
        + INSIGHT_BONUS * check.insights.len() as f64;
    check.reliability_score = score.clamp(0.0, 100.0);
    check.reliability_level = reliability_level(check.reliability_score);
    check
}

fn reliability_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "High"
    } else if score >= 60.0 {
        "Medium"
    } else {
        "Low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(sentiment: f64, reviews: usize, pros: usize, cons: usize) -> ReviewSummary {
        ReviewSummary {
            overall_sentiment: "Neutral".to_owned(),
            sentiment_score: sentiment,
            sentiments: Vec::new(),
            pros: (0..pros).map(|i| format!("pro {i}")).collect(),
            cons: (0..cons).map(|i| format!("con {i}")).collect(),
            review_count: reviews,
        }
    }

    #[test]
    fn no_reviews_is_an_issue() {
        let check = self_check(&summary(0.0, 0, 0, 0), 25.0);
        assert_eq!(check.issues, vec!["No reviews available for analysis"]);
        // 70 - 25 (issue) - 10 (very low confidence)
        assert!((check.reliability_score - 35.0).abs() < f64::EPSILON);
        assert_eq!(check.reliability_level, "Low");
    }

    #[test]
    fn sample_size_warnings_follow_review_count() {
        let tiny = self_check(&summary(0.5, 2, 1, 1), 60.0);
        assert!(tiny.warnings[0].starts_with("Very small sample size (2 reviews)"));

        let limited = self_check(&summary(0.5, 7, 1, 1), 60.0);
        assert!(limited.warnings[0].starts_with("Limited sample size (7 reviews)"));

        let good = self_check(&summary(0.5, 25, 1, 1), 60.0);
        assert!(good.insights[0].starts_with("Good sample size (25 reviews)"));
    }

    #[test]
    fn extreme_sentiment_warns_about_bias() {
        let check = self_check(&summary(0.95, 20, 3, 2), 85.0);
        assert!(check.warnings.iter().any(|w| w.contains("promotional")));
    }

    #[test]
    fn imbalance_is_flagged() {
        let check = self_check(&summary(0.5, 20, 4, 1), 70.0);
        assert!(check
            .warnings
            .iter()
            .any(|w| w == "Significant imbalance between pros (4) and cons (1)"));
    }

    #[test]
    fn healthy_analysis_scores_high() {
        let check = self_check(&summary(0.5, 20, 3, 2), 95.0);
        assert!(check.issues.is_empty());
        assert!(check.warnings.is_empty());
        // 70 + 3 insights * 5
        assert!((check.reliability_score - 85.0).abs() < f64::EPSILON);
        assert_eq!(check.reliability_level, "High");
    }

    #[test]
    fn reliability_never_drops_below_zero() {
        let check = self_check(&summary(-0.95, 1, 0, 0), 10.0);
        assert!(check.reliability_score >= 0.0);
    }
}
