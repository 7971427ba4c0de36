//! Spread and balance of per-review sentiment.

use buywise_core::ReviewConsistency;

use crate::summary::{round2, POLARITY_CUTOFF};

/// Reviews above these shares make the sample look one-sided.
const HIGH_BIAS_RATIO: f64 = 0.9;
const MEDIUM_BIAS_RATIO: f64 = 0.8;

const LOW_CONSISTENCY_DEVIATION: f64 = 0.6;
const MEDIUM_CONSISTENCY_DEVIATION: f64 = 0.4;
const SUSPICIOUS_DEVIATION: f64 = 0.2;

/// Measures how much the review scores agree and whether one polarity
/// dominates. `None` without reviews.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn check_consistency(sentiments: &[f32]) -> Option<ReviewConsistency> {
    if sentiments.is_empty() {
        return None;
    }

    let count = sentiments.len();
    let n = count as f64;
    let scores: Vec<f64> = sentiments.iter().copied().map(f64::from).collect();
    let average = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - average).powi(2)).sum::<f64>() / n;
    let std_deviation = variance.sqrt();

    let cutoff = f64::from(POLARITY_CUTOFF);
    let positive = scores.iter().filter(|&&s| s > cutoff).count();
    let negative = scores.iter().filter(|&&s| s < -cutoff).count();
    let positive_ratio = positive as f64 / n;
    let negative_ratio = negative as f64 / n;
    let neutral_ratio = (count - positive - negative) as f64 / n;

    let (bias_level, bias_explanation) = if positive_ratio > HIGH_BIAS_RATIO {
        ("High", "Reviews are overwhelmingly positive, which might indicate bias")
    } else if negative_ratio > HIGH_BIAS_RATIO {
        ("High", "Reviews are overwhelmingly negative, which might indicate bias")
    } else if positive_ratio > MEDIUM_BIAS_RATIO {
        ("Medium", "Reviews skew heavily positive")
    } else if negative_ratio > MEDIUM_BIAS_RATIO {
        ("Medium", "Reviews skew heavily negative")
    } else {
        ("Low", "Reviews appear balanced")
    };

    let (consistency_level, consistency_explanation) =
        if std_deviation > LOW_CONSISTENCY_DEVIATION {
            ("Low", "Sentiments vary widely across reviews")
        } else if std_deviation > MEDIUM_CONSISTENCY_DEVIATION {
            ("Medium", "Some variation in review sentiments")
        } else {
            ("High", "Reviews are highly consistent in sentiment")
        };

    let mut insights = Vec::new();
    if count < 5 {
        insights.push("Sample size is very small for reliable sentiment analysis".to_owned());
    } else if count < 10 {
        insights.push("Limited sample size may affect confidence in analysis".to_owned());
    }
    if average.abs() < 0.1 {
        insights.push("Overall sentiment is very neutral, suggesting mixed opinions".to_owned());
    }
    if neutral_ratio > 0.5 {
        insights.push(
            "High proportion of neutral reviews suggests indecision or lukewarm reception"
                .to_owned(),
        );
    }
    if std_deviation < SUSPICIOUS_DEVIATION && count > 10 {
        insights.push("Unusually consistent sentiments might suggest artificial reviews".to_owned());
    }

    Some(ReviewConsistency {
        review_count: u32::try_from(count).unwrap_or(u32::MAX),
        avg_sentiment: round2(average),
        std_deviation: round2(std_deviation),
        positive_ratio: round2(positive_ratio),
        negative_ratio: round2(negative_ratio),
        neutral_ratio: round2(neutral_ratio),
        bias_level: bias_level.to_owned(),
        bias_explanation: bias_explanation.to_owned(),
        consistency_level: consistency_level.to_owned(),
        consistency_explanation: consistency_explanation.to_owned(),
        insights,
    })
}
