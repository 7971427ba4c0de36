//! End-to-end analysis of one scraped product.

use buywise_core::{AnalysisResult, ProductData};

use crate::category::classify_product;
use crate::confidence::calculate_confidence;
use crate::consistency::check_consistency;
use crate::self_check::self_check;
use crate::summary::summarize_reviews;

/// Reviews read when the request did not ask for full details.
pub const PARTIAL_REVIEW_LIMIT: usize = 10;

/// Summarizes, scores and self-checks the reviews of `product`, and tags
/// it with a category from its title.
///
/// Preference matching is left to the caller, which knows whether the
/// shopper supplied preferences at all.
#[must_use]
pub fn analyze_product(product: &ProductData) -> AnalysisResult {
    let reviews = if product.full_details {
        &product.reviews[..]
    } else {
        &product.reviews[..product.reviews.len().min(PARTIAL_REVIEW_LIMIT)]
    };

    let summary = summarize_reviews(reviews);
    let confidence = calculate_confidence(&summary);
    let check = self_check(&summary, confidence.score);
    let consistency = check_consistency(&summary.sentiments);
    let category = classify_product(&product.title);

    tracing::info!(
        site = %product.site,
        reviews = reviews.len(),
        pros = summary.pros.len(),
        cons = summary.cons.len(),
        confidence = confidence.score,
        reliability = check.reliability_score,
        category,
        "product analysis complete"
    );

    AnalysisResult {
        title: Some(product.title.clone()),
        confidence_score: confidence.score,
        confidence_level: confidence.level.to_owned(),
        sentiment_score: summary.sentiment_score,
        overall_sentiment: summary.overall_sentiment,
        pros: summary.pros,
        cons: summary.cons,
        review_count: u32::try_from(summary.review_count).unwrap_or(u32::MAX),
        warnings: check.warnings,
        confidence_explanation: Some(confidence.explanation),
        confidence_components: Some(confidence.components),
        reliability_score: Some(check.reliability_score),
        reliability_level: Some(check.reliability_level.to_owned()),
        issues: check.issues,
        insights: check.insights,
        review_consistency: consistency,
        product_category: Some(category.to_owned()),
        ..AnalysisResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(reviews: usize, full_details: bool) -> ProductData {
        ProductData {
            title: "Instant Pot Duo 7-in-1".to_owned(),
            site: "amazon.com".to_owned(),
            reviews: (0..reviews)
                .map(|i| format!("Review {i}: great pressure cooker, easy to clean."))
                .collect(),
            full_details,
            ..ProductData::default()
        }
    }

    #[test]
    fn partial_mode_caps_reviews() {
        let result = analyze_product(&product(25, false));
        assert_eq!(result.review_count, 10);
    }

    #[test]
    fn full_details_reads_every_review() {
        let result = analyze_product(&product(25, true));
        assert_eq!(result.review_count, 25);
        assert_eq!(result.overall_sentiment, "Positive");
        assert_eq!(result.title.as_deref(), Some("Instant Pot Duo 7-in-1"));
    }

    #[test]
    fn empty_reviews_produce_unknown_low_confidence() {
        let result = analyze_product(&product(0, true));
        assert_eq!(result.overall_sentiment, "Unknown");
        assert_eq!(result.review_count, 0);
        assert_eq!(result.issues, vec!["No reviews available for analysis"]);
        assert!(result.confidence_level.starts_with("Very Low Confidence"));
        assert!(result.preference_match_score.is_none());
    }

    #[test]
    fn extras_are_populated() {
        let result = analyze_product(&product(3, true));
        assert!(result.confidence_explanation.is_some());
        assert!(result.confidence_components.is_some());
        assert!(result.reliability_level.is_some());
    }

    #[test]
    fn consistency_and_category_are_attached() {
        let mut headphones = product(4, true);
        headphones.title = "Sony WH-1000XM5 Wireless Headphones".to_owned();
        let result = analyze_product(&headphones);

        assert_eq!(result.product_category.as_deref(), Some("headphones"));
        let consistency = result.review_consistency.expect("consistency for reviewed product");
        assert_eq!(consistency.review_count, 4);
        assert_eq!(consistency.consistency_level, "High");
    }

    #[test]
    fn no_reviews_has_no_consistency() {
        let result = analyze_product(&product(0, true));
        assert!(result.review_consistency.is_none());
        assert_eq!(result.product_category.as_deref(), Some("other"));
    }
}
