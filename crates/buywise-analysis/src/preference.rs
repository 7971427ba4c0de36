//! Shopper preference normalization and preference-match evaluation.

use std::collections::BTreeSet;

use buywise_core::{AnalysisResult, ProductData, UserPreferences};

/// Outcome of checking one product against a preference record.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceMatch {
    /// Share of evaluated checks that were satisfied, `0..=100`, rounded.
    pub score: f64,
    pub analysis: String,
    pub matches: Vec<String>,
    pub mismatches: Vec<String>,
}

impl PreferenceMatch {
    /// Copies the match fields onto an analysis result.
    pub fn apply_to(self, result: &mut AnalysisResult) {
        result.preference_match_score = Some(self.score);
        result.preference_match_analysis = Some(self.analysis);
        result.preference_matches = self.matches;
        result.preference_mismatches = self.mismatches;
    }
}

/// Normalizes submitted preferences over the defaults.
///
/// Blank list entries are dropped and the rest trimmed, thresholds are
/// clamped to their ranges, a negative minimum price becomes zero, and an
/// inverted price range is swapped.
#[must_use]
pub fn process_preferences(preferences: Option<UserPreferences>) -> UserPreferences {
    let Some(mut prefs) = preferences else {
        return UserPreferences::default();
    };

    prefs.brand_preferences = clean_set(prefs.brand_preferences);
    prefs.feature_priorities = clean_set(prefs.feature_priorities);
    prefs.avoid_features = clean_set(prefs.avoid_features);

    prefs.sentiment_threshold = finite_or(prefs.sentiment_threshold, 0.5).clamp(0.0, 1.0);
    prefs.confidence_threshold = finite_or(prefs.confidence_threshold, 70.0).clamp(0.0, 100.0);

    let range = &mut prefs.price_range;
    range.min = finite_or(range.min, 0.0).max(0.0);
    range.max = range.max.filter(|max| max.is_finite());
    if let Some(max) = range.max {
        if max < range.min {
            range.max = Some(range.min);
            range.min = max.max(0.0);
        }
    }

    prefs
}

/// Checks `product` and its analysis against `prefs`.
///
/// Price is only evaluated when both a bounded range and a parseable price
/// exist; brands only when the shopper named some. The three thresholds are
/// always evaluated. Sentiment is compared after mapping `[-1, 1]` onto
/// `[0, 1]`.
#[must_use]
pub fn evaluate_preference_match(
    product: &ProductData,
    analysis: &AnalysisResult,
    prefs: &UserPreferences,
) -> PreferenceMatch {
    let mut matches = Vec::new();
    let mut mismatches = Vec::new();

    if !prefs.price_range.is_unbounded() {
        if let Some(price) = product.price_value() {
            let bounds = describe_range(prefs);
            if prefs.price_range.contains(price) {
                matches.push(format!("Price ${price:.2} is within your range ({bounds})"));
            } else {
                mismatches.push(format!("Price ${price:.2} is outside your range ({bounds})"));
            }
        }
    }

    if !prefs.brand_preferences.is_empty() {
        let title = product.title.to_lowercase();
        match prefs
            .brand_preferences
            .iter()
            .find(|brand| title.contains(&brand.to_lowercase()))
        {
            Some(brand) => matches.push(format!("Brand matches your preference: {brand}")),
            None => mismatches.push("Brand is not among your preferred brands".to_owned()),
        }
    }

    let pros = lowercase_all(&analysis.pros);
    let cons = lowercase_all(&analysis.cons);
    let reviews = lowercase_all(&product.reviews);

    for feature in &prefs.feature_priorities {
        let needle = feature.to_lowercase();
        if mentions(&pros, &needle) {
            matches.push(format!("Reviewers praise {feature}"));
        } else if mentions(&cons, &needle) {
            mismatches.push(format!("Reviewers complain about {feature}"));
        } else if mentions(&reviews, &needle) {
            matches.push(format!("Reviews mention {feature}"));
        } else {
            mismatches.push(format!("No reviews mention {feature}"));
        }
    }

    for feature in &prefs.avoid_features {
        let needle = feature.to_lowercase();
        if mentions(&cons, &needle) || mentions(&reviews, &needle) {
            mismatches.push(format!("Reviews mention {feature}, which you want to avoid"));
        } else {
            matches.push(format!("No mention of {feature}"));
        }
    }

    if analysis.review_count >= prefs.review_threshold {
        matches.push(format!(
            "Review count ({}) meets your minimum of {}",
            analysis.review_count, prefs.review_threshold
        ));
    } else {
        mismatches.push(format!(
            "Review count ({}) is below your minimum of {}",
            analysis.review_count, prefs.review_threshold
        ));
    }

    let normalized_sentiment = (analysis.sentiment_score + 1.0) / 2.0;
    if normalized_sentiment >= prefs.sentiment_threshold {
        matches.push(format!(
            "Sentiment ({normalized_sentiment:.2}) meets your threshold of {:.2}",
            prefs.sentiment_threshold
        ));
    } else {
        mismatches.push(format!(
            "Sentiment ({normalized_sentiment:.2}) is below your threshold of {:.2}",
            prefs.sentiment_threshold
        ));
    }

    if analysis.confidence_score >= prefs.confidence_threshold {
        matches.push(format!(
            "Confidence ({}) meets your threshold of {}",
            analysis.confidence_score, prefs.confidence_threshold
        ));
    } else {
        mismatches.push(format!(
            "Confidence ({}) is below your threshold of {}",
            analysis.confidence_score, prefs.confidence_threshold
        ));
    }

    let satisfied = matches.len();
    let evaluated = satisfied + mismatches.len();
    #[allow(clippy::cast_precision_loss)]
    let score = if evaluated == 0 {
        0.0
    } else {
        (100.0 * satisfied as f64 / evaluated as f64).round()
    };

    PreferenceMatch {
        score,
        analysis: describe_match(score, satisfied, evaluated),
        matches,
        mismatches,
    }
}

fn describe_match(score: f64, satisfied: usize, evaluated: usize) -> String {
    let verdict = if score >= 80.0 {
        "Strong match for your preferences"
    } else if score >= 50.0 {
        "Partial match for your preferences"
    } else {
        "Weak match for your preferences"
    };
    format!("{verdict}: {satisfied} of {evaluated} checks satisfied.")
}

fn describe_range(prefs: &UserPreferences) -> String {
    match prefs.price_range.max {
        Some(max) => format!("${:.2}–${max:.2}", prefs.price_range.min),
        None => format!("${:.2} and up", prefs.price_range.min),
    }
}

fn clean_set(items: BTreeSet<String>) -> BTreeSet<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|item| item.to_lowercase()).collect()
}

fn mentions(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|text| text.contains(needle))
}
