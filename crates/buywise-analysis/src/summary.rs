//! Review sentiment summary with pros/cons extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::scorer::lexicon_score;

/// Reviews (and sentences) above this score count as positive, below its
/// negation as negative.
pub(crate) const POLARITY_CUTOFF: f32 = 0.3;

/// Maximum pros and cons kept in a summary.
const MAX_ITEMS: usize = 5;

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("sentence regex is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    /// Label: `Positive`, `Negative`, `Neutral`, or `Unknown` without reviews.
    pub overall_sentiment: String,
    /// Mean review score rounded to two decimals.
    pub sentiment_score: f64,
    pub sentiments: Vec<f32>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub review_count: usize,
}

/// Summarizes `reviews` into an overall sentiment and up to five pros/cons.
///
/// Pros are positive sentences taken from positive reviews; cons are
/// negative sentences taken from negative reviews. Duplicates are dropped
/// keeping first occurrence order.
#[must_use]
pub fn summarize_reviews(reviews: &[String]) -> ReviewSummary {
    if reviews.is_empty() {
        return ReviewSummary {
            overall_sentiment: "Unknown".to_owned(),
            sentiment_score: 0.0,
            sentiments: Vec::new(),
            pros: Vec::new(),
            cons: Vec::new(),
            review_count: 0,
        };
    }

    let sentiments: Vec<f32> = reviews.iter().map(|r| lexicon_score(r)).collect();
    #[allow(clippy::cast_precision_loss)]
    let average = f64::from(sentiments.iter().sum::<f32>()) / sentiments.len() as f64;

    let mut pros = Vec::new();
    let mut cons = Vec::new();
    for (review, &score) in reviews.iter().zip(&sentiments) {
        if score > POLARITY_CUTOFF {
            collect_sentences(review, |s| s > POLARITY_CUTOFF, &mut pros);
        } else if score < -POLARITY_CUTOFF {
            collect_sentences(review, |s| s < -POLARITY_CUTOFF, &mut cons);
        }
    }

    ReviewSummary {
        overall_sentiment: sentiment_label(average).to_owned(),
        sentiment_score: round2(average),
        sentiments,
        pros,
        cons,
        review_count: reviews.len(),
    }
}

/// Maps a mean score in `[-1, 1]` to its label.
#[must_use]
pub fn sentiment_label(score: f64) -> &'static str {
    if score > f64::from(POLARITY_CUTOFF) {
        "Positive"
    } else if score < -f64::from(POLARITY_CUTOFF) {
        "Negative"
    } else {
        "Neutral"
    }
}

fn collect_sentences(review: &str, keep: impl Fn(f32) -> bool, out: &mut Vec<String>) {
    for sentence in SENTENCE_RE.find_iter(review) {
        if out.len() >= MAX_ITEMS {
            return;
        }
        let sentence = sentence.as_str().trim();
        if sentence.is_empty() || !keep(lexicon_score(sentence)) {
            continue;
        }
        if !out.iter().any(|existing| existing == sentence) {
            out.push(sentence.to_owned());
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
