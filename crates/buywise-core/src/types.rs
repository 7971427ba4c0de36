//! JSON bodies exchanged between the popup, the relay, and the companion server.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Site recorded for a scrape that did not report one.
pub const DEFAULT_SITE: &str = "amazon.com";

/// `status` value the analysis endpoint uses to announce a prior analysis.
pub const MEMORY_MATCH_STATUS: &str = "memory_match_found";

/// Product record produced by the content bridge for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub reviews: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<UserPreferences>,
    /// Asks the server to analyze every review rather than a truncated sample.
    #[serde(default)]
    pub full_details: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force_new_analysis: bool,
}

impl ProductData {
    /// Parses the leading numeric amount out of a display price such as
    /// `"$1,199.99"`.
    #[must_use]
    pub fn price_value(&self) -> Option<f64> {
        let raw = self.price.as_deref()?;
        let digits: String = raw
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .filter(|c| *c != ',')
            .collect();
        digits.parse().ok()
    }
}

/// Inclusive price bounds. `max: None` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0.0, max: None }
    }
}

impl PriceRange {
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min <= 0.0 && self.max.is_none()
    }
}

/// Shopper preferences. Missing fields in stored or submitted JSON fall back
/// to the defaults below, so partial records merge over the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub price_range: PriceRange,
    pub brand_preferences: BTreeSet<String>,
    pub feature_priorities: BTreeSet<String>,
    pub avoid_features: BTreeSet<String>,
    pub review_threshold: u32,
    pub sentiment_threshold: f64,
    pub confidence_threshold: f64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            price_range: PriceRange::default(),
            brand_preferences: BTreeSet::new(),
            feature_priorities: BTreeSet::new(),
            avoid_features: BTreeSet::new(),
            review_threshold: 10,
            sentiment_threshold: 0.5,
            confidence_threshold: 70.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceComponents {
    pub sentiment_component: f64,
    pub review_count_component: f64,
    pub specificity_component: f64,
    pub balance_component: f64,
}

/// Agreement and polarity balance across individual review scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConsistency {
    pub review_count: u32,
    pub avg_sentiment: f64,
    pub std_deviation: f64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub neutral_ratio: f64,
    /// `Low`, `Medium` or `High`.
    pub bias_level: String,
    pub bias_explanation: String,
    /// `Low`, `Medium` or `High`.
    pub consistency_level: String,
    pub consistency_explanation: String,
    pub insights: Vec<String>,
}

/// Finished analysis as returned by either backend endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub confidence_score: f64,
    pub confidence_level: String,
    pub sentiment_score: f64,
    pub overall_sentiment: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub review_count: u32,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_match_analysis: Option<String>,
    pub preference_matches: Vec<String>,
    pub preference_mismatches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_components: Option<ConfidenceComponents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability_level: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_consistency: Option<ReviewConsistency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

/// Reference to a stored analysis offered for reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingAnalysis {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Body of a `memory_match_found` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMatchBody {
    pub status: String,
    pub existing_analysis: ExistingAnalysis,
}

impl MemoryMatchBody {
    #[must_use]
    pub fn new(existing_analysis: ExistingAnalysis) -> Self {
        Self {
            status: MEMORY_MATCH_STATUS.to_owned(),
            existing_analysis,
        }
    }
}

/// Error envelope used by every non-success backend response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// What the analysis endpoint answered, resolved once at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectOutcome {
    Complete(Box<AnalysisResult>),
    MemoryMatch(ExistingAnalysis),
}

impl DetectOutcome {
    /// Classifies a decoded response body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the body matches neither shape.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        if body.get("status").and_then(Value::as_str) == Some(MEMORY_MATCH_STATUS) {
            let matched: MemoryMatchBody = serde_json::from_value(body)?;
            return Ok(Self::MemoryMatch(matched.existing_analysis));
        }
        let result: AnalysisResult = serde_json::from_value(body)?;
        Ok(Self::Complete(Box::new(result)))
    }
}

/// Body of `POST /api/handle-memory-choice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum MemoryChoiceRequest {
    UseExisting { product_id: String },
    NewAnalysis { product_data: Box<ProductData> },
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
