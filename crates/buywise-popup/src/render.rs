//! View model for an analysis result.

use buywise_core::AnalysisResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreColor {
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDisplay {
    pub text: String,
    pub color: ScoreColor,
}

/// One row of a rendered list. An empty source list renders as a single
/// [`ListItem::Placeholder`] the presenter fills with its own wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ListItem {
    Text(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferencePanel {
    pub score: ScoreDisplay,
    pub analysis: Option<String>,
    pub matches: Vec<String>,
    pub mismatches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub title: String,
    pub confidence: ScoreDisplay,
    pub confidence_level: String,
    pub sentiment: ScoreDisplay,
    pub overall_sentiment: String,
    pub review_count: u32,
    pub pros: Vec<ListItem>,
    pub cons: Vec<ListItem>,
    /// `None` hides the warnings section.
    pub warnings: Option<Vec<String>>,
    pub review_note: Option<String>,
    /// Present only when the result carries a preference match score.
    pub preference_panel: Option<PreferencePanel>,
}

/// Builds the view for `result`. Pure: the same input always yields the
/// same view, rebuilt from scratch.
#[must_use]
pub fn render(result: &AnalysisResult, title: &str) -> RenderedView {
    RenderedView {
        title: title.to_owned(),
        confidence: ScoreDisplay {
            text: format!("{}%", result.confidence_score.round()),
            color: confidence_color(result.confidence_score),
        },
        confidence_level: result.confidence_level.clone(),
        sentiment: ScoreDisplay {
            text: format!("{:.2}", result.sentiment_score),
            color: sentiment_color(result.sentiment_score),
        },
        overall_sentiment: result.overall_sentiment.clone(),
        review_count: result.review_count,
        pros: list_items(&result.pros),
        cons: list_items(&result.cons),
        warnings: (!result.warnings.is_empty()).then(|| result.warnings.clone()),
        review_note: result.review_note.clone(),
        preference_panel: result.preference_match_score.map(|score| PreferencePanel {
            score: ScoreDisplay {
                text: format!("{}%", score.round()),
                color: match_color(score),
            },
            analysis: result.preference_match_analysis.clone(),
            matches: result.preference_matches.clone(),
            mismatches: result.preference_mismatches.clone(),
        }),
    }
}

#[must_use]
pub fn confidence_color(score: f64) -> ScoreColor {
    if score >= 70.0 {
        ScoreColor::Green
    } else if score >= 40.0 {
        ScoreColor::Amber
    } else {
        ScoreColor::Red
    }
}

#[must_use]
pub fn sentiment_color(score: f64) -> ScoreColor {
    if score >= 0.3 {
        ScoreColor::Green
    } else if score <= -0.3 {
        ScoreColor::Red
    } else {
        ScoreColor::Amber
    }
}

#[must_use]
pub fn match_color(score: f64) -> ScoreColor {
    if score >= 80.0 {
        ScoreColor::Green
    } else if score >= 50.0 {
        ScoreColor::Amber
    } else {
        ScoreColor::Red
    }
}

fn list_items(items: &[String]) -> Vec<ListItem> {
    if items.is_empty() {
        vec![ListItem::Placeholder]
    } else {
        items.iter().cloned().map(ListItem::Text).collect()
    }
}
