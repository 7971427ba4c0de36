//! Local review analysis used by the companion server.
//!
//! Scores review text with a product-review lexicon, extracts pros and cons,
//! derives a confidence score and a reliability self-check, measures how
//! consistent the reviews are, classifies the product, and evaluates
//! how well a product fits a shopper's stored preferences.

pub mod category;
pub mod confidence;
pub mod consistency;
pub mod pipeline;
pub mod preference;
pub mod scorer;
pub mod self_check;
pub mod summary;

pub use category::{classify_product, OTHER_CATEGORY};
pub use confidence::{calculate_confidence, ConfidenceScore};
pub use consistency::check_consistency;
pub use pipeline::{analyze_product, PARTIAL_REVIEW_LIMIT};
pub use preference::{evaluate_preference_match, process_preferences, PreferenceMatch};
pub use scorer::lexicon_score;
pub use self_check::{self_check, SelfCheck};
pub use summary::{summarize_reviews, ReviewSummary};
