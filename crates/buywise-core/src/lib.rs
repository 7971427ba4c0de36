//! Shared wire model and configuration for the `BuyWise` purchase advisor.

mod app_config;
mod config;
pub mod location;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{normalize_server_url, ServerLocation, DEFAULT_SERVER_URL};
pub use types::{
    AnalysisResult, ConfidenceComponents, DetectOutcome, ErrorBody, ExistingAnalysis,
    MemoryChoiceRequest, MemoryMatchBody, PriceRange, ProductData, ReviewConsistency,
    UserPreferences,
    DEFAULT_SITE, MEMORY_MATCH_STATUS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
