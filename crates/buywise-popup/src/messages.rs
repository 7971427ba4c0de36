//! Messages exchanged with the content bridge and the background relay.

use buywise_core::{AnalysisResult, ProductData};
use serde::{Deserialize, Serialize};

/// Request sent to the content bridge inside a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BridgeMessage {
    Ping,
    ScrapeProductData,
}

/// Bridge answer to [`BridgeMessage::ScrapeProductData`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReply {
    #[serde(default)]
    pub product_data: Option<ProductData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Request sent to the background relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RelayMessage {
    ProcessApiResults { data: Box<AnalysisResult> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayReply {
    pub status: String,
    #[serde(default)]
    pub processed_data: Option<AnalysisResult>,
    #[serde(default)]
    pub needs_refresh: bool,
}

impl RelayReply {
    pub const SUCCESS: &'static str = "success";

    #[must_use]
    pub fn success(processed_data: AnalysisResult) -> Self {
        Self {
            status: Self::SUCCESS.to_owned(),
            processed_data: Some(processed_data),
            needs_refresh: false,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}
