use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// The tab the popup was opened over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: i64,
    /// Document title, used when the scrape found no product title.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[async_trait]
pub trait TabResolver: Send + Sync {
    /// The active tab of the current window.
    async fn active_tab(&self) -> Result<Tab, HostError>;
}
