//! Content-bridge readiness and scraping.

use std::time::Duration;

use async_trait::async_trait;
use buywise_core::ProductData;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{HostError, PopupError};
use crate::messages::{BridgeMessage, ScrapeReply};

/// Messaging channel to the content bridge running inside a tab.
#[async_trait]
pub trait PageBridge: Send + Sync {
    /// Sends `message` to the bridge in `tab_id`. `Ok(None)` means nothing
    /// in the page answered.
    async fn send_message(
        &self,
        tab_id: i64,
        message: BridgeMessage,
    ) -> Result<Option<Value>, HostError>;

    /// Injects the bridge script into `tab_id`.
    async fn inject(&self, tab_id: i64) -> Result<(), HostError>;
}

/// Makes sure a bridge answers in `tab_id`.
///
/// Probes once; when nothing answers, injects the bridge, waits `settle`
/// and probes again. A second silent probe is final.
///
/// # Errors
///
/// Returns [`PopupError::BridgeUnavailable`] when injection fails or the
/// bridge stays silent after it.
pub async fn ensure_bridge(
    bridge: &dyn PageBridge,
    tab_id: i64,
    settle: Duration,
) -> Result<(), PopupError> {
    if probe(bridge, tab_id).await {
        debug!(tab_id, "content bridge already present");
        return Ok(());
    }

    info!(tab_id, "content bridge not answering, injecting");
    bridge
        .inject(tab_id)
        .await
        .map_err(|e| PopupError::BridgeUnavailable {
            tab_id,
            reason: format!("injection failed: {e}"),
        })?;

    tokio::time::sleep(settle).await;

    if probe(bridge, tab_id).await {
        debug!(tab_id, "content bridge answering after injection");
        Ok(())
    } else {
        warn!(tab_id, "content bridge still silent after injection");
        Err(PopupError::BridgeUnavailable {
            tab_id,
            reason: "no response after injection".to_owned(),
        })
    }
}

/// Asks the bridge for the page's product record and any scrape warning.
///
/// # Errors
///
/// Returns [`PopupError::ScrapeFailed`] when the bridge errors, stays
/// silent, answers in an unknown shape, or found no product.
pub async fn request_scrape(
    bridge: &dyn PageBridge,
    tab_id: i64,
) -> Result<(ProductData, Option<String>), PopupError> {
    let raw = bridge
        .send_message(tab_id, BridgeMessage::ScrapeProductData)
        .await
        .map_err(|e| PopupError::ScrapeFailed(e.to_string()))?
        .ok_or_else(|| PopupError::ScrapeFailed("no response from the content bridge".to_owned()))?;

    let reply: ScrapeReply = serde_json::from_value(raw)
        .map_err(|e| PopupError::ScrapeFailed(format!("unexpected bridge reply: {e}")))?;

    match reply.product_data {
        Some(product) => {
            debug!(
                tab_id,
                review_count = product.reviews.len(),
                has_warning = reply.warning.is_some(),
                "scrape complete"
            );
            Ok((product, reply.warning))
        }
        None => Err(PopupError::ScrapeFailed(
            reply
                .warning
                .unwrap_or_else(|| "no product data found".to_owned()),
        )),
    }
}

async fn probe(bridge: &dyn PageBridge, tab_id: i64) -> bool {
    match bridge.send_message(tab_id, BridgeMessage::Ping).await {
        Ok(Some(answer)) => is_truthy(&answer),
        Ok(None) => false,
        Err(e) => {
            debug!(tab_id, error = %e, "bridge ping failed");
            false
        }
    }
}

/// Script-style truthiness of a ping answer.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
