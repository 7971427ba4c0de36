//! Hand-off of a finished analysis to the background relay.

use async_trait::async_trait;
use buywise_core::AnalysisResult;

use crate::error::{HostError, PopupError};
use crate::messages::{RelayMessage, RelayReply};

/// Background process that post-processes results before display.
#[async_trait]
pub trait ResultRelay: Send + Sync {
    async fn send(&self, message: RelayMessage) -> Result<RelayReply, HostError>;
}

/// A result accepted by the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedResult {
    pub result: AnalysisResult,
    /// The relay asks the page to be reloaded before the next attempt.
    pub needs_refresh: bool,
}

/// Sends `result` through the relay and returns its processed form.
///
/// # Errors
///
/// Returns [`PopupError::Relay`] when the relay fails, answers with a
/// non-success status, or returns no data.
pub async fn relay_result(
    relay: &dyn ResultRelay,
    result: AnalysisResult,
) -> Result<RelayedResult, PopupError> {
    let reply = relay
        .send(RelayMessage::ProcessApiResults {
            data: Box::new(result),
        })
        .await
        .map_err(|e| PopupError::Relay(e.to_string()))?;

    if !reply.is_success() {
        return Err(PopupError::Relay(format!(
            "relay answered with status \"{}\"",
            reply.status
        )));
    }

    let result = reply
        .processed_data
        .ok_or_else(|| PopupError::Relay("relay returned no processed data".to_owned()))?;
    Ok(RelayedResult {
        result,
        needs_refresh: reply.needs_refresh,
    })
}
