//! HTTP client for the purchase-advisor backend.
//!
//! Wraps `reqwest` with the backend's three endpoints and resolves every
//! response body into a typed value once, here, so callers never inspect
//! raw JSON. No request is retried; the user re-triggers the action.

use std::time::Duration;

use buywise_core::{
    AnalysisResult, DetectOutcome, ErrorBody, MemoryChoiceRequest, ProductData, ServerLocation,
};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;

pub const DETECT_PRODUCT_PATH: &str = "/api/detect-product";
pub const MEMORY_CHOICE_PATH: &str = "/api/handle-memory-choice";

/// Client for the advisor backend rooted at a [`ServerLocation`].
pub struct AdvisorClient {
    client: Client,
    location: ServerLocation,
}

impl AdvisorClient {
    /// Creates a client with a request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        location: ServerLocation,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, location })
    }

    #[must_use]
    pub fn location(&self) -> &ServerLocation {
        &self.location
    }

    /// `GET {base}/`. Any 2xx status means the server is alive; the body is ignored.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unreachable`] when no response arrives.
    /// - [`ClientError::UnexpectedStatus`] for a non-2xx status.
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let url = self.location.endpoint("/");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: url.clone(),
                source,
            })?;
        Self::require_success(response, &url).await?;
        tracing::debug!(url = %url, "backend health check passed");
        Ok(())
    }

    /// `POST {base}/api/detect-product`.
    ///
    /// Returns either a finished analysis or a reference to a stored one the
    /// server offers for reuse.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unreachable`] when no response arrives.
    /// - [`ClientError::UnexpectedStatus`] for a non-2xx status.
    /// - [`ClientError::Malformed`] when the body is not a recognizable shape.
    /// - [`ClientError::Server`] when a 2xx body only carries an `error`.
    pub async fn detect_product(&self, product: &ProductData) -> Result<DetectOutcome, ClientError> {
        tracing::info!(
            title = %product.title,
            site = %product.site,
            review_count = product.reviews.len(),
            "requesting product analysis"
        );
        let (url, body) = self.post_json(DETECT_PRODUCT_PATH, product).await?;

        if body.get("confidence_score").is_none() {
            if let Some(message) = error_field(&body) {
                return Err(ClientError::Server(message));
            }
        }

        DetectOutcome::from_value(body).map_err(|source| ClientError::Malformed { url, source })
    }

    /// `POST {base}/api/handle-memory-choice`.
    ///
    /// # Errors
    ///
    /// Same as [`AdvisorClient::detect_product`]; an `error` field anywhere in
    /// a 2xx body is surfaced verbatim as [`ClientError::Server`].
    pub async fn handle_memory_choice(
        &self,
        choice: &MemoryChoiceRequest,
    ) -> Result<AnalysisResult, ClientError> {
        let (url, body) = self.post_json(MEMORY_CHOICE_PATH, choice).await?;

        if let Some(message) = error_field(&body) {
            return Err(ClientError::Server(message));
        }

        serde_json::from_value(body).map_err(|source| ClientError::Malformed { url, source })
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<(String, Value), ClientError> {
        let url = self.location.endpoint(path);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: url.clone(),
                source,
            })?;
        let response = Self::require_success(response, &url).await?;
        let text = response.text().await?;
        let body = serde_json::from_str(&text).map_err(|source| ClientError::Malformed {
            url: url.clone(),
            source,
        })?;
        Ok((url, body))
    }

    /// Passes 2xx responses through; turns anything else into
    /// [`ClientError::UnexpectedStatus`], keeping the body's `error` text.
    async fn require_success(response: Response, url: &str) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Best effort: a body that is not an error envelope just yields no message.
        let message = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
            .map(|body| body.error);

        tracing::warn!(status = status.as_u16(), url = %url, "backend returned an error status");
        Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
            message,
        })
    }
}

fn error_field(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}
