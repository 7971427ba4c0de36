//! One analysis attempt, from the health check to the rendered view.

use std::sync::atomic::{AtomicBool, Ordering};

use buywise_client::AdvisorClient;
use buywise_core::{DetectOutcome, ProductData, DEFAULT_SITE};
use tracing::{debug, info, warn};

use crate::bridge::{ensure_bridge, request_scrape, PageBridge};
use crate::config::PopupConfig;
use crate::error::PopupError;
use crate::negotiation::{MemoryDialog, MemoryPrompt};
use crate::relay::{relay_result, ResultRelay};
use crate::render::{render, RenderedView};
use crate::tabs::{Tab, TabResolver};

/// What a successful attempt hands back to the presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub view: RenderedView,
    pub needs_refresh: bool,
    /// Non-fatal note from the scrape, e.g. that no reviews were found.
    pub scrape_warning: Option<String>,
}

/// Sequences health check, tab lookup, bridge readiness, scrape, backend
/// call, optional memory dialog, relay and render. Any failing step ends
/// the attempt; nothing is retried.
pub struct Orchestrator<'a> {
    config: &'a PopupConfig,
    client: AdvisorClient,
    tabs: &'a dyn TabResolver,
    bridge: &'a dyn PageBridge,
    relay: &'a dyn ResultRelay,
    prompt: &'a dyn MemoryPrompt,
    busy: AtomicBool,
}

impl<'a> Orchestrator<'a> {
    /// # Errors
    ///
    /// Returns [`PopupError::ClientSetup`] if the HTTP client cannot be built.
    pub fn new(
        config: &'a PopupConfig,
        tabs: &'a dyn TabResolver,
        bridge: &'a dyn PageBridge,
        relay: &'a dyn ResultRelay,
        prompt: &'a dyn MemoryPrompt,
    ) -> Result<Self, PopupError> {
        Ok(Self {
            client: config.client()?,
            config,
            tabs,
            bridge,
            relay,
            prompt,
            busy: AtomicBool::new(false),
        })
    }

    /// Runs one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`PopupError::Busy`] while another attempt is running,
    /// otherwise the error of the first step that failed.
    pub async fn analyze(&self) -> Result<AnalysisOutcome, PopupError> {
        let _guard = BusyGuard::acquire(&self.busy).ok_or(PopupError::Busy)?;
        let location = self.client.location();

        self.client
            .health_check()
            .await
            .map_err(|e| PopupError::ServerUnreachable {
                base: location.to_string(),
                detail: e.to_string(),
            })?;

        let tab = self
            .tabs
            .active_tab()
            .await
            .map_err(|e| PopupError::TabDetection(e.to_string()))?;
        debug!(tab_id = tab.id, url = %tab.url, "active tab resolved");

        ensure_bridge(self.bridge, tab.id, self.config.injection_settle).await?;
        let (scraped, scrape_warning) = request_scrape(self.bridge, tab.id).await?;
        if let Some(warning) = &scrape_warning {
            warn!(tab_id = tab.id, %warning, "scrape reported a warning");
        }

        let product = self.prepare(scraped, &tab);
        let title = product.title.clone();

        let result = match self
            .client
            .detect_product(&product)
            .await
            .map_err(|e| PopupError::from_client(e, location))?
        {
            DetectOutcome::Complete(result) => *result,
            DetectOutcome::MemoryMatch(existing) => {
                info!(product_id = %existing.product_id, "backend offered a stored analysis");
                MemoryDialog::new(existing, product)
                    .run(self.prompt, &self.client)
                    .await?
            }
        };

        let relayed = relay_result(self.relay, result).await?;
        let title = relayed.result.title.clone().unwrap_or(title);
        info!(
            confidence = relayed.result.confidence_score,
            review_count = relayed.result.review_count,
            needs_refresh = relayed.needs_refresh,
            "analysis ready"
        );

        Ok(AnalysisOutcome {
            view: render(&relayed.result, &title),
            needs_refresh: relayed.needs_refresh,
            scrape_warning,
        })
    }

    /// Fills what the scrape left blank and attaches the stored preferences.
    fn prepare(&self, mut product: ProductData, tab: &Tab) -> ProductData {
        if product.title.trim().is_empty() {
            product.title.clone_from(&tab.title);
        }
        if product.site.trim().is_empty() {
            DEFAULT_SITE.clone_into(&mut product.site);
        }
        if product.url.is_empty() {
            product.url.clone_from(&tab.url);
        }
        product.full_details = true;
        product.user_preferences = Some(self.config.preferences.clone());
        product
    }
}

/// Holds the busy flag for the lifetime of one attempt.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_guard_is_exclusive_until_dropped() {
        let flag = AtomicBool::new(false);
        let first = BusyGuard::acquire(&flag).expect("first acquire");
        assert!(BusyGuard::acquire(&flag).is_none());
        drop(first);
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
