//! Terminal stand-ins for the browser pieces the popup talks to.
//!
//! A page snapshot plays the active tab and its content bridge, local
//! storage plays the background relay, and stdin answers the memory prompt.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use buywise_core::ExistingAnalysis;
use buywise_popup::{
    BridgeMessage, HostError, KeyValueStore, MemoryChoice, MemoryPrompt, PageBridge, RelayMessage,
    RelayReply, ResultRelay, ScrapeReply, Tab, TabResolver, LAST_ANALYSIS_KEY,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Saved page: the tab, whether the bridge is already running, and what a
/// scrape of it returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageSnapshot {
    pub(crate) tab: Tab,
    #[serde(default)]
    pub(crate) bridge_installed: bool,
    #[serde(flatten)]
    pub(crate) scrape: ScrapeReply,
}

pub(crate) struct SnapshotHost {
    tab: Tab,
    scrape: ScrapeReply,
    bridge_installed: AtomicBool,
}

impl SnapshotHost {
    pub(crate) fn new(snapshot: PageSnapshot) -> Self {
        Self {
            tab: snapshot.tab,
            scrape: snapshot.scrape,
            bridge_installed: AtomicBool::new(snapshot.bridge_installed),
        }
    }

    /// Reads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a snapshot.
    pub(crate) async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read page snapshot {}", path.display()))?;
        let snapshot: PageSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a page snapshot", path.display()))?;
        tracing::debug!(tab_id = snapshot.tab.id, url = %snapshot.tab.url, "page snapshot loaded");
        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl TabResolver for SnapshotHost {
    async fn active_tab(&self) -> Result<Tab, HostError> {
        Ok(self.tab.clone())
    }
}

#[async_trait]
impl PageBridge for SnapshotHost {
    async fn send_message(
        &self,
        tab_id: i64,
        message: BridgeMessage,
    ) -> Result<Option<Value>, HostError> {
        if tab_id != self.tab.id {
            return Err(HostError::new(format!("no tab with id {tab_id}")));
        }
        if !self.bridge_installed.load(Ordering::SeqCst) {
            return Ok(None);
        }
        match message {
            BridgeMessage::Ping => Ok(Some(json!({ "status": "alive" }))),
            BridgeMessage::ScrapeProductData => serde_json::to_value(&self.scrape)
                .map(Some)
                .map_err(|e| HostError::new(e.to_string())),
        }
    }

    async fn inject(&self, tab_id: i64) -> Result<(), HostError> {
        if tab_id != self.tab.id {
            return Err(HostError::new(format!("no tab with id {tab_id}")));
        }
        self.bridge_installed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Relay that records the result as the last analysis and passes it on.
pub(crate) struct LocalRelay<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> LocalRelay<'a> {
    pub(crate) fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResultRelay for LocalRelay<'_> {
    async fn send(&self, message: RelayMessage) -> Result<RelayReply, HostError> {
        let RelayMessage::ProcessApiResults { data } = message;
        let value = serde_json::to_value(&*data).map_err(|e| HostError::new(e.to_string()))?;
        self.store
            .set(LAST_ANALYSIS_KEY, value)
            .await
            .map_err(|e| HostError::new(e.to_string()))?;
        Ok(RelayReply::success(*data))
    }
}

/// Memory prompt answered by a preset choice or, failing that, by stdin.
pub(crate) struct TerminalPrompt {
    preset: Option<MemoryChoice>,
}

impl TerminalPrompt {
    pub(crate) fn new(preset: Option<MemoryChoice>) -> Self {
        Self { preset }
    }
}

#[async_trait]
impl MemoryPrompt for TerminalPrompt {
    async fn choose(&self, existing: &ExistingAnalysis) -> Result<MemoryChoice, HostError> {
        if let Some(choice) = self.preset {
            return Ok(choice);
        }

        eprintln!("A previous analysis of this product exists.");
        if let Some(timestamp) = &existing.timestamp {
            eprintln!("  analyzed: {timestamp}");
        }
        if let Some(summary) = &existing.summary {
            eprintln!("  summary:  {summary}");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("Use the stored analysis [r]euse, or run a [n]ew one? ");
            let line = lines
                .next_line()
                .await
                .map_err(|e| HostError::new(e.to_string()))?
                .ok_or_else(|| HostError::new("stdin closed before a choice was made"))?;
            if let Some(choice) = parse_choice(&line) {
                return Ok(choice);
            }
        }
    }
}

pub(crate) fn parse_choice(input: &str) -> Option<MemoryChoice> {
    match input.trim().to_ascii_lowercase().as_str() {
        "r" | "reuse" | "use" | "existing" => Some(MemoryChoice::UseExisting),
        "n" | "new" => Some(MemoryChoice::NewAnalysis),
        _ => None,
    }
}
