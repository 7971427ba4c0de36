use std::time::Duration;

use buywise_client::AdvisorClient;
use buywise_core::{AppConfig, ServerLocation, UserPreferences};

use crate::error::{PopupError, StorageError};
use crate::storage::{KeyValueStore, PreferenceStore, ServerLocationStore};

/// Popup session state, read from storage once and passed explicitly to the
/// orchestrator. Saves write storage first, then replace the field.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupConfig {
    pub location: ServerLocation,
    pub preferences: UserPreferences,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Wait between injecting the bridge and probing it again.
    pub injection_settle: Duration,
}

impl PopupConfig {
    /// Loads stored preferences and server location over `app` defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be read.
    pub async fn load(store: &dyn KeyValueStore, app: &AppConfig) -> Result<Self, StorageError> {
        let preferences = PreferenceStore::new(store).load().await?;
        let location = ServerLocationStore::new(store).load().await?;
        tracing::debug!(server = %location, "popup configuration loaded");
        Ok(Self {
            location,
            preferences,
            request_timeout_secs: app.request_timeout_secs,
            user_agent: app.user_agent.clone(),
            injection_settle: Duration::from_millis(app.injection_settle_ms),
        })
    }

    /// Persists `preferences`, then makes them current.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails; the current value is kept.
    pub async fn save_preferences(
        &mut self,
        store: &dyn KeyValueStore,
        preferences: UserPreferences,
    ) -> Result<(), StorageError> {
        PreferenceStore::new(store).save(&preferences).await?;
        self.preferences = preferences;
        Ok(())
    }

    /// Persists a normalized server URL, then makes it current.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails; the current value is kept.
    pub async fn save_server_url(
        &mut self,
        store: &dyn KeyValueStore,
        raw: &str,
    ) -> Result<&ServerLocation, StorageError> {
        self.location = ServerLocationStore::new(store).save(raw).await?;
        Ok(&self.location)
    }

    /// HTTP client bound to the current server location.
    ///
    /// # Errors
    ///
    /// Returns [`PopupError::ClientSetup`] if the client cannot be built.
    pub fn client(&self) -> Result<AdvisorClient, PopupError> {
        AdvisorClient::new(
            self.location.clone(),
            self.request_timeout_secs,
            &self.user_agent,
        )
        .map_err(|e| PopupError::ClientSetup(e.to_string()))
    }
}
