//! Local key-value storage and the typed adapters over it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use buywise_core::{ServerLocation, UserPreferences};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::StorageError;

pub const USER_PREFERENCES_KEY: &str = "userPreferences";
pub const SERVER_URL_KEY: &str = "serverUrl";
/// Written by the CLI relay with the last processed result.
pub const LAST_ANALYSIS_KEY: &str = "lastAnalysis";

/// Persistent string-keyed JSON storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// [`KeyValueStore`] kept as one JSON object in a file.
///
/// Every write rewrites the whole file; a missing file reads as empty.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn write_all(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_owned(), value);
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

/// Reads and replaces the shopper's preference record.
pub struct PreferenceStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> PreferenceStore<'a> {
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Stored preferences merged over the defaults; defaults when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails or the record is malformed.
    pub async fn load(&self) -> Result<UserPreferences, StorageError> {
        Ok(read_typed(self.store, USER_PREFERENCES_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Replaces the stored record wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    pub async fn save(&self, preferences: &UserPreferences) -> Result<(), StorageError> {
        let value = serde_json::to_value(preferences).map_err(|source| StorageError::Shape {
            key: USER_PREFERENCES_KEY.to_owned(),
            source,
        })?;
        self.store.set(USER_PREFERENCES_KEY, value).await
    }

    /// Drops the stored record so defaults apply again.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.store.remove(USER_PREFERENCES_KEY).await
    }
}

/// Reads and writes the configured backend base URL.
pub struct ServerLocationStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ServerLocationStore<'a> {
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Stored base URL, normalized; the default when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails or the value is not a string.
    pub async fn load(&self) -> Result<ServerLocation, StorageError> {
        Ok(read_typed::<ServerLocation>(self.store, SERVER_URL_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Normalizes `raw`, stores it and returns the normalized location.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    pub async fn save(&self, raw: &str) -> Result<ServerLocation, StorageError> {
        let location = ServerLocation::new(raw);
        self.store
            .set(SERVER_URL_KEY, Value::String(location.to_string()))
            .await?;
        Ok(location)
    }
}

async fn read_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get(key)
        .await?
        .map(|value| {
            serde_json::from_value(value).map_err(|source| StorageError::Shape {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
}
