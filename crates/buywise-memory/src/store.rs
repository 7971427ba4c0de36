//! JSON-file store over a memory directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use buywise_core::{AnalysisResult, ProductData, UserPreferences};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::entry::{file_stem, product_id, product_key, MemoryEntry};
use crate::error::MemoryError;

/// File holding the server-side preference record; never listed as an analysis.
pub const PREFERENCES_FILE: &str = "user_preferences.json";

/// Analyses stored as one JSON file each under `directory`.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    directory: PathBuf,
}

impl MemoryStore {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, product_id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", file_stem(product_id)))
    }

    fn preferences_path(&self) -> PathBuf {
        self.directory.join(PREFERENCES_FILE)
    }

    /// Stores an analysis stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the directory or file cannot be written.
    pub async fn store(
        &self,
        product: &ProductData,
        analysis: &AnalysisResult,
        preferences: Option<&UserPreferences>,
    ) -> Result<MemoryEntry, MemoryError> {
        self.store_at(product, analysis, preferences, Local::now().naive_local())
            .await
    }

    /// Stores an analysis stamped with `at`. The returned entry carries the
    /// generated product id, also copied into its `analysis_results`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the directory or file cannot be written.
    pub async fn store_at(
        &self,
        product: &ProductData,
        analysis: &AnalysisResult,
        preferences: Option<&UserPreferences>,
        at: NaiveDateTime,
    ) -> Result<MemoryEntry, MemoryError> {
        create_dir(&self.directory).await?;

        let (id, path, mut file) = self.claim_entry_file(&product_id(&product.title, at)).await?;
        let mut analysis_results = analysis.clone();
        analysis_results.product_id = Some(id.clone());

        let entry = MemoryEntry {
            product_id: id,
            product_key: product_key(product),
            product_data: product.clone(),
            analysis_results,
            timestamp: at,
            user_preferences: preferences.cloned(),
        };

        let json = to_json(&path, &entry)?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|source| io_error(&path, source))?;
        file.flush().await.map_err(|source| io_error(&path, source))?;
        info!(product_id = %entry.product_id, "stored product analysis");
        Ok(entry)
    }

    /// Creates a fresh entry file for `base`. When an entry already holds
    /// that id (two analyses of one title within a second), `_2`, `_3`, ...
    /// is appended until a free one is found.
    async fn claim_entry_file(
        &self,
        base: &str,
    ) -> Result<(String, PathBuf, tokio::fs::File), MemoryError> {
        let mut attempt = 1_u32;
        loop {
            let id = if attempt == 1 {
                base.to_owned()
            } else {
                format!("{base}_{attempt}")
            };
            let path = self.entry_path(&id);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((id, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(product_id = %id, "product id taken, trying next suffix");
                    attempt += 1;
                }
                Err(source) => return Err(io_error(&path, source)),
            }
        }
    }

    /// Loads the entry stored under `product_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the file exists but cannot be read or parsed.
    pub async fn retrieve(&self, product_id: &str) -> Result<Option<MemoryEntry>, MemoryError> {
        let path = self.entry_path(product_id);
        let entry = read_json::<MemoryEntry>(&path).await?;
        if entry.is_none() {
            warn!(product_id, "no stored analysis found");
        }
        Ok(entry)
    }

    /// Newest stored analysis with the same product key as `product`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the memory directory cannot be listed.
    pub async fn find_match(
        &self,
        product: &ProductData,
    ) -> Result<Option<MemoryEntry>, MemoryError> {
        let key = product_key(product);
        let found = self
            .load_all()
            .await?
            .into_iter()
            .find(|entry| entry.key() == key);
        debug!(found = found.is_some(), "prior analysis lookup");
        Ok(found)
    }

    /// Up to `limit` entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the memory directory cannot be listed.
    pub async fn recent(&self, limit: usize) -> Result<Vec<MemoryEntry>, MemoryError> {
        let mut entries = self.load_all().await?;
        entries.truncate(limit);
        info!(count = entries.len(), "retrieved recent analyses");
        Ok(entries)
    }

    /// Entries whose title, or failing that any top-level analysis field,
    /// contains `query` case-insensitively. Newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the memory directory cannot be listed.
    pub async fn search(&self, query: &str) -> Result<Vec<MemoryEntry>, MemoryError> {
        let needle = query.to_lowercase();
        let matches: Vec<MemoryEntry> = self
            .load_all()
            .await?
            .into_iter()
            .filter(|entry| {
                entry.product_data.title.to_lowercase().contains(&needle)
                    || analysis_mentions(&entry.analysis_results, &needle)
            })
            .collect();
        info!(count = matches.len(), "searched stored analyses");
        Ok(matches)
    }

    /// Replaces the stored preference record.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the file cannot be written.
    pub async fn store_preferences(&self, preferences: &UserPreferences) -> Result<(), MemoryError> {
        create_dir(&self.directory).await?;
        write_json(&self.preferences_path(), preferences).await?;
        info!("stored user preferences");
        Ok(())
    }

    /// The stored preference record, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError`] if the file exists but cannot be read or parsed.
    pub async fn preferences(&self) -> Result<Option<UserPreferences>, MemoryError> {
        read_json(&self.preferences_path()).await
    }

    /// Every readable entry, newest first. Files that fail to parse are
    /// skipped with a warning.
    async fn load_all(&self) -> Result<Vec<MemoryEntry>, MemoryError> {
        let mut dir = match tokio::fs::read_dir(&self.directory).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(&self.directory, source)),
        };

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|source| io_error(&self.directory, source))?
        {
            let path = item.path();
            let is_entry_file = path.extension().is_some_and(|ext| ext == "json")
                && item.file_name() != PREFERENCES_FILE;
            if !is_entry_file {
                continue;
            }
            match read_json::<MemoryEntry>(&path).await {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "skipping unreadable memory file"),
            }
        }

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}

fn analysis_mentions(analysis: &AnalysisResult, needle: &str) -> bool {
    let Ok(Value::Object(fields)) = serde_json::to_value(analysis) else {
        return false;
    };
    fields.values().any(|value| match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        other => other.to_string().to_lowercase().contains(needle),
    })
}

async fn create_dir(directory: &Path) -> Result<(), MemoryError> {
    tokio::fs::create_dir_all(directory)
        .await
        .map_err(|source| io_error(directory, source))
}

fn to_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<String, MemoryError> {
    serde_json::to_string_pretty(value).map_err(|source| MemoryError::Json {
        path: path.display().to_string(),
        source,
    })
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), MemoryError> {
    let json = to_json(path, value)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| io_error(path, source))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, MemoryError> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(path, source)),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| MemoryError::Json {
            path: path.display().to_string(),
            source,
        })
}

fn io_error(path: &Path, source: std::io::Error) -> MemoryError {
    MemoryError::Io {
        path: path.display().to_string(),
        source,
    }
}
