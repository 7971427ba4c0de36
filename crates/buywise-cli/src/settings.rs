//! `prefs` and `server-url` command handlers.

use std::path::Path;

use anyhow::Context;
use buywise_core::UserPreferences;
use buywise_popup::{KeyValueStore, PopupConfig, PreferenceStore};
use clap::Subcommand;

/// Sub-commands available under `prefs`.
#[derive(Debug, Subcommand)]
pub enum PrefsCommands {
    /// Print the stored preferences
    Show,
    /// Replace stored preferences with a JSON object or file; missing fields use defaults
    Set {
        /// Inline JSON, or a path to a JSON file
        value: String,
    },
    /// Restore default preferences
    Reset,
}

/// Sub-commands available under `server-url`.
#[derive(Debug, Subcommand)]
pub enum ServerUrlCommands {
    /// Print the backend base URL in use
    Show,
    /// Store a new backend base URL
    Set { url: String },
}

pub(crate) async fn run_prefs(
    config: &mut PopupConfig,
    store: &dyn KeyValueStore,
    command: PrefsCommands,
) -> anyhow::Result<()> {
    match command {
        PrefsCommands::Show => {}
        PrefsCommands::Set { value } => {
            let preferences = parse_preferences(&value).await?;
            config.save_preferences(store, preferences).await?;
            tracing::info!("preferences saved");
        }
        PrefsCommands::Reset => {
            PreferenceStore::new(store).reset().await?;
            config.preferences = UserPreferences::default();
            tracing::info!("preferences reset to defaults");
        }
    }
    println!("{}", serde_json::to_string_pretty(&config.preferences)?);
    Ok(())
}

pub(crate) async fn run_server_url(
    config: &mut PopupConfig,
    store: &dyn KeyValueStore,
    command: ServerUrlCommands,
) -> anyhow::Result<()> {
    if let ServerUrlCommands::Set { url } = command {
        let saved = config.save_server_url(store, &url).await?;
        tracing::info!(server = %saved, "server URL saved");
    }
    println!("{}", config.location);
    Ok(())
}

/// Reads preferences from inline JSON, or from a file when `value` names one.
async fn parse_preferences(value: &str) -> anyhow::Result<UserPreferences> {
    let trimmed = value.trim_start();
    let raw = if trimmed.starts_with('{') {
        value.to_owned()
    } else {
        let path = Path::new(value);
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read preferences file {}", path.display()))?
    };
    serde_json::from_str(&raw).context("preferences must be a JSON object")
}
