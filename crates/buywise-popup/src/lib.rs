//! Popup-side logic of the purchase advisor.
//!
//! The browser pieces the popup talks to (the active tab, the content
//! bridge running inside the page, the background relay, local storage and
//! the memory dialog) are traits; a host such as the CLI supplies them.
//! [`Orchestrator`] sequences one analysis attempt and [`render`] turns the
//! result into a [`RenderedView`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod messages;
pub mod negotiation;
pub mod orchestrator;
pub mod relay;
pub mod render;
pub mod storage;
pub mod tabs;

pub use bridge::{ensure_bridge, request_scrape, PageBridge};
pub use config::PopupConfig;
pub use error::{HostError, PopupError, StorageError};
pub use messages::{BridgeMessage, RelayMessage, RelayReply, ScrapeReply};
pub use negotiation::{MemoryChoice, MemoryDialog, MemoryPrompt};
pub use orchestrator::{AnalysisOutcome, Orchestrator};
pub use relay::{relay_result, RelayedResult, ResultRelay};
pub use render::{render, ListItem, PreferencePanel, RenderedView, ScoreColor, ScoreDisplay};
pub use storage::{
    JsonFileStore, KeyValueStore, PreferenceStore, ServerLocationStore, LAST_ANALYSIS_KEY,
    SERVER_URL_KEY, USER_PREFERENCES_KEY,
};
pub use tabs::{Tab, TabResolver};
