use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Listen address of the companion server.
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Directory holding stored analyses and server-side preferences.
    pub memory_dir: PathBuf,
    /// JSON file backing the popup's local key-value storage.
    pub storage_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Wait between injecting the content bridge and probing it again.
    pub injection_settle_ms: u64,
}
