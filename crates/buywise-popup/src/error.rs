use buywise_client::ClientError;
use buywise_core::ServerLocation;
use thiserror::Error;

/// Failure reported by a host adapter (tabs, page bridge, relay).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored value under {key} has an unexpected shape: {source}")]
    Shape {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything that can end an analysis attempt. Each variant maps to one
/// status line via [`PopupError::user_message`].
#[derive(Debug, Error)]
pub enum PopupError {
    #[error("an analysis is already in progress")]
    Busy,

    #[error("could not detect the active tab: {0}")]
    TabDetection(String),

    #[error("content bridge unavailable in tab {tab_id}: {reason}")]
    BridgeUnavailable { tab_id: i64, reason: String },

    #[error("scrape failed: {0}")]
    ScrapeFailed(String),

    #[error("cannot reach backend at {base}: {detail}")]
    ServerUnreachable { base: String, detail: String },

    #[error("backend returned HTTP {status}")]
    HttpStatus { status: u16, message: Option<String> },

    #[error("backend returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("backend reported an error: {0}")]
    Server(String),

    #[error("result processing failed: {0}")]
    Relay(String),

    #[error("memory prompt failed: {0}")]
    Prompt(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PopupError {
    /// Classifies a backend call failure against the configured base URL.
    #[must_use]
    pub fn from_client(error: ClientError, location: &ServerLocation) -> Self {
        match error {
            ClientError::Unreachable { source, .. } => Self::ServerUnreachable {
                base: location.to_string(),
                detail: source.to_string(),
            },
            ClientError::Http(source) => Self::ServerUnreachable {
                base: location.to_string(),
                detail: source.to_string(),
            },
            ClientError::UnexpectedStatus {
                status, message, ..
            } => Self::HttpStatus { status, message },
            ClientError::Malformed { source, .. } => Self::MalformedResponse(source.to_string()),
            ClientError::Server(message) => Self::Server(message),
        }
    }

    /// Single status line shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Busy => "Analysis already in progress. Please wait.".to_owned(),
            Self::TabDetection(_) => {
                "Could not detect the current tab. Please try again.".to_owned()
            }
            Self::BridgeUnavailable { .. } => {
                "Could not connect to the page. Please refresh the page and try again.".to_owned()
            }
            Self::ScrapeFailed(reason) => {
                format!("Could not extract product data from this page: {reason}")
            }
            Self::ServerUnreachable { base, .. } => format!(
                "Cannot connect to the API server. Please ensure the API server is running at {base}."
            ),
            Self::HttpStatus {
                status,
                message: Some(message),
            } => format!("Server error ({status}): {message}"),
            Self::HttpStatus {
                status,
                message: None,
            } => format!("Server error ({status}). Please try again later."),
            Self::MalformedResponse(_) => {
                "Received an invalid response from the server.".to_owned()
            }
            Self::Server(message) => message.clone(),
            Self::Relay(reason) => format!("Error processing analysis results: {reason}"),
            Self::Prompt(reason) => format!("Could not read your choice: {reason}"),
            Self::ClientSetup(reason) => format!("Could not start the HTTP client: {reason}"),
            Self::Storage(e) => format!("Could not access local storage: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_message_names_the_base_url() {
        let err = PopupError::ServerUnreachable {
            base: "http://localhost:8080".to_owned(),
            detail: "connection refused".to_owned(),
        };
        assert_eq!(
            err.user_message(),
            "Cannot connect to the API server. Please ensure the API server is running at http://localhost:8080."
        );
    }

    #[test]
    fn http_status_message_prefers_server_text() {
        let with_text = PopupError::HttpStatus {
            status: 400,
            message: Some("Missing required field: title".to_owned()),
        };
        assert_eq!(
            with_text.user_message(),
            "Server error (400): Missing required field: title"
        );

        let without_text = PopupError::HttpStatus {
            status: 502,
            message: None,
        };
        assert_eq!(
            without_text.user_message(),
            "Server error (502). Please try again later."
        );
    }

    #[test]
    fn server_error_is_shown_verbatim() {
        let err = PopupError::from_client(
            ClientError::Server("Stored analysis could not be loaded".to_owned()),
            &ServerLocation::default(),
        );
        assert_eq!(err.user_message(), "Stored analysis could not be loaded");
    }

    #[test]
    fn network_and_scrape_failures_read_differently() {
        let network = PopupError::ServerUnreachable {
            base: "http://localhost:8080".to_owned(),
            detail: String::new(),
        };
        let scrape = PopupError::ScrapeFailed("no product data".to_owned());
        assert_ne!(network.user_message(), scrape.user_message());
        assert!(!scrape.user_message().contains("API server"));
    }
}
