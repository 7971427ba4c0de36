//! Backend base URL handling.
//!
//! Users paste whatever they copied from the server log, which is often a
//! full endpoint URL. Stored locations are reduced to the bare base URL so
//! endpoint paths can be appended without doubling up.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Endpoint paths that are stripped from a configured base URL.
pub const ENDPOINT_SUFFIXES: &[&str] = &["/api/detect-product", "/api/handle-memory-choice"];

/// Strips known endpoint suffixes and trailing slashes from `raw`.
///
/// Idempotent: normalizing an already-normalized URL returns it unchanged.
#[must_use]
pub fn normalize_server_url(raw: &str) -> String {
    let mut current = raw.trim().trim_end_matches('/');
    while let Some(stripped) = ENDPOINT_SUFFIXES
        .iter()
        .find_map(|suffix| current.strip_suffix(suffix))
    {
        current = stripped.trim_end_matches('/');
    }
    current.to_owned()
}

/// Normalized backend base URL. Empty input falls back to [`DEFAULT_SERVER_URL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ServerLocation(String);

impl ServerLocation {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let normalized = normalize_server_url(raw);
        if normalized.is_empty() {
            Self::default()
        } else {
            Self(normalized)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an absolute endpoint path (e.g. `/api/detect-product`) onto the base.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for ServerLocation {
    fn default() -> Self {
        Self(DEFAULT_SERVER_URL.to_owned())
    }
}

impl From<String> for ServerLocation {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<ServerLocation> for String {
    fn from(location: ServerLocation) -> Self {
        location.0
    }
}

impl fmt::Display for ServerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_detect_product_suffix() {
        assert_eq!(
            normalize_server_url("http://localhost:8080/api/detect-product"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn strips_memory_choice_suffix_and_trailing_slash() {
        assert_eq!(
            normalize_server_url("http://10.0.0.5:9000/api/handle-memory-choice/"),
            "http://10.0.0.5:9000"
        );
    }

    #[test]
    fn strips_only_trailing_slashes_from_plain_base() {
        assert_eq!(
            normalize_server_url("http://localhost:8080///"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn leaves_unrelated_paths_alone() {
        assert_eq!(
            normalize_server_url("https://advisor.example.com/proxy"),
            "https://advisor.example.com/proxy"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "http://localhost:8080/api/detect-product/",
            "http://localhost:8080",
            "http://localhost:8080/api/handle-memory-choice/api/detect-product",
            "https://advisor.example.com/proxy/",
        ] {
            let once = normalize_server_url(raw);
            assert_eq!(normalize_server_url(&once), once, "input: {raw}");
        }
    }

    #[test]
    fn empty_location_falls_back_to_default() {
        assert_eq!(ServerLocation::new("  ").as_str(), DEFAULT_SERVER_URL);
        assert_eq!(ServerLocation::new("/").as_str(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let location = ServerLocation::new("http://localhost:8080/");
        assert_eq!(
            location.endpoint("/api/detect-product"),
            "http://localhost:8080/api/detect-product"
        );
    }

    #[test]
    fn deserializing_normalizes() {
        let location: ServerLocation =
            serde_json::from_str("\"http://localhost:8080/api/detect-product\"")
                .expect("deserialize");
        assert_eq!(location.as_str(), "http://localhost:8080");
    }
}
