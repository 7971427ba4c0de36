use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("memory file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
