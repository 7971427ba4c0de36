use thiserror::Error;

/// Errors returned by [`crate::AdvisorClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The `reqwest` client could not be built or a body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request never produced a response (refused, DNS, timeout).
    #[error("could not reach {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        /// The `error` field of the body, when the server sent one.
        message: Option<String>,
    },

    /// The body was not JSON, or not the JSON shape the endpoint promises.
    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx body carrying an `error` field instead of a result.
    #[error("{0}")]
    Server(String),
}
