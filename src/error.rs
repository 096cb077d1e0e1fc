// Error type returned by every facade call in `api`.
// Transport failures, non-2xx statuses and bodies that are not JSON all
// surface as `NetworkError`; callers are not expected to tell them apart.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request could not be sent or the response body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The body was not valid JSON.
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl NetworkError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            NetworkError::Transport { url, .. }
            | NetworkError::Status { url, .. }
            | NetworkError::Decode { url, .. } => url,
        }
    }
}
