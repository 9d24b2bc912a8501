use thiserror::Error;

use crate::core::frame::FrameError;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{0} request timed out")]
    Timeout(String),
    #[error("Malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Backend(String),
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] FrameError),
}
