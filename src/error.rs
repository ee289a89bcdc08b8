use reqwest::header::InvalidHeaderValue;
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors surfaced by the API client and its helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// body read failure). The failure has already been written to the
    /// request log when this is returned.
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("login returned status {status} without an id_token")]
    MissingToken { status: StatusCode },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
