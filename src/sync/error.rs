use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Timed out fetching {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid response body: {0}")]
    Body(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Field '{0}' not found")]
    MissingField(String),

    #[error("Field '{0}' is neither a string nor a number")]
    UnsupportedValue(String),

    #[error("No version marker comment found")]
    MissingMarker,

    #[error("Version token is empty")]
    EmptyVersion,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
