//! Internal error types for ugcflow-reqwest.

use thiserror::Error;

/// Result type alias for ugcflow-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for ugcflow-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
}

impl From<Error> for ugcflow_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    ugcflow_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    ugcflow_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else {
                    ugcflow_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => ugcflow_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::BaseUrl(url) => ugcflow_core::Error::configuration()
                .with_message(format!("base URL {url} cannot be used for API requests")),
        }
    }
}
