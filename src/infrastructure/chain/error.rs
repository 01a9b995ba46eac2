use std::error::Error;
use std::fmt;

/// Error type for chain-data API operations
#[derive(Debug)]
pub enum ChainClientError {
    /// Error from the reqwest HTTP client
    HttpError(reqwest::Error),
    /// Error parsing JSON
    JsonError(serde_json::Error),
    /// The API answered with an error status or message
    ApiError(String),
    /// The response parsed but did not have the expected shape
    ResponseError(String),
}

impl fmt::Display for ChainClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainClientError::HttpError(e) => write!(f, "HTTP error: {}", e),
            ChainClientError::JsonError(e) => write!(f, "JSON error: {}", e),
            ChainClientError::ApiError(msg) => write!(f, "API error: {}", msg),
            ChainClientError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for ChainClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChainClientError::HttpError(e) => Some(e),
            ChainClientError::JsonError(e) => Some(e),
            ChainClientError::ApiError(_) | ChainClientError::ResponseError(_) => None,
        }
    }
}

impl From<reqwest::Error> for ChainClientError {
    fn from(error: reqwest::Error) -> Self {
        ChainClientError::HttpError(error)
    }
}

impl From<serde_json::Error> for ChainClientError {
    fn from(error: serde_json::Error) -> Self {
        ChainClientError::JsonError(error)
    }
}
