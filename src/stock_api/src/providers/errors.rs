use thiserror::Error;

use crate::errors::ErrorKind;

/// Errors that can occur within an `IntradayProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not recognise the symbol or returned no result set.
    #[error("Invalid or unknown stock symbol: {symbol}")]
    InvalidSymbol { symbol: String },

    /// An error during the HTTP request (e.g., network failure, timeout).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status and no usable body.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The decoded response violates the series invariants.
    #[error("Malformed intraday series: {0}")]
    MalformedSeries(String),

    #[error("Provider request was cancelled")]
    Cancelled,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::InvalidSymbol { .. } => ErrorKind::InvalidSymbol,
            ProviderError::Cancelled => ErrorKind::Cancelled,
            ProviderError::Request(_)
            | ProviderError::Status { .. }
            | ProviderError::Parse(_)
            | ProviderError::MalformedSeries(_) => ErrorKind::ExternalServiceFailure,
        }
    }
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("Invalid base URL {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },
}
