use thiserror::Error;

use crate::providers::errors::ProviderError;

/// The failure categories callers act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The symbol is unknown to the provider or it returned no result set.
    InvalidSymbol,
    /// Transport or parse failure talking to the provider.
    ExternalServiceFailure,
    /// Malformed input rejected before any network call.
    InvalidArgument,
    /// The caller cancelled the request before it completed.
    Cancelled,
}

/// The unified error type for the `stock_api` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input failed validation (empty symbol, day count out of range).
    #[error("{0}")]
    InvalidArgument(String),

    /// A failure reported by the intraday data provider, passed through as-is.
    #[error(transparent)]
    Provider(ProviderError),

    #[error("Request was cancelled")]
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Provider(e) => e.kind(),
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Cancelled => Error::Cancelled,
            other => Error::Provider(other),
        }
    }
}
