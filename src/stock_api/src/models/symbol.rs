//! Validated ticker symbols.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Longest symbol accepted, generous enough for futures and FX tickers.
pub const MAX_SYMBOL_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Symbol is required")]
    Empty,

    #[error("Symbol is longer than {MAX_SYMBOL_LEN} characters")]
    TooLong,

    #[error("Symbol contains invalid character {0:?}")]
    InvalidChar(char),
}

/// An upper-cased ticker symbol such as `AAPL`, `BRK-B` or `^GSPC`.
///
/// Only `[A-Z0-9.^=-]` survives parsing, so a `Symbol` can be embedded in a
/// URL path segment as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Trims and upper-cases `raw`, then checks length and character set.
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(SymbolError::Empty);
        }
        if normalized.len() > MAX_SYMBOL_LEN {
            return Err(SymbolError::TooLong);
        }
        if let Some(c) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
        {
            return Err(SymbolError::InvalidChar(c));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
