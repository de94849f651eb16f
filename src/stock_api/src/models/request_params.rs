use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{errors::Error, models::symbol::Symbol};

/// Days of history returned when the caller does not ask for a window.
pub const DEFAULT_DAYS: u16 = 30;

/// Largest accepted window, in days.
pub const MAX_DAYS: u16 = 365;

/// A validated request for daily aggregates.
///
/// Construction is the only validation point: once a query exists its symbol
/// is normalized and `days` lies in `1..=MAX_DAYS`, so nothing downstream of
/// it needs to re-check before going to the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyAggregatesQuery {
    pub symbol: Symbol,
    pub days: u16,
}

impl DailyAggregatesQuery {
    pub fn new(symbol: &str, days: i64) -> Result<Self, Error> {
        let symbol = Symbol::parse(symbol).map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let days = u16::try_from(days)
            .ok()
            .filter(|d| (1..=MAX_DAYS).contains(d))
            .ok_or_else(|| {
                Error::InvalidArgument(format!("Days must be between 1 and {MAX_DAYS}"))
            })?;
        Ok(Self { symbol, days })
    }

    /// Key under which the finished response for this query is cached.
    pub fn cache_key(&self) -> String {
        format!("stock_{}_{}", self.symbol, self.days)
    }

    /// Builds the provider request for the `days` window ending at `end`.
    pub fn window_ending_at(&self, end: DateTime<Utc>) -> IntradayRequestParams {
        IntradayRequestParams {
            symbol: self.symbol.clone(),
            start: end - Duration::days(i64::from(self.days)),
            end,
        }
    }
}

/// Parameters for fetching raw intraday samples from a provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntradayRequestParams {
    /// Normalized ticker to request.
    pub symbol: Symbol,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (UTC).
    pub end: DateTime<Utc>,
}

impl IntradayRequestParams {
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}
