//! Raw intraday samples as returned by a market data provider.
//!
//! A [`RawIntradaySeries`] stores the provider's four parallel columns
//! (timestamp, low, high, volume). Any of low/high/volume may be absent for a
//! given sample; the timestamp never is.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error(
        "Column lengths differ: {timestamps} timestamps, {lows} lows, {highs} highs, {volumes} volumes"
    )]
    LengthMismatch {
        timestamps: usize,
        lows: usize,
        highs: usize,
        volumes: usize,
    },

    #[error("Timestamp {value} at index {index} is out of range")]
    TimestampOutOfRange { index: usize, value: i64 },
}

/// One provider observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntradaySample {
    pub timestamp: DateTime<Utc>,
    pub low: Option<Decimal>,
    pub high: Option<Decimal>,
    pub volume: Option<i64>,
}

/// Parallel intraday columns of equal length.
///
/// Index `i` refers to the same sample in every column. Ordering by time is
/// not guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIntradaySeries {
    timestamps: Vec<DateTime<Utc>>,
    lows: Vec<Option<Decimal>>,
    highs: Vec<Option<Decimal>>,
    volumes: Vec<Option<i64>>,
}

impl RawIntradaySeries {
    /// Builds a series from Unix-second timestamps and the three value columns.
    pub fn new(
        timestamps: Vec<i64>,
        lows: Vec<Option<Decimal>>,
        highs: Vec<Option<Decimal>>,
        volumes: Vec<Option<i64>>,
    ) -> Result<Self, SeriesError> {
        let n = timestamps.len();
        if lows.len() != n || highs.len() != n || volumes.len() != n {
            return Err(SeriesError::LengthMismatch {
                timestamps: n,
                lows: lows.len(),
                highs: highs.len(),
                volumes: volumes.len(),
            });
        }

        let timestamps = timestamps
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                DateTime::from_timestamp(value, 0)
                    .ok_or(SeriesError::TimestampOutOfRange { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            timestamps,
            lows,
            highs,
            volumes,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamps as Unix seconds, in provider order.
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.timestamps.iter().map(|ts| ts.timestamp())
    }

    /// Iterates samples in provider order.
    pub fn samples(&self) -> impl Iterator<Item = IntradaySample> + '_ {
        self.timestamps
            .iter()
            .zip(&self.lows)
            .zip(&self.highs)
            .zip(&self.volumes)
            .map(|(((timestamp, low), high), volume)| IntradaySample {
                timestamp: *timestamp,
                low: *low,
                high: *high,
                volume: *volume,
            })
    }
}
