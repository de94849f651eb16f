//! Reduction of intraday samples into per-day aggregates.
//!
//! Samples are bucketed by the UTC calendar date of their timestamp. For each
//! date the present lows and highs are averaged (absent values count toward
//! neither sum nor divisor) and the present volumes are summed. A date whose
//! samples carry no low (or no high) at all reports `0` for that average;
//! the date is still emitted.
//!
//! Buckets live in a `BTreeMap<NaiveDate, _>`, so output is in ascending date
//! order whatever order the provider used.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    daily::DailyAggregate,
    intraday::{IntradaySample, RawIntradaySeries},
};

/// Fractional digits kept on averaged prices.
pub const AVERAGE_DECIMAL_PLACES: u32 = 4;

#[derive(Debug, Default)]
struct Mean {
    sum: Decimal,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: Option<Decimal>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn rounded(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        (self.sum / Decimal::from(self.count))
            .round_dp_with_strategy(AVERAGE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[derive(Debug, Default)]
struct DayBucket {
    low: Mean,
    high: Mean,
    volume: i64,
}

impl DayBucket {
    fn push(&mut self, sample: &IntradaySample) {
        self.low.push(sample.low);
        self.high.push(sample.high);
        if let Some(v) = sample.volume {
            self.volume = self.volume.saturating_add(v);
        }
    }

    fn finish(self, day: NaiveDate) -> DailyAggregate {
        DailyAggregate {
            day: day.format("%Y-%m-%d").to_string(),
            low_average: self.low.rounded(),
            high_average: self.high.rounded(),
            volume: self.volume,
        }
    }
}

/// Groups `series` by UTC day and reduces each day to a [`DailyAggregate`].
///
/// Pure: the same series always yields the same, date-ascending output.
pub fn aggregate_by_day(series: &RawIntradaySeries) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for sample in series.samples() {
        days.entry(sample.timestamp.date_naive())
            .or_default()
            .push(&sample);
    }

    days.into_iter()
        .map(|(day, bucket)| bucket.finish(day))
        .collect()
}
