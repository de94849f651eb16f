//! Per-day aggregate records produced from intraday samples.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar day's reduction of intraday samples.
///
/// Serialized as `{"day","lowAverage","highAverage","volume"}` with the
/// averages written as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub day: String,

    /// Mean of the day's present low prices, rounded to 4 decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub low_average: Decimal,

    /// Mean of the day's present high prices, rounded to 4 decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub high_average: Decimal,

    /// Sum of the day's present volumes.
    pub volume: i64,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn serializes_camel_case_numbers() {
        let record = DailyAggregate {
            day: "2026-01-06".to_string(),
            low_average: dec!(100.5556),
            high_average: dec!(200.5556),
            volume: 3000,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "day": "2026-01-06",
                "lowAverage": 100.5556,
                "highAverage": 200.5556,
                "volume": 3000
            })
        );

        let back: DailyAggregate = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
