use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{models::intraday::RawIntradaySeries, providers::errors::ProviderError};

/// Error bodies are echoed into `ProviderError::Status`, capped at this many chars.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    /// Absent when the window holds no bars.
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    pub low: Option<Vec<Option<Decimal>>>,
    pub high: Option<Vec<Option<Decimal>>>,
    pub volume: Option<Vec<Option<i64>>>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ChartResponse {
    /// Converts the first chart result into a [`RawIntradaySeries`].
    ///
    /// A reported chart error or a missing/empty result set means the symbol
    /// is unknown to Yahoo.
    pub fn into_series(self, symbol: &str) -> Result<RawIntradaySeries, ProviderError> {
        let invalid = || ProviderError::InvalidSymbol {
            symbol: symbol.to_string(),
        };

        if self.chart.error.is_some() {
            return Err(invalid());
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(invalid)?;

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        RawIntradaySeries::new(
            result.timestamp.unwrap_or_default(),
            quote.low.unwrap_or_default(),
            quote.high.unwrap_or_default(),
            quote.volume.unwrap_or_default(),
        )
        .map_err(|e| ProviderError::MalformedSeries(e.to_string()))
    }
}

/// Decodes a chart API response body received with `status`.
///
/// Yahoo reports unknown symbols as a 404 carrying a chart error body. Every
/// other failing status (422 range errors, 5xx) is an external failure even
/// when its body is a chart error.
pub fn decode_chart(
    symbol: &str,
    status: StatusCode,
    body: &str,
) -> Result<RawIntradaySeries, ProviderError> {
    let parsed = serde_json::from_str::<ChartResponse>(body);

    if !status.is_success() {
        return match parsed {
            Ok(response) if status == StatusCode::NOT_FOUND && response.chart.error.is_some() => {
                response.into_series(symbol)
            }
            _ => Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            }),
        };
    }

    parsed?.into_series(symbol)
}
