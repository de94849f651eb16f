use chrono::Duration;

use crate::models::request_params::IntradayRequestParams;

/// Yahoo only serves 15-minute bars for windows shorter than 60 days.
pub const FIFTEEN_MINUTE_MAX_SPAN_DAYS: i64 = 60;

/// Bar interval requested from the chart API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interval {
    FifteenMinutes,
    OneHour,
}

impl Interval {
    /// Picks the finest interval Yahoo will serve for a window of `span`.
    pub fn for_span(span: Duration) -> Self {
        if span < Duration::days(FIFTEEN_MINUTE_MAX_SPAN_DAYS) {
            Interval::FifteenMinutes
        } else {
            Interval::OneHour
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::FifteenMinutes => "15m",
            Interval::OneHour => "1h",
        }
    }
}

/// Builds the chart API query string for `params`.
pub fn construct_params(params: &IntradayRequestParams) -> Vec<(String, String)> {
    vec![
        ("period1".to_string(), params.start.timestamp().to_string()),
        ("period2".to_string(), params.end.timestamp().to_string()),
        (
            "interval".to_string(),
            Interval::for_span(params.span()).as_str().to_string(),
        ),
        ("includePrePost".to_string(), "false".to_string()),
    ]
}
