//! The daily aggregation service.
//!
//! [`Aggregator`] validates the request, asks its [`IntradayProvider`] for the
//! trailing window of intraday samples and reduces them with
//! [`aggregate_by_day`]. It holds no state between calls; caching belongs to
//! whoever wraps it (see [`crate::api`]).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    aggregation::aggregate_by_day,
    errors::Error,
    models::{daily::DailyAggregate, request_params::DailyAggregatesQuery},
    providers::IntradayProvider,
};

/// Anything that can answer a [`DailyAggregatesQuery`].
#[async_trait]
pub trait DailyAggregateSource: Send + Sync {
    /// Returns one record per UTC day in the query window, ascending by day.
    async fn daily_aggregates(
        &self,
        query: &DailyAggregatesQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyAggregate>, Error>;
}

pub struct Aggregator<P> {
    provider: P,
}

impl<P: IntradayProvider> Aggregator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Validates `symbol`/`days` and aggregates the window ending now.
    ///
    /// Invalid input fails with [`Error::InvalidArgument`] before the provider
    /// is contacted.
    pub async fn get_daily_aggregates(
        &self,
        symbol: &str,
        days: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyAggregate>, Error> {
        let query = DailyAggregatesQuery::new(symbol, days)?;
        self.daily_aggregates(&query, cancel).await
    }

    /// Aggregates the `query.days` window ending at `end`.
    pub async fn aggregate_window(
        &self,
        query: &DailyAggregatesQuery,
        end: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyAggregate>, Error> {
        info!(symbol = %query.symbol, days = query.days, "Aggregating data");

        let params = query.window_ending_at(end);
        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            raw = self.provider.fetch_intraday(&params, cancel) => raw?,
        };
        // The fetch may have raced a cancellation; discard its result.
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let days = aggregate_by_day(&raw);
        info!(symbol = %query.symbol, count = days.len(), "Aggregated days of data");
        Ok(days)
    }
}

#[async_trait]
impl<P: IntradayProvider> DailyAggregateSource for Aggregator<P> {
    async fn daily_aggregates(
        &self,
        query: &DailyAggregatesQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyAggregate>, Error> {
        self.aggregate_window(query, Utc::now(), cancel).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        errors::ErrorKind,
        models::{intraday::RawIntradaySeries, request_params::IntradayRequestParams},
        providers::errors::ProviderError,
    };

    /// Returns a canned outcome and records what it was asked for.
    struct StubProvider {
        outcome: fn(&IntradayRequestParams) -> Result<RawIntradaySeries, ProviderError>,
        calls: AtomicUsize,
        last_params: Mutex<Option<IntradayRequestParams>>,
    }

    impl StubProvider {
        fn new(outcome: fn(&IntradayRequestParams) -> Result<RawIntradaySeries, ProviderError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                last_params: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl IntradayProvider for StubProvider {
        async fn fetch_intraday(
            &self,
            params: &IntradayRequestParams,
            _cancel: &CancellationToken,
        ) -> Result<RawIntradaySeries, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params.clone());
            (self.outcome)(params)
        }
    }

    /// Never answers; only cancellation ends the call.
    struct HangingProvider;

    #[async_trait]
    impl IntradayProvider for HangingProvider {
        async fn fetch_intraday(
            &self,
            _params: &IntradayRequestParams,
            _cancel: &CancellationToken,
        ) -> Result<RawIntradaySeries, ProviderError> {
            std::future::pending().await
        }
    }

    fn three_days(_: &IntradayRequestParams) -> Result<RawIntradaySeries, ProviderError> {
        // Jan 7, Jan 5, Jan 6 2026, deliberately out of order.
        Ok(RawIntradaySeries::new(
            vec![1_767_744_000, 1_767_571_200, 1_767_657_600],
            vec![Some(dec!(100)), Some(dec!(101)), Some(dec!(102))],
            vec![Some(dec!(110)), Some(dec!(111)), Some(dec!(112))],
            vec![Some(1000), Some(2000), Some(3000)],
        )
        .unwrap())
    }

    fn unknown_symbol(params: &IntradayRequestParams) -> Result<RawIntradaySeries, ProviderError> {
        Err(ProviderError::InvalidSymbol {
            symbol: params.symbol.to_string(),
        })
    }

    fn upstream_down(_: &IntradayRequestParams) -> Result<RawIntradaySeries, ProviderError> {
        Err(ProviderError::Status {
            status: 503,
            body: "down".into(),
        })
    }

    #[tokio::test]
    async fn returns_sorted_daily_aggregates() {
        let aggregator = Aggregator::new(StubProvider::new(three_days));

        let days = aggregator
            .get_daily_aggregates("nvda", 30, &CancellationToken::new())
            .await
            .unwrap();

        let labels: Vec<_> = days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, vec!["2026-01-05", "2026-01-06", "2026-01-07"]);
        assert_eq!(days[0].low_average, dec!(101));
    }

    #[tokio::test]
    async fn requests_window_ending_at_now() {
        let provider = StubProvider::new(three_days);
        let aggregator = Aggregator::new(provider);
        let query = DailyAggregatesQuery::new("aapl", 10).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 2, 1, 15, 30, 0).unwrap();

        aggregator
            .aggregate_window(&query, end, &CancellationToken::new())
            .await
            .unwrap();

        let params = aggregator.provider.last_params.lock().unwrap().clone().unwrap();
        assert_eq!(params.symbol.as_str(), "AAPL");
        assert_eq!(params.end, end);
        assert_eq!(params.start, end - Duration::days(10));
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_provider() {
        let aggregator = Aggregator::new(StubProvider::new(three_days));
        let cancel = CancellationToken::new();

        for (symbol, days) in [("AAPL", 0), ("AAPL", 366), ("", 30), ("AA/PL", 30)] {
            let err = aggregator
                .get_daily_aggregates(symbol, days, &cancel)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{symbol:?}/{days}");
        }
        assert_eq!(aggregator.provider.calls.load(Ordering::SeqCst), 0);

        for days in [1, 365] {
            assert!(aggregator.get_daily_aggregates("AAPL", days, &cancel).await.is_ok());
        }
        assert_eq!(aggregator.provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn provider_failures_propagate_unchanged() {
        let cancel = CancellationToken::new();

        let err = Aggregator::new(StubProvider::new(unknown_symbol))
            .get_daily_aggregates("ZZZZ", 30, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Provider(ProviderError::InvalidSymbol { ref symbol }) if symbol == "ZZZZ"
        ));

        let err = Aggregator::new(StubProvider::new(upstream_down))
            .get_daily_aggregates("AAPL", 30, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalServiceFailure);
        assert!(matches!(err, Error::Provider(ProviderError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_fetch() {
        let aggregator = Aggregator::new(HangingProvider);
        let cancel = CancellationToken::new();

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };

        let err = aggregator
            .get_daily_aggregates("AAPL", 30, &cancel)
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_the_provider() {
        let aggregator = Aggregator::new(StubProvider::new(three_days));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = aggregator
            .get_daily_aggregates("AAPL", 30, &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(aggregator.provider.calls.load(Ordering::SeqCst), 0);
    }
}
