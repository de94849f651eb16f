use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use rust_decimal_macros::dec;
use serde_json::Value;
use stock_api::{
    api::{AppState, create_router},
    cache::{InMemoryCache, ResponseCache},
    errors::Error,
    models::{daily::DailyAggregate, request_params::DailyAggregatesQuery},
    providers::errors::ProviderError,
    service::DailyAggregateSource,
};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Answers from the symbol alone and counts calls.
#[derive(Default)]
struct StubSource {
    calls: AtomicUsize,
}

#[async_trait]
impl DailyAggregateSource for StubSource {
    async fn daily_aggregates(
        &self,
        query: &DailyAggregatesQuery,
        _cancel: &CancellationToken,
    ) -> Result<Vec<DailyAggregate>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match query.symbol.as_str() {
            "NOPE" => Err(ProviderError::InvalidSymbol {
                symbol: "NOPE".into(),
            }
            .into()),
            "DOWN" => Err(ProviderError::Status {
                status: 503,
                body: "unavailable".into(),
            }
            .into()),
            _ => Ok(vec![
                DailyAggregate {
                    day: "2026-01-05".into(),
                    low_average: dec!(101),
                    high_average: dec!(113.5),
                    volume: 3000,
                },
                DailyAggregate {
                    day: "2026-01-06".into(),
                    low_average: dec!(100.5556),
                    high_average: dec!(200.5556),
                    volume: 3000,
                },
            ]),
        }
    }
}

struct Harness {
    router: Router,
    source: Arc<StubSource>,
    cache: Arc<InMemoryCache<Vec<DailyAggregate>>>,
}

fn harness() -> Harness {
    let source = Arc::new(StubSource::default());
    let cache = Arc::new(InMemoryCache::new());
    let state = AppState {
        source: source.clone(),
        cache: cache.clone(),
        cache_ttl: Duration::from_secs(900),
        shutdown: CancellationToken::new(),
    };
    Harness {
        router: create_router(state),
        source,
        cache,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_check_is_ok() {
    let h = harness();
    let response = h
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn returns_daily_aggregates_as_json() {
    let h = harness();

    let (status, body) = get(&h.router, "/api/v1/stock/aapl?days=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([
            {"day": "2026-01-05", "lowAverage": 101.0, "highAverage": 113.5, "volume": 3000},
            {"day": "2026-01-06", "lowAverage": 100.5556, "highAverage": 200.5556, "volume": 3000}
        ])
    );
    assert!(h.cache.get("stock_AAPL_10").is_some());
}

#[tokio::test]
async fn days_defaults_to_thirty() {
    let h = harness();

    let (status, _) = get(&h.router, "/api/v1/stock/MSFT").await;

    assert_eq!(status, StatusCode::OK);
    assert!(h.cache.get("stock_MSFT_30").is_some());
}

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let h = harness();

    let (first_status, first) = get(&h.router, "/api/v1/stock/aapl?days=7").await;
    let (second_status, second) = get(&h.router, "/api/v1/stock/AAPL?days=7").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn out_of_range_days_is_bad_request() {
    let h = harness();

    for uri in [
        "/api/v1/stock/AAPL?days=0",
        "/api/v1/stock/AAPL?days=366",
        "/api/v1/stock/AAPL?days=-5",
        "/api/v1/stock/AAPL?days=ten",
    ] {
        let (status, body) = get(&h.router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("Days must be"), "{uri}: {body}");
        assert!(body["timestamp"].is_string());
    }
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn boundary_days_are_accepted() {
    let h = harness();
    for uri in ["/api/v1/stock/AAPL?days=1", "/api/v1/stock/AAPL?days=365"] {
        let (status, _) = get(&h.router, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn malformed_symbol_is_bad_request() {
    let h = harness();

    let (status, body) = get(&h.router, "/api/v1/stock/AA%20PL").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid character"));
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_symbol_is_not_found() {
    let h = harness();

    let (status, body) = get(&h.router, "/api/v1/stock/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid or unknown stock symbol: NOPE");
}

#[tokio::test]
async fn provider_outage_is_bad_gateway_and_not_cached() {
    let h = harness();

    let (status, _) = get(&h.router, "/api/v1/stock/DOWN").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = get(&h.router, "/api/v1/stock/DOWN").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    assert_eq!(h.source.calls.load(Ordering::SeqCst), 2);
    assert!(h.cache.get("stock_DOWN_30").is_none());
}
