//! HTTP boundary.
//!
//! - `GET /api/v1/stock/{symbol}?days=N`: daily aggregates (days defaults to 30)
//! - `GET /health`: liveness
//!
//! Responses are cached here, around the aggregation service, keyed by the
//! normalized query. Only successful results are cached.

pub mod error;
mod handlers;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::{cache::ResponseCache, models::daily::DailyAggregate, service::DailyAggregateSource};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DailyAggregateSource>,
    pub cache: Arc<dyn ResponseCache<Vec<DailyAggregate>>>,
    pub cache_ttl: Duration,
    /// Parent of each request's cancellation token; cancelled on shutdown.
    pub shutdown: CancellationToken,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/stock/{symbol}", get(handlers::get_stock_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
