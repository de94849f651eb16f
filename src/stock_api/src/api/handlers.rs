use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    api::{AppState, error::ApiError},
    errors::Error,
    models::{
        daily::DailyAggregate,
        request_params::{DEFAULT_DAYS, DailyAggregatesQuery},
    },
};

#[derive(Debug, Deserialize)]
pub(super) struct StockQueryParams {
    days: Option<i64>,
}

pub(super) async fn health_check() -> &'static str {
    "OK"
}

pub(super) async fn get_stock_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    params: Result<Query<StockQueryParams>, QueryRejection>,
) -> Result<Json<Vec<DailyAggregate>>, ApiError> {
    let Query(params) = params
        .map_err(|_| Error::InvalidArgument("Days must be an integer".to_string()))?;
    let days = params.days.unwrap_or(i64::from(DEFAULT_DAYS));
    let query = DailyAggregatesQuery::new(&symbol, days)?;
    let key = query.cache_key();

    if let Some(cached) = state.cache.get(&key) {
        info!(symbol = %query.symbol, days = query.days, "Returning cached data");
        return Ok(Json(cached));
    }

    // Dropping this future (client gone) drops the guard, which cancels the
    // token so the provider call stops too.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let data = state.source.daily_aggregates(&query, &cancel).await?;
    state.cache.set(key, data.clone(), state.cache_ttl);

    info!(
        symbol = %query.symbol,
        count = data.len(),
        "Successfully retrieved daily aggregates"
    );
    Ok(Json(data))
}
