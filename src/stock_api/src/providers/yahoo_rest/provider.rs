use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    config::YahooFinanceConfig,
    models::{intraday::RawIntradaySeries, request_params::IntradayRequestParams, symbol::Symbol},
    providers::{
        IntradayProvider,
        errors::{ProviderError, ProviderInitError},
        yahoo_rest::{params::construct_params, response::decode_chart},
    },
};

pub struct YahooFinanceProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl YahooFinanceProvider {
    /// Creates a new Yahoo Finance provider.
    ///
    /// The HTTP client carries the configured `User-Agent` (Yahoo rejects
    /// requests without a browser-like one) and request timeout. Outbound
    /// calls are throttled to `requests_per_minute`.
    pub fn new(config: &YahooFinanceConfig) -> Result<Self, ProviderInitError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ProviderInitError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            limiter: RateLimiter::direct(Quota::per_minute(config.requests_per_minute)),
        })
    }

    fn chart_url(&self, symbol: &Symbol) -> String {
        format!("{}/{}", self.base_url, symbol)
    }

    async fn fetch_chart(
        &self,
        params: &IntradayRequestParams,
    ) -> Result<RawIntradaySeries, ProviderError> {
        self.limiter.until_ready().await;

        let response = self
            .client
            .get(self.chart_url(&params.symbol))
            .query(&construct_params(params))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_chart(params.symbol.as_str(), status, &body)
    }
}

#[async_trait]
impl IntradayProvider for YahooFinanceProvider {
    async fn fetch_intraday(
        &self,
        params: &IntradayRequestParams,
        cancel: &CancellationToken,
    ) -> Result<RawIntradaySeries, ProviderError> {
        info!(
            symbol = %params.symbol,
            start = %params.start,
            end = %params.end,
            "Fetching intraday data"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.fetch_chart(params) => result,
        };

        match &result {
            Ok(series) => info!(
                symbol = %params.symbol,
                count = series.len(),
                "Fetched intraday data points"
            ),
            Err(ProviderError::InvalidSymbol { .. }) => {
                warn!(symbol = %params.symbol, "Yahoo Finance returned no data for symbol")
            }
            Err(ProviderError::Cancelled) => info!(symbol = %params.symbol, "Intraday fetch cancelled"),
            Err(e) => error!(symbol = %params.symbol, error = %e, "Intraday fetch failed"),
        }

        result
    }
}
