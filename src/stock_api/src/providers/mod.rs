//! Provider abstraction for intraday market data sources.
//!
//! This module defines the [`IntradayProvider`] trait, the single seam between
//! the aggregation logic and any market data vendor. The concrete
//! [`yahoo_rest`] implementation talks to the Yahoo Finance chart API; tests
//! substitute in-memory providers.
//!
//! Every implementation reports failures through [`ProviderError`], whose
//! [`kind`](ProviderError::kind) collapses vendor-specific conditions into
//! "invalid symbol" and "external service failure".
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use stock_api::models::{intraday::RawIntradaySeries, request_params::IntradayRequestParams};
//! use stock_api::providers::{IntradayProvider, errors::ProviderError};
//! use tokio_util::sync::CancellationToken;
//!
//! struct EmptyProvider;
//!
//! #[async_trait]
//! impl IntradayProvider for EmptyProvider {
//!     async fn fetch_intraday(
//!         &self,
//!         _params: &IntradayRequestParams,
//!         _cancel: &CancellationToken,
//!     ) -> Result<RawIntradaySeries, ProviderError> {
//!         Ok(RawIntradaySeries::empty())
//!     }
//! }
//! ```

pub mod errors;
pub mod yahoo_rest;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    models::{intraday::RawIntradaySeries, request_params::IntradayRequestParams},
    providers::errors::ProviderError,
};

/// Trait for fetching raw intraday samples from a market data provider.
///
/// The trait is object safe so the service can hold a `Box<dyn IntradayProvider>`
/// chosen at runtime.
#[async_trait]
pub trait IntradayProvider: Send + Sync {
    /// Fetches intraday samples for `params.symbol` between `params.start` and `params.end`.
    ///
    /// # Returns
    ///
    /// * `Ok(RawIntradaySeries)` - Equal-length columns, possibly empty.
    /// * `Err(ProviderError::InvalidSymbol)` - The vendor does not know the symbol.
    /// * `Err(ProviderError::Cancelled)` - `cancel` fired before the call finished.
    /// * Any other `Err` - Transport or parse failure.
    async fn fetch_intraday(
        &self,
        params: &IntradayRequestParams,
        cancel: &CancellationToken,
    ) -> Result<RawIntradaySeries, ProviderError>;
}

#[async_trait]
impl<P: IntradayProvider + ?Sized> IntradayProvider for Box<P> {
    async fn fetch_intraday(
        &self,
        params: &IntradayRequestParams,
        cancel: &CancellationToken,
    ) -> Result<RawIntradaySeries, ProviderError> {
        (**self).fetch_intraday(params, cancel).await
    }
}
