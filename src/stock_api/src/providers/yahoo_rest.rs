//! Yahoo Finance chart API client.
//!
//! - [`params`]: query construction and interval selection.
//! - [`response`]: wire DTOs and their translation into [`RawIntradaySeries`](crate::models::intraday::RawIntradaySeries).
//! - [`provider`]: the [`IntradayProvider`](crate::providers::IntradayProvider) implementation.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::YahooFinanceProvider;
