//! Daily stock aggregates built from intraday market data.
//!
//! A request names a symbol and a trailing window of days. The service
//! fetches intraday samples from a provider (Yahoo Finance by default),
//! groups them by UTC calendar day and reports each day's average low,
//! average high and total volume.

pub mod aggregation;
pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod service;
pub mod telemetry;
