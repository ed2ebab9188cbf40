//! Domain models and utilities for the dashboard server.
//!
//! This module groups the data types and helpers behind one render pass:
//! - `history`: daily OHLC `Bar`s and the ordered `History` table.
//! - `provider`: the `MarketDataProvider` seam and the Yahoo chart client.
//! - `cache`: time-bounded `TtlCache` with an injectable `Clock`.
//! - `retry`: fixed-count exponential-backoff `RetryPolicy`.
//! - `fetcher`: caching `HistoryFetcher` and retrying `QuoteFetcher`.
//! - `chart`: Plotly figure construction.

pub mod cache;
pub mod chart;
pub mod fetcher;
pub mod history;
pub mod provider;
pub mod retry;
