//! Caching wrappers around the market-data provider.
//!
//! - `HistoryFetcher::get_stock_data`: six months of daily bars, cached for
//!   the history expiry. Any failure becomes an empty `History`.
//! - `QuoteFetcher::get_stock_price`: latest close, retried with exponential
//!   backoff and cached for the quote expiry. Exhaustion becomes `None`.
//!
//! Neither returns an error: failures are logged here and surface on the page
//! as a missing chart or metric.
use std::sync::Arc;
use std::time::Duration;

use dashboard_common::logging::log_message;
use dashboard_common::{DashboardError, Result, Ticker};

use crate::model::cache::{Clock, TtlCache};
use crate::model::history::History;
use crate::model::provider::{MarketDataProvider, Period};
use crate::model::retry::{RetryPolicy, Sleeper};

/// Cached six-month history lookups.
pub struct HistoryFetcher {
    provider: Arc<dyn MarketDataProvider>,
    cache: TtlCache<Ticker, Arc<History>>,
    expiry: Duration,
}

impl HistoryFetcher {
    /// History fetcher with an empty cache holding entries for `expiry`.
    pub fn new(provider: Arc<dyn MarketDataProvider>, clock: Arc<dyn Clock>, expiry: Duration) -> Self {
        Self {
            provider,
            cache: TtlCache::new(clock),
            expiry,
        }
    }

    /// Daily bars for `ticker`, oldest first; empty when the provider failed.
    ///
    /// Empty results are cached like any other, so a failing ticker is not
    /// retried until its entry expires.
    pub fn get_stock_data(&mut self, ticker: &Ticker) -> Arc<History> {
        let provider = &self.provider;
        self.cache.get_or_compute(ticker, self.expiry, || {
            match fetch_history(provider.as_ref(), ticker) {
                Ok(history) => Arc::new(history),
                Err(e) => {
                    log_message("error", &format!("Failed to fetch data for {}: {}", ticker, e));
                    Arc::new(History::empty())
                }
            }
        })
    }

    /// Forget entries past their expiry.
    pub fn purge_expired(&mut self) -> usize {
        self.cache.purge_expired(self.expiry).len()
    }
}

fn fetch_history(provider: &dyn MarketDataProvider, ticker: &Ticker) -> Result<History> {
    let bars = provider.fetch_bars(ticker, Period::SixMonths)?;
    if bars.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }
    Ok(History::new(bars))
}

/// Cached, retried latest-close lookups.
pub struct QuoteFetcher {
    provider: Arc<dyn MarketDataProvider>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    cache: TtlCache<Ticker, Option<f64>>,
    expiry: Duration,
}

impl QuoteFetcher {
    /// Quote fetcher retrying per `policy`, with an empty cache holding entries for `expiry`.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
        expiry: Duration,
    ) -> Self {
        Self {
            provider,
            sleeper,
            policy,
            cache: TtlCache::new(clock),
            expiry,
        }
    }

    /// Most recent close for `ticker`, or `None` after every attempt failed.
    pub fn get_stock_price(&mut self, ticker: &Ticker) -> Option<f64> {
        let provider = &self.provider;
        let sleeper = &self.sleeper;
        let policy = self.policy;
        self.cache.get_or_compute(ticker, self.expiry, || {
            let price = policy.run(
                sleeper.as_ref(),
                |_| fetch_last_close(provider.as_ref(), ticker),
                |attempt, e| {
                    log_message(
                        "warning",
                        &format!(
                            "Retrying {} ({}/{}): {}",
                            ticker,
                            attempt + 1,
                            policy.max_attempts(),
                            e
                        ),
                    );
                },
            );
            if price.is_none() {
                log_message("error", &format!("Failed to fetch real-time price for {}", ticker));
            }
            price
        })
    }

    /// Forget entries past their expiry.
    pub fn purge_expired(&mut self) -> usize {
        self.cache.purge_expired(self.expiry).len()
    }
}

fn fetch_last_close(provider: &dyn MarketDataProvider, ticker: &Ticker) -> Result<f64> {
    let bars = provider.fetch_bars(ticker, Period::OneDay)?;
    let close = bars.last().ok_or(DashboardError::EmptyDataset)?.close;
    if close.is_nan() {
        return Err(DashboardError::InvalidPrice);
    }
    Ok(close)
}
