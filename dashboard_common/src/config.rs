//! Startup configuration.
//!
//! The constants mirror the dashboard's defaults; `DashboardConfig` is the
//! resolved form the server builds once from its command-line arguments and
//! hands to the controller.
use std::time::Duration;

use crate::error::DashboardError;
use crate::net::PROVIDER_URL;
use crate::tickers::Ticker;

/// Quote cache expiry in seconds; also the page auto-refresh interval.
pub const UPDATE_FREQUENCY: u64 = 60;
/// History cache expiry in seconds.
pub const CACHE_EXPIRY: u64 = 300;
/// Provider attempts per quote lookup.
pub const MAX_ATTEMPTS: u32 = 3;
/// First backoff delay in seconds; doubles on every following attempt.
pub const RETRY_BASE_DELAY: u64 = 1;
/// Browser tab title.
pub const PAGE_TITLE: &str = "Real-Time Stock Dashboard";
/// Tickers offered by the sidebar multiselect.
pub const DEFAULT_OPTIONS: &[&str] = &["AAPL", "TSLA", "MSFT", "GOOGL", "AMZN"];
/// Tickers selected on first load.
pub const DEFAULT_SELECTION: &[&str] = &["AAPL"];

/// Fully resolved dashboard settings, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Browser tab title.
    pub page_title: String,
    /// Base URL of the market-data provider.
    pub provider_url: String,
    /// How long a fetched price history stays visible.
    pub history_expiry: Duration,
    /// How long a fetched quote (or its absence) stays visible.
    pub quote_expiry: Duration,
    /// Provider attempts per quote lookup, at least one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards.
    pub retry_base_delay: Duration,
    /// Tickers the user may pick from, in display order.
    pub ticker_options: Vec<Ticker>,
    /// Tickers selected when the form has not been submitted yet.
    pub default_tickers: Vec<Ticker>,
    /// Interval for the page's meta refresh; `None` disables it.
    pub auto_refresh: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_title: String::from(PAGE_TITLE),
            provider_url: String::from(PROVIDER_URL),
            history_expiry: Duration::from_secs(CACHE_EXPIRY),
            quote_expiry: Duration::from_secs(UPDATE_FREQUENCY),
            max_attempts: MAX_ATTEMPTS,
            retry_base_delay: Duration::from_secs(RETRY_BASE_DELAY),
            ticker_options: parse_symbols(DEFAULT_OPTIONS),
            default_tickers: parse_symbols(DEFAULT_SELECTION),
            auto_refresh: Some(Duration::from_secs(UPDATE_FREQUENCY)),
        }
    }
}

impl DashboardConfig {
    /// Check the invariants the controller relies on.
    ///
    /// Every default ticker must be one of the options, the option list must
    /// not be empty and at least one provider attempt must be allowed.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.max_attempts == 0 {
            return Err(DashboardError::Format(String::from(
                "max attempts must be at least 1",
            )));
        }
        if self.ticker_options.is_empty() {
            return Err(DashboardError::Format(String::from(
                "ticker option list is empty",
            )));
        }
        if let Some(missing) = self
            .default_tickers
            .iter()
            .find(|t| !self.ticker_options.contains(t))
        {
            return Err(DashboardError::Format(format!(
                "default ticker {} is not among the options",
                missing
            )));
        }
        Ok(())
    }
}

fn parse_symbols(symbols: &[&str]) -> Vec<Ticker> {
    symbols.iter().filter_map(|s| s.parse().ok()).collect()
}
