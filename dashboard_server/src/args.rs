//! Command-line arguments for the dashboard server.
//!
//! Every flag defaults to the value in `dashboard_common::config`; the resolved
//! settings are fixed for the lifetime of the process.
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dashboard_common::config::{
    CACHE_EXPIRY, DEFAULT_SELECTION, MAX_ATTEMPTS, UPDATE_FREQUENCY,
};
use dashboard_common::net::{BIND_ADDRESS, HTTP_PORT, PROVIDER_URL, addr};
use dashboard_common::tickers::TickerParser;
use dashboard_common::{DashboardConfig, DashboardError, Result, Ticker};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Real-time stock dashboard served over HTTP", long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[clap(long, default_value = BIND_ADDRESS)]
    pub bind: String,

    /// Port to listen on.
    #[clap(long, default_value_t = HTTP_PORT)]
    pub port: u16,

    /// Base URL of the Yahoo Finance compatible chart API.
    #[clap(long, default_value = PROVIDER_URL)]
    pub provider_url: String,

    /// Path to a text file with the tickers offered for selection.
    /// Tickers may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub tickers_file: Option<PathBuf>,

    /// Ticker selected on first load; repeat for several.
    #[clap(long = "default-ticker")]
    pub default_tickers: Vec<Ticker>,

    /// Seconds a price history stays cached.
    #[clap(long, default_value_t = CACHE_EXPIRY)]
    pub history_expiry_secs: u64,

    /// Seconds a current price stays cached.
    #[clap(long, default_value_t = UPDATE_FREQUENCY)]
    pub quote_expiry_secs: u64,

    /// Provider attempts per current-price lookup.
    #[clap(long, default_value_t = MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Seconds between automatic page reloads; 0 disables.
    #[clap(long, default_value_t = UPDATE_FREQUENCY)]
    pub auto_refresh_secs: u64,
}

impl Args {
    /// `bind:port` for the HTTP listener.
    pub fn listen_address(&self) -> String {
        addr(&self.bind, self.port)
    }

    /// Resolve the flags into a validated configuration.
    pub fn to_config(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig {
            provider_url: self.provider_url.clone(),
            history_expiry: Duration::from_secs(self.history_expiry_secs),
            quote_expiry: Duration::from_secs(self.quote_expiry_secs),
            max_attempts: self.max_attempts,
            auto_refresh: (self.auto_refresh_secs > 0)
                .then(|| Duration::from_secs(self.auto_refresh_secs)),
            ..DashboardConfig::default()
        };

        if let Some(path) = &self.tickers_file {
            let file = File::open(path).map_err(|e| {
                DashboardError::ParseTickers(format!("cannot open {}: {}", path.display(), e))
            })?;
            config.ticker_options = Ticker::parse_from_file(BufReader::new(file))?;
        }

        config.default_tickers = if self.default_tickers.is_empty() {
            default_selection(&config.ticker_options)
        } else {
            self.default_tickers.clone()
        };

        config.validate()?;
        Ok(config)
    }
}

/// The built-in default selection where offered, else the first option.
fn default_selection(options: &[Ticker]) -> Vec<Ticker> {
    let preferred: Vec<Ticker> = DEFAULT_SELECTION
        .iter()
        .filter_map(|s| s.parse::<Ticker>().ok())
        .filter(|t| options.contains(t))
        .collect();
    if preferred.is_empty() {
        options.iter().take(1).cloned().collect()
    } else {
        preferred
    }
}
