//! One render pass over the selected tickers.
//!
//! For every ticker, in selection order: a subheader, then either the line and
//! candlestick charts followed by the current-price metric, or an error banner
//! when no history could be loaded. A divider closes each section.
use std::sync::Arc;

use dashboard_common::{DashboardConfig, Ticker};
use log::debug;

use crate::model::cache::Clock;
use crate::model::chart::plot_chart;
use crate::model::fetcher::{HistoryFetcher, QuoteFetcher};
use crate::model::provider::MarketDataProvider;
use crate::model::retry::{RetryPolicy, Sleeper};
use crate::page::DashboardUi;

const DASHBOARD_TITLE: &str = "Real-Time Stock Market Dashboard";
const SIDEBAR_HEADER: &str = "Stock Selection";
const SELECT_LABEL: &str = "Select Stocks:";

/// Owns both fetchers, and with them both caches, across render passes.
pub struct DashboardController {
    history: HistoryFetcher,
    quotes: QuoteFetcher,
    options: Vec<Ticker>,
    default_selection: Vec<Ticker>,
}

impl DashboardController {
    /// Build both fetchers from `config` over a shared provider, clock and sleeper.
    pub fn new(
        config: &DashboardConfig,
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let policy = RetryPolicy::new(config.max_attempts, config.retry_base_delay);
        Self {
            history: HistoryFetcher::new(provider.clone(), clock.clone(), config.history_expiry),
            quotes: QuoteFetcher::new(provider, clock, sleeper, policy, config.quote_expiry),
            options: config.ticker_options.clone(),
            default_selection: config.default_tickers.clone(),
        }
    }

    /// Render the whole dashboard into `ui`.
    pub fn render(&mut self, ui: &mut dyn DashboardUi) {
        let purged = self.history.purge_expired() + self.quotes.purge_expired();
        if purged > 0 {
            debug!("Dropped {} expired cache entries", purged);
        }

        ui.title(DASHBOARD_TITLE);
        ui.sidebar_header(SIDEBAR_HEADER);
        let stocks = ui.multiselect(SELECT_LABEL, &self.options, &self.default_selection);
        debug!("Rendering {} ticker section(s)", stocks.len());

        for stock in &stocks {
            self.render_ticker(ui, stock);
        }
    }

    fn render_ticker(&mut self, ui: &mut dyn DashboardUi, stock: &Ticker) {
        ui.subheader(&format!("{} Stock Performance", stock));

        let history = self.history.get_stock_data(stock);
        if history.is_empty() {
            ui.error(&format!("Could not load data for {}.", stock));
        } else {
            let line = plot_chart(&history, &format!("{} - Line Chart", stock), "line");
            let candles = plot_chart(&history, &format!("{} - Candlestick Chart", stock), "candlestick");
            ui.chart_columns(&line, &candles);

            if let Some(price) = self.quotes.get_stock_price(stock) {
                ui.metric(&format!("{} Current Price", stock), &format_price(price));
            }
        }
        ui.divider();
    }
}

/// Dollar amount with two decimals, e.g. `$187.25`.
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}
