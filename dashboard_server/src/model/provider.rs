//! Market-data provider seam and the Yahoo Finance chart client.
//!
//! The dashboard asks a provider for one thing only: the daily bars of a ticker
//! over a trailing period. `YahooProvider` answers that from the v8 chart
//! endpoint:
//!
//! ```text
//! GET {base}/v8/finance/chart/{ticker}?range=6mo&interval=1d
//! ```
//!
//! Non-2xx responses, an API-level `chart.error` and undecodable bodies are
//! faults. A response without a result or without timestamps is an empty
//! series, which the fetchers treat as a failure of their own.
use chrono::{DateTime, NaiveDate};
use dashboard_common::{DashboardError, Result, Ticker};
use log::debug;
use serde::Deserialize;
use strum_macros::Display;

use crate::model::history::Bar;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Trailing window requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Period {
    /// Roughly six months of daily bars, used for the charts.
    #[strum(serialize = "6mo")]
    SixMonths,
    /// The most recent trading day, used for the current price.
    #[strum(serialize = "1d")]
    OneDay,
}

/// Source of daily OHLC bars.
pub trait MarketDataProvider {
    /// Fetch the daily bars of `ticker` covering `period`.
    fn fetch_bars(&self, ticker: &Ticker, period: Period) -> Result<Vec<Bar>>;
}

/// Blocking client for the Yahoo Finance chart API.
pub struct YahooProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    /// Create a client against `base_url` (e.g. `https://query1.finance.yahoo.com`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DashboardError::Provider(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl MarketDataProvider for YahooProvider {
    fn fetch_bars(&self, ticker: &Ticker, period: Period) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, ticker, period
        );
        debug!("Fetching from provider: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DashboardError::Provider(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| DashboardError::Provider(e.to_string()))?;
        debug!("Provider response for {}: {} ({} bytes)", ticker, status, body.len());

        if !status.is_success() {
            // Yahoo explains most rejections (unknown symbol, bad range) in the body.
            return match parse_chart(&body) {
                Err(DashboardError::Provider(detail)) => Err(DashboardError::Provider(detail)),
                _ => Err(DashboardError::Provider(format!("HTTP {}", status))),
            };
        }
        parse_chart(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

/// Decode a chart response body into bars.
///
/// Timestamps are shifted by the exchange `gmtoffset` before truncating to a
/// date. Rows whose four prices are all null are dropped; a partially null row
/// keeps NaN in the missing columns.
pub(crate) fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        return Err(DashboardError::Provider(format!(
            "{} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let open = value_at(&quote.open, i);
        let high = value_at(&quote.high, i);
        let low = value_at(&quote.low, i);
        let close = value_at(&quote.close, i);
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }
        let Some(date) = local_date(*ts, offset) else {
            continue;
        };
        bars.push(Bar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
        });
    }
    Ok(bars)
}

fn value_at(series: &Option<Vec<Option<f64>>>, index: usize) -> Option<f64> {
    series.as_ref().and_then(|values| values.get(index).copied().flatten())
}

fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp.checked_add(gmtoffset)?, 0).map(|dt| dt.date_naive())
}
