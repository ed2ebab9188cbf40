//! Daily price history.
//!
//! A `History` is the chronologically ordered table the fetcher returns and the
//! chart builder consumes. An empty table is the uniform failure signal.
use chrono::NaiveDate;

/// One trading day. Prices the provider left blank are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Trading date in the exchange's local calendar.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

/// Chronologically ascending sequence of daily bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    bars: Vec<Bar>,
}

impl History {
    /// Build a history, sorting the bars by date. Equal dates keep their order.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self { bars }
    }

    /// The failure value: no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True for the failure value.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Date column.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Open column.
    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    /// High column.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Low column.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Close column.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
