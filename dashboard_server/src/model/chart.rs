//! Chart construction.
//!
//! A `Figure` mirrors the Plotly figure JSON (`{"data": [...], "layout": {...}}`)
//! so the page can hand it straight to `Plotly.newPlot`. `plot_chart` builds
//! either a close-price line or an OHLC candlestick from a `History`.
use chrono::NaiveDate;
use dashboard_common::Result;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::model::history::History;

const X_AXIS_TITLE: &str = "Date";
const Y_AXIS_TITLE: &str = "Price";
const LINE_TRACE_NAME: &str = "Stock Price";
const INCREASING_COLOR: &str = "green";
const DECREASING_COLOR: &str = "red";

/// Kind of chart requested from [`plot_chart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ChartKind {
    /// Close price over time.
    Line,
    /// Open, high, low and close per day.
    Candlestick,
}

impl ChartKind {
    /// `"candlestick"` selects a candlestick; every other name a line.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(ChartKind::Line)
    }
}

/// Renderable figure: zero or one trace plus layout metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    /// Traces to draw; empty when there was nothing to plot.
    pub data: Vec<Trace>,
    /// Title and axis labels.
    pub layout: Layout,
}

impl Figure {
    /// Plotly figure JSON for `Plotly.newPlot`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A single Plotly trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Line of `y` over `x`.
    Scatter {
        /// Trading dates.
        x: Vec<NaiveDate>,
        /// Closing prices.
        y: Vec<f64>,
        /// Plotly draw mode, `lines` here.
        mode: String,
        /// Legend name.
        name: String,
    },
    /// OHLC candles.
    Candlestick {
        /// Trading dates.
        x: Vec<NaiveDate>,
        /// Opening prices.
        open: Vec<f64>,
        /// Session highs.
        high: Vec<f64>,
        /// Session lows.
        low: Vec<f64>,
        /// Closing prices.
        close: Vec<f64>,
        /// Style of candles that closed above their open.
        increasing: CandleStyle,
        /// Style of candles that closed below their open.
        decreasing: CandleStyle,
    },
}

/// Per-direction candle styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleStyle {
    /// Outline of the candle body and wick.
    pub line: LineStyle,
}

/// Stroke settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    /// CSS color name or value.
    pub color: String,
}

impl CandleStyle {
    fn colored(color: &str) -> Self {
        Self {
            line: LineStyle {
                color: color.to_string(),
            },
        }
    }
}

/// Figure layout; unset parts are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    /// Chart title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Horizontal axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    /// Vertical axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
}

/// Plotly title object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Displayed text.
    pub text: String,
}

/// Plotly axis object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    /// Axis label.
    pub title: Title,
}

fn title(text: &str) -> Title {
    Title {
        text: text.to_string(),
    }
}

/// Build a chart of `history`.
///
/// An empty history yields an empty figure without title or axes. Otherwise
/// the figure carries exactly one trace with one point per bar.
pub fn plot_chart(history: &History, chart_title: &str, chart_kind: &str) -> Figure {
    if history.is_empty() {
        return Figure::default();
    }

    let trace = match ChartKind::from_name(chart_kind) {
        ChartKind::Candlestick => Trace::Candlestick {
            x: history.dates(),
            open: history.opens(),
            high: history.highs(),
            low: history.lows(),
            close: history.closes(),
            increasing: CandleStyle::colored(INCREASING_COLOR),
            decreasing: CandleStyle::colored(DECREASING_COLOR),
        },
        ChartKind::Line => Trace::Scatter {
            x: history.dates(),
            y: history.closes(),
            mode: String::from("lines"),
            name: String::from(LINE_TRACE_NAME),
        },
    };

    Figure {
        data: vec![trace],
        layout: Layout {
            title: Some(title(chart_title)),
            xaxis: Some(Axis {
                title: title(X_AXIS_TITLE),
            }),
            yaxis: Some(Axis {
                title: title(Y_AXIS_TITLE),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars;
    use serde_json::json;

    #[test]
    fn empty_history_gives_empty_figure() {
        let figure = plot_chart(&History::empty(), "AAPL - Candlestick Chart", "candlestick");
        assert!(figure.data.is_empty());
        assert_eq!(figure.layout, Layout::default());
        assert_eq!(figure.to_json().unwrap(), r#"{"data":[],"layout":{}}"#);
    }

    #[test]
    fn candlestick_has_one_trace_per_bar() {
        let history = History::new(bars(30, 100.0));
        let figure = plot_chart(&history, "AAPL - Candlestick Chart", "candlestick");
        assert_eq!(figure.data.len(), 1);
        match &figure.data[0] {
            Trace::Candlestick {
                x,
                close,
                increasing,
                decreasing,
                ..
            } => {
                assert_eq!(x.len(), 30);
                assert_eq!(close, &history.closes());
                assert_eq!(increasing.line.color, "green");
                assert_eq!(decreasing.line.color, "red");
            }
            other => panic!("expected candlestick, got {:?}", other),
        }
    }

    #[test]
    fn any_other_kind_is_a_line() {
        let history = History::new(bars(12, 50.0));
        for kind in ["line", "area", "", "Candlestick"] {
            let figure = plot_chart(&history, "chart", kind);
            assert_eq!(figure.data.len(), 1);
            assert!(matches!(
                &figure.data[0],
                Trace::Scatter { x, name, .. } if name == "Stock Price" && x.len() == 12
            ));
        }
    }

    #[test]
    fn layout_serializes_as_plotly_json() {
        let history = History::new(bars(2, 10.0));
        let figure = plot_chart(&history, "TSLA - Line Chart", "line");
        let value: serde_json::Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();

        assert_eq!(value["layout"]["title"], json!({"text": "TSLA - Line Chart"}));
        assert_eq!(value["layout"]["xaxis"]["title"]["text"], "Date");
        assert_eq!(value["layout"]["yaxis"]["title"]["text"], "Price");
        assert_eq!(value["data"][0]["type"], "scatter");
        assert_eq!(value["data"][0]["mode"], "lines");
        assert_eq!(value["data"][0]["x"][0], "2024-01-01");
    }

    #[test]
    fn nan_prices_serialize_as_gaps() {
        let mut rows = bars(2, 10.0);
        rows[1].close = f64::NAN;
        let figure = plot_chart(&History::new(rows), "gap", "line");
        let value: serde_json::Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();
        assert!(value["data"][0]["y"][1].is_null());
    }

    #[test]
    fn input_history_is_untouched() {
        let history = History::new(bars(3, 1.0));
        let before = history.clone();
        let _ = plot_chart(&history, "t", "candlestick");
        assert_eq!(history, before);
    }
}
