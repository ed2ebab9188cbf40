//! Test doubles shared by the unit tests.
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::sync::Once;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use dashboard_common::{DashboardError, Result, Ticker};
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::model::cache::Clock;
use crate::model::chart::Figure;
use crate::model::history::Bar;
use crate::model::provider::{MarketDataProvider, Period};
use crate::model::retry::Sleeper;
use crate::page::DashboardUi;

pub fn ticker(symbol: &str) -> Ticker {
    symbol.parse().unwrap()
}

/// `count` consecutive daily bars from 2024-01-01, closes rising by one from `first_close`.
pub fn bars(count: usize, first_close: f64) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            let close = first_close + i as f64;
            Bar {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
            }
        })
        .collect()
}

/// Clock that only moves when told to.
pub struct ManualClock {
    start: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }
}

/// Sleeper that records requested pauses instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

type Script = VecDeque<std::result::Result<Vec<Bar>, String>>;

/// Provider answering from per-(period, ticker) queues.
///
/// Responses are consumed in order; the last one repeats. A key with no script
/// fails every call.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: RefCell<HashMap<(Period, String), Script>>,
    calls: RefCell<HashMap<(Period, String), usize>>,
}

impl ScriptedProvider {
    pub fn push(&self, period: Period, symbol: &str, response: Result<Vec<Bar>>) {
        let response = response.map_err(|e| match e {
            DashboardError::Provider(detail) => detail,
            other => other.to_string(),
        });
        self.scripts
            .borrow_mut()
            .entry((period, symbol.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self, period: Period, symbol: &str) -> usize {
        self.calls
            .borrow()
            .get(&(period, symbol.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl MarketDataProvider for ScriptedProvider {
    fn fetch_bars(&self, ticker: &Ticker, period: Period) -> Result<Vec<Bar>> {
        let key = (period, ticker.to_string());
        *self.calls.borrow_mut().entry(key.clone()).or_insert(0) += 1;

        let mut scripts = self.scripts.borrow_mut();
        let response = match scripts.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match response {
            Some(Ok(bars)) => Ok(bars),
            Some(Err(detail)) => Err(DashboardError::Provider(detail)),
            None => Err(DashboardError::Provider(format!("no data scripted for {}", ticker))),
        }
    }
}

/// One call made against a `RecordingUi`.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Title(String),
    SidebarHeader(String),
    Multiselect(String),
    Subheader(String),
    Charts(Figure, Figure),
    Metric { label: String, value: String },
    Error(String),
    Divider,
}

/// UI that records widgets; `selection` stands in for the user's choice.
#[derive(Default)]
pub struct RecordingUi {
    pub selection: Option<Vec<Ticker>>,
    pub widgets: Vec<Widget>,
}

impl RecordingUi {
    pub fn selecting(symbols: &[&str]) -> Self {
        Self {
            selection: Some(symbols.iter().map(|s| ticker(s)).collect()),
            widgets: Vec::new(),
        }
    }

    pub fn count(&self, matches: impl Fn(&Widget) -> bool) -> usize {
        self.widgets.iter().filter(|w| matches(w)).count()
    }
}

impl DashboardUi for RecordingUi {
    fn title(&mut self, text: &str) {
        self.widgets.push(Widget::Title(text.to_string()));
    }

    fn sidebar_header(&mut self, text: &str) {
        self.widgets.push(Widget::SidebarHeader(text.to_string()));
    }

    fn multiselect(&mut self, label: &str, _options: &[Ticker], default: &[Ticker]) -> Vec<Ticker> {
        self.widgets.push(Widget::Multiselect(label.to_string()));
        self.selection.clone().unwrap_or_else(|| default.to_vec())
    }

    fn subheader(&mut self, text: &str) {
        self.widgets.push(Widget::Subheader(text.to_string()));
    }

    fn chart_columns(&mut self, left: &Figure, right: &Figure) {
        self.widgets.push(Widget::Charts(left.clone(), right.clone()));
    }

    fn metric(&mut self, label: &str, value: &str) {
        self.widgets.push(Widget::Metric {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    fn error(&mut self, text: &str) {
        self.widgets.push(Widget::Error(text.to_string()));
    }

    fn divider(&mut self) {
        self.widgets.push(Widget::Divider);
    }
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<(Level, String)>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| {
            if let Some(records) = captured.borrow_mut().as_mut() {
                records.push((record.level(), record.args().to_string()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Run `f` and return its result together with every record it logged on this thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
    let result = f();
    let records = CAPTURED.with(|captured| captured.borrow_mut().take().unwrap_or_default());
    (result, records)
}
