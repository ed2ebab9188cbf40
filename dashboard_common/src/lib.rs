//!
//! Common types and utilities shared by the dashboard server crates.
//!
//! This crate aggregates:
//! - `error`: unified error type `DashboardError` used across the workspace.
//! - `result`: handy `Result<T, DashboardError>` alias.
//! - `tickers`: the opaque `Ticker` symbol and list parsing helpers.
//! - `config`: startup constants and the resolved `DashboardConfig`.
//! - `logging`: logger initialisation and the leveled `log_message` helper.
//! - `net`: networking constants and small helpers.
#![warn(missing_docs)]
pub mod config;
pub mod error;
pub mod logging;
pub mod net;
pub mod result;
pub mod tickers;

pub use config::DashboardConfig;
pub use error::DashboardError;
pub use result::Result;
pub use tickers::Ticker;
