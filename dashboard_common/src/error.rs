//! Error types shared across the workspace.
//!
//! The `DashboardError` enum unifies the failure cases of the provider client,
//! the HTTP front end and internal plumbing so that every crate can propagate a
//! single error type. Fetch failures never reach the page: the fetchers log
//! them and degrade to an empty history or an absent quote.
use std::io;

use thiserror::Error;

/// Unified error type shared by the dashboard crates.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing a ticker list into `Ticker` values.
    #[error("Parse tickers error: {0}")]
    ParseTickers(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Transport or protocol failure talking to the market-data provider.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider answered, but with zero rows.
    #[error("Received empty dataset from API")]
    EmptyDataset,

    /// A price was extracted but is missing or not a number.
    #[error("Invalid price data received")]
    InvalidPrice,

    /// Malformed or unsupported HTTP request from a browser.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}
