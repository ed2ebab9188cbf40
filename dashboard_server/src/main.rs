//! Real-time stock dashboard server.
//!
//! This binary serves a single HTML page showing six months of daily prices and
//! the latest close for a user-selected set of tickers. Internally, it wires
//! together a few building blocks:
//!
//! - `PageReceiver`: accepts browser connections on a background thread,
//!   parses each request head and forwards valid requests over a
//!   `crossbeam_channel`.
//! - `DashboardController`: owns the history and quote fetchers (and with them
//!   both time-bounded caches) and renders one page per request through the
//!   `DashboardUi` primitives.
//! - `YahooProvider`: blocking client for the market-data chart API.
//!
//! Concurrency and shutdown:
//! - Rendering is strictly sequential on the main thread; a slow provider or a
//!   retry backoff delays the requests queued behind it.
//! - Crossbeam `select!` multiplexes incoming requests and the Ctrl+C shutdown
//!   signal.
//! - Errors on a single connection are logged; the server keeps serving.
//!
//! HTTP surface:
//! - `GET /`: the dashboard; `?submitted=1&tickers=AAPL&tickers=TSLA` selects tickers.
//! - `GET /health`: liveness probe returning `ok`.
#![warn(missing_docs)]
use crate::args::Args;
use crate::controller::DashboardController;
use crate::http::{HttpResponse, Route};
use crate::model::cache::SystemClock;
use crate::model::provider::YahooProvider;
use crate::model::retry::ThreadSleeper;
use crate::page::{HtmlPage, Selection};
use crate::receiver::{PageReceiver, PageRequest};
use clap::Parser;
use crossbeam_channel::{bounded, select, unbounded};
use dashboard_common::logging::init_logger;
use dashboard_common::{DashboardConfig, DashboardError, Result};
use log::{error, info, warn};
use std::sync::Arc;
use std::thread;

mod args;
mod controller;
mod http;
pub mod model;
mod page;
mod receiver;
#[cfg(test)]
mod test_support;

/// Answer one browser request.
///
/// Dashboard requests run a full render pass; the response is written back on
/// the request's own connection. Write failures only affect that client.
pub fn handle_page_request(
    controller: &mut DashboardController,
    config: &DashboardConfig,
    page_request: PageRequest,
) {
    let PageRequest {
        mut stream,
        request,
        peer,
    } = page_request;

    let response = match (request.method.as_str(), Route::from_path(&request.path)) {
        ("GET", Route::Dashboard) => {
            let mut page = HtmlPage::new(config, Selection::from_request(&request));
            controller.render(&mut page);
            HttpResponse::html(page.finish())
        }
        ("GET", Route::Health) => HttpResponse::text(200, "OK", "ok"),
        ("GET", Route::NotFound) => HttpResponse::not_found(),
        _ => HttpResponse::method_not_allowed(),
    };

    if let Err(e) = response.write_to(&mut stream) {
        warn!("Failed to send response to {}: {}", peer, e);
    }
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let config = args.to_config()?;
    info!(
        "Serving {} ticker option(s); history cache {}s, quote cache {}s, {} attempt(s) per quote",
        config.ticker_options.len(),
        config.history_expiry.as_secs(),
        config.quote_expiry.as_secs(),
        config.max_attempts
    );

    let provider = Arc::new(YahooProvider::new(&config.provider_url)?);
    let mut controller = DashboardController::new(
        &config,
        provider,
        Arc::new(SystemClock),
        Arc::new(ThreadSleeper),
    );

    let receiver = PageReceiver::new(&args.listen_address())?;
    let (request_tx, request_rx) = unbounded::<PageRequest>();
    thread::spawn(move || {
        if let Err(e) = receiver.receive_loop_with_channel(request_tx) {
            error!("Receiver loop failed: {:?}", e);
        }
    });

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| DashboardError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    loop {
        select! {
            recv(request_rx) -> msg => match msg {
                Ok(page_request) => handle_page_request(&mut controller, &config, page_request),
                Err(e) => {
                    error!("Request channel closed: {}", e);
                    return Err(DashboardError::ChannelRecv(e.to_string()));
                }
            },
            recv(shutdown_rx) -> _ => {
                info!("Ctrl+C received. Shutting down dashboard...");
                break;
            }
        }
    }
    Ok(())
}
