//! Leveled diagnostic logging.
//!
//! `init_logger` wires `env_logger` with a `timestamp - LEVEL - message` line
//! format. `log_message` is the string-levelled entry point the fetchers use;
//! unrecognised level names fall back to info.
use std::io::Write;

use chrono::Local;
use strum_macros::{Display, EnumString};

/// Severity accepted by [`log_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    /// Routine progress.
    Info,
    /// Recoverable trouble, e.g. a retried provider call.
    Warning,
    /// A failure surfaced to the user as degraded output.
    Error,
}

impl LogLevel {
    /// Resolve a level name; anything other than `info`, `warning` or `error`
    /// is treated as info.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(LogLevel::Info)
    }

    /// Bracketed tag prepended to every message.
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

/// Log `message` at the level named by `level`.
pub fn log_message(level: &str, message: &str) {
    let level = LogLevel::from_name(level);
    match level {
        LogLevel::Error => log::error!("{} {}", level.tag(), message),
        LogLevel::Warning => log::warn!("{} {}", level.tag(), message),
        LogLevel::Info => log::info!("{} {}", level.tag(), message),
    }
}

/// Install the process-wide logger. `RUST_LOG` overrides the info default.
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}
