//! Shared networking constants and helpers.

/// Default HTTP port the dashboard is served on.
pub const HTTP_PORT: u16 = 8501;
/// Default bind address for the HTTP listener.
pub const BIND_ADDRESS: &str = "0.0.0.0";
/// Base URL of the market-data provider.
pub const PROVIDER_URL: &str = "https://query1.finance.yahoo.com";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
