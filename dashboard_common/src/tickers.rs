//! Ticker symbols and helpers for reading ticker lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::DashboardError;

/// Trait providing list parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Symbols may be separated by commas, spaces, or new lines. Duplicates are
    /// dropped while keeping first-seen order.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Ticker>, DashboardError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, DashboardError> {
        let mut tickers: Vec<Ticker> = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(DashboardError::Io)?;
            for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                let ticker = token
                    .parse::<Self>()
                    .map_err(|e| DashboardError::ParseTickers(e.to_string()))?;
                if !tickers.contains(&ticker) {
                    tickers.push(ticker);
                }
            }
        }
        Ok(tickers)
    }
}

/// Opaque ticker symbol such as `AAPL`.
///
/// The symbol is trimmed and uppercased on parse; well-formedness is left to
/// the market-data provider.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        if symbol.is_empty() {
            return Err(DashboardError::ParseTickers(String::from("empty ticker symbol")));
        }
        Ok(Ticker(symbol.to_ascii_uppercase()))
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn t(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(t("  aapl ").as_str(), "AAPL");
        assert_eq!(t("BRK.B").to_string(), "BRK.B");
    }

    #[test]
    fn parse_rejects_blank_symbol() {
        assert!(matches!(
            "   ".parse::<Ticker>(),
            Err(DashboardError::ParseTickers(_))
        ));
    }

    #[test]
    fn parse_from_file_accepts_mixed_separators() {
        let input = "AAPL, tsla\n\nMSFT GOOGL\n amzn,AAPL\n";
        let tickers = Ticker::parse_from_file(Cursor::new(input)).unwrap();
        assert_eq!(
            tickers,
            vec![t("AAPL"), t("TSLA"), t("MSFT"), t("GOOGL"), t("AMZN")]
        );
    }

    #[test]
    fn parse_from_file_of_blank_lines_is_empty() {
        let tickers = Ticker::parse_from_file(Cursor::new("\n \n")).unwrap();
        assert!(tickers.is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&t("nvda")).unwrap(), "\"NVDA\"");
    }
}
