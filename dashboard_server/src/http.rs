//! Minimal HTTP/1.1 request parsing and response writing.
//!
//! Only what the dashboard needs: the request line, the decoded query string
//! and a close-after-response reply with an explicit length.
use std::io::Write;

use dashboard_common::{DashboardError, Result};
use reqwest::Url;

/// Origin used to resolve request targets; never contacted.
const LOCAL_ORIGIN: &str = "http://dashboard.local";

/// Parsed request line of an incoming HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method, e.g. `GET`.
    pub method: String,
    /// Percent-decoded path without the query string.
    pub path: String,
    /// Decoded query pairs in request order.
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Parse the head of a raw request. Headers after the request line are ignored.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw).map_err(|e| DashboardError::BadRequest(e.to_string()))?;
        let request_line = text
            .lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| DashboardError::BadRequest(String::from("empty request")))?;

        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DashboardError::BadRequest(format!(
                "malformed request line: {}",
                request_line
            )));
        };
        if !version.starts_with("HTTP/1.") {
            return Err(DashboardError::BadRequest(format!("unsupported version: {}", version)));
        }
        if !target.starts_with('/') {
            return Err(DashboardError::BadRequest(format!("unsupported target: {}", target)));
        }

        let url = Url::parse(&format!("{}{}", LOCAL_ORIGIN, target))
            .map_err(|e| DashboardError::BadRequest(e.to_string()))?;

        Ok(Self {
            method: method.to_string(),
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
        })
    }

    /// Values of every query parameter called `name`, in order.
    pub fn query_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// True when the query carries `name`, with or without a value.
    pub fn has_param(&self, name: &str) -> bool {
        self.query.iter().any(|(key, _)| key == name)
    }
}

/// What a request path asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The dashboard page.
    Dashboard,
    /// Liveness probe.
    Health,
    /// Anything else.
    NotFound,
}

impl Route {
    /// Route for a request path.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/index.html" => Route::Dashboard,
            "/health" => Route::Health,
            _ => Route::NotFound,
        }
    }
}

/// Complete response, written in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Reason phrase sent after the status code.
    pub reason: &'static str,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// 200 with an HTML body.
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: "text/html; charset=utf-8",
            body,
        }
    }

    /// Plain-text response with the given status.
    pub fn text(status: u16, reason: &'static str, body: &str) -> Self {
        Self {
            status,
            reason,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
        }
    }

    /// 400 carrying the parse failure.
    pub fn bad_request(detail: &str) -> Self {
        Self::text(400, "Bad Request", detail)
    }

    /// 404.
    pub fn not_found() -> Self {
        Self::text(404, "Not Found", "not found")
    }

    /// 405.
    pub fn method_not_allowed() -> Self {
        Self::text(405, "Method Not Allowed", "method not allowed")
    }

    /// Write status line, headers and body, then flush.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            self.status,
            self.reason,
            self.content_type,
            self.body.len()
        )?;
        writer.write_all(self.body.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
