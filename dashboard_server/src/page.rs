//! Page rendering primitives and the HTML page behind them.
//!
//! The controller only talks to `DashboardUi`. `HtmlPage` implements it by
//! accumulating HTML for one response: a sidebar form with the ticker
//! checkboxes and a main column of per-ticker sections whose charts are drawn
//! in the browser by Plotly.js.
use std::fmt::Write as _;
use std::time::Duration;

use dashboard_common::{DashboardConfig, Ticker};
use log::error;

use crate::http::HttpRequest;
use crate::model::chart::Figure;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TICKERS_PARAM: &str = "tickers";
const SUBMITTED_PARAM: &str = "submitted";

const STYLE: &str = "\
body{margin:0;font-family:sans-serif;display:flex;min-height:100vh}\
aside{width:16rem;padding:1rem;background:#f0f2f6}\
main{flex:1;padding:1rem 2rem}\
.columns{display:grid;grid-template-columns:1fr 1fr;gap:1rem}\
.metric .label{font-size:.9rem;color:#555}\
.metric .value{font-size:2rem}\
.error{padding:.75rem;background:#fde8e8;color:#9b1c1c;border-radius:.25rem}\
label{display:block}";

/// Widgets a render pass may emit, in page order.
pub trait DashboardUi {
    /// Page heading.
    fn title(&mut self, text: &str);
    /// Heading above the sidebar controls.
    fn sidebar_header(&mut self, text: &str);
    /// Show a multi-select over `options` and return the current choice,
    /// `default` until the user has submitted one.
    fn multiselect(&mut self, label: &str, options: &[Ticker], default: &[Ticker]) -> Vec<Ticker>;
    /// Section heading.
    fn subheader(&mut self, text: &str);
    /// Two charts side by side.
    fn chart_columns(&mut self, left: &Figure, right: &Figure);
    /// Labelled headline value.
    fn metric(&mut self, label: &str, value: &str);
    /// Error banner.
    fn error(&mut self, text: &str);
    /// Horizontal rule between sections.
    fn divider(&mut self);
}

/// Ticker choice carried by the request's query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The form was never submitted.
    Default,
    /// Raw symbols from the submitted form, in query order.
    Submitted(Vec<String>),
}

impl Selection {
    /// Read the selection from the `submitted` and `tickers` query parameters.
    pub fn from_request(request: &HttpRequest) -> Self {
        if !request.has_param(SUBMITTED_PARAM) && !request.has_param(TICKERS_PARAM) {
            return Selection::Default;
        }
        Selection::Submitted(
            request
                .query_values(TICKERS_PARAM)
                .flat_map(|value| value.split(','))
                .map(str::to_string)
                .collect(),
        )
    }

    /// Resolve against the offered options. Unknown symbols are ignored and
    /// duplicates collapse onto their first position.
    pub fn resolve(&self, options: &[Ticker], default: &[Ticker]) -> Vec<Ticker> {
        match self {
            Selection::Default => default.to_vec(),
            Selection::Submitted(raw) => {
                let mut chosen: Vec<Ticker> = Vec::new();
                for ticker in raw.iter().filter_map(|s| s.parse::<Ticker>().ok()) {
                    if options.contains(&ticker) && !chosen.contains(&ticker) {
                        chosen.push(ticker);
                    }
                }
                chosen
            }
        }
    }
}

/// One HTML document under construction.
pub struct HtmlPage {
    page_title: String,
    auto_refresh: Option<Duration>,
    selection: Selection,
    sidebar: String,
    main: String,
    charts: usize,
}

impl HtmlPage {
    /// Empty page titled and refreshed per `config`.
    pub fn new(config: &DashboardConfig, selection: Selection) -> Self {
        Self {
            page_title: config.page_title.clone(),
            auto_refresh: config.auto_refresh,
            selection,
            sidebar: String::new(),
            main: String::new(),
            charts: 0,
        }
    }

    fn push_chart(&mut self, figure: &Figure) {
        self.charts += 1;
        let id = format!("chart-{}", self.charts);
        match figure.to_json() {
            Ok(json) => {
                let _ = write!(
                    self.main,
                    "<div><div id=\"{id}\"></div><script>(function(){{var f={json};\
                     Plotly.newPlot(\"{id}\",f.data,f.layout,{{responsive:true}});}})();</script></div>",
                    id = id,
                    json = json.replace("</", "<\\/"),
                );
            }
            Err(e) => {
                error!("Failed to serialize chart {}: {}", id, e);
                self.main.push_str("<div></div>");
            }
        }
    }

    /// Complete document.
    pub fn finish(self) -> String {
        let refresh = self
            .auto_refresh
            .map(|every| format!("<meta http-equiv=\"refresh\" content=\"{}\">", every.as_secs()))
            .unwrap_or_default();
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">{refresh}\
             <title>{title}</title><script src=\"{plotly}\"></script><style>{style}</style></head>\
             <body><aside>{sidebar}</aside><main>{main}</main></body></html>",
            refresh = refresh,
            title = escape_html(&self.page_title),
            plotly = PLOTLY_SRC,
            style = STYLE,
            sidebar = self.sidebar,
            main = self.main,
        )
    }
}

impl DashboardUi for HtmlPage {
    fn title(&mut self, text: &str) {
        let _ = write!(self.main, "<h1>{}</h1>", escape_html(text));
    }

    fn sidebar_header(&mut self, text: &str) {
        let _ = write!(self.sidebar, "<h2>{}</h2>", escape_html(text));
    }

    fn multiselect(&mut self, label: &str, options: &[Ticker], default: &[Ticker]) -> Vec<Ticker> {
        let chosen = self.selection.resolve(options, default);
        let _ = write!(
            self.sidebar,
            "<form method=\"get\" action=\"/\"><fieldset><legend>{}</legend>",
            escape_html(label)
        );
        for option in options {
            let checked = if chosen.contains(option) { " checked" } else { "" };
            let symbol = escape_html(option.as_str());
            let _ = write!(
                self.sidebar,
                "<label><input type=\"checkbox\" name=\"{}\" value=\"{}\"{}> {}</label>",
                TICKERS_PARAM, symbol, checked, symbol
            );
        }
        let _ = write!(
            self.sidebar,
            "</fieldset><input type=\"hidden\" name=\"{}\" value=\"1\">\
             <button type=\"submit\">Update</button></form>",
            SUBMITTED_PARAM
        );
        chosen
    }

    fn subheader(&mut self, text: &str) {
        let _ = write!(self.main, "<h3>{}</h3>", escape_html(text));
    }

    fn chart_columns(&mut self, left: &Figure, right: &Figure) {
        self.main.push_str("<div class=\"columns\">");
        self.push_chart(left);
        self.push_chart(right);
        self.main.push_str("</div>");
    }

    fn metric(&mut self, label: &str, value: &str) {
        let _ = write!(
            self.main,
            "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            escape_html(label),
            escape_html(value)
        );
    }

    fn error(&mut self, text: &str) {
        let _ = write!(self.main, "<div class=\"error\" role=\"alert\">{}</div>", escape_html(text));
    }

    fn divider(&mut self) {
        self.main.push_str("<hr>");
    }
}

/// Escape text for element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chart::plot_chart;
    use crate::model::history::History;
    use crate::test_support::{bars, ticker};

    fn request(target: &str) -> HttpRequest {
        HttpRequest::parse(format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target).as_bytes()).unwrap()
    }

    fn options() -> Vec<Ticker> {
        DashboardConfig::default().ticker_options
    }

    #[test]
    fn first_visit_uses_default_selection() {
        let selection = Selection::from_request(&request("/"));
        assert_eq!(selection, Selection::Default);
        assert_eq!(selection.resolve(&options(), &[ticker("AAPL")]), vec![ticker("AAPL")]);
    }

    #[test]
    fn submitted_selection_keeps_order_and_drops_unknowns() {
        let selection =
            Selection::from_request(&request("/?submitted=1&tickers=tsla&tickers=NOPE&tickers=AAPL&tickers=TSLA"));
        assert_eq!(
            selection.resolve(&options(), &[ticker("AAPL")]),
            vec![ticker("TSLA"), ticker("AAPL")]
        );
    }

    #[test]
    fn submitted_empty_selection_stays_empty() {
        let selection = Selection::from_request(&request("/?submitted=1"));
        assert!(selection.resolve(&options(), &[ticker("AAPL")]).is_empty());
    }

    #[test]
    fn comma_separated_tickers_are_accepted() {
        let selection = Selection::from_request(&request("/?tickers=MSFT,GOOGL"));
        assert_eq!(
            selection.resolve(&options(), &[]),
            vec![ticker("MSFT"), ticker("GOOGL")]
        );
    }

    #[test]
    fn multiselect_renders_checked_options() {
        let config = DashboardConfig::default();
        let mut page = HtmlPage::new(&config, Selection::Submitted(vec![String::from("MSFT")]));
        let chosen = page.multiselect("Select Stocks:", &config.ticker_options, &config.default_tickers);
        assert_eq!(chosen, vec![ticker("MSFT")]);

        let html = page.finish();
        assert!(html.contains("<legend>Select Stocks:</legend>"));
        assert!(html.contains("value=\"MSFT\" checked>"));
        assert!(html.contains("value=\"AAPL\">"));
        assert!(html.contains("name=\"submitted\" value=\"1\""));
    }

    #[test]
    fn charts_are_embedded_as_plotly_calls() {
        let config = DashboardConfig::default();
        let mut page = HtmlPage::new(&config, Selection::Default);
        let history = History::new(bars(3, 10.0));
        page.chart_columns(
            &plot_chart(&history, "AAPL - Line Chart", "line"),
            &plot_chart(&history, "AAPL - Candlestick Chart", "candlestick"),
        );

        let html = page.finish();
        assert!(html.contains(PLOTLY_SRC));
        assert!(html.contains("Plotly.newPlot(\"chart-1\""));
        assert!(html.contains("Plotly.newPlot(\"chart-2\""));
        assert!(html.contains("\"type\":\"candlestick\""));
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"60\">"));
    }

    #[test]
    fn text_widgets_are_escaped() {
        let config = DashboardConfig {
            auto_refresh: None,
            ..DashboardConfig::default()
        };
        let mut page = HtmlPage::new(&config, Selection::Default);
        page.error("Could not load data for <script>.");
        page.metric("AAPL Current Price", "$187.25");
        page.divider();

        let html = page.finish();
        assert!(html.contains("Could not load data for &lt;script&gt;."));
        assert!(html.contains("<div class=\"value\">$187.25</div>"));
        assert!(html.contains("<hr>"));
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn chart_titles_cannot_close_the_script_tag() {
        let config = DashboardConfig::default();
        let mut page = HtmlPage::new(&config, Selection::Default);
        let history = History::new(bars(1, 1.0));
        let figure = plot_chart(&history, "</script><b>", "line");
        page.chart_columns(&figure, &figure);
        assert!(!page.finish().contains("</script><b>"));
    }

    #[test]
    fn escape_html_handles_quotes_and_ampersands() {
        assert_eq!(escape_html("a&b \"c\" 'd'"), "a&amp;b &quot;c&quot; &#39;d&#39;");
    }
}
