//! Response formatting for each output surface

use crate::api::RawBar;
use crate::engine::{AnalysisReport, AnalysisResult};
use crate::error::AnalysisError;
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

pub const TITLE: &str = "📈 Stock Helper App";
pub const DESCRIPTION: &str =
    "Enter an amount, pick a stock, and get buy/sell guidance based on technical indicators.";

const ANSI_RESET: &str = "\x1b[0m";

/// Output surface selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown output format '{other}' (expected text, markdown or json)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Json => "json",
        })
    }
}

pub trait Formatter: Send + Sync {
    fn output_format(&self) -> OutputFormat;
    /// Static title and description; empty when the surface has none
    fn format_header(&self) -> String;
    fn format_report(&self, report: &AnalysisReport) -> String;
    fn format_table(&self, rows: &[RawBar]) -> String;
    fn format_error(&self, error: &AnalysisError) -> String;
}

fn price_line(result: &AnalysisResult) -> String {
    format!(
        "Latest Price for {}: ${:.2}",
        result.ticker, result.latest_price
    )
}

fn affordability_line(result: &AnalysisResult, emphasis: &str) -> String {
    format!(
        "With ${:.2}, you can buy approximately {emphasis}{:.2} shares{emphasis}.",
        result.amount_to_invest, result.affordable_shares
    )
}

fn price_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn recent_rows(report: &AnalysisReport) -> Vec<RawBar> {
    report.recent.iter().map(RawBar::from).collect()
}

/// Rows a failure carries for inspection, if any
fn error_rows(error: &AnalysisError) -> Option<&[RawBar]> {
    match error {
        AnalysisError::MissingField { recent, .. } if !recent.is_empty() => Some(recent.as_slice()),
        _ => None,
    }
}

/// Column headers and cell text for the recent-bars table
///
/// Date is always shown; the other fields only when some bar carries them.
fn table_data(bars: &[RawBar]) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let has_open = bars.iter().any(|b| b.open.is_some());
    let has_high = bars.iter().any(|b| b.high.is_some());
    let has_low = bars.iter().any(|b| b.low.is_some());
    let has_close = bars.iter().any(|b| b.close.is_some());
    let has_adj = bars.iter().any(|b| b.adj_close.is_some());
    let has_volume = bars.iter().any(|b| b.volume.is_some());

    let mut headers = vec!["Date"];
    if has_open {
        headers.push("Open");
    }
    if has_high {
        headers.push("High");
    }
    if has_low {
        headers.push("Low");
    }
    if has_close {
        headers.push("Close");
    }
    if has_adj {
        headers.push("Adj Close");
    }
    if has_volume {
        headers.push("Volume");
    }

    let rows = bars
        .iter()
        .map(|bar| {
            let mut row = vec![bar.date.to_string()];
            if has_open {
                row.push(price_cell(bar.open));
            }
            if has_high {
                row.push(price_cell(bar.high));
            }
            if has_low {
                row.push(price_cell(bar.low));
            }
            if has_close {
                row.push(price_cell(bar.close));
            }
            if has_adj {
                row.push(price_cell(bar.adj_close));
            }
            if has_volume {
                row.push(bar.volume.map_or_else(|| "-".to_string(), |v| v.to_string()));
            }
            row
        })
        .collect();

    (headers, rows)
}

/// Terminal output, optionally coloured with ANSI escapes
pub struct TextFormatter {
    color: bool,
}

impl TextFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, ansi: &str, text: &str) -> String {
        if self.color {
            format!("{ansi}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Formatter for TextFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn format_header(&self) -> String {
        format!("{}\n{DESCRIPTION}", self.paint("\x1b[1m", TITLE))
    }

    fn format_report(&self, report: &AnalysisReport) -> String {
        let result = &report.result;
        format!(
            "{}\nRecommendation: {}\n{}\n\nRecent Data:\n{}",
            self.paint("\x1b[1m", &price_line(result)),
            self.paint(result.tier().ansi(), result.signal.as_str()),
            affordability_line(result, ""),
            self.format_table(&recent_rows(report))
        )
    }

    fn format_table(&self, bars: &[RawBar]) -> String {
        let (headers, rows) = table_data(bars);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(headers);
        for row in rows {
            table.add_row(row.into_iter().enumerate().map(|(i, text)| {
                let cell = Cell::new(text);
                if i == 0 {
                    cell
                } else {
                    cell.set_alignment(CellAlignment::Right)
                }
            }));
        }
        table.to_string()
    }

    fn format_error(&self, error: &AnalysisError) -> String {
        let message = self.paint("\x1b[31m", &error.to_string());
        match error_rows(error) {
            Some(rows) => format!("{message}\n{}", self.format_table(rows)),
            None => message,
        }
    }
}

/// Markdown with inline HTML colour spans
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn format_header(&self) -> String {
        format!("# {TITLE}\n\n{DESCRIPTION}")
    }

    fn format_report(&self, report: &AnalysisReport) -> String {
        let result = &report.result;
        format!(
            "### {}\n\n**Recommendation:** <span style='color:{}; font-size: 20px;'>{}</span>\n\n{}\n\nRecent Data:\n\n{}",
            price_line(result),
            result.tier().color(),
            result.signal,
            affordability_line(result, "**"),
            self.format_table(&recent_rows(report))
        )
    }

    fn format_table(&self, bars: &[RawBar]) -> String {
        let (headers, rows) = table_data(bars);

        let mut output = format!("| {} |\n", headers.join(" | "));
        output.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
        for row in rows {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        output
    }

    fn format_error(&self, error: &AnalysisError) -> String {
        match error_rows(error) {
            Some(rows) => format!("**Error:** {error}\n\n{}", self.format_table(rows)),
            None => format!("**Error:** {error}"),
        }
    }
}

/// Machine-readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format_header(&self) -> String {
        String::new()
    }

    fn format_report(&self, report: &AnalysisReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|e| {
            self.format_error(&AnalysisError::Unclassified(e.to_string()))
        })
    }

    fn format_table(&self, rows: &[RawBar]) -> String {
        json!(rows).to_string()
    }

    fn format_error(&self, error: &AnalysisError) -> String {
        let mut body = json!({
            "kind": error.kind(),
            "message": error.to_string(),
        });
        match error {
            AnalysisError::MissingField { available, recent } => {
                body["available"] = json!(available);
                body["recent"] = json!(recent);
            }
            AnalysisError::EmptyData { ticker } => body["ticker"] = json!(ticker),
            _ => {}
        }
        json!({ "error": body }).to_string()
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat, color: bool) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Text => Box::new(TextFormatter::new(color)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PriceBar, Signal};
    use chrono::NaiveDate;

    fn report(signal: Signal) -> AnalysisReport {
        let mut bar = PriceBar::new(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(), 150.0);
        bar.volume = Some(1_200);

        AnalysisReport {
            result: AnalysisResult {
                ticker: "AAPL".to_string(),
                latest_price: 150.0,
                short_window: 20,
                long_window: 50,
                sma_short: Some(140.5),
                sma_long: Some(125.5),
                signal,
                amount_to_invest: 300.0,
                affordable_shares: 2.0,
            },
            recent: vec![bar],
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "text");
    }

    #[test]
    fn test_text_report() {
        let output = TextFormatter::plain().format_report(&report(Signal::Buy));
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines[0], "Latest Price for AAPL: $150.00");
        assert_eq!(lines[1], "Recommendation: BUY");
        assert_eq!(lines[2], "With $300.00, you can buy approximately 2.00 shares.");
        assert_eq!(lines[4], "Recent Data:");
        assert!(output.contains("2024-06-28"));
        assert!(output.contains("150.00"));
        assert!(output.contains("Volume"));
        assert!(!output.contains("Open"));
    }

    #[test]
    fn test_text_colored_signal() {
        let output = TextFormatter::new(true).format_report(&report(Signal::Sell));
        assert!(output.contains("\x1b[1;31mSELL\x1b[0m"));
    }

    #[test]
    fn test_text_error_is_verbatim() {
        let err = AnalysisError::EmptyData {
            ticker: "ZZZZ".to_string(),
        };
        assert_eq!(
            TextFormatter::plain().format_error(&err),
            "No data found for ticker 'ZZZZ'. Please check the symbol and try again."
        );
    }

    #[test]
    fn test_markdown_report() {
        let output = MarkdownFormatter.format_report(&report(Signal::Hold));

        assert!(output.starts_with("### Latest Price for AAPL: $150.00"));
        assert!(output.contains(
            "**Recommendation:** <span style='color:gray; font-size: 20px;'>HOLD</span>"
        ));
        assert!(output.contains("you can buy approximately **2.00 shares**."));
        assert!(output.ends_with(
            "| Date | Close | Volume |\n| --- | --- | --- |\n| 2024-06-28 | 150.00 | 1200 |\n"
        ));
    }

    #[test]
    fn test_table_marks_missing_values() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let mut first = RawBar::new(day(27)).with_close(149.0);
        first.open = Some(148.5);
        let second = RawBar::new(day(28)).with_close(150.0);

        let (headers, rows) = table_data(&[first, second]);
        assert_eq!(headers, vec!["Date", "Open", "Close"]);
        assert_eq!(rows[1], vec!["2024-06-28", "-", "150.00"]);
    }

    fn missing_close() -> AnalysisError {
        let mut row = RawBar::new(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        row.open = Some(148.5);
        row.volume = Some(1_200);
        AnalysisError::MissingField {
            available: vec!["Open".to_string(), "Volume".to_string()],
            recent: vec![row],
        }
    }

    #[test]
    fn test_json_error() {
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_error(&missing_close())).unwrap();

        assert_eq!(value["error"]["kind"], "missing_field");
        assert_eq!(value["error"]["available"][0], "Open");
        assert_eq!(value["error"]["recent"][0]["date"], "2024-06-28");
        assert_eq!(value["error"]["recent"][0]["open"], 148.5);
    }

    #[test]
    fn test_missing_close_shows_recent_rows() {
        let output = TextFormatter::plain().format_error(&missing_close());
        let (message, table) = output.split_once('\n').unwrap();
        assert_eq!(
            message,
            r#"'Close' column not found. Available columns: ["Open", "Volume"]"#
        );
        assert!(table.contains("Open"));
        assert!(table.contains("148.50"));
        assert!(!table.contains("Close"));

        let output = MarkdownFormatter.format_error(&missing_close());
        assert!(output.ends_with(
            "| Date | Open | Volume |\n| --- | --- | --- |\n| 2024-06-28 | 148.50 | 1200 |\n"
        ));
    }

    #[test]
    fn test_missing_close_without_rows_is_message_only() {
        let err = AnalysisError::MissingField {
            available: vec!["Open".to_string()],
            recent: vec![],
        };
        assert_eq!(
            MarkdownFormatter.format_error(&err),
            r#"**Error:** 'Close' column not found. Available columns: ["Open"]"#
        );
    }

    #[test]
    fn test_json_report() {
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_report(&report(Signal::Buy))).unwrap();

        assert_eq!(value["result"]["signal"], "BUY");
        assert_eq!(value["result"]["affordable_shares"], 2.0);
        assert_eq!(value["recent"][0]["date"], "2024-06-28");
    }

    #[test]
    fn test_factory() {
        assert_eq!(
            FormatterFactory::create(OutputFormat::Json, true).output_format(),
            OutputFormat::Json
        );
        assert!(FormatterFactory::create(OutputFormat::Json, false)
            .format_header()
            .is_empty());
    }
}
