//! Offline price history from JSON exports
//!
//! Reads the layout pandas writes with `DataFrame.to_json(orient="split")`:
//!
//! ```json
//! {"columns": ["Open", "Close"], "index": ["2024-01-02", 1704240000000], "data": [[1.0, 2.0], ...]}
//! ```
//!
//! Index entries may be ISO dates (optionally with a time part) or epoch milliseconds.
//! Column names are kept verbatim; recognised names are matched case-insensitively.

use super::{Lookback, PriceProvider, ProviderFrame, RawBar};
use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SplitFrame {
    columns: Vec<String>,
    index: Vec<Value>,
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Field {
    fn from_column(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            "close" => Some(Self::Close),
            "adj close" | "adj_close" | "adjclose" => Some(Self::AdjClose),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }
}

/// Provider reading a JSON export from disk
///
/// When `path` is a directory the file `<TICKER>.json` inside it is read; otherwise
/// `path` itself is read regardless of ticker.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn resolve(&self, ticker: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{ticker}.json"))
        } else {
            self.path.clone()
        }
    }
}

fn parse_date(value: &Value) -> Result<NaiveDate> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| AnalysisError::Provider(format!("Invalid index timestamp: {n}"))),
        Value::String(s) => s
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .ok_or_else(|| AnalysisError::Provider(format!("Invalid index date: {s}"))),
        other => Err(AnalysisError::Provider(format!("Invalid index value: {other}"))),
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn parse_frame(raw: SplitFrame, lookback: Lookback) -> Result<ProviderFrame> {
    if raw.index.len() != raw.data.len() {
        return Err(AnalysisError::Provider(format!(
            "Index has {} entries but data has {} rows",
            raw.index.len(),
            raw.data.len()
        )));
    }

    let fields: Vec<Option<Field>> = raw.columns.iter().map(|c| Field::from_column(c)).collect();
    let has_close = fields.contains(&Some(Field::Close));

    let mut rows = Vec::with_capacity(raw.data.len());
    for (index, cells) in raw.index.iter().zip(&raw.data) {
        let mut bar = RawBar::new(parse_date(index)?);

        for (field, cell) in fields.iter().zip(cells) {
            let value = parse_number(cell);
            match field {
                Some(Field::Open) => bar.open = value,
                Some(Field::High) => bar.high = value,
                Some(Field::Low) => bar.low = value,
                Some(Field::Close) => bar.close = value,
                Some(Field::AdjClose) => bar.adj_close = value,
                Some(Field::Volume) => bar.volume = value.map(|v| v.round() as u64),
                None => {}
            }
        }

        // A present close column with a blank cell is a non-trading row, not a schema problem
        if has_close && bar.close.is_none() {
            debug!(date = %bar.date, "Skipping row without a close");
            continue;
        }
        rows.push(bar);
    }

    if let Some(last) = rows.iter().map(|r| r.date).max() {
        let first = lookback.first_date_before(last);
        rows.retain(|r| r.date > first);
    }

    Ok(ProviderFrame::new(raw.columns, rows))
}

async fn read_frame(path: &Path) -> Result<SplitFrame> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AnalysisError::Provider(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_str(&contents)?)
}

#[async_trait]
impl PriceProvider for FileProvider {
    async fn fetch_history(&self, ticker: &str, lookback: Lookback) -> Result<ProviderFrame> {
        let path = self.resolve(ticker);
        debug!(ticker, path = %path.display(), "Reading price history from file");

        let raw = read_frame(&path).await?;
        parse_frame(raw, lookback)
    }
}
