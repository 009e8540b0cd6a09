//! Validated daily price series

use crate::api::{ProviderFrame, RawBar};
use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One trading day with a known close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            open: None,
            high: None,
            low: None,
            adj_close: None,
            volume: None,
        }
    }

    fn from_raw(raw: RawBar, close: f64) -> Self {
        Self {
            date: raw.date,
            close,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            adj_close: raw.adj_close,
            volume: raw.volume,
        }
    }
}

impl From<&PriceBar> for RawBar {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: Some(bar.close),
            adj_close: bar.adj_close,
            volume: bar.volume,
        }
    }
}

/// Non-empty, date-ascending bars for one ticker
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Order `bars` by date and drop duplicate dates, keeping the last observation
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Result<Self> {
        let ticker = ticker.into();
        if bars.is_empty() {
            return Err(AnalysisError::EmptyData { ticker });
        }

        // Stable sort keeps provider order within a date, so the later duplicate wins
        bars.sort_by_key(|bar| bar.date);
        bars.reverse();
        bars.dedup_by_key(|bar| bar.date);
        bars.reverse();

        Ok(Self { ticker, bars })
    }

    /// Classify a provider frame into a usable series or a named failure
    ///
    /// Rows without a close are skipped when the frame lists a close column. Otherwise
    /// the frame is a Missing-Field failure carrying its last `tail_rows` rows.
    pub fn from_frame(
        ticker: impl Into<String>,
        frame: ProviderFrame,
        tail_rows: usize,
    ) -> Result<Self> {
        let ticker = ticker.into();
        if frame.is_empty() {
            return Err(AnalysisError::EmptyData { ticker });
        }

        let has_close = frame.has_close_column();
        if !has_close && frame.rows.iter().any(|raw| raw.close.is_none()) {
            let ProviderFrame { columns, mut rows } = frame;
            rows.sort_by_key(|raw| raw.date);
            let recent = rows.split_off(rows.len().saturating_sub(tail_rows));
            return Err(AnalysisError::MissingField {
                available: columns,
                recent,
            });
        }

        let mut bars = Vec::with_capacity(frame.rows.len());
        for raw in frame.rows {
            match raw.close {
                Some(close) => bars.push(PriceBar::from_raw(raw, close)),
                None => debug!(ticker = %ticker, date = %raw.date, "Skipping row without a close"),
            }
        }

        Self::new(ticker, bars)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Never true for a constructed series
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Most recent bar
    pub fn latest(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// Up to `n` most recent bars, oldest first
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}
