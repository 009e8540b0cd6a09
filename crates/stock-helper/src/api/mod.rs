//! Price history providers
//!
//! A provider answers one question: what did this ticker trade at, day by day, over the
//! lookback window? It returns a [`ProviderFrame`], which keeps the field names exactly
//! as the source delivered them next to rows whose fields are all optional. Deciding
//! whether that frame is usable is the retrieval stage's job, not the provider's.

pub mod file;
pub mod yahoo;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use file::FileProvider;
pub use yahoo::YahooFinanceClient;

/// Historical window requested from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    months: u32,
}

impl Lookback {
    /// The window every analysis run uses
    pub const SIX_MONTHS: Self = Self { months: 6 };

    /// Range string in the form Yahoo Finance understands, e.g. `6mo`
    pub fn range(&self) -> String {
        format!("{}mo", self.months)
    }

    /// Start of the window ending at `end`
    pub fn start_before(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        end.checked_sub_months(Months::new(self.months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// First calendar date still inside the window ending at `end`
    pub fn first_date_before(&self, end: NaiveDate) -> NaiveDate {
        end.checked_sub_months(Months::new(self.months))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::SIX_MONTHS
    }
}

/// One provider row; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    pub fn with_close(mut self, close: f64) -> Self {
        self.close = Some(close);
        self
    }
}

/// Raw provider response: verbatim field names plus rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderFrame {
    pub columns: Vec<String>,
    pub rows: Vec<RawBar>,
}

impl ProviderFrame {
    pub fn new(columns: Vec<String>, rows: Vec<RawBar>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the source lists a closing price field, ignoring case
    pub fn has_close_column(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case("close"))
    }
}

/// Source of daily price history for one ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch daily bars for `ticker` over `lookback`
    ///
    /// The ticker is passed through exactly as given. Failures of the source itself
    /// (network, throttling, unknown symbol) come back as `AnalysisError::Provider`.
    async fn fetch_history(&self, ticker: &str, lookback: Lookback) -> Result<ProviderFrame>;
}
