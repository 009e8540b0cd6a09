//! Analysis result types

use super::series::PriceBar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommendation derived from the moving-average comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// Visual emphasis attached to a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Affirmative,
    Warning,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::Buy => Tier::Affirmative,
            Self::Sell => Tier::Warning,
            Self::Hold => Tier::Neutral,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Tier {
    /// CSS colour name used in markup output
    pub fn color(&self) -> &'static str {
        match self {
            Self::Affirmative => "green",
            Self::Warning => "red",
            Self::Neutral => "gray",
        }
    }

    /// ANSI SGR sequence used on terminals
    pub fn ansi(&self) -> &'static str {
        match self {
            Self::Affirmative => "\x1b[1;32m",
            Self::Warning => "\x1b[1;31m",
            Self::Neutral => "\x1b[1;90m",
        }
    }
}

/// Indicators and recommendation for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub latest_price: f64,
    pub short_window: usize,
    pub long_window: usize,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub signal: Signal,
    pub amount_to_invest: f64,
    pub affordable_shares: f64,
}

impl AnalysisResult {
    pub fn tier(&self) -> Tier {
        self.signal.tier()
    }
}

/// Everything shown to the user after a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub recent: Vec<PriceBar>,
}
