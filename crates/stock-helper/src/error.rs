//! Error types for stock analysis runs

use crate::api::RawBar;
use serde::Serialize;
use thiserror::Error;

/// Failure classification for one analysis run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Provider returned no rows for the requested window
    #[error("No data found for ticker '{ticker}'. Please check the symbol and try again.")]
    EmptyData { ticker: String },

    /// Provider rows carry no closing price; `recent` holds the last rows as delivered
    #[error("'Close' column not found. Available columns: {available:?}")]
    MissingField {
        available: Vec<String>,
        recent: Vec<RawBar>,
    },

    /// Any failure surfaced by the data source, message passed through verbatim
    #[error("An error occurred: {0}")]
    Provider(String),

    /// Anything not classified above
    #[error("An error occurred: {0}")]
    Unclassified(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable, machine-readable name for each failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyData,
    MissingField,
    Provider,
    Unclassified,
    Config,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyData { .. } => ErrorKind::EmptyData,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::Provider(_) => ErrorKind::Provider,
            Self::Unclassified(_) => ErrorKind::Unclassified,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Provider(format!("malformed price data: {err}"))
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Provider(err.to_string())
    }
}
