//! Configuration for analysis runs

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source of daily price history
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataProvider {
    /// Yahoo Finance (default, no API key required)
    #[default]
    Yahoo,
    /// Offline JSON export in pandas "split" orientation
    File(PathBuf),
}

/// Configuration for the analysis pipeline and its input surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Where price history comes from
    pub provider: DataProvider,

    /// Short moving-average window (bars)
    pub short_window: usize,

    /// Long moving-average window (bars)
    pub long_window: usize,

    /// Number of most recent bars shown in the report
    pub tail_rows: usize,

    /// Ticker offered when the user enters nothing
    pub default_ticker: String,

    /// Amount offered when the user enters nothing
    pub default_amount: f64,

    /// Smallest amount the input surface accepts
    pub min_amount: f64,

    /// Request timeout duration
    pub request_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider: DataProvider::Yahoo,
            short_window: 20,
            long_window: 50,
            tail_rows: 5,
            default_ticker: "AAPL".to_string(),
            default_amount: 100.0,
            min_amount: 1.0,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 {
            return Err(AnalysisError::Config(
                "short_window must be greater than 0".to_string(),
            ));
        }

        if self.short_window >= self.long_window {
            return Err(AnalysisError::Config(format!(
                "short_window ({}) must be less than long_window ({})",
                self.short_window, self.long_window
            )));
        }

        if self.tail_rows == 0 {
            return Err(AnalysisError::Config(
                "tail_rows must be greater than 0".to_string(),
            ));
        }

        if !(self.min_amount.is_finite() && self.min_amount > 0.0) {
            return Err(AnalysisError::Config(
                "min_amount must be a positive number".to_string(),
            ));
        }

        if !self.default_amount.is_finite() || self.default_amount < self.min_amount {
            return Err(AnalysisError::Config(format!(
                "default_amount must be at least {:.2}",
                self.min_amount
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(AnalysisError::Config(
                "request_timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalyzerConfig
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    provider: Option<DataProvider>,
    short_window: Option<usize>,
    long_window: Option<usize>,
    tail_rows: Option<usize>,
    default_ticker: Option<String>,
    default_amount: Option<f64>,
    min_amount: Option<f64>,
    request_timeout: Option<Duration>,
}

impl AnalyzerConfigBuilder {
    /// Set the data provider
    pub fn provider(mut self, provider: DataProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Read prices from a local JSON export instead of Yahoo Finance
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.provider = Some(DataProvider::File(path.into()));
        self
    }

    /// Set both moving-average windows
    pub fn windows(mut self, short: usize, long: usize) -> Self {
        self.short_window = Some(short);
        self.long_window = Some(long);
        self
    }

    /// Set the number of bars shown in the report
    pub fn tail_rows(mut self, rows: usize) -> Self {
        self.tail_rows = Some(rows);
        self
    }

    /// Set the ticker offered by default
    pub fn default_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.default_ticker = Some(ticker.into());
        self
    }

    /// Set the amount offered by default
    pub fn default_amount(mut self, amount: f64) -> Self {
        self.default_amount = Some(amount);
        self
    }

    /// Set the smallest accepted amount
    pub fn min_amount(mut self, amount: f64) -> Self {
        self.min_amount = Some(amount);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalyzerConfig> {
        let defaults = AnalyzerConfig::default();

        let config = AnalyzerConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            short_window: self.short_window.unwrap_or(defaults.short_window),
            long_window: self.long_window.unwrap_or(defaults.long_window),
            tail_rows: self.tail_rows.unwrap_or(defaults.tail_rows),
            default_ticker: self.default_ticker.unwrap_or(defaults.default_ticker),
            default_amount: self.default_amount.unwrap_or(defaults.default_amount),
            min_amount: self.min_amount.unwrap_or(defaults.min_amount),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.provider, DataProvider::Yahoo);
        assert_eq!(config.short_window, 20);
        assert_eq!(config.long_window, 50);
        assert_eq!(config.tail_rows, 5);
        assert_eq!(config.default_ticker, "AAPL");
        assert_eq!(config.default_amount, 100.0);
        assert_eq!(config.min_amount, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalyzerConfig::builder()
            .data_file("prices.json")
            .tail_rows(10)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.provider, DataProvider::File(PathBuf::from("prices.json")));
        assert_eq!(config.tail_rows, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.long_window, 50);
    }

    #[test]
    fn test_validation_window_order() {
        let result = AnalyzerConfig::builder().windows(50, 20).build();
        assert!(matches!(result, Err(AnalysisError::Config(_))));

        let result = AnalyzerConfig::builder().windows(0, 20).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_amounts() {
        let config = AnalyzerConfig {
            min_amount: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            default_amount: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout() {
        let result = AnalyzerConfig::builder()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }
}
