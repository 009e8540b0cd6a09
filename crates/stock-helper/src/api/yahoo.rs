//! Yahoo Finance price history client

use super::{Lookback, PriceProvider, ProviderFrame, RawBar};
use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Field names as Yahoo Finance reports them for daily history
const YAHOO_COLUMNS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Get daily quotes between `start` and `end`
    ///
    /// An unknown symbol or an empty window yields an empty list rather than an error.
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<yahoo::Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalysisError::Provider(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AnalysisError::Provider(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AnalysisError::Provider(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| AnalysisError::Provider(e.to_string()))?;

        response_quotes(&response)
    }
}

/// Extract quotes from a chart response, treating an empty data set as no rows
fn response_quotes(response: &yahoo::YResponse) -> Result<Vec<yahoo::Quote>> {
    // `quotes()` indexes the first result block without checking
    if response.chart.result.as_ref().is_some_and(Vec::is_empty) {
        return Ok(Vec::new());
    }

    match response.quotes() {
        Ok(quotes) => Ok(quotes),
        Err(yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) => {
            debug!("Yahoo Finance returned an empty data set");
            Ok(Vec::new())
        }
        Err(err @ yahoo::YahooError::DataInconsistency) => match present_columns(response) {
            Some(available) if !available.iter().any(|c| c == "Close") => {
                Err(AnalysisError::MissingField {
                    available,
                    recent: Vec::new(),
                })
            }
            _ => Err(AnalysisError::Provider(err.to_string())),
        },
        Err(err) => Err(AnalysisError::Provider(err.to_string())),
    }
}

/// Field names actually present in the first result block
fn present_columns(response: &yahoo::YResponse) -> Option<Vec<String>> {
    let block = response.chart.result.as_ref()?.first()?;
    let indicators = serde_json::to_value(&block.indicators).ok()?;
    let quote = indicators.pointer("/quote/0")?;

    let present = |value: Option<&Value>| value.is_some_and(|v| !v.is_null());
    let mut columns: Vec<String> = [
        ("open", "Open"),
        ("high", "High"),
        ("low", "Low"),
        ("close", "Close"),
    ]
    .into_iter()
    .filter(|(key, _)| present(quote.get(*key)))
    .map(|(_, name)| name.to_string())
    .collect();

    if present(indicators.pointer("/adjclose/0/adjclose")) {
        columns.push("Adj Close".to_string());
    }
    if present(quote.get("volume")) {
        columns.push("Volume".to_string());
    }
    Some(columns)
}

/// A field Yahoo left blank arrives as zero
fn reported(value: f64) -> Option<f64> {
    (value.is_finite() && value != 0.0).then_some(value)
}

/// Convert Yahoo quotes into provider rows, dropping rows without a usable close
fn to_rows(quotes: &[yahoo::Quote]) -> Result<Vec<RawBar>> {
    let mut rows = Vec::with_capacity(quotes.len());

    for q in quotes {
        if !q.close.is_finite() {
            debug!(timestamp = q.timestamp, "Skipping quote without a close");
            continue;
        }

        let date = DateTime::from_timestamp(q.timestamp as i64, 0)
            .ok_or_else(|| AnalysisError::Provider(format!("Invalid quote timestamp: {}", q.timestamp)))?
            .date_naive();

        rows.push(RawBar {
            date,
            open: reported(q.open),
            high: reported(q.high),
            low: reported(q.low),
            close: Some(q.close),
            adj_close: reported(q.adjclose),
            volume: Some(q.volume),
        });
    }

    Ok(rows)
}

fn to_frame(quotes: &[yahoo::Quote]) -> Result<ProviderFrame> {
    Ok(ProviderFrame::new(
        YAHOO_COLUMNS.iter().map(ToString::to_string).collect(),
        to_rows(quotes)?,
    ))
}

#[async_trait]
impl PriceProvider for YahooFinanceClient {
    async fn fetch_history(&self, ticker: &str, lookback: Lookback) -> Result<ProviderFrame> {
        let end = Utc::now();
        let start = lookback.start_before(end);
        debug!(ticker, range = %lookback.range(), "Requesting Yahoo Finance history");

        let quotes = self.get_historical_quotes(ticker, start, end).await?;
        to_frame(&quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PriceSeries;
    use serde_json::json;

    fn response(blocks: Vec<yahoo::YQuoteBlock>) -> yahoo::YResponse {
        yahoo::YResponse {
            chart: yahoo::YChart {
                result: Some(blocks),
                error: None,
            },
        }
    }

    fn quote(timestamp: i64, close: f64) -> yahoo::Quote {
        yahoo::Quote {
            timestamp: timestamp as _,
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            volume: 1_000,
            close,
            adjclose: close,
        }
    }

    #[test]
    fn test_to_rows_maps_fields() {
        // 2024-01-02T14:30:00Z
        let rows = to_rows(&[quote(1_704_205_800, 185.64)]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date.to_string(), "2024-01-02");
        assert_eq!(rows[0].close, Some(185.64));
        assert_eq!(rows[0].adj_close, Some(185.64));
        assert_eq!(rows[0].volume, Some(1_000));
    }

    #[test]
    fn test_to_rows_skips_missing_close() {
        let rows = to_rows(&[quote(1_704_205_800, f64::NAN), quote(1_704_292_200, 184.25)]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, Some(184.25));
    }

    #[test]
    fn test_to_rows_blank_fields_are_absent() {
        let mut q = quote(1_704_205_800, 185.64);
        q.open = 0.0;
        q.adjclose = 0.0;

        let rows = to_rows(&[q]).unwrap();
        assert_eq!(rows[0].open, None);
        assert_eq!(rows[0].adj_close, None);
        assert!(rows[0].high.is_some());
        assert_eq!(rows[0].close, Some(185.64));
    }

    #[test]
    fn test_empty_quote_block_is_empty_data() {
        let quotes = response_quotes(&response(vec![yahoo::YQuoteBlock::default()])).unwrap();
        assert!(quotes.is_empty());

        let err = PriceSeries::from_frame("ZZZZ", to_frame(&quotes).unwrap(), 5).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyData {
                ticker: "ZZZZ".to_string()
            }
        );
    }

    #[test]
    fn test_empty_result_list_does_not_panic() {
        let quotes = response_quotes(&response(vec![])).unwrap();
        assert!(quotes.is_empty());

        let err = PriceSeries::from_frame("ZZZZ", to_frame(&quotes).unwrap(), 5).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmptyData);
    }

    #[test]
    fn test_missing_close_block_is_missing_field() {
        let indicators: yahoo::QuoteBlock = serde_json::from_value(json!({
            "quote": [{"open": [184.2], "high": [186.0], "low": [183.1], "volume": [1000]}]
        }))
        .unwrap();
        let block = yahoo::YQuoteBlock {
            timestamp: Some(vec![1_704_205_800]),
            indicators,
            ..Default::default()
        };

        let err = response_quotes(&response(vec![block])).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingField {
                available: vec![
                    "Open".to_string(),
                    "High".to_string(),
                    "Low".to_string(),
                    "Volume".to_string()
                ],
                recent: vec![],
            }
        );
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_history() {
        let client = YahooFinanceClient::new();
        let frame = client.fetch_history("AAPL", Lookback::SIX_MONTHS).await.unwrap();

        assert!(!frame.is_empty());
        assert!(frame.columns.contains(&"Close".to_string()));
        assert!(frame.rows.iter().all(|r| r.close.is_some()));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_history_unknown_symbol() {
        let client = YahooFinanceClient::new();
        let result = client
            .fetch_history("INVALID_SYMBOL_12345", Lookback::SIX_MONTHS)
            .await;

        match result {
            Ok(frame) => assert!(frame.is_empty()),
            Err(err) => assert!(matches!(err, AnalysisError::Provider(_))),
        }
    }
}
