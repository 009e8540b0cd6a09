//! Analysis engine - one retrieve, compute and present pass per request

use crate::api::{FileProvider, Lookback, PriceProvider, YahooFinanceClient};
use crate::config::{AnalyzerConfig, DataProvider};
use crate::error::{AnalysisError, Result};
use crate::interface::Formatter;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::indicators;
use super::result::AnalysisReport;
use super::series::PriceSeries;

/// Inputs collected for one Analyze action
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Ticker as entered; only uppercased before use
    pub ticker: String,
    pub amount_to_invest: f64,
}

impl AnalysisRequest {
    pub fn new(ticker: impl Into<String>, amount_to_invest: f64) -> Self {
        Self {
            ticker: ticker.into(),
            amount_to_invest,
        }
    }

    pub fn normalized_ticker(&self) -> String {
        self.ticker.to_uppercase()
    }
}

/// Stateless pipeline over a price provider
pub struct AnalysisEngine {
    provider: Arc<dyn PriceProvider>,
    config: Arc<AnalyzerConfig>,
}

impl AnalysisEngine {
    pub fn new(provider: Arc<dyn PriceProvider>, config: Arc<AnalyzerConfig>) -> Self {
        Self { provider, config }
    }

    /// Build an engine over the provider named in `config`
    pub fn from_config(config: Arc<AnalyzerConfig>) -> Self {
        let provider: Arc<dyn PriceProvider> = match &config.provider {
            DataProvider::Yahoo => Arc::new(YahooFinanceClient::new()),
            DataProvider::File(path) => Arc::new(FileProvider::new(path)),
        };
        Self::new(provider, config)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Fetch the lookback window for `ticker` and classify the response
    pub async fn retrieve(&self, ticker: &str) -> Result<PriceSeries> {
        let timeout = self.config.request_timeout;
        let frame = tokio::time::timeout(
            timeout,
            self.provider.fetch_history(ticker, Lookback::SIX_MONTHS),
        )
        .await
        .map_err(|_| {
            AnalysisError::Provider(format!(
                "request for {ticker} timed out after {}s",
                timeout.as_secs_f64()
            ))
        })??;

        debug!(ticker, rows = frame.rows.len(), columns = ?frame.columns, "Provider responded");
        PriceSeries::from_frame(ticker, frame, self.config.tail_rows)
    }

    /// Run retrieve and compute for one request
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let ticker = request.normalized_ticker();
        let span = info_span!("analyze", ticker = %ticker);

        async move {
            debug!("Fetching");
            let series = self.retrieve(&ticker).await?;

            debug!(bars = series.len(), "Computing");
            let result = indicators::compute(
                &series,
                request.amount_to_invest,
                self.config.short_window,
                self.config.long_window,
            )?;

            info!(signal = %result.signal, price = result.latest_price, "Analysis complete");
            Ok::<_, AnalysisError>(AnalysisReport {
                result,
                recent: series.tail(self.config.tail_rows).to_vec(),
            })
        }
        .instrument(span)
        .await
    }

    /// Run one request to completion and render whatever it produced
    ///
    /// Never fails: every failure class, including a panic in the provider stack, is
    /// turned into its user-facing message.
    pub async fn run(&self, request: &AnalysisRequest, formatter: &dyn Formatter) -> String {
        let outcome = AssertUnwindSafe(self.analyze(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(ticker = %request.ticker, "Analysis panicked: {}", message);
                Err(AnalysisError::Unclassified(message))
            });

        match outcome {
            Ok(report) => formatter.format_report(&report),
            Err(err) => {
                warn!(kind = ?err.kind(), "Analysis failed: {}", err);
                formatter.format_error(&err)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "analysis aborted unexpectedly".to_string()
    }
}
