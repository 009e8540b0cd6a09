//! Moving averages, crossover signal and affordability

use super::result::{AnalysisResult, Signal};
use super::series::PriceSeries;
use crate::error::{AnalysisError, Result};
use ta::{Next, indicators::SimpleMovingAverage};
use tracing::debug;

/// Mean of the last `period` closes, or `None` when the series is shorter than `period`
pub fn sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let mut indicator = SimpleMovingAverage::new(period).ok()?;
    closes[closes.len() - period..]
        .iter()
        .fold(None, |_, &close| Some(indicator.next(close)))
}

/// BUY when the short average is strictly above the long one, SELL when strictly below,
/// HOLD on an exact tie or when either average is unavailable
pub fn crossover_signal(sma_short: Option<f64>, sma_long: Option<f64>) -> Signal {
    match (sma_short, sma_long) {
        (Some(short), Some(long)) if short > long => Signal::Buy,
        (Some(short), Some(long)) if short < long => Signal::Sell,
        _ => Signal::Hold,
    }
}

pub fn affordable_shares(amount_to_invest: f64, latest_price: f64) -> f64 {
    amount_to_invest / latest_price
}

/// Derive the full result for `series` and `amount_to_invest`
pub fn compute(
    series: &PriceSeries,
    amount_to_invest: f64,
    short_window: usize,
    long_window: usize,
) -> Result<AnalysisResult> {
    let latest_price = series.latest().close;
    if !(latest_price.is_finite() && latest_price > 0.0) {
        return Err(AnalysisError::Unclassified(format!(
            "latest close for {} is not a positive price: {latest_price}",
            series.ticker()
        )));
    }
    if !(amount_to_invest.is_finite() && amount_to_invest > 0.0) {
        return Err(AnalysisError::Unclassified(format!(
            "amount to invest must be positive, got {amount_to_invest}"
        )));
    }

    let closes = series.closes();
    let sma_short = sma(&closes, short_window);
    let sma_long = sma(&closes, long_window);
    let signal = crossover_signal(sma_short, sma_long);

    debug!(
        ticker = series.ticker(),
        bars = closes.len(),
        ?sma_short,
        ?sma_long,
        %signal,
        "Computed indicators"
    );

    Ok(AnalysisResult {
        ticker: series.ticker().to_string(),
        latest_price,
        short_window,
        long_window,
        sma_short,
        sma_long,
        signal,
        amount_to_invest,
        affordable_shares: affordable_shares(amount_to_invest, latest_price),
    })
}
