//! Moving-average stock helper
//!
//! Fetches six months of daily prices for one ticker, compares the 20-day and 50-day
//! simple moving averages, and reports a BUY/SELL/HOLD call together with how many
//! shares a given amount buys at the latest close.
//!
//! # Architecture
//!
//! One run is a straight line through three stages:
//! - **Retrieve** (`api`, `engine::series`): a [`PriceProvider`] returns a raw frame,
//!   which is classified into a [`PriceSeries`] or an [`AnalysisError`]
//! - **Compute** (`engine::indicators`): latest close, both SMAs, the signal and the
//!   affordability estimate
//! - **Present** (`interface`): a [`Formatter`] turns the report or the error into text
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_helper::{AnalysisEngine, AnalysisRequest, AnalyzerConfig, TextFormatter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = AnalysisEngine::from_config(Arc::new(AnalyzerConfig::default()));
//!     let output = engine
//!         .run(&AnalysisRequest::new("aapl", 300.0), &TextFormatter::plain())
//!         .await;
//!     println!("{output}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;

pub use api::{FileProvider, Lookback, PriceProvider, ProviderFrame, RawBar, YahooFinanceClient};
pub use config::{AnalyzerConfig, DataProvider};
pub use engine::{
    AnalysisEngine, AnalysisReport, AnalysisRequest, AnalysisResult, PriceBar, PriceSeries,
    Signal, Tier,
};
pub use error::{AnalysisError, ErrorKind, Result};
pub use interface::{Formatter, FormatterFactory, OutputFormat, Session, TextFormatter};
