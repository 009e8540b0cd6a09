//! Fetch → compute pipeline

pub mod analysis_engine;
pub mod indicators;
pub mod result;
pub mod series;

pub use analysis_engine::{AnalysisEngine, AnalysisRequest};
pub use result::{AnalysisReport, AnalysisResult, Signal, Tier};
pub use series::{PriceBar, PriceSeries};
