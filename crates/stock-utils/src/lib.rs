//! Shared utilities for stock-helper
//!
//! Logging setup and application-level settings used by the binaries in this
//! workspace.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
