//! Application-level settings

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Directive used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Emit log lines as JSON objects
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stock-helper".to_string(),
            log_filter: "warn,stock_helper=info".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Raise the default directive for each `-v` given on the command line
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        match verbose {
            0 => {}
            1 => self.log_filter = "info,stock_helper=debug".to_string(),
            _ => self.log_filter = "debug".to_string(),
        }
        self
    }

    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}
