//! Parsing of the two interactive inputs

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Amount must be a number, got '{0}'")]
    NotANumber(String),

    #[error("Amount must be at least ${min:.2}")]
    BelowMinimum { min: f64 },
}

/// Drop the trailing newline left by `read_line`, nothing else
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

pub fn is_exit(line: &str) -> bool {
    matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "exit" | "quit" | "/exit"
    )
}

/// Blank input selects `default`; anything else is kept exactly as typed
pub fn parse_ticker(line: &str, default: &str) -> String {
    if line.trim().is_empty() {
        default.to_string()
    } else {
        line.to_string()
    }
}

/// Blank input selects `default`; otherwise a finite number no smaller than `min`
pub fn parse_amount(line: &str, default: f64, min: f64) -> Result<f64, InputError> {
    let trimmed = line.trim().trim_start_matches('$').replace(',', "");
    if trimmed.is_empty() {
        return Ok(default);
    }

    let amount: f64 = trimmed
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| InputError::NotANumber(line.trim().to_string()))?;

    if amount < min {
        return Err(InputError::BelowMinimum { min });
    }
    Ok(amount)
}
