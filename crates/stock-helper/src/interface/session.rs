//! Interactive prompt loop
//!
//! Each ticker/amount submission is one Analyze action; the next prompt is only shown
//! once that run has been rendered.

use super::formatter::Formatter;
use super::input;
use crate::engine::{AnalysisEngine, AnalysisRequest};
use std::io::{self, BufRead, Write};
use tracing::debug;

pub struct Session<'a> {
    engine: &'a AnalysisEngine,
    formatter: &'a dyn Formatter,
}

/// Read one line; `None` on EOF
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(input::strip_line_ending(&line).to_string()))
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a AnalysisEngine, formatter: &'a dyn Formatter) -> Self {
        Self { engine, formatter }
    }

    fn prompt<R: BufRead, W: Write>(
        input: &mut R,
        output: &mut W,
        text: &str,
    ) -> io::Result<Option<String>> {
        write!(output, "{text}")?;
        output.flush()?;
        match read_line(input)? {
            Some(line) if input::is_exit(&line) => Ok(None),
            other => Ok(other),
        }
    }

    /// Prompt until EOF or an exit command; returns the number of completed runs
    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<usize> {
        let config = self.engine.config();
        let ticker_prompt = format!(
            "Enter Stock Ticker (e.g., AAPL, TSLA) [{}]: ",
            config.default_ticker
        );
        let amount_prompt = format!("Amount to invest ($) [{:.2}]: ", config.default_amount);
        let mut runs = 0;

        loop {
            let Some(line) = Self::prompt(&mut input, &mut output, &ticker_prompt)? else {
                break;
            };
            let ticker = input::parse_ticker(&line, &config.default_ticker);

            let amount = loop {
                let Some(line) = Self::prompt(&mut input, &mut output, &amount_prompt)? else {
                    return Ok(runs);
                };
                match input::parse_amount(&line, config.default_amount, config.min_amount) {
                    Ok(amount) => break amount,
                    Err(err) => writeln!(output, "{err}")?,
                }
            };

            debug!(ticker = %ticker, amount, "Analyze triggered");
            let rendered = self
                .engine
                .run(&AnalysisRequest::new(ticker, amount), self.formatter)
                .await;
            writeln!(output, "{rendered}\n")?;
            runs += 1;
        }

        Ok(runs)
    }
}
