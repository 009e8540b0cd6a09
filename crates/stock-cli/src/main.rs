//! Command-line interface for stock-helper
//!
//! # Usage
//!
//! ```bash
//! # Interactive: prompts for ticker and amount until `exit` or EOF
//! cargo run -p stock-cli
//!
//! # One analysis and exit
//! cargo run -p stock-cli -- --ticker tsla --amount 250
//!
//! # Offline, from a pandas `to_json(orient="split")` export
//! cargo run -p stock-cli -- --data-file ./prices --ticker AAPL --format markdown
//! ```

use clap::{ArgAction, Parser};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use stock_helper::interface::InputError;
use stock_helper::{
    AnalysisEngine, AnalysisError, AnalysisRequest, AnalyzerConfig, Formatter, FormatterFactory,
    OutputFormat, Session,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-cli", version)]
#[command(about = "Buy/sell/hold guidance from 20- and 50-day moving averages", long_about = None)]
struct Args {
    /// Ticker to analyze once; prompts interactively when omitted
    #[arg(short, long)]
    ticker: Option<String>,

    /// Amount to invest in dollars (default 100, minimum 1)
    #[arg(short, long)]
    amount: Option<f64>,

    /// Output format: text, markdown or json
    #[arg(short, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON export (or directory of <TICKER>.json files) to read instead of Yahoo Finance
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Give up on the data provider after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Disable ANSI colours in text output
    #[arg(long)]
    no_color: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> anyhow::Result<AnalyzerConfig> {
    let mut builder =
        AnalyzerConfig::builder().request_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(path) = &args.data_file {
        builder = builder.data_file(path);
    }
    Ok(builder.build()?)
}

/// Resolve the amount for a one-shot run, applying the same floor as the prompt
fn one_shot_amount(args: &Args, config: &AnalyzerConfig) -> Result<f64, InputError> {
    let amount = args.amount.unwrap_or(config.default_amount);
    if !amount.is_finite() {
        return Err(InputError::NotANumber(amount.to_string()));
    }
    if amount < config.min_amount {
        return Err(InputError::BelowMinimum {
            min: config.min_amount,
        });
    }
    Ok(amount)
}

/// Render a failure that escaped a run, keeping its classification when it has one
fn failure_message(err: &anyhow::Error, formatter: &dyn Formatter) -> String {
    match err.downcast_ref::<AnalysisError>() {
        Some(err) => formatter.format_error(err),
        None => formatter.format_error(&AnalysisError::Unclassified(format!("{err:#}"))),
    }
}

async fn run(args: Args, formatter: &dyn Formatter) -> anyhow::Result<()> {
    let config = Arc::new(build_config(&args)?);
    info!(provider = ?config.provider, "Configured");
    let engine = AnalysisEngine::from_config(Arc::clone(&config));

    if let Some(ticker) = args.ticker.clone() {
        let amount = one_shot_amount(&args, &config)?;
        let output = engine
            .run(&AnalysisRequest::new(ticker, amount), formatter)
            .await;
        println!("{output}");
        return Ok(());
    }

    let stdin = io::stdin();
    let runs = Session::new(&engine, formatter)
        .run(stdin.lock(), io::stdout())
        .await?;
    info!(runs, "Session ended");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let utils_config = stock_utils::Config::default()
        .with_verbosity(args.verbose)
        .with_json_logs(args.log_json);
    stock_utils::init_tracing(&utils_config);

    info!(app = %utils_config.app_name, "Starting stock-cli");

    let color = !args.no_color && io::stdout().is_terminal();
    let formatter = FormatterFactory::create(args.format, color);

    let header = formatter.format_header();
    if !header.is_empty() {
        println!("{header}\n");
    }

    // Anything escaping a run, bad flags included, is still reported through the formatter
    if let Err(err) = run(args, formatter.as_ref()).await {
        println!("{}", failure_message(&err, formatter.as_ref()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use stock_helper::{DataProvider, TextFormatter};

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_one_shot_args() {
        let args = Args::try_parse_from([
            "stock-cli", "-t", "tsla", "-a", "250", "-f", "markdown", "--data-file", "prices",
        ])
        .unwrap();

        assert_eq!(args.ticker.as_deref(), Some("tsla"));
        assert_eq!(args.format, OutputFormat::Markdown);

        let config = build_config(&args).unwrap();
        assert_eq!(config.provider, DataProvider::File(PathBuf::from("prices")));
        assert_eq!(one_shot_amount(&args, &config), Ok(250.0));
    }

    #[test]
    fn test_one_shot_amount_floor() {
        let args = Args::try_parse_from(["stock-cli", "-t", "aapl", "-a", "0.5"]).unwrap();
        let config = build_config(&args).unwrap();
        assert!(one_shot_amount(&args, &config).is_err());

        let args = Args::try_parse_from(["stock-cli", "-t", "aapl"]).unwrap();
        assert_eq!(one_shot_amount(&args, &config), Ok(100.0));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let args = Args::try_parse_from(["stock-cli", "--timeout-secs", "0"]).unwrap();
        assert!(build_config(&args).is_err());
    }

    #[tokio::test]
    async fn test_bad_flags_go_through_formatter() {
        let args = Args::try_parse_from(["stock-cli", "-t", "aapl", "--timeout-secs", "0"]).unwrap();
        let formatter = TextFormatter::plain();

        let err = run(args, &formatter).await.unwrap_err();
        assert!(
            failure_message(&err, &formatter).starts_with("Configuration error: "),
            "unexpected message: {err:#}"
        );
    }

    #[test]
    fn test_unclassified_failure_message() {
        let err = anyhow::anyhow!("stdout closed");
        assert_eq!(
            failure_message(&err, &TextFormatter::plain()),
            "An error occurred: stdout closed"
        );
    }
}
