//! # fileanchor CLI entry point
//!
//! Uploads one file to the configured IPFS API and records the returned
//! content address on the configured contract. Configuration comes from
//! the environment; see `AppConfig`.
//!
//! stdout carries only the result (transaction id or receipt JSON); logs
//! and errors go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use fileanchor_cli::exit::{EXIT_CONFIG, EXIT_OK};
use fileanchor_cli::{build_pipeline, exit_code, render_receipt, AppConfig};

/// Store a file in IPFS and record its content address on an EVM contract.
#[derive(Parser, Debug)]
#[command(name = "fileanchor", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Confirm the store holds the content before recording it on the
    /// ledger (overrides FILEANCHOR_VERIFY_STORED).
    #[arg(long)]
    verify_stored: bool,

    /// Print the full receipt as JSON instead of only the transaction id.
    #[arg(long)]
    json: bool,

    /// File to upload.
    file: PathBuf,

    /// Ledger account the transaction is sent from.
    sender: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "fileanchor starting");

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

/// `RUST_LOG`, when set, overrides the `-v` level.
fn init_tracing(verbose: u8, format: LogFormat) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: &Cli) -> anyhow::Result<u8> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if cli.verify_stored {
        config.pipeline.verify_stored = true;
    }
    tracing::debug!(?config, "configuration loaded");

    let pipeline = build_pipeline(config)?;
    match pipeline.submit(&cli.file, &cli.sender).await {
        Ok(receipt) => {
            println!("{}", render_receipt(&receipt, cli.json)?);
            Ok(EXIT_OK)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(exit_code(&e))
        }
    }
}
