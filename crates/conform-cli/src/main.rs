//! `conform` - validate JSON attribute documents from the command line.

mod cli;
mod commands;
mod config;

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code for faults: unreadable input, malformed constraints, unknown
/// validators.
const EXIT_FAULT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("CONFORM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    let cli = cli::Cli::parse();
    match cli.execute().await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::from(EXIT_FAULT)
        }
    }
}
