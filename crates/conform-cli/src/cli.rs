//! CLI argument parsing

use crate::commands::{self, CheckArgs, ValidatorsArgs};
use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// conform - validate JSON attributes against JSON constraints
#[derive(Parser, Debug)]
#[command(name = "conform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./conform.toml when present)
    #[arg(long, global = true, env = "CONFORM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an attributes document against a constraints document
    Check(CheckArgs),

    /// List the registered validators
    Validators(ValidatorsArgs),
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Success,
    /// The attributes violate the constraints
    Invalid,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Invalid => ExitCode::from(1),
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> anyhow::Result<Outcome> {
        let config = Config::load(self.config.as_deref()).await?;
        match self.command {
            Commands::Check(args) => commands::check(args, &config).await,
            Commands::Validators(args) => commands::list_validators(args),
        }
    }
}
