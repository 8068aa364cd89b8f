//! Check command: validate an attributes document

use crate::cli::Outcome;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use clap::Args;
use conform::{AsyncValidateOptions, Constraints, OutputFormat, ValidateOptions, ValidationResult};
use console::{style, Emoji};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "x ");

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON file holding the attributes object
    #[arg(short, long)]
    attributes: PathBuf,

    /// JSON file holding the constraints
    #[arg(short, long)]
    constraints: PathBuf,

    /// Report format (grouped, flat, detailed, constraint)
    #[arg(short, long)]
    format: Option<String>,

    /// Leave messages without the attribute name prefix
    #[arg(long)]
    no_full_messages: bool,

    /// Use the concurrent validation path
    #[arg(long = "async")]
    run_async: bool,

    /// Keep attributes that no constraint names (async path only)
    #[arg(long, requires = "run_async")]
    no_clean: bool,
}

pub async fn check(args: CheckArgs, config: &Config) -> Result<Outcome> {
    let attributes = read_attributes(&args.attributes).await?;
    let constraints = read_constraints(&args.constraints).await?;

    let format = args
        .format
        .clone()
        .or_else(|| config.format.clone())
        .map(OutputFormat::from)
        .unwrap_or_default();
    let full_messages = !args.no_full_messages && config.full_messages.unwrap_or(true);
    let options = ValidateOptions::default()
        .format(format)
        .full_messages(full_messages);

    tracing::debug!(
        attributes = attributes.len(),
        constraints = constraints.constraint_count(),
        run_async = args.run_async,
        "Validating"
    );

    let result = if args.run_async {
        let clean = !args.no_clean && config.clean_attributes.unwrap_or(true);
        let options = AsyncValidateOptions::from(options).clean_attributes(clean);
        conform::validate_async(&attributes, &constraints, &options).await?
    } else {
        conform::validate(&attributes, &constraints, &options)?
    };

    report(&result)
}

fn report(result: &ValidationResult) -> Result<Outcome> {
    match result.report() {
        None => {
            eprintln!("{} {}", CHECK, style("Attributes are valid").green());
            Ok(Outcome::Success)
        }
        Some(report) => {
            let json = serde_json::to_string_pretty(&report.to_value())
                .context("Failed to serialize report")?;
            println!("{}", json);
            eprintln!(
                "{} {}",
                CROSS,
                style(format!("{} violation(s)", result.errors().len())).red()
            );
            Ok(Outcome::Invalid)
        }
    }
}

async fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn read_attributes(path: &Path) -> Result<Map<String, Value>> {
    match read_json(path).await? {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{} must hold a JSON object, found {}",
            path.display(),
            kind(&other)
        ),
    }
}

async fn read_constraints(path: &Path) -> Result<Constraints> {
    let value = read_json(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Malformed constraints in {}", path.display()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
