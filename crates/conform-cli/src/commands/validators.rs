//! List the validators the default engine knows

use crate::cli::Outcome;
use anyhow::Result;
use clap::Args;
use console::style;

#[derive(Args, Debug)]
pub struct ValidatorsArgs {
    /// Print the names as a JSON array
    #[arg(long)]
    json: bool,
}

pub fn list_validators(args: ValidatorsArgs) -> Result<Outcome> {
    let registry = conform::default_engine().registry();
    let names = registry.validator_names();

    if args.json {
        println!("{}", serde_json::to_string(&names)?);
        return Ok(Outcome::Success);
    }

    println!("{}", style("Registered validators:").bold());
    for name in names {
        let async_marker = match registry.lookup(name) {
            Some(validator) if validator.is_async() => style(" (async)").dim().to_string(),
            _ => String::new(),
        };
        println!("  {}{}", style(name).cyan(), async_marker);
    }
    Ok(Outcome::Success)
}
