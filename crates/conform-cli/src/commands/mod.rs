//! CLI commands

mod check;
mod validators;

pub use check::{check, CheckArgs};
pub use validators::{list_validators, ValidatorsArgs};
