//! Built-in validators.
//!
//! Each validator normalizes its boundary spec (`true`, a shorthand, or an
//! options object) into a typed options struct before evaluating.

mod datetime;
mod email;
mod equality;
mod length;
mod membership;
mod numericality;
mod pattern;
mod presence;
mod url;

pub use datetime::{DateTimeOptions, DateTimeValidator};
pub use email::{EmailOptions, EmailValidator};
pub use equality::{EqualityOptions, EqualityValidator};
pub use length::{LengthOptions, LengthValidator};
pub use membership::{Membership, MembershipOptions, MembershipValidator, Within};
pub use numericality::{NumericalityOptions, NumericalityValidator};
pub use pattern::{FormatOptions, FormatValidator};
pub use presence::{PresenceOptions, PresenceValidator};
pub use url::{Schemes, UrlOptions, UrlValidator};

use crate::error::ValidationFault;
use crate::registry::Registry;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Register every built-in validator under its constraint name.
pub(crate) fn register_builtins(registry: &mut Registry) {
    registry
        .register("presence", PresenceValidator)
        .register("email", EmailValidator)
        .register("date", DateTimeValidator::date())
        .register("datetime", DateTimeValidator::datetime())
        .register("equality", EqualityValidator)
        .register("exclusion", MembershipValidator::exclusion())
        .register("inclusion", MembershipValidator::inclusion())
        .register("format", FormatValidator::new())
        .register("length", LengthValidator)
        .register("numericality", NumericalityValidator)
        .register("url", UrlValidator);
}

/// Normalize `true` or an options object into typed options.
pub(crate) fn options_from_spec<T>(validator: &str, spec: &Value) -> Result<T, ValidationFault>
where
    T: DeserializeOwned + Default,
{
    match spec {
        Value::Bool(true) => Ok(T::default()),
        Value::Object(_) => parse_options(validator, spec),
        other => Err(ValidationFault::invalid_spec(
            validator,
            format!("expected `true` or an options object, got {other}"),
        )),
    }
}

/// Deserialize an options object.
pub(crate) fn parse_options<T: DeserializeOwned>(
    validator: &str,
    spec: &Value,
) -> Result<T, ValidationFault> {
    serde_json::from_value(spec.clone())
        .map_err(|e| ValidationFault::invalid_spec(validator, e.to_string()))
}

/// Pick the first message that is set.
pub(crate) fn pick(messages: &[&Option<String>], default: &str) -> String {
    messages
        .iter()
        .find_map(|m| m.as_deref())
        .unwrap_or(default)
        .to_string()
}
