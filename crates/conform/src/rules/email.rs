use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Dot-atom local part, then at least two dot-separated domain labels.
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
        )
        .unwrap()
    })
}

/// Options for `email`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailOptions {
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Checks that a string looks like an email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options: EmailOptions = super::options_from_spec("email", spec)?;

        let valid = value.as_str().is_some_and(|s| email_regex().is_match(s));
        if valid {
            Ok(Verdict::Valid)
        } else {
            let message = super::pick(&[&options.message], "is not a valid email");
            Ok(RuleError::new("email", message).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ValidateOptions;
    use crate::registry::Registry;
    use serde_json::json;

    fn check(value: Value) -> bool {
        let attributes = serde_json::Map::new();
        let options = ValidateOptions::default();
        let registry = Registry::empty();
        let ctx = ValidationContext::new("email", &attributes, &options, &registry);
        EmailValidator
            .validate(&value, &json!(true), &ctx)
            .unwrap()
            .is_valid()
    }

    #[test]
    fn accepts_addresses() {
        assert!(check(json!("nicklas@ansman.se")));
        assert!(check(json!("first.last+tag@sub.example.co.uk")));
        assert!(check(json!("UPPER@EXAMPLE.COM")));
    }

    #[test]
    fn rejects_non_addresses() {
        assert!(!check(json!("foobar")));
        assert!(!check(json!("foo@bar")));
        assert!(!check(json!("foo@.com")));
        assert!(!check(json!("foo..bar@example.com")));
        assert!(!check(json!(" foo@example.com")));
        assert!(!check(json!(42)));
    }
}
