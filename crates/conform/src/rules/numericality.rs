use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

fn strict_number_regex() -> &'static Regex {
    static STRICT_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    STRICT_NUMBER_REGEX.get_or_init(|| Regex::new(r"^-?(0|[1-9]\d*)(\.\d+)?$").unwrap())
}

fn strict_integer_regex() -> &'static Regex {
    static STRICT_INTEGER_REGEX: OnceLock<Regex> = OnceLock::new();
    STRICT_INTEGER_REGEX.get_or_init(|| Regex::new(r"^-?(0|[1-9]\d*)$").unwrap())
}

/// Options for `numericality`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumericalityOptions {
    /// Strings must be canonical numbers (no leading zeros, `+` or exponent)
    #[serde(default)]
    pub strict: bool,
    /// Reject strings outright
    #[serde(default)]
    pub no_strings: bool,
    #[serde(default)]
    pub only_integer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greater_than_or_equal_to: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equal_to: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub less_than: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub less_than_or_equal_to: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divisible_by: Option<f64>,
    #[serde(default)]
    pub odd: bool,
    #[serde(default)]
    pub even: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_valid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_integer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_greater_than: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_greater_than_or_equal_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_equal_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_less_than: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_less_than_or_equal_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_divisible_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_odd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_even: Option<String>,
}

impl NumericalityOptions {
    /// Read the value as a number, honoring the string options.
    fn coerce(&self, value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(_) if self.no_strings => None,
            Value::String(s) => {
                let s = s.trim();
                let canonical = if self.only_integer {
                    strict_integer_regex()
                } else {
                    strict_number_regex()
                };
                if s.is_empty() || (self.strict && !canonical.is_match(s)) {
                    None
                } else {
                    s.parse::<f64>().ok()
                }
            }
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }
}

/// Checks that a value is a number, optionally within bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericalityValidator;

impl Validator for NumericalityValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options: NumericalityOptions = super::options_from_spec("numericality", spec)?;
        if options.divisible_by == Some(0.0) {
            return Err(ValidationFault::invalid_spec(
                "numericality",
                "`divisibleBy` must not be zero",
            ));
        }

        let Some(number) = options.coerce(value) else {
            let message = super::pick(&[&options.not_valid, &options.message], "is not a number");
            return Ok(RuleError::new("numericality", message).into());
        };

        if options.only_integer && number.fract() != 0.0 {
            let message = super::pick(&[&options.not_integer, &options.message], "must be an integer");
            return Ok(RuleError::new("numericality", message).into());
        }

        let bounds: [(Option<f64>, &Option<String>, &str, fn(f64, f64) -> bool); 6] = [
            (
                options.greater_than,
                &options.not_greater_than,
                "must be greater than %{count}",
                |n, b| n > b,
            ),
            (
                options.greater_than_or_equal_to,
                &options.not_greater_than_or_equal_to,
                "must be greater than or equal to %{count}",
                |n, b| n >= b,
            ),
            (
                options.equal_to,
                &options.not_equal_to,
                "must be equal to %{count}",
                |n, b| n == b,
            ),
            (
                options.less_than,
                &options.not_less_than,
                "must be less than %{count}",
                |n, b| n < b,
            ),
            (
                options.less_than_or_equal_to,
                &options.not_less_than_or_equal_to,
                "must be less than or equal to %{count}",
                |n, b| n <= b,
            ),
            (
                options.divisible_by,
                &options.not_divisible_by,
                "must be divisible by %{count}",
                |n, b| n % b == 0.0,
            ),
        ];

        for (bound, specific, default, holds) in bounds {
            if let Some(bound) = bound {
                if !holds(number, bound) {
                    let message = super::pick(&[specific, &options.message], default);
                    return Ok(RuleError::new("numericality", message)
                        .param("count", bound)
                        .into());
                }
            }
        }

        if options.odd && number.rem_euclid(2.0) != 1.0 {
            let message = super::pick(&[&options.not_odd, &options.message], "must be odd");
            return Ok(RuleError::new("numericality", message).into());
        }

        if options.even && number.rem_euclid(2.0) != 0.0 {
            let message = super::pick(&[&options.not_even, &options.message], "must be even");
            return Ok(RuleError::new("numericality", message).into());
        }

        Ok(Verdict::Valid)
    }
}
