use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for `length`.
///
/// Bounds are read as numbers so integral floats such as `3.0` are accepted;
/// negative or fractional bounds are rejected when the validator runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LengthOptions {
    /// Exact length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<f64>,
    /// Minimum length, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Maximum length, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Registered tokenizer; characters (or array elements) when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub too_short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub too_long: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_valid: Option<String>,
}

/// A bound as a count, or a fault when it is not a non-negative integer.
fn count_bound(key: &str, bound: Option<f64>) -> Result<Option<usize>, ValidationFault> {
    match bound {
        None => Ok(None),
        Some(b) if b >= 0.0 && b.fract() == 0.0 && b <= usize::MAX as f64 => Ok(Some(b as usize)),
        Some(b) => Err(ValidationFault::invalid_spec(
            "length",
            format!("`{key}` must be a non-negative integer, got {b}"),
        )),
    }
}

/// Checks the length of strings and arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthValidator;

fn default_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

impl Validator for LengthValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options: LengthOptions = super::options_from_spec("length", spec)?;
        let is = count_bound("is", options.is)?;
        let minimum = count_bound("minimum", options.minimum)?;
        let maximum = count_bound("maximum", options.maximum)?;

        let length = match options.tokenizer.as_deref() {
            None => default_length(value),
            Some(name) => {
                let tokenizer = ctx
                    .registry()
                    .tokenizer(name)
                    .ok_or_else(|| ValidationFault::UnknownTokenizer(name.to_string()))?;
                tokenizer(value)
            }
        };

        let Some(length) = length else {
            let message = super::pick(
                &[&options.not_valid, &options.message],
                "has an incorrect length",
            );
            return Ok(RuleError::new("length", message).into());
        };

        let violation = if is.is_some_and(|is| length != is) {
            Some((
                &options.wrong_length,
                "is the wrong length (should be %{count} characters)",
                is,
            ))
        } else if minimum.is_some_and(|min| length < min) {
            Some((
                &options.too_short,
                "is too short (minimum is %{count} characters)",
                minimum,
            ))
        } else if maximum.is_some_and(|max| length > max) {
            Some((
                &options.too_long,
                "is too long (maximum is %{count} characters)",
                maximum,
            ))
        } else {
            None
        };

        Ok(match violation {
            Some((specific, default, count)) => {
                let message = super::pick(&[specific, &options.message], default);
                RuleError::new("length", message)
                    .param("count", count)
                    .param("length", length)
                    .into()
            }
            None => Verdict::Valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ValidateOptions;
    use crate::registry::Registry;
    use serde_json::json;

    fn check(value: Value, spec: Value) -> Result<Verdict, ValidationFault> {
        let attributes = serde_json::Map::new();
        let options = ValidateOptions::default();
        let registry = Registry::default();
        let ctx = ValidationContext::new("username", &attributes, &options, &registry);
        LengthValidator.validate(&value, &spec, &ctx)
    }

    #[test]
    fn bounds() {
        let spec = json!({ "minimum": 3, "maximum": 5 });
        assert!(check(json!("abc"), spec.clone()).unwrap().is_valid());
        assert!(check(json!("abcde"), spec.clone()).unwrap().is_valid());
        assert_eq!(
            check(json!("ab"), spec.clone()).unwrap(),
            Verdict::invalid("is too short (minimum is 3 characters)")
        );
        assert_eq!(
            check(json!("abcdef"), spec).unwrap(),
            Verdict::invalid("is too long (maximum is 5 characters)")
        );
    }

    #[test]
    fn exact_length_wins_first() {
        let spec = json!({ "is": 4, "minimum": 5 });
        assert_eq!(
            check(json!("abc"), spec).unwrap(),
            Verdict::invalid("is the wrong length (should be 4 characters)")
        );
    }

    #[test]
    fn arrays_count_elements() {
        let spec = json!({ "maximum": 2 });
        assert!(check(json!([1, 2]), spec.clone()).unwrap().is_valid());
        assert!(!check(json!([1, 2, 3]), spec).unwrap().is_valid());
    }

    #[test]
    fn values_without_length() {
        assert_eq!(
            check(json!(3), json!({ "minimum": 1 })).unwrap(),
            Verdict::invalid("has an incorrect length")
        );
    }

    #[test]
    fn message_overrides() {
        let spec = json!({ "minimum": 3, "tooShort": "needs %{count} letters, got %{length}" });
        assert_eq!(
            check(json!("a"), spec).unwrap(),
            Verdict::invalid("needs 3 letters, got 1")
        );
        let spec = json!({ "maximum": 1, "message": "bad length" });
        assert_eq!(check(json!("ab"), spec).unwrap(), Verdict::invalid("bad length"));
    }

    #[test]
    fn named_tokenizers() {
        let spec = json!({ "maximum": 2, "tokenizer": "words" });
        assert!(check(json!("two words"), spec.clone()).unwrap().is_valid());
        assert!(!check(json!("three words now"), spec).unwrap().is_valid());

        let spec = json!({ "is": 1, "tokenizer": "graphemes" });
        assert!(check(json!("e\u{301}"), spec).unwrap().is_valid());

        let spec = json!({ "is": 1, "tokenizer": "syllables" });
        assert!(matches!(
            check(json!("x"), spec),
            Err(ValidationFault::UnknownTokenizer(name)) if name == "syllables"
        ));
    }

    #[test]
    fn non_integer_bound_is_a_fault() {
        assert!(matches!(
            check(json!("abc"), json!({ "minimum": "three" })),
            Err(ValidationFault::InvalidSpec { .. })
        ));
        for spec in [json!({ "minimum": -1 }), json!({ "maximum": 2.5 }), json!({ "is": -3.0 })] {
            assert!(matches!(
                check(json!("abc"), spec),
                Err(ValidationFault::InvalidSpec { validator, .. }) if validator == "length"
            ));
        }
    }

    #[test]
    fn integral_float_bounds() {
        let spec = json!({ "minimum": 3.0, "maximum": 5.0 });
        assert!(check(json!("abc"), spec.clone()).unwrap().is_valid());
        assert_eq!(
            check(json!("ab"), spec).unwrap(),
            Verdict::invalid("is too short (minimum is 3 characters)")
        );
        assert_eq!(
            check(json!("abc"), json!({ "is": 4.0 })).unwrap(),
            Verdict::invalid("is the wrong length (should be 4 characters)")
        );
    }
}
