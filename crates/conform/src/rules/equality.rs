use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for `equality`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EqualityOptions {
    /// Name or dotted path of the attribute to compare against
    pub attribute: String,
    /// Registered comparator; strict JSON equality when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EqualityOptions {
    fn from_spec(spec: &Value) -> Result<Self, ValidationFault> {
        match spec {
            Value::String(attribute) => Ok(Self {
                attribute: attribute.clone(),
                comparator: None,
                message: None,
            }),
            Value::Object(_) => super::parse_options("equality", spec),
            other => Err(ValidationFault::invalid_spec(
                "equality",
                format!("expected an attribute name or options object, got {other}"),
            )),
        }
    }
}

/// Checks that the value equals another attribute, e.g. a password
/// confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualityValidator;

impl Validator for EqualityValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options = EqualityOptions::from_spec(spec)?;
        let other = ctx.lookup(&options.attribute).unwrap_or(&Value::Null);

        let equal = match options.comparator.as_deref() {
            None => value == other,
            Some(name) => {
                let comparator = ctx
                    .registry()
                    .comparator(name)
                    .ok_or_else(|| ValidationFault::UnknownComparator(name.to_string()))?;
                comparator(value, other)
            }
        };

        if equal {
            Ok(Verdict::Valid)
        } else {
            let message = super::pick(&[&options.message], "is not equal to %{attribute}");
            Ok(RuleError::new("equality", message)
                .param("attribute", ctx.prettify(&options.attribute))
                .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ValidateOptions;
    use crate::registry::Registry;
    use serde_json::json;

    fn check(value: Value, spec: Value) -> Result<Verdict, ValidationFault> {
        let attributes = json!({ "password": "secret", "account": { "pin": "1234" } });
        let attributes = attributes.as_object().unwrap();
        let options = ValidateOptions::default();
        let registry = Registry::default();
        let ctx = ValidationContext::new("confirmation", attributes, &options, &registry);
        EqualityValidator.validate(&value, &spec, &ctx)
    }

    #[test]
    fn shorthand_compares_attributes() {
        assert!(check(json!("secret"), json!("password")).unwrap().is_valid());
        assert_eq!(
            check(json!("Secret"), json!("password")).unwrap(),
            Verdict::invalid("is not equal to password")
        );
    }

    #[test]
    fn deep_path_and_prettified_name() {
        assert!(check(json!("1234"), json!("account.pin")).unwrap().is_valid());
        assert_eq!(
            check(json!("0000"), json!({ "attribute": "account.pin" })).unwrap(),
            Verdict::invalid("is not equal to account pin")
        );
    }

    #[test]
    fn named_comparator() {
        let spec = json!({ "attribute": "password", "comparator": "case_insensitive" });
        assert!(check(json!("SECRET"), spec).unwrap().is_valid());

        let spec = json!({ "attribute": "password", "comparator": "fuzzy" });
        assert!(matches!(
            check(json!("x"), spec),
            Err(ValidationFault::UnknownComparator(name)) if name == "fuzzy"
        ));
    }

    #[test]
    fn malformed_specs() {
        assert!(matches!(check(json!("x"), json!(true)), Err(ValidationFault::InvalidSpec { .. })));
        assert!(matches!(
            check(json!("x"), json!({ "message": "no attribute" })),
            Err(ValidationFault::InvalidSpec { .. })
        ));
    }
}
