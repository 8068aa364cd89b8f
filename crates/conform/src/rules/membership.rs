use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::format;
use crate::traits::{Validator, Verdict};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Allowed or restricted values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Within {
    /// Plain list of values
    List(Vec<Value>),
    /// Keys are the values; labels replace `%{value}` in messages
    Labeled(IndexMap<String, Value>),
}

impl Within {
    fn contains(&self, value: &Value) -> bool {
        match self {
            Within::List(items) => items.contains(value),
            Within::Labeled(labels) => key_of(value).is_some_and(|key| labels.contains_key(&key)),
        }
    }

    fn label(&self, value: &Value) -> String {
        if let Within::Labeled(labels) = self {
            if let Some(Value::String(label)) = key_of(value).and_then(|key| labels.get(&key)) {
                return label.clone();
            }
        }
        format::stringify_param(value)
    }
}

fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Options for `inclusion` and `exclusion`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MembershipOptions {
    pub within: Within,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MembershipOptions {
    fn from_spec(name: &str, spec: &Value) -> Result<Self, ValidationFault> {
        match spec {
            Value::Array(items) => Ok(Self {
                within: Within::List(items.clone()),
                message: None,
            }),
            Value::Object(map) if map.contains_key("within") => super::parse_options(name, spec),
            other => Err(ValidationFault::invalid_spec(
                name,
                format!("expected a list or an options object with `within`, got {other}"),
            )),
        }
    }
}

/// Which side of the list a value must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// The value must be in the list
    Inclusion,
    /// The value must not be in the list
    Exclusion,
}

/// Checks list membership.
#[derive(Debug, Clone, Copy)]
pub struct MembershipValidator {
    kind: Membership,
}

impl MembershipValidator {
    /// The `inclusion` validator.
    pub fn inclusion() -> Self {
        Self {
            kind: Membership::Inclusion,
        }
    }

    /// The `exclusion` validator.
    pub fn exclusion() -> Self {
        Self {
            kind: Membership::Exclusion,
        }
    }
}

impl Validator for MembershipValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let (name, default) = match self.kind {
            Membership::Inclusion => ("inclusion", "^%{value} is not included in the list"),
            Membership::Exclusion => ("exclusion", "^%{value} is restricted"),
        };
        let options = MembershipOptions::from_spec(name, spec)?;

        let member = options.within.contains(value);
        let violated = match self.kind {
            Membership::Inclusion => !member,
            Membership::Exclusion => member,
        };

        if violated {
            let message = super::pick(&[&options.message], default);
            Ok(RuleError::new(name, message)
                .param("value", options.within.label(value))
                .into())
        } else {
            Ok(Verdict::Valid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ValidateOptions;
    use crate::registry::Registry;
    use serde_json::json;

    fn check(validator: MembershipValidator, value: Value, spec: Value) -> Result<Verdict, ValidationFault> {
        let attributes = serde_json::Map::new();
        let options = ValidateOptions::default();
        let registry = Registry::empty();
        let ctx = ValidationContext::new("size", &attributes, &options, &registry);
        validator.validate(&value, &spec, &ctx)
    }

    #[test]
    fn inclusion_list() {
        let v = MembershipValidator::inclusion();
        assert!(check(v, json!("small"), json!(["small", "large"])).unwrap().is_valid());
        assert_eq!(
            check(v, json!("medium"), json!(["small", "large"])).unwrap(),
            Verdict::invalid("^medium is not included in the list")
        );
        assert!(!check(v, json!("1"), json!([1, 2])).unwrap().is_valid());
    }

    #[test]
    fn exclusion_with_labels() {
        let v = MembershipValidator::exclusion();
        let spec = json!({ "within": { "jp": "Japan", "ch": "China" } });
        assert_eq!(
            check(v, json!("jp"), spec.clone()).unwrap(),
            Verdict::invalid("^Japan is restricted")
        );
        assert!(check(v, json!("se"), spec).unwrap().is_valid());
    }

    #[test]
    fn custom_message() {
        let v = MembershipValidator::inclusion();
        let spec = json!({ "within": [1, 2, 3], "message": "^%{value} is not a valid choice" });
        assert_eq!(
            check(v, json!(4), spec).unwrap(),
            Verdict::invalid("^4 is not a valid choice")
        );
    }

    #[test]
    fn malformed_spec() {
        let v = MembershipValidator::exclusion();
        assert!(matches!(check(v, json!("x"), json!(true)), Err(ValidationFault::InvalidSpec { .. })));
        assert!(matches!(check(v, json!("x"), json!({ "message": "m" })), Err(ValidationFault::InvalidSpec { .. })));
    }
}
