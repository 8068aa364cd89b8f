use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use crate::util;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for `presence`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceOptions {
    /// Accept empty strings, arrays and objects; only null fails
    #[serde(default)]
    pub allow_empty: bool,
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Fails on null or missing values and, unless `allowEmpty`, on blank
/// strings and empty collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceValidator;

impl Validator for PresenceValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options: PresenceOptions = super::options_from_spec("presence", spec)?;

        let missing = if options.allow_empty {
            value.is_null()
        } else {
            util::is_empty(value)
        };

        if missing {
            let message = super::pick(&[&options.message], "can't be blank");
            Ok(RuleError::new("presence", message).into())
        } else {
            Ok(Verdict::Valid)
        }
    }

    fn validates_absent(&self) -> bool {
        true
    }
}
