//! Error types: configuration/execution faults and collected validation errors.

use crate::format;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A fault raised while running validation.
///
/// Faults are distinct from validation failures: a value violating a
/// constraint is reported through [`ValidationErrors`], while a fault means
/// the validation itself could not be carried out (unknown constraint name,
/// malformed options, a validator that broke while running).
#[derive(Debug, Error)]
pub enum ValidationFault {
    #[error("Unknown validator '{name}' declared for attribute '{attribute}'")]
    UnknownValidator { name: String, attribute: String },

    #[error("Invalid options for validator '{validator}': {reason}")]
    InvalidSpec { validator: String, reason: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Validator '{validator}' failed: {reason}")]
    Execution { validator: String, reason: String },

    #[error("Validator '{validator}' is asynchronous; use validate_async")]
    AsyncInSyncPath { validator: String },

    #[error("Unknown format: {0}")]
    UnknownFormatter(String),

    #[error("Unknown comparator: {0}")]
    UnknownComparator(String),

    #[error("Unknown tokenizer: {0}")]
    UnknownTokenizer(String),
}

impl ValidationFault {
    /// Malformed constraint options.
    pub fn invalid_spec(validator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            validator: validator.into(),
            reason: reason.into(),
        }
    }

    /// A validator raised while executing.
    pub fn execution(validator: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Execution {
            validator: validator.into(),
            reason: reason.to_string(),
        }
    }
}

/// Message produced by a single rule, before attribute-level formatting.
///
/// Templates use `%{name}` placeholders that are filled from `params`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The validation rule code (e.g., "presence", "length")
    pub code: String,
    /// Message template
    pub message: String,
    /// Parameters for message interpolation
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, Value>,
}

impl RuleError {
    /// Create a new rule error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: IndexMap::new(),
        }
    }

    /// Add a parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Interpolate parameters into the message.
    ///
    /// Replaces `%{param_name}` placeholders with actual values. Placeholders
    /// without a matching parameter are left in place for later stages, and
    /// substituted values are escaped so those stages leave them alone.
    pub fn interpolate_message(&self) -> String {
        let params: Vec<(&str, String)> = self
            .params
            .iter()
            .map(|(key, value)| (key.as_str(), format::escape(&format::stringify_param(value))))
            .collect();
        format::interpolate(&self.message, &params)
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, format::unescape(&self.interpolate_message()))
    }
}

impl std::error::Error for RuleError {}

/// One violation in its detailed form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Attribute name (or dotted path) as declared in the constraints
    pub attribute: String,
    /// The value that was validated
    pub value: Value,
    /// Name of the validator that produced the message
    pub validator: String,
    /// The constraint spec the validator ran with
    pub options: Value,
    /// The message
    pub error: String,
}

/// Collection of validation errors, in evaluation order.
///
/// Attributes appear in the order the constraints declare them, and the
/// messages of one attribute in the order of its constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ValidationErrors {
    entries: Vec<ErrorDetail>,
}

impl ValidationErrors {
    /// Create an empty validation errors collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error.
    pub fn add(&mut self, detail: ErrorDetail) {
        self.entries.push(detail);
    }

    /// Add multiple errors.
    pub fn add_all(&mut self, details: impl IntoIterator<Item = ErrorDetail>) {
        self.entries.extend(details);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the total number of errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Messages for a specific attribute.
    pub fn get(&self, attribute: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.attribute == attribute)
            .map(|e| e.error.as_str())
            .collect()
    }

    /// Attribute names with errors, in first-seen order.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.attribute.as_str()) {
                names.push(&entry.attribute);
            }
        }
        names
    }

    /// Iterate over the detailed entries.
    pub fn iter(&self) -> std::slice::Iter<'_, ErrorDetail> {
        self.entries.iter()
    }

    /// Keep only the entries matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&ErrorDetail) -> bool) {
        self.entries.retain(f);
    }

    /// Rewrite every message.
    pub fn map_messages(mut self, mut f: impl FnMut(&ErrorDetail) -> String) -> Self {
        for entry in &mut self.entries {
            entry.error = f(entry);
        }
        self
    }

    /// Attribute name to ordered messages.
    pub fn grouped(&self) -> IndexMap<String, Vec<String>> {
        let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.attribute.clone())
                .or_default()
                .push(entry.error.clone());
        }
        grouped
    }

    /// Every message, in order.
    pub fn flat(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.error.clone()).collect()
    }

    /// Attribute name to the names of the validators that failed for it.
    pub fn constraint_names(&self) -> IndexMap<String, Vec<String>> {
        let mut names: IndexMap<String, Vec<String>> = IndexMap::new();
        for entry in &self.entries {
            let failed = names.entry(entry.attribute.clone()).or_default();
            if !failed.contains(&entry.validator) {
                failed.push(entry.validator.clone());
            }
        }
        names
    }

    /// The detailed entries.
    pub fn details(&self) -> &[ErrorDetail] {
        &self.entries
    }

    /// Convert to Result - Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ErrorDetail;
    type IntoIter = std::vec::IntoIter<ErrorDetail>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} error(s)", self.len())
    }
}

impl std::error::Error for ValidationErrors {}
