//! Validation results and their output shapes.

use crate::error::{ErrorDetail, ValidationErrors};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// A failed validation, shaped by [`OutputFormat`](crate::OutputFormat).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// Attribute name to ordered messages
    Grouped(IndexMap<String, Vec<String>>),
    /// All messages in order
    Flat(Vec<String>),
    /// One entry per violation
    Detailed(Vec<ErrorDetail>),
    /// Attribute name to failed validator names
    Constraint(IndexMap<String, Vec<String>>),
    /// Output of a registered formatter
    Custom(Value),
}

impl Report {
    /// The report as JSON.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Outcome of a validation call.
///
/// Fresh per call. An empty error collection means the attributes are
/// valid, in which case there is no report.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    errors: ValidationErrors,
    report: Option<Report>,
    attributes: Option<Map<String, Value>>,
}

impl ValidationResult {
    pub(crate) fn new(
        errors: ValidationErrors,
        report: Option<Report>,
        attributes: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            errors,
            report,
            attributes,
        }
    }

    /// Check if no constraint was violated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The formatted errors, in evaluation order.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The report in the requested format; `None` when valid.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Consume the result, keeping the report.
    pub fn into_report(self) -> Option<Report> {
        self.report
    }

    /// Attribute name to ordered messages, regardless of the report format.
    pub fn grouped(&self) -> IndexMap<String, Vec<String>> {
        self.errors.grouped()
    }

    /// The attributes the async path validated, after cleaning.
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.attributes.as_ref()
    }

    /// Convert to Result - Ok if valid, Err with the errors otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}
