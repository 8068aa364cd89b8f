//! Options for a validation call.

use crate::constraints::Constraints;
use crate::error::ValidationErrors;
use crate::format;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Humanization override applied to attribute names and stringified values.
pub type Prettifier = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Hook that post-processes the raw errors of an async validation call.
///
/// Receives the raw (not yet prefixed or interpolated) errors, the
/// attributes that were validated and the constraints.
pub type ErrorWrapper =
    Arc<dyn Fn(ValidationErrors, &Map<String, Value>, &Constraints) -> ValidationErrors + Send + Sync>;

/// Shape of the report returned for a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum OutputFormat {
    /// Attribute name to ordered messages
    #[default]
    Grouped,
    /// All messages in one list
    Flat,
    /// Attribute, value, validator, options and message per violation
    Detailed,
    /// Attribute name to the names of the failed validators
    Constraint,
    /// A formatter registered under this name
    Custom(String),
}

impl OutputFormat {
    /// Get the format name as a string.
    pub fn name(&self) -> &str {
        match self {
            OutputFormat::Grouped => "grouped",
            OutputFormat::Flat => "flat",
            OutputFormat::Detailed => "detailed",
            OutputFormat::Constraint => "constraint",
            OutputFormat::Custom(name) => name,
        }
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s {
            "grouped" => OutputFormat::Grouped,
            "flat" => OutputFormat::Flat,
            "detailed" => OutputFormat::Detailed,
            "constraint" => OutputFormat::Constraint,
            other => OutputFormat::Custom(other.to_string()),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OutputFormat::from(s))
    }
}

impl From<String> for OutputFormat {
    fn from(s: String) -> Self {
        OutputFormat::from(s.as_str())
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.name().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options for synchronous validation (and the shared part of async
/// validation).
#[derive(Clone)]
pub struct ValidateOptions {
    /// Report shape
    pub format: OutputFormat,
    /// Prefix messages with the capitalized attribute name
    pub full_messages: bool,
    /// Stop evaluating an attribute's constraints after the first failure
    pub stop_at_first_error: bool,
    prettify: Option<Prettifier>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Grouped,
            full_messages: true,
            stop_at_first_error: false,
            prettify: None,
        }
    }
}

impl ValidateOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report format.
    pub fn format(mut self, format: impl Into<OutputFormat>) -> Self {
        self.format = format.into();
        self
    }

    /// Toggle the attribute-name prefix.
    pub fn full_messages(mut self, enabled: bool) -> Self {
        self.full_messages = enabled;
        self
    }

    /// Toggle stopping at the first failing constraint of each attribute.
    pub fn stop_at_first_error(mut self, enabled: bool) -> Self {
        self.stop_at_first_error = enabled;
        self
    }

    /// Override the humanization of attribute names and values.
    pub fn prettify_with(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.prettify = Some(Arc::new(f));
        self
    }

    /// Humanize text with the override, or the default prettifier.
    pub fn prettify(&self, text: &str) -> String {
        match &self.prettify {
            Some(f) => f(text),
            None => format::prettify(text),
        }
    }
}

impl fmt::Debug for ValidateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOptions")
            .field("format", &self.format)
            .field("full_messages", &self.full_messages)
            .field("stop_at_first_error", &self.stop_at_first_error)
            .field("custom_prettify", &self.prettify.is_some())
            .finish()
    }
}

/// Options for asynchronous validation.
#[derive(Clone)]
pub struct AsyncValidateOptions {
    /// Options shared with the synchronous path
    pub validate: ValidateOptions,
    /// Drop attributes not named by the constraints before validating
    pub clean_attributes: bool,
    wrap_errors: Option<ErrorWrapper>,
}

impl Default for AsyncValidateOptions {
    fn default() -> Self {
        Self {
            validate: ValidateOptions::default(),
            clean_attributes: true,
            wrap_errors: None,
        }
    }
}

impl AsyncValidateOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shared options.
    pub fn validate(mut self, options: ValidateOptions) -> Self {
        self.validate = options;
        self
    }

    /// Toggle attribute cleaning.
    pub fn clean_attributes(mut self, enabled: bool) -> Self {
        self.clean_attributes = enabled;
        self
    }

    /// Post-process raw errors before they are formatted.
    pub fn wrap_errors(
        mut self,
        f: impl Fn(ValidationErrors, &Map<String, Value>, &Constraints) -> ValidationErrors
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.wrap_errors = Some(Arc::new(f));
        self
    }

    /// The error wrapper, if any.
    pub fn error_wrapper(&self) -> Option<&ErrorWrapper> {
        self.wrap_errors.as_ref()
    }
}

impl From<ValidateOptions> for AsyncValidateOptions {
    fn from(validate: ValidateOptions) -> Self {
        Self {
            validate,
            ..Self::default()
        }
    }
}

impl fmt::Debug for AsyncValidateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidateOptions")
            .field("validate", &self.validate)
            .field("clean_attributes", &self.clean_attributes)
            .field("has_wrap_errors", &self.wrap_errors.is_some())
            .finish()
    }
}
