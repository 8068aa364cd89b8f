//! # conform
//!
//! Declarative validation of attribute mappings. Attributes are a JSON
//! object; constraints map attribute names (or dotted paths into nested
//! objects) to named constraints with their options. The result is either
//! valid or a report of human-readable messages per attribute.
//!
//! ## Features
//!
//! - Built-in validators: `presence`, `length`, `numericality`, `equality`,
//!   `inclusion`, `exclusion`, `format`, `email`, `url`, `date`, `datetime`
//! - Custom sync and async validators registered by name
//! - Concurrent async validation with a single join point
//! - `%{name}` message templates, full messages with humanized attribute
//!   names, `^` to suppress the prefix
//! - Grouped, flat, detailed, constraint and custom report formats
//!
//! ## Example
//!
//! ```rust,ignore
//! use conform::prelude::*;
//!
//! let constraints: Constraints = serde_json::from_value(json!({
//!     "username": { "presence": true, "length": { "minimum": 3 } },
//!     "age": { "numericality": { "onlyInteger": true, "greaterThanOrEqualTo": 18 } }
//! }))?;
//! let attributes = json!({ "username": "ab", "age": 17 });
//!
//! let result = conform::validate(attributes.as_object().unwrap(), &constraints, &ValidateOptions::default())?;
//! assert_eq!(
//!     result.report().map(Report::to_value),
//!     Some(json!({
//!         "username": ["Username is too short (minimum is 3 characters)"],
//!         "age": ["Age must be greater than or equal to 18"]
//!     }))
//! );
//! ```

mod constraints;
mod context;
mod engine;
mod error;
mod format;
mod options;
mod registry;
mod result;
mod traits;

pub mod rules;
pub mod util;


pub use constraints::{ConstraintSet, ConstraintSpec, Constraints};
pub use context::{ContextSnapshot, ValidationContext};
pub use engine::{Engine, EngineBuilder};
pub use error::{ErrorDetail, RuleError, ValidationErrors, ValidationFault};
pub use options::{AsyncValidateOptions, ErrorWrapper, OutputFormat, Prettifier, ValidateOptions};
pub use registry::{Comparator, Formatter, RegisteredValidator, Registry, Tokenizer};
pub use result::{Report, ValidationResult};
pub use traits::{AsyncFnValidator, AsyncValidator, FnValidator, Validator, Verdict};

use serde_json::{Map, Value};
use std::sync::OnceLock;

/// The shared engine over the built-in registry.
pub fn default_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(Engine::default)
}

/// Validate with the default engine.
pub fn validate(
    attributes: &Map<String, Value>,
    constraints: &Constraints,
    options: &ValidateOptions,
) -> Result<ValidationResult, ValidationFault> {
    default_engine().validate(attributes, constraints, options)
}

/// Validate asynchronously with the default engine.
pub async fn validate_async(
    attributes: &Map<String, Value>,
    constraints: &Constraints,
    options: &AsyncValidateOptions,
) -> Result<ValidationResult, ValidationFault> {
    default_engine()
        .validate_async(attributes, constraints, options)
        .await
}

/// Validate a lone value with the default engine.
pub fn single(
    value: &Value,
    set: &ConstraintSet,
    options: &ValidateOptions,
) -> Result<Option<Vec<String>>, ValidationFault> {
    default_engine().single(value, set, options)
}

/// Prelude module for validation
pub mod prelude {
    pub use crate::constraints::{ConstraintSet, ConstraintSpec, Constraints};
    pub use crate::context::{ContextSnapshot, ValidationContext};
    pub use crate::engine::{Engine, EngineBuilder};
    pub use crate::error::{ErrorDetail, RuleError, ValidationErrors, ValidationFault};
    pub use crate::options::{AsyncValidateOptions, OutputFormat, ValidateOptions};
    pub use crate::registry::Registry;
    pub use crate::result::{Report, ValidationResult};
    pub use crate::traits::{AsyncValidator, Validator, Verdict};
    pub use serde_json::{json, Value};
}
