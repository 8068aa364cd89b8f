//! The validation engine: per-constraint and per-attribute evaluation, and
//! the synchronous and asynchronous orchestrators.

use crate::constraints::{ConstraintSet, ConstraintSpec, Constraints};
use crate::context::{ContextSnapshot, ValidationContext};
use crate::error::{ErrorDetail, ValidationErrors, ValidationFault};
use crate::format;
use crate::options::{AsyncValidateOptions, OutputFormat, ValidateOptions};
use crate::registry::{RegisteredValidator, Registry};
use crate::result::{Report, ValidationResult};
use crate::traits::{AsyncValidator, Validator, Verdict};
use crate::util;
use futures_util::future::join_all;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

/// Validates attribute mappings against constraint mappings.
///
/// Cloning is cheap: clones share one [`Registry`].
///
/// ## Example
///
/// ```rust,ignore
/// use conform::prelude::*;
///
/// let engine = Engine::default();
/// let constraints: Constraints = serde_json::from_value(json!({
///     "email": { "presence": true, "email": true }
/// }))?;
/// let attributes = json!({ "email": "nope" });
///
/// let result = engine.validate(attributes.as_object().unwrap(), &constraints, &ValidateOptions::default())?;
/// assert_eq!(result.grouped()["email"], vec!["Email is not a valid email"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: Arc<Registry>,
}

impl Engine {
    /// Create an engine over a registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Create a builder starting from the built-in registry.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The registry this engine evaluates with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn lookup(&self, name: &str, attribute: &str) -> Result<&RegisteredValidator, ValidationFault> {
        self.registry
            .lookup(name)
            .ok_or_else(|| ValidationFault::UnknownValidator {
                name: name.to_string(),
                attribute: attribute.to_string(),
            })
    }

    /// Apply one named constraint to one value.
    ///
    /// Returns the raw messages (parameters interpolated, no attribute
    /// prefix). The name must be registered even when the spec is disabled.
    /// Disabled specs and absent values yield none, except for validators
    /// that opt in to absent values.
    pub fn evaluate_constraint(
        &self,
        name: &str,
        spec: &ConstraintSpec,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Vec<String>, ValidationFault> {
        let validator = self.lookup(name, ctx.attribute())?;
        if !spec.is_enabled() || (value.is_null() && !validator.validates_absent()) {
            return Ok(Vec::new());
        }

        tracing::trace!(attribute = ctx.attribute(), validator = name, "Evaluating constraint");

        let verdict = match validator {
            RegisteredValidator::Sync(v) => v.validate(value, spec.as_value(), ctx),
            RegisteredValidator::Async(_) => Err(ValidationFault::AsyncInSyncPath {
                validator: name.to_string(),
            }),
        };
        settle(name, ctx.attribute(), verdict)
    }

    async fn evaluate_constraint_async(
        &self,
        name: &str,
        spec: &ConstraintSpec,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Vec<String>, ValidationFault> {
        let validator = self.lookup(name, ctx.attribute())?;
        if !spec.is_enabled() || (value.is_null() && !validator.validates_absent()) {
            return Ok(Vec::new());
        }

        tracing::trace!(attribute = ctx.attribute(), validator = name, "Evaluating constraint");

        let verdict = match validator {
            RegisteredValidator::Sync(v) => v.validate(value, spec.as_value(), ctx),
            RegisteredValidator::Async(v) => v.validate_async(value, spec.as_value(), ctx).await,
        };
        settle(name, ctx.attribute(), verdict)
    }

    /// Apply every constraint of a set to one attribute, in declaration
    /// order.
    pub fn evaluate_attribute(
        &self,
        attribute: &str,
        set: &ConstraintSet,
        attributes: &Map<String, Value>,
        options: &ValidateOptions,
    ) -> Result<Vec<ErrorDetail>, ValidationFault> {
        let value = util::get_deep_value(attributes, attribute).unwrap_or(&Value::Null);
        let ctx = ValidationContext::new(attribute, attributes, options, &self.registry);

        let mut details = Vec::new();
        for (name, spec) in set.iter() {
            let messages = self.evaluate_constraint(name, spec, value, &ctx)?;
            let failed = !messages.is_empty();
            details.extend(
                messages
                    .into_iter()
                    .map(|message| detail(attribute, value, name, spec, message)),
            );
            if failed && options.stop_at_first_error {
                break;
            }
        }
        Ok(details)
    }

    /// Validate attributes against constraints.
    ///
    /// Only attributes named by the constraints are examined. Violations are
    /// reported in the result; `Err` means the validation itself could not
    /// run.
    pub fn validate(
        &self,
        attributes: &Map<String, Value>,
        constraints: &Constraints,
        options: &ValidateOptions,
    ) -> Result<ValidationResult, ValidationFault> {
        self.check_format(&options.format)?;
        tracing::debug!(
            attributes = constraints.len(),
            constraints = constraints.constraint_count(),
            "Validating"
        );

        let mut errors = ValidationErrors::new();
        for (attribute, set) in constraints.iter() {
            errors.add_all(self.evaluate_attribute(attribute, set, attributes, options)?);
        }
        self.finish(errors, options, None)
    }

    /// Validate attributes against constraints, running every constraint
    /// evaluation concurrently.
    ///
    /// All evaluations are joined before anything is reported. If any of
    /// them faulted, the first fault in declaration order is returned and no
    /// partial result is produced.
    pub async fn validate_async(
        &self,
        attributes: &Map<String, Value>,
        constraints: &Constraints,
        options: &AsyncValidateOptions,
    ) -> Result<ValidationResult, ValidationFault> {
        let validate_options = &options.validate;
        self.check_format(&validate_options.format)?;

        let cleaned;
        let attributes = if options.clean_attributes {
            cleaned = util::clean_attributes(attributes, constraints);
            &cleaned
        } else {
            attributes
        };

        tracing::debug!(
            attributes = constraints.len(),
            constraints = constraints.constraint_count(),
            "Validating asynchronously"
        );

        let evaluations = constraints.iter().flat_map(|(attribute, set)| {
            set.iter().map(move |(name, spec)| {
                self.evaluate_detached(attribute, name, spec, attributes, validate_options)
            })
        });
        let outcomes = join_all(evaluations).await;

        let mut errors = ValidationErrors::new();
        let mut stopped: HashSet<String> = HashSet::new();
        for outcome in outcomes {
            let details = outcome?;
            let Some(first) = details.first() else {
                continue;
            };
            if validate_options.stop_at_first_error && !stopped.insert(first.attribute.clone()) {
                continue;
            }
            errors.add_all(details);
        }

        let errors = match options.error_wrapper() {
            Some(wrap) => wrap(errors, attributes, constraints),
            None => errors,
        };
        let returned = options.clean_attributes.then(|| attributes.clone());
        self.finish(errors, validate_options, returned)
    }

    async fn evaluate_detached(
        &self,
        attribute: &str,
        name: &str,
        spec: &ConstraintSpec,
        attributes: &Map<String, Value>,
        options: &ValidateOptions,
    ) -> Result<Vec<ErrorDetail>, ValidationFault> {
        let value = util::get_deep_value(attributes, attribute).unwrap_or(&Value::Null);
        let ctx = ValidationContext::new(attribute, attributes, options, &self.registry);
        let messages = self.evaluate_constraint_async(name, spec, value, &ctx).await?;
        Ok(messages
            .into_iter()
            .map(|message| detail(attribute, value, name, spec, message))
            .collect())
    }

    /// Validate a lone value against a constraint set.
    ///
    /// Messages come without an attribute prefix. Returns `None` when the
    /// value is valid.
    pub fn single(
        &self,
        value: &Value,
        set: &ConstraintSet,
        options: &ValidateOptions,
    ) -> Result<Option<Vec<String>>, ValidationFault> {
        let mut attributes = Map::new();
        attributes.insert("single".to_string(), value.clone());
        let constraints = Constraints::new().attribute("single", set.clone());
        let options = options
            .clone()
            .format(OutputFormat::Flat)
            .full_messages(false);

        let result = self.validate(&attributes, &constraints, &options)?;
        Ok(match result.into_report() {
            Some(Report::Flat(messages)) => Some(messages),
            _ => None,
        })
    }

    fn check_format(&self, format: &OutputFormat) -> Result<(), ValidationFault> {
        match format {
            OutputFormat::Custom(name) if self.registry.formatter(name).is_none() => {
                Err(ValidationFault::UnknownFormatter(name.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Turn raw errors into full messages and the requested report.
    fn finish(
        &self,
        errors: ValidationErrors,
        options: &ValidateOptions,
        attributes: Option<Map<String, Value>>,
    ) -> Result<ValidationResult, ValidationFault> {
        let errors = errors.map_messages(|entry| {
            format::full_message(&entry.error, &entry.attribute, &entry.value, options)
        });

        let report = if errors.is_empty() {
            None
        } else {
            Some(match &options.format {
                OutputFormat::Grouped => Report::Grouped(errors.grouped()),
                OutputFormat::Flat => Report::Flat(errors.flat()),
                OutputFormat::Detailed => Report::Detailed(errors.details().to_vec()),
                OutputFormat::Constraint => Report::Constraint(errors.constraint_names()),
                OutputFormat::Custom(name) => {
                    let formatter = self
                        .registry
                        .formatter(name)
                        .ok_or_else(|| ValidationFault::UnknownFormatter(name.clone()))?;
                    Report::Custom(formatter(&errors))
                }
            })
        };

        Ok(ValidationResult::new(errors, report, attributes))
    }
}

fn settle(
    name: &str,
    attribute: &str,
    verdict: Result<Verdict, ValidationFault>,
) -> Result<Vec<String>, ValidationFault> {
    verdict.map(Verdict::into_messages).map_err(|fault| {
        tracing::warn!(attribute, validator = name, error = %fault, "Validator faulted");
        fault
    })
}

fn detail(attribute: &str, value: &Value, name: &str, spec: &ConstraintSpec, message: String) -> ErrorDetail {
    ErrorDetail {
        attribute: attribute.to_string(),
        value: value.clone(),
        validator: name.to_string(),
        options: spec.as_value().clone(),
        error: message,
    }
}

/// Builder for an [`Engine`] with custom registrations.
///
/// ```rust,ignore
/// let engine = Engine::builder()
///     .validator_fn("even", |value, _, _| Ok(Verdict::from(
///         (value.as_i64().unwrap_or(1) % 2 != 0).then(|| "must be even".to_string()),
///     )))
///     .comparator("trimmed", |a, b| a.as_str().map(str::trim) == b.as_str().map(str::trim))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct EngineBuilder {
    registry: Registry,
}

impl EngineBuilder {
    /// Create a builder over the built-in registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from another registry.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a validator.
    pub fn validator(mut self, name: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.registry.register(name, validator);
        self
    }

    /// Register a closure as a validator.
    pub fn validator_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &Value, &ValidationContext<'_>) -> Result<Verdict, ValidationFault>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_fn(name, f);
        self
    }

    /// Register an async validator.
    pub fn async_validator(
        mut self,
        name: impl Into<String>,
        validator: impl AsyncValidator + 'static,
    ) -> Self {
        self.registry.register_async(name, validator);
        self
    }

    /// Register an async closure as a validator.
    pub fn async_validator_fn<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, Value, ContextSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Verdict, ValidationFault>> + Send + 'static,
    {
        self.registry.register_async_fn(name, f);
        self
    }

    /// Register an output formatter.
    pub fn formatter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ValidationErrors) -> Value + Send + Sync + 'static,
    {
        self.registry.register_formatter(name, f);
        self
    }

    /// Register an equality comparator.
    pub fn comparator<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.registry.register_comparator(name, f);
        self
    }

    /// Register a length tokenizer.
    pub fn tokenizer<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Option<usize> + Send + Sync + 'static,
    {
        self.registry.register_tokenizer(name, f);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Engine {
        Engine::new(self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn unknown_validator_is_a_fault() {
        let engine = Engine::default();
        let constraints = Constraints::new().attribute("name", ConstraintSet::new().with("uniqueness", true));
        let err = engine
            .validate(&attrs(json!({ "name": "x" })), &constraints, &ValidateOptions::default())
            .unwrap_err();
        assert!(matches!(err, ValidationFault::UnknownValidator { name, attribute } if name == "uniqueness" && attribute == "name"));
    }

    #[test]
    fn disabled_constraints_are_skipped() {
        let engine = Engine::default();
        let constraints = Constraints::new().attribute(
            "name",
            ConstraintSet::new()
                .with("presence", false)
                .with("length", Value::Null),
        );
        let result = engine
            .validate(&Map::new(), &constraints, &ValidateOptions::default())
            .unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn disabled_unknown_constraints_still_fault() {
        let engine = Engine::default();
        for disabled in [Value::Null, Value::Bool(false)] {
            let constraints = Constraints::new().attribute(
                "name",
                ConstraintSet::new()
                    .with("presence", false)
                    .with("uniqueness", disabled),
            );
            let err = engine
                .validate(&Map::new(), &constraints, &ValidateOptions::default())
                .unwrap_err();
            assert!(matches!(
                err,
                ValidationFault::UnknownValidator { ref name, ref attribute }
                    if name == "uniqueness" && attribute == "name"
            ));
        }
    }

    #[test]
    fn absent_values_reach_only_opted_in_validators() {
        let engine = Engine::default();
        let constraints = Constraints::new().attribute(
            "age",
            ConstraintSet::new()
                .with("numericality", true)
                .with("length", json!({ "minimum": 1 })),
        );
        let result = engine
            .validate(&Map::new(), &constraints, &ValidateOptions::default())
            .unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn stop_at_first_error() {
        let engine = Engine::default();
        let constraints = Constraints::new().attribute(
            "code",
            ConstraintSet::new()
                .with("length", json!({ "is": 4 }))
                .with("format", "[0-9]+"),
        );
        let attributes = attrs(json!({ "code": "abc" }));

        let all = engine
            .validate(&attributes, &constraints, &ValidateOptions::default())
            .unwrap();
        assert_eq!(all.errors().len(), 2);

        let first = engine
            .validate(
                &attributes,
                &constraints,
                &ValidateOptions::default().stop_at_first_error(true),
            )
            .unwrap();
        assert_eq!(
            first.errors().flat(),
            vec!["Code is the wrong length (should be 4 characters)"]
        );
    }

    #[test]
    fn async_validator_on_sync_path() {
        let engine = Engine::builder()
            .async_validator_fn("remote", |_, _, _| async { Ok::<_, ValidationFault>(Verdict::Valid) })
            .build();
        let constraints = Constraints::new().attribute("name", ConstraintSet::new().with("remote", true));
        let err = engine
            .validate(&attrs(json!({ "name": "x" })), &constraints, &ValidateOptions::default())
            .unwrap_err();
        assert!(matches!(err, ValidationFault::AsyncInSyncPath { validator } if validator == "remote"));
    }

    #[test]
    fn unknown_formatter_is_checked_up_front() {
        let engine = Engine::default();
        let err = engine
            .validate(
                &Map::new(),
                &Constraints::new(),
                &ValidateOptions::default().format("summary"),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationFault::UnknownFormatter(name) if name == "summary"));
    }

    #[test]
    fn custom_formatter() {
        let engine = Engine::builder()
            .formatter("count", |errors| json!(errors.len()))
            .build();
        let constraints = Constraints::new()
            .attribute("a", ConstraintSet::new().with("presence", true))
            .attribute("b", ConstraintSet::new().with("presence", true));
        let result = engine
            .validate(&Map::new(), &constraints, &ValidateOptions::default().format("count"))
            .unwrap();
        assert_eq!(result.report(), Some(&Report::Custom(json!(2))));
    }

    #[test]
    fn single_value() {
        let engine = Engine::default();
        let set = ConstraintSet::new()
            .with("presence", true)
            .with("length", json!({ "minimum": 3 }));

        assert_eq!(engine.single(&json!("abc"), &set, &ValidateOptions::default()).unwrap(), None);
        assert_eq!(
            engine.single(&json!("ab"), &set, &ValidateOptions::default()).unwrap(),
            Some(vec!["is too short (minimum is 3 characters)".to_string()])
        );
        assert_eq!(
            engine.single(&Value::Null, &set, &ValidateOptions::default()).unwrap(),
            Some(vec!["can't be blank".to_string()])
        );
    }
}
