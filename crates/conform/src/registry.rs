//! Registry of validators, output formatters, comparators and tokenizers.

use crate::context::{ContextSnapshot, ValidationContext};
use crate::error::{ValidationErrors, ValidationFault};
use crate::rules;
use crate::traits::{AsyncFnValidator, AsyncValidator, FnValidator, Validator, Verdict};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Equality comparator: `(value, other) -> equal`.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Length tokenizer: returns the token count, or `None` when the value has
/// no length.
pub type Tokenizer = Arc<dyn Fn(&Value) -> Option<usize> + Send + Sync>;

/// Output formatter for a custom report shape.
pub type Formatter = Arc<dyn Fn(&ValidationErrors) -> Value + Send + Sync>;

/// A validator as stored in the registry.
#[derive(Clone)]
pub enum RegisteredValidator {
    /// Completes without suspending
    Sync(Arc<dyn Validator>),
    /// May suspend; only usable from the async path
    Async(Arc<dyn AsyncValidator>),
}

impl RegisteredValidator {
    /// Whether null or missing values reach the validator.
    pub fn validates_absent(&self) -> bool {
        match self {
            RegisteredValidator::Sync(v) => v.validates_absent(),
            RegisteredValidator::Async(v) => v.validates_absent(),
        }
    }

    /// Check if the validator is asynchronous.
    pub fn is_async(&self) -> bool {
        matches!(self, RegisteredValidator::Async(_))
    }
}

/// Name-keyed tables the engine evaluates with.
///
/// `Registry::default()` carries every built-in validator (`presence`,
/// `email`, `date`, `datetime`, `equality`, `exclusion`, `inclusion`,
/// `format`, `length`, `numericality`, `url`), the `strict` and
/// `case_insensitive` comparators and the `chars`, `graphemes`, `words` and
/// `bytes` tokenizers. Registration takes `&mut self`, so it happens before
/// the registry is handed to an [`Engine`](crate::Engine).
///
/// ## Example
///
/// ```rust,ignore
/// use conform::prelude::*;
///
/// let mut registry = Registry::default();
/// registry.register_fn("even", |value, _spec, _ctx| {
///     Ok(match value.as_i64() {
///         Some(n) if n % 2 == 0 => Verdict::Valid,
///         _ => Verdict::invalid("must be even"),
///     })
/// });
/// let engine = Engine::new(registry);
/// ```
#[derive(Clone)]
pub struct Registry {
    validators: HashMap<String, RegisteredValidator>,
    formatters: HashMap<String, Formatter>,
    comparators: HashMap<String, Comparator>,
    tokenizers: HashMap<String, Tokenizer>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        rules::register_builtins(&mut registry);

        registry
            .register_comparator("strict", |a, b| a == b)
            .register_comparator("case_insensitive", |a, b| match (a, b) {
                (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
                _ => a == b,
            });

        registry
            .register_tokenizer("chars", |value| match value {
                Value::String(s) => Some(s.chars().count()),
                Value::Array(items) => Some(items.len()),
                _ => None,
            })
            .register_tokenizer("graphemes", |value| {
                value.as_str().map(|s| s.graphemes(true).count())
            })
            .register_tokenizer("words", |value| {
                value.as_str().map(|s| s.split_whitespace().count())
            })
            .register_tokenizer("bytes", |value| value.as_str().map(str::len));

        registry
    }
}

impl Registry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
            formatters: HashMap::new(),
            comparators: HashMap::new(),
            tokenizers: HashMap::new(),
        }
    }

    /// Register a validator, replacing any previous one with that name.
    pub fn register(&mut self, name: impl Into<String>, validator: impl Validator + 'static) -> &mut Self {
        self.validators
            .insert(name.into(), RegisteredValidator::Sync(Arc::new(validator)));
        self
    }

    /// Register a closure as a validator.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Value, &Value, &ValidationContext<'_>) -> Result<Verdict, ValidationFault>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, FnValidator(f))
    }

    /// Register an async validator.
    pub fn register_async(
        &mut self,
        name: impl Into<String>,
        validator: impl AsyncValidator + 'static,
    ) -> &mut Self {
        self.validators
            .insert(name.into(), RegisteredValidator::Async(Arc::new(validator)));
        self
    }

    /// Register an async closure over the owned value, spec and context.
    pub fn register_async_fn<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Value, Value, ContextSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Verdict, ValidationFault>> + Send + 'static,
    {
        self.register_async(name, AsyncFnValidator::new(f))
    }

    /// Remove a validator.
    pub fn unregister(&mut self, name: &str) -> Option<RegisteredValidator> {
        self.validators.remove(name)
    }

    /// Register an output formatter, usable as `OutputFormat::Custom(name)`.
    pub fn register_formatter<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&ValidationErrors) -> Value + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Arc::new(f));
        self
    }

    /// Register an equality comparator.
    pub fn register_comparator<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.comparators.insert(name.into(), Arc::new(f));
        self
    }

    /// Register a length tokenizer.
    pub fn register_tokenizer<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Value) -> Option<usize> + Send + Sync + 'static,
    {
        self.tokenizers.insert(name.into(), Arc::new(f));
        self
    }

    /// Get a validator by name.
    pub fn lookup(&self, name: &str) -> Option<&RegisteredValidator> {
        self.validators.get(name)
    }

    /// Get a formatter by name.
    pub fn formatter(&self, name: &str) -> Option<&Formatter> {
        self.formatters.get(name)
    }

    /// Get a comparator by name.
    pub fn comparator(&self, name: &str) -> Option<&Comparator> {
        self.comparators.get(name)
    }

    /// Get a tokenizer by name.
    pub fn tokenizer(&self, name: &str) -> Option<&Tokenizer> {
        self.tokenizers.get(name)
    }

    /// Registered validator names, sorted.
    pub fn validator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("validators", &self.validator_names())
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("comparators", &self.comparators.keys().collect::<Vec<_>>())
            .field("tokenizers", &self.tokenizers.keys().collect::<Vec<_>>())
            .finish()
    }
}
