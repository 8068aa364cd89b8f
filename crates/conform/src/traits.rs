//! Validator traits.

use crate::context::{ContextSnapshot, ValidationContext};
use crate::error::{RuleError, ValidationFault};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::future::Future;

/// What a validator reports for one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Verdict {
    /// The value satisfies the constraint
    #[default]
    Valid,
    /// The value violates the constraint
    Invalid(Vec<String>),
}

impl Verdict {
    /// A single-message failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Verdict::Invalid(vec![message.into()])
    }

    /// Check if the value passed.
    pub fn is_valid(&self) -> bool {
        match self {
            Verdict::Valid => true,
            Verdict::Invalid(messages) => messages.is_empty(),
        }
    }

    /// The messages, empty when valid.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Verdict::Valid => Vec::new(),
            Verdict::Invalid(messages) => messages,
        }
    }
}

impl From<Option<String>> for Verdict {
    fn from(message: Option<String>) -> Self {
        match message {
            Some(message) => Verdict::invalid(message),
            None => Verdict::Valid,
        }
    }
}

impl From<RuleError> for Verdict {
    fn from(error: RuleError) -> Self {
        Verdict::invalid(error.interpolate_message())
    }
}

impl From<Result<(), RuleError>> for Verdict {
    fn from(result: Result<(), RuleError>) -> Self {
        match result {
            Ok(()) => Verdict::Valid,
            Err(error) => error.into(),
        }
    }
}

/// A synchronous validator registered under a constraint name.
///
/// ## Example
///
/// ```rust,ignore
/// use conform::prelude::*;
///
/// struct Even;
///
/// impl Validator for Even {
///     fn validate(
///         &self,
///         value: &Value,
///         _spec: &Value,
///         _ctx: &ValidationContext<'_>,
///     ) -> Result<Verdict, ValidationFault> {
///         match value.as_i64() {
///             Some(n) if n % 2 == 0 => Ok(Verdict::Valid),
///             _ => Ok(Verdict::invalid("must be even")),
///         }
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Validate the value against the constraint spec.
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault>;

    /// Whether null or missing values reach this validator.
    fn validates_absent(&self) -> bool {
        false
    }
}

/// A validator whose evaluation may suspend, e.g. a remote uniqueness check.
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    /// Validate the value asynchronously.
    async fn validate_async(
        &self,
        value: &Value,
        spec: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault>;

    /// Whether null or missing values reach this validator.
    fn validates_absent(&self) -> bool {
        false
    }
}

/// Adapter turning a closure into a [`Validator`].
pub struct FnValidator<F>(pub F);

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value, &Value, &ValidationContext<'_>) -> Result<Verdict, ValidationFault>
        + Send
        + Sync,
{
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        (self.0)(value, spec, ctx)
    }
}

type BoxedAsyncFn = Box<
    dyn Fn(Value, Value, ContextSnapshot) -> BoxFuture<'static, Result<Verdict, ValidationFault>>
        + Send
        + Sync,
>;

/// Adapter turning an async closure into an [`AsyncValidator`].
///
/// The closure owns its inputs: the value, the spec and a
/// [`ContextSnapshot`] for cross-attribute checks.
pub struct AsyncFnValidator(BoxedAsyncFn);

impl AsyncFnValidator {
    /// Wrap the closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, Value, ContextSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Verdict, ValidationFault>> + Send + 'static,
    {
        Self(Box::new(
            move |value: Value,
                  spec: Value,
                  ctx: ContextSnapshot|
                  -> BoxFuture<'static, Result<Verdict, ValidationFault>> {
                Box::pin(f(value, spec, ctx))
            },
        ))
    }
}

#[async_trait]
impl AsyncValidator for AsyncFnValidator {
    async fn validate_async(
        &self,
        value: &Value,
        spec: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        (self.0)(value.clone(), spec.clone(), ctx.snapshot()).await
    }
}
