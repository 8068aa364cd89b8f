//! Per-evaluation context handed to validators.

use crate::options::ValidateOptions;
use crate::registry::Registry;
use crate::util;
use serde_json::{Map, Value};

/// Context for one constraint evaluation.
///
/// Gives a validator read access to the attribute being validated, every
/// other attribute (for cross-attribute checks such as equality), the call
/// options and the registry (for named comparators and tokenizers).
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    attribute: &'a str,
    attributes: &'a Map<String, Value>,
    options: &'a ValidateOptions,
    registry: &'a Registry,
}

impl<'a> ValidationContext<'a> {
    /// Create a context.
    pub fn new(
        attribute: &'a str,
        attributes: &'a Map<String, Value>,
        options: &'a ValidateOptions,
        registry: &'a Registry,
    ) -> Self {
        Self {
            attribute,
            attributes,
            options,
            registry,
        }
    }

    /// Name (or dotted path) of the attribute being validated.
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// All attributes of the call.
    pub fn attributes(&self) -> &'a Map<String, Value> {
        self.attributes
    }

    /// Options of the call.
    pub fn options(&self) -> &'a ValidateOptions {
        self.options
    }

    /// The registry the engine evaluates with.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Resolve another attribute by name or dotted path.
    pub fn lookup(&self, keypath: &str) -> Option<&'a Value> {
        util::get_deep_value(self.attributes, keypath)
    }

    /// Humanize text with the call's prettifier.
    pub fn prettify(&self, text: &str) -> String {
        self.options.prettify(text)
    }

    /// An owned copy of the attribute name and attributes, for work that
    /// outlives the borrow.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            attribute: self.attribute.to_string(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Owned view of a [`ValidationContext`], handed to async closure validators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    attribute: String,
    attributes: Map<String, Value>,
}

impl ContextSnapshot {
    /// Name (or dotted path) of the attribute being validated.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// All attributes of the call.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Resolve another attribute by name or dotted path.
    pub fn lookup(&self, keypath: &str) -> Option<&Value> {
        util::get_deep_value(&self.attributes, keypath)
    }
}

impl std::fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("attribute", &self.attribute)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}
