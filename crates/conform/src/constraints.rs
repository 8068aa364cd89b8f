//! Constraint declarations.
//!
//! A [`Constraints`] mapping names attributes (or dotted paths into nested
//! attributes) and gives each a [`ConstraintSet`]: named constraints in
//! declaration order. Each constraint carries a [`ConstraintSpec`], the
//! boundary form of its options: `true`, a shorthand scalar or list, or an
//! options object. Validators normalize the spec into their typed options.
//!
//! ```rust,ignore
//! let constraints: Constraints = serde_json::from_value(json!({
//!     "username": { "presence": true, "length": { "minimum": 3 } },
//!     "role": { "inclusion": ["admin", "member"] }
//! }))?;
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options of one constraint, as declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSpec(Value);

impl ConstraintSpec {
    /// Wrap a raw spec.
    pub fn new(spec: impl Into<Value>) -> Self {
        Self(spec.into())
    }

    /// The raw spec.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// `false` and `null` switch a constraint off.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.0, Value::Null | Value::Bool(false))
    }
}

impl From<Value> for ConstraintSpec {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<bool> for ConstraintSpec {
    fn from(enabled: bool) -> Self {
        Self(Value::Bool(enabled))
    }
}

impl From<&str> for ConstraintSpec {
    fn from(shorthand: &str) -> Self {
        Self(Value::String(shorthand.to_string()))
    }
}

/// All constraints declared for one attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet(IndexMap<String, ConstraintSpec>);

impl ConstraintSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, keeping declaration order.
    pub fn with(mut self, name: impl Into<String>, spec: impl Into<ConstraintSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    /// Add or replace a constraint.
    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<ConstraintSpec>) {
        self.0.insert(name.into(), spec.into());
    }

    /// Get a constraint by name.
    pub fn get(&self, name: &str) -> Option<&ConstraintSpec> {
        self.0.get(name)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstraintSpec)> {
        self.0.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of declared constraints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, S: Into<ConstraintSpec>> FromIterator<(K, S)> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, spec)| (name.into(), spec.into()))
                .collect(),
        )
    }
}

/// Attribute name (or dotted path) to its constraint set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(IndexMap<String, ConstraintSet>);

impl Constraints {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare constraints for an attribute.
    pub fn attribute(mut self, name: impl Into<String>, set: ConstraintSet) -> Self {
        self.insert(name, set);
        self
    }

    /// Add or replace an attribute's constraints.
    pub fn insert(&mut self, name: impl Into<String>, set: ConstraintSet) {
        self.0.insert(name.into(), set);
    }

    /// Get an attribute's constraints.
    pub fn get(&self, name: &str) -> Option<&ConstraintSet> {
        self.0.get(name)
    }

    /// Whether the attribute is constrained.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstraintSet)> {
        self.0.iter().map(|(name, set)| (name.as_str(), set))
    }

    /// Constrained attribute names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of constrained attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is constrained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of declared constraints.
    pub fn constraint_count(&self) -> usize {
        self.0.values().map(ConstraintSet::len).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, ConstraintSet)> for Constraints {
    fn from_iter<I: IntoIterator<Item = (K, ConstraintSet)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, set)| (name.into(), set))
                .collect(),
        )
    }
}
