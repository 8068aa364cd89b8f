use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Options for `format`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatOptions {
    /// Regular expression the whole value must match
    pub pattern: String,
    /// JavaScript-style flags: `i`, `m` and `s` apply; `g`, `y` and `u` are
    /// accepted and ignored
    #[serde(default)]
    pub flags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormatOptions {
    fn from_spec(spec: &Value) -> Result<Self, ValidationFault> {
        match spec {
            Value::String(pattern) => Ok(Self {
                pattern: pattern.clone(),
                flags: String::new(),
                message: None,
            }),
            Value::Object(_) => super::parse_options("format", spec),
            other => Err(ValidationFault::invalid_spec(
                "format",
                format!("expected a pattern or options object, got {other}"),
            )),
        }
    }

    /// The anchored source handed to the regex compiler.
    fn source(&self) -> Result<String, ValidationFault> {
        let mut inline = String::new();
        for flag in self.flags.chars() {
            match flag {
                'i' | 'm' | 's' => {
                    if !inline.contains(flag) {
                        inline.push(flag);
                    }
                }
                'g' | 'y' | 'u' => {}
                other => {
                    return Err(ValidationFault::invalid_spec(
                        "format",
                        format!("unsupported flag '{other}'"),
                    ))
                }
            }
        }

        let prefix = if inline.is_empty() {
            String::new()
        } else {
            format!("(?{inline})")
        };
        Ok(format!("{prefix}\\A(?:{})\\z", self.pattern))
    }
}

/// Checks that a string matches a regular expression in full.
///
/// Compiled patterns are cached by their anchored source.
#[derive(Debug, Default)]
pub struct FormatValidator {
    cache: RwLock<HashMap<String, Regex>>,
}

impl FormatValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, options: &FormatOptions) -> Result<Regex, ValidationFault> {
        let source = options.source()?;

        {
            let cache = self
                .cache
                .read()
                .map_err(|e| ValidationFault::execution("format", format!("Failed to acquire lock: {}", e)))?;
            if let Some(regex) = cache.get(&source) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(&source).map_err(|source| ValidationFault::InvalidPattern {
            pattern: options.pattern.clone(),
            source,
        })?;

        self.cache
            .write()
            .map_err(|e| ValidationFault::execution("format", format!("Failed to acquire lock: {}", e)))?
            .insert(source, regex.clone());

        Ok(regex)
    }
}

impl Validator for FormatValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options = FormatOptions::from_spec(spec)?;
        let regex = self.compile(&options)?;

        let matched = value.as_str().is_some_and(|s| regex.is_match(s));
        if matched {
            Ok(Verdict::Valid)
        } else {
            let message = super::pick(&[&options.message], "is invalid");
            Ok(RuleError::new("format", message)
                .param("pattern", &options.pattern)
                .into())
        }
    }
}
