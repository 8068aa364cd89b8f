use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use crate::util;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for `date` and `datetime`.
///
/// Bounds accept the same inputs as the validated value: RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` strings, or epoch milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeOptions {
    /// Lower bound, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest: Option<Value>,
    /// Upper bound, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<Value>,
    /// Compare and render dates without their time of day
    #[serde(default)]
    pub date_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_valid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub too_early: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub too_late: Option<String>,
}

/// Checks that a value parses as a date, optionally within bounds.
///
/// Registered twice: `date` always truncates to the day, `datetime` only
/// when `dateOnly` is set.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeValidator {
    date_only: bool,
}

impl DateTimeValidator {
    /// The `date` validator.
    pub fn date() -> Self {
        Self { date_only: true }
    }

    /// The `datetime` validator.
    pub fn datetime() -> Self {
        Self { date_only: false }
    }

    fn name(&self) -> &'static str {
        if self.date_only {
            "date"
        } else {
            "datetime"
        }
    }
}

fn truncate(dt: DateTime<Utc>, date_only: bool) -> DateTime<Utc> {
    if date_only {
        dt.date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(dt)
    } else {
        dt
    }
}

fn render(dt: DateTime<Utc>, date_only: bool) -> String {
    if date_only {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Validator for DateTimeValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let name = self.name();
        let options: DateTimeOptions = super::options_from_spec(name, spec)?;
        let date_only = self.date_only || options.date_only;

        let bound = |bound: &Option<Value>, key: &str| -> Result<Option<DateTime<Utc>>, ValidationFault> {
            match bound {
                None | Some(Value::Null) => Ok(None),
                Some(raw) => util::parse_datetime(raw)
                    .map(|dt| Some(truncate(dt, date_only)))
                    .ok_or_else(|| {
                        ValidationFault::invalid_spec(name, format!("`{key}` is not a date: {raw}"))
                    }),
            }
        };
        let earliest = bound(&options.earliest, "earliest")?;
        let latest = bound(&options.latest, "latest")?;

        let Some(parsed) = util::parse_datetime(value) else {
            let message = super::pick(
                &[&options.not_valid, &options.message],
                "must be a valid date",
            );
            return Ok(RuleError::new(name, message).into());
        };
        let parsed = truncate(parsed, date_only);

        if let Some(earliest) = earliest.filter(|earliest| parsed < *earliest) {
            let message = super::pick(
                &[&options.too_early, &options.message],
                "must be no earlier than %{date}",
            );
            return Ok(RuleError::new(name, message)
                .param("date", render(earliest, date_only))
                .into());
        }

        if let Some(latest) = latest.filter(|latest| parsed > *latest) {
            let message = super::pick(
                &[&options.too_late, &options.message],
                "must be no later than %{date}",
            );
            return Ok(RuleError::new(name, message)
                .param("date", render(latest, date_only))
                .into());
        }

        Ok(Verdict::Valid)
    }
}
