//! Supporting utilities: deep lookups, attribute cleaning, membership,
//! shallow merge and type predicates.

use crate::constraints::Constraints;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

pub use crate::format::{capitalize, interpolate, prettify};

/// Split a dotted key path into its keys.
///
/// `\.` escapes a literal dot and `\\` a literal backslash.
pub fn parse_keypath(keypath: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut key = String::new();
    let mut escaped = false;

    for c in keypath.chars() {
        match c {
            _ if escaped => {
                key.push(c);
                escaped = false;
            }
            '\\' => escaped = true,
            '.' => keys.push(std::mem::take(&mut key)),
            _ => key.push(c),
        }
    }
    if escaped {
        key.push('\\');
    }
    keys.push(key);
    keys
}

/// Look up a value by dotted key path.
///
/// ```rust,ignore
/// let attrs = json!({ "address": { "city": "Oslo" } });
/// assert_eq!(get_deep_value(attrs.as_object().unwrap(), "address.city"), Some(&json!("Oslo")));
/// ```
pub fn get_deep_value<'a>(object: &'a Map<String, Value>, keypath: &str) -> Option<&'a Value> {
    if keypath.is_empty() {
        return None;
    }
    let mut keys = parse_keypath(keypath).into_iter();
    let first = keys.next()?;
    let mut current = object.get(&first)?;
    for key in keys {
        current = current.as_object()?.get(&key)?;
    }
    Some(current)
}

fn whitelist_tree(constraints: &Constraints) -> Value {
    let mut root = Value::Object(Map::new());
    for name in constraints.names() {
        let keys = parse_keypath(name);
        let mut node = &mut root;
        for (i, key) in keys.iter().enumerate() {
            let last = i + 1 == keys.len();
            let Some(map) = node.as_object_mut() else {
                break;
            };
            let entry = map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if last {
                *entry = Value::Bool(true);
            }
            node = entry;
        }
    }
    root
}

fn clean_recursive(attributes: &Map<String, Value>, whitelist: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::new();
    for (key, value) in attributes {
        match whitelist.get(key) {
            Some(Value::Bool(true)) => {
                cleaned.insert(key.clone(), value.clone());
            }
            Some(Value::Object(nested)) => {
                let value = match value {
                    Value::Object(inner) => Value::Object(clean_recursive(inner, nested)),
                    other => other.clone(),
                };
                cleaned.insert(key.clone(), value);
            }
            _ => {}
        }
    }
    cleaned
}

/// Keep only the attributes (and nested keys) the constraints name.
pub fn clean_attributes(attributes: &Map<String, Value>, constraints: &Constraints) -> Map<String, Value> {
    match whitelist_tree(constraints) {
        Value::Object(tree) => clean_recursive(attributes, &tree),
        _ => Map::new(),
    }
}

/// Membership test: array element, object key or substring.
pub fn contains(collection: &Value, value: &Value) -> bool {
    match collection {
        Value::Array(items) => items.contains(value),
        Value::Object(map) => match value {
            Value::String(key) => map.contains_key(key),
            Value::Number(n) => map.contains_key(&n.to_string()),
            _ => false,
        },
        Value::String(haystack) => value.as_str().is_some_and(|needle| haystack.contains(needle)),
        _ => false,
    }
}

/// Shallow merge: later maps overwrite earlier keys.
pub fn extend<'a>(
    mut base: Map<String, Value>,
    others: impl IntoIterator<Item = &'a Map<String, Value>>,
) -> Map<String, Value> {
    for other in others {
        for (key, value) in other {
            base.insert(key.clone(), value.clone());
        }
    }
    base
}

/// Parse a date or date-time value.
///
/// Accepts RFC 3339 strings, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD` and epoch milliseconds. Naive values are read as UTC.
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

/// Check if the value is an array.
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Check if the value is a boolean.
pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

/// Check if the value is a string holding a parseable date.
pub fn is_date(value: &Value) -> bool {
    value.is_string() && parse_datetime(value).is_some()
}

/// Anything but null.
pub fn is_defined(value: &Value) -> bool {
    !value.is_null()
}

/// Null, blank strings, empty arrays and empty objects.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Check if the value is a key/value object.
pub fn is_hash(value: &Value) -> bool {
    value.is_object()
}

/// Objects and arrays.
pub fn is_object(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Check if the value is a finite number.
pub fn is_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// Check if the value is a number without a fractional part.
pub fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

/// Check if the value is a string.
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}
