//! Message formatting: attribute humanization, placeholder interpolation and
//! full-message assembly.

use crate::options::ValidateOptions;
use serde_json::{Number, Value};

/// Humanize an identifier-style name.
///
/// `"firstName"` becomes `"first name"`, `"address.zip_code"` becomes
/// `"address zip code"`. Backslashes are dropped.
pub fn prettify(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        match c {
            '\\' => {}
            '.' if prev.is_some_and(|p| !p.is_whitespace())
                && next.is_some_and(|n| !n.is_whitespace()) =>
            {
                out.push(' ')
            }
            '_' | '-' => out.push(' '),
            c if c.is_uppercase() && prev.is_some_and(char::is_lowercase) => {
                out.push(' ');
                out.extend(c.to_lowercase());
            }
            c => out.extend(c.to_lowercase()),
        }
    }

    out
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace `%{key}` placeholders with their values.
///
/// Unknown keys stay untouched so a template can be filled in stages, and
/// `%%{key}` is kept verbatim until [`unescape`] runs.
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let escaped = rest[..start].ends_with('%');
        let key = &rest[start + 2..start + len];
        out.push_str(&rest[..start]);

        match params.iter().find(|(k, _)| *k == key) {
            Some((_, value)) if !escaped => out.push_str(value),
            _ => out.push_str(&rest[start..=start + len]),
        }
        rest = &rest[start + len + 1..];
    }

    out.push_str(rest);
    out
}

/// Turn escaped `%%{` sequences into literal `%{`.
pub fn unescape(text: &str) -> String {
    text.replace("%%{", "%{")
}

/// Protect substituted text from later interpolation passes.
///
/// The inverse of [`unescape`]: `unescape(&escape(s)) == s`.
pub fn escape(text: &str) -> String {
    text.replace("%{", "%%{")
}

/// Format a number the way messages show it: integers without a fraction,
/// everything else rounded to two decimals.
pub fn format_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) if (f * 100.0).fract() == 0.0 => f.to_string(),
        Some(f) => format!("{:.2}", f),
        None => number.to_string(),
    }
}

/// Stringify a message parameter (bounds, counts, labels).
pub fn stringify_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Array(items) => items
            .iter()
            .map(stringify_param)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Stringify a validated value for `%{value}`, passing strings through the
/// prettifier.
pub fn stringify_value(value: &Value, prettify: &dyn Fn(&str) -> String) -> String {
    match value {
        Value::String(s) => prettify(s),
        Value::Number(n) => format_number(n),
        Value::Array(items) => items
            .iter()
            .map(|item| stringify_value(item, prettify))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Assemble the final message for one attribute.
///
/// A leading `^` suppresses the attribute prefix; otherwise the capitalized,
/// prettified attribute name is prepended when full messages are on. `\^`
/// yields a literal caret and `%{value}` receives the stringified value.
///
/// Only the template itself is interpolated: text substituted into it (the
/// value, rule parameters, the attribute name) is never expanded again.
pub(crate) fn full_message(
    raw: &str,
    attribute: &str,
    value: &Value,
    options: &ValidateOptions,
) -> String {
    let (body, prefixed) = match raw.strip_prefix('^') {
        Some(rest) => (rest, false),
        None => (raw, options.full_messages),
    };

    let shown = escape(&stringify_value(value, &|s| options.prettify(s)));
    let body = unescape(&interpolate(&body.replace("\\^", "^"), &[("value", shown)]));

    if prefixed {
        format!("{} {}", capitalize(&options.prettify(attribute)), body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prettify_identifiers() {
        assert_eq!(prettify("firstName"), "first name");
        assert_eq!(prettify("zip_code"), "zip code");
        assert_eq!(prettify("billing-address"), "billing address");
        assert_eq!(prettify("address.city"), "address city");
        assert_eq!(prettify("a\\.b"), "a b");
        assert_eq!(prettify("end ."), "end .");
    }

    #[test]
    fn capitalize_first_char() {
        assert_eq!(capitalize("first name"), "First name");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn interpolate_known_and_unknown_keys() {
        let params = [("count", "3".to_string())];
        assert_eq!(
            interpolate("minimum is %{count}, got %{value}", &params),
            "minimum is 3, got %{value}"
        );
        assert_eq!(interpolate("literal %%{count}", &params), "literal %%{count}");
        assert_eq!(unescape("literal %%{count}"), "literal %{count}");
        assert_eq!(interpolate("dangling %{count", &params), "dangling %{count");
    }

    #[test]
    fn numbers_render_compactly() {
        assert_eq!(stringify_param(&json!(18)), "18");
        assert_eq!(stringify_param(&json!(1.5)), "1.5");
        assert_eq!(stringify_param(&json!(3.14159)), "3.14");
        assert_eq!(stringify_param(&json!(2.0)), "2");
    }

    #[test]
    fn values_render_with_prettifier() {
        let shown = stringify_value(&json!(["fooBar", 2]), &prettify);
        assert_eq!(shown, "foo bar, 2");
        assert_eq!(stringify_value(&json!({"a": 1}), &prettify), r#"{"a":1}"#);
    }

    #[test]
    fn full_message_prefix_and_caret() {
        let options = ValidateOptions::default();
        let value = json!("xyz");

        assert_eq!(
            full_message("can't be blank", "firstName", &value, &options),
            "First name can't be blank"
        );
        assert_eq!(
            full_message("^%{value} is restricted", "role", &value, &options),
            "xyz is restricted"
        );
        assert_eq!(
            full_message("must start with \\^", "tag", &value, &options),
            "Tag must start with ^"
        );

        let short = ValidateOptions::default().full_messages(false);
        assert_eq!(
            full_message("can't be blank", "firstName", &value, &short),
            "can't be blank"
        );
    }

    #[test]
    fn substituted_text_is_not_expanded_twice() {
        let options = ValidateOptions::default();

        assert_eq!(
            full_message("is %{value}", "code", &json!("%{value} and %%{x}"), &options),
            "Code is %{value} and %%{x}"
        );
        assert_eq!(
            full_message("is invalid", "odd%{value}", &json!("v"), &options),
            "Odd%{value} is invalid"
        );
        assert_eq!(
            full_message("literal %%{value}, got %{value}", "code", &json!(1), &options),
            "Code literal %{value}, got 1"
        );
    }

    #[test]
    fn escape_inverts_unescape() {
        for text in ["plain", "%{value}", "%%{value}", "100%", "%{a}%%{b}"] {
            assert_eq!(unescape(&escape(text)), text);
        }
    }
}
