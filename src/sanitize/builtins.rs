//! Builtin sanitizers.
//!
//! The string, boolean and integer sanitizers double as the per-type
//! fallbacks applied to fields that declare no sanitizer of their own.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::document::SettingValue;
use crate::sanitize::Sanitizer;

static SCRIPT_STYLE_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style pattern is valid")
});
static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("whitespace pattern is valid"));
static OCTETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("octet pattern is valid"));

pub fn email() -> Sanitizer {
    Sanitizer::new("sanitize_email", sanitize_email)
}

pub fn text_field() -> Sanitizer {
    Sanitizer::new("sanitize_text_field", sanitize_text_field)
}

pub fn key() -> Sanitizer {
    Sanitizer::new("sanitize_key", sanitize_key)
}

pub fn absint() -> Sanitizer {
    Sanitizer::new("absint", |raw: &Value| Some(SettingValue::Integer(to_absint(raw))))
}

pub fn boolean() -> Sanitizer {
    Sanitizer::new("rest_sanitize_boolean", |raw: &Value| {
        Some(SettingValue::Boolean(to_bool(raw)))
    })
}

/// Clean up an email address; `None` when nothing usable remains.
///
/// Disallowed characters are stripped from the local part and from each
/// domain label rather than rejected outright.
pub fn sanitize_email(raw: &Value) -> Option<SettingValue> {
    let email = raw.as_str()?.trim();

    if email.len() < 6 {
        return None;
    }
    // The '@' may not be the first character.
    let at = email.get(1..)?.find('@')? + 1;
    let (local, domain) = (&email[..at], &email[at + 1..]);

    let local: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(*c))
        .collect();
    if local.is_empty() {
        return None;
    }

    let mut domain = domain.to_string();
    while domain.contains("..") {
        domain = domain.replace("..", "");
    }
    let domain = domain.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '\0');

    let labels: Vec<String> = domain
        .split('.')
        .map(|label| {
            label
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
                .trim_matches('-')
                .to_string()
        })
        .filter(|label| !label.is_empty())
        .collect();
    if labels.len() < 2 {
        return None;
    }

    // Stripping may have shortened the address below the minimum.
    let cleaned = format!("{}@{}", local, labels.join("."));
    if cleaned.len() < 6 {
        return None;
    }
    Some(SettingValue::String(cleaned))
}

/// Reduce input to a single line of plain text.
///
/// Arrays and objects have no text form and are rejected.
pub fn sanitize_text_field(raw: &Value) -> Option<SettingValue> {
    let text = scalar_to_string(raw)?;

    let text = SCRIPT_STYLE_BLOCKS.replace_all(&text, "");
    let text = TAGS.replace_all(&text, "");
    let text = text.replace('<', "&lt;");
    let mut text = WHITESPACE.replace_all(&text, " ").into_owned();

    while OCTETS.is_match(&text) {
        text = OCTETS.replace_all(&text, "").into_owned();
    }
    let text = WHITESPACE.replace_all(&text, " ");

    Some(SettingValue::String(text.trim().to_string()))
}

/// Lowercase and keep only `[a-z0-9_-]`.
pub fn sanitize_key(raw: &Value) -> Option<SettingValue> {
    let text = scalar_to_string(raw)?;
    let key = text
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect();
    Some(SettingValue::String(key))
}

/// Coerce to a non-negative integer. Negative or non-numeric input gives 0.
pub fn to_absint(raw: &Value) -> u64 {
    match raw {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f > 0.0 {
                    // `as` saturates at u64::MAX
                    f.trunc() as u64
                } else {
                    0
                }
            } else {
                0
            }
        }
        Value::String(s) => parse_leading_int(s),
        Value::Bool(b) => u64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

/// Truthiness: `false`, `0`, `""`, `"0"`, `null`, empty containers and the
/// words "false", "off" and "no" are false; everything else is true.
pub fn to_bool(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty()
                || s == "0"
                || s.eq_ignore_ascii_case("false")
                || s.eq_ignore_ascii_case("off")
                || s.eq_ignore_ascii_case("no"))
        }
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Whether a raw value counts as empty. Declared sanitizers are skipped for
/// empty input.
pub fn is_empty_raw(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn scalar_to_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Leading `[+-]?[0-9]+` of `s`, negative clamped to 0, overflow saturated.
fn parse_leading_int(s: &str) -> u64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}
