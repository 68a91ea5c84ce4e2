//! Scalar coercion: raw scalar text to a typed JSON value.
//!
//! The rules are total and ordered; every unquoted scalar lands on exactly
//! one of null, bool, integer, float, array, object, or the original
//! string. Quoted scalars bypass everything and stay strings.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Largest integer magnitude representable without precision loss in a
/// 64-bit double (2^53 - 1). Integer literals beyond it are left as strings
/// rather than silently rounded.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").unwrap());
static SCI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.?\d*[eE][+-]?\d+$").unwrap());

/// Coerce one scalar. `quoted` short-circuits to a string.
pub fn coerce_scalar(raw: &str, quoted: bool) -> Value {
    if quoted {
        return Value::String(raw.to_string());
    }
    let trimmed = raw.trim();
    match trimmed {
        // An empty scalar is just an empty string, not null.
        "" => return Value::String(raw.to_string()),
        "null" | "Null" | "NULL" | "~" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if INT_RE.is_match(trimmed) {
        if let Ok(n) = trimmed.parse::<i64>() {
            if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n) {
                return Value::Number(n.into());
            }
        }
        // An integer literal outside the safe range matches no later rule
        // and falls through to the string fallback.
    } else if FLOAT_RE.is_match(trimmed) || SCI_RE.is_match(trimmed) {
        if let Ok(f) = trimmed.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(f) {
                return Value::Number(number);
            }
        }
    } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            if parsed.is_array() {
                return parsed;
            }
        }
    } else if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            if parsed.is_object() {
                return parsed;
            }
        }
    }
    Value::String(raw.to_string())
}
