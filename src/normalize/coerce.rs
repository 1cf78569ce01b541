//! Field coercion helpers for loosely typed export values.
//!
//! Exports come from JavaScript pages, so the same field may hold a string,
//! a number, or nothing at all. These helpers follow JavaScript truthiness
//! when choosing between alternative keys, and never fail: a value that
//! cannot be converted either recovers to a default or becomes `None`.

use serde_json::Value;

/// Quantity used when the export names none or names an unusable one.
pub const DEFAULT_QTY: u32 = 1;

/// Result of converting a raw quantity field.
///
/// Recovery is an ordinary outcome here, not an error: callers take
/// [`value()`](QtyCoercion::value) and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QtyCoercion {
    /// The field held a usable positive integer.
    Parsed(u32),
    /// Neither `count` nor `quantity` was present (or truthy).
    Defaulted,
    /// A value was present but could not be read as a positive integer.
    Recovered,
}

impl QtyCoercion {
    pub fn value(self) -> u32 {
        match self {
            QtyCoercion::Parsed(q) => q,
            QtyCoercion::Defaulted | QtyCoercion::Recovered => DEFAULT_QTY,
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Return the first truthy value among `keys` of `obj`, in key order.
pub fn first_truthy<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| is_truthy(v))
}

/// Render a scalar as a string. Null, arrays and objects yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Like [`scalar_to_string`] but skips falsy values (`""`, `0`, `false`).
pub fn truthy_string(value: &Value) -> Option<String> {
    if is_truthy(value) {
        scalar_to_string(value)
    } else {
        None
    }
}

/// Convert a raw quantity field into a positive count.
///
/// Integers are taken as-is, floats are truncated toward zero, strings are
/// trimmed and parsed as integers, and `true` counts as one. Anything that
/// lands outside `1..=u32::MAX` is recovered to [`DEFAULT_QTY`].
pub fn coerce_qty(raw: Option<&Value>) -> QtyCoercion {
    let Some(value) = raw else {
        return QtyCoercion::Defaulted;
    };

    let parsed: Option<i64> = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(true) => Some(1),
        _ => None,
    };

    match parsed.and_then(|q| u32::try_from(q).ok()) {
        Some(q) if q >= 1 => QtyCoercion::Parsed(q),
        _ => QtyCoercion::Recovered,
    }
}
