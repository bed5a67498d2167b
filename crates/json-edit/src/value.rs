//! Helpers over [`serde_json::Value`], the document model of this crate.

use std::borrow::Cow;

use json_edit_path::PathComponent;
use serde_json::Value;

/// Human-readable JSON type of a value, with its article, for messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Canonical text of a scalar: string content without quotes, the number
/// as `serde_json` prints it, `true`/`false`. Containers and `null` have none.
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Follow a route from `val`.
pub fn get<'a>(val: &'a Value, route: &[PathComponent]) -> Option<&'a Value> {
    let mut current = val;
    for step in route {
        current = match (current, step) {
            (Value::Array(arr), PathComponent::Index(idx)) => arr.get(*idx)?,
            (Value::Object(map), PathComponent::Key(key)) => map.get(key)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Follow a route from `val`, mutably.
pub fn get_mut<'a>(val: &'a mut Value, route: &[PathComponent]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in route {
        current = match (current, step) {
            (Value::Array(arr), PathComponent::Index(idx)) => arr.get_mut(*idx)?,
            (Value::Object(map), PathComponent::Key(key)) => map.get_mut(key)?,
            _ => return None,
        };
    }
    Some(current)
}
