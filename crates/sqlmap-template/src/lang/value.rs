//! Value semantics shared by the evaluator and the built-in functions.

use serde_json::Value;

/// false, 0, null, "", empty list and empty object are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text a value contributes to rendered SQL.
pub(crate) fn display_value(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(format!(
            "cannot print a {}; use join or range",
            type_name(value)
        )),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Follow `path` from `start`; a missing field or a non-object step fails.
pub(crate) fn resolve_path<'v>(start: &'v Value, path: &[String]) -> Result<&'v Value, String> {
    let mut current = start;
    for (depth, name) in path.iter().enumerate() {
        current = match current {
            Value::Object(map) => map.get(name).ok_or_else(|| {
                format!("missing field `{}`", path[..=depth].join("."))
            })?,
            other => {
                return Err(format!(
                    "cannot access field `{name}` of a {}",
                    type_name(other)
                ))
            }
        };
    }
    Ok(current)
}
