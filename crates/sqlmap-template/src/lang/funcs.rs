//! Built-in template functions.

use std::cmp::Ordering;

use serde_json::Value;

use super::value::{display_value, is_truthy, type_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Len,
    Join,
    Quote,
    Print,
    Default,
}

impl Func {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "le" => Self::Le,
            "gt" => Self::Gt,
            "ge" => Self::Ge,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "len" => Self::Len,
            "join" => Self::Join,
            "quote" => Self::Quote,
            "print" => Self::Print,
            "default" => Self::Default,
            _ => return None,
        })
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Len => "len",
            Self::Join => "join",
            Self::Quote => "quote",
            Self::Print => "print",
            Self::Default => "default",
        }
    }

    /// Accepted argument counts as (min, max); `None` means unbounded.
    fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Eq => (2, None),
            Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => (2, Some(2)),
            Self::And | Self::Or => (1, None),
            Self::Not | Self::Len | Self::Quote => (1, Some(1)),
            Self::Join | Self::Default => (2, Some(2)),
            Self::Print => (0, None),
        }
    }

    /// `and` stops at the first falsy argument, `or` at the first truthy one.
    pub(crate) fn short_circuits(self, value: &Value) -> bool {
        match self {
            Self::And => !is_truthy(value),
            Self::Or => is_truthy(value),
            _ => false,
        }
    }

    pub(crate) fn check_arity(self, count: usize) -> Result<(), String> {
        let (min, max) = self.arity();
        let within = count >= min && max.map_or(true, |max| count <= max);
        if within {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => format!("{min}"),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        Err(format!(
            "wrong number of arguments for `{}`: expected {expected}, got {count}",
            self.name()
        ))
    }

    pub(crate) fn call(self, mut args: Vec<Value>) -> Result<Value, String> {
        match self {
            Self::Eq => {
                let first = args.remove(0);
                for other in &args {
                    if values_equal(&first, other)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Self::Ne => Ok(Value::Bool(!values_equal(&args[0], &args[1])?)),
            Self::Lt => compare(&args[0], &args[1]).map(|o| Value::Bool(o == Ordering::Less)),
            Self::Le => compare(&args[0], &args[1]).map(|o| Value::Bool(o != Ordering::Greater)),
            Self::Gt => compare(&args[0], &args[1]).map(|o| Value::Bool(o == Ordering::Greater)),
            Self::Ge => compare(&args[0], &args[1]).map(|o| Value::Bool(o != Ordering::Less)),
            Self::And => {
                let last = args.len() - 1;
                for (i, arg) in args.iter().enumerate() {
                    if !is_truthy(arg) || i == last {
                        return Ok(arg.clone());
                    }
                }
                Ok(Value::Null)
            }
            Self::Or => {
                let last = args.len() - 1;
                for (i, arg) in args.iter().enumerate() {
                    if is_truthy(arg) || i == last {
                        return Ok(arg.clone());
                    }
                }
                Ok(Value::Null)
            }
            Self::Not => Ok(Value::Bool(!is_truthy(&args[0]))),
            Self::Len => length(&args[0]).map(Value::from),
            Self::Join => join(&args[0], &args[1]).map(Value::String),
            Self::Quote => quote(&args[0]).map(Value::String),
            Self::Print => {
                let mut out = String::new();
                for arg in &args {
                    out.push_str(&display_value(arg)?);
                }
                Ok(Value::String(out))
            }
            Self::Default => {
                let value = args.pop().unwrap_or(Value::Null);
                let fallback = args.pop().unwrap_or(Value::Null);
                Ok(if is_truthy(&value) { value } else { fallback })
            }
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> Result<bool, String> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => Ok(a.is_null() && b.is_null()),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (Value::Number(_), Value::Number(_)) => Ok(compare(a, b)? == Ordering::Equal),
        _ => Err(format!(
            "incompatible types for comparison: {} and {}",
            type_name(a),
            type_name(b)
        )),
    }
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, String> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return Ok(x.cmp(&y));
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return Ok(x.cmp(&y));
            }
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.partial_cmp(&y)
                .ok_or_else(|| "cannot compare non-finite numbers".to_string())
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        _ => Err(format!(
            "incompatible types for comparison: {} and {}",
            type_name(a),
            type_name(b)
        )),
    }
}

fn length(value: &Value) -> Result<usize, String> {
    match value {
        Value::String(s) => Ok(s.chars().count()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(map) => Ok(map.len()),
        other => Err(format!("len of {}", type_name(other))),
    }
}

fn join(sep: &Value, list: &Value) -> Result<String, String> {
    let sep = match sep {
        Value::String(s) => s.as_str(),
        other => return Err(format!("join separator must be a string, got {}", type_name(other))),
    };
    match list {
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(display_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(sep))
        }
        other => Err(format!("join expects a list, got {}", type_name(other))),
    }
}

/// SQL literal: strings single-quoted with embedded quotes doubled,
/// lists become comma-separated literals, null becomes `NULL`.
fn quote(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
        Value::Array(items) => {
            let parts = items.iter().map(quote).collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(", "))
        }
        Value::Object(_) => Err("cannot quote an object".to_string()),
        scalar => display_value(scalar),
    }
}
