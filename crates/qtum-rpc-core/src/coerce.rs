//! Positional argument coercion.
//!
//! Every method in the [`MethodTable`](crate::methods::MethodTable) declares a
//! [`TypeTag`] per parameter position. Before a call goes on the wire each
//! argument is normalized into the JSON shape the node expects for that slot,
//! so callers may pass `"5"` where an integer is wanted, or a JSON string where
//! an object is wanted.

use std::fmt;

use serde_json::{Number, Value};

use crate::error::RpcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Str,
    Int,
    Float,
    Bool,
    Obj,
}

impl TypeTag {
    /// Parse a tag token from the method table. Unrecognized tokens fall back
    /// to [`TypeTag::Str`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "int" | "integer" => TypeTag::Int,
            "float" => TypeTag::Float,
            "bool" | "boolean" => TypeTag::Bool,
            "obj" | "object" => TypeTag::Obj,
            _ => TypeTag::Str,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Str => "str",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Obj => "obj",
        }
    }

    pub fn coerce(&self, raw: Value) -> Result<Value, RpcError> {
        match self {
            TypeTag::Str => Ok(coerce_str(raw)),
            TypeTag::Int | TypeTag::Float => coerce_number(raw),
            TypeTag::Bool => Ok(Value::Bool(coerce_bool(&raw))),
            TypeTag::Obj => coerce_obj(raw),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn coerce_str(raw: Value) -> Value {
    match raw {
        Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }
}

fn coerce_number(raw: Value) -> Result<Value, RpcError> {
    match raw {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Ok(Value::Number(n));
            }
            let f = n
                .as_f64()
                .ok_or_else(|| RpcError::InvalidArgument(format!("not a number: {n}")))?;
            number_from_f64(f)
        }
        Value::String(s) => parse_numeric_text(&s),
        other => Err(RpcError::InvalidArgument(format!(
            "expected a number, got {other}"
        ))),
    }
}

fn parse_numeric_text(text: &str) -> Result<Value, RpcError> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Value::from(n));
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(Value::from(n));
    }
    let f = trimmed
        .parse::<f64>()
        .map_err(|_| RpcError::InvalidArgument(format!("not a number: `{text}`")))?;
    number_from_f64(f)
}

// Integral floats collapse to JSON integers so `5`, `5.0` and `"5"` coerce
// to the same wire value.
fn number_from_f64(f: f64) -> Result<Value, RpcError> {
    if !f.is_finite() {
        return Err(RpcError::InvalidArgument(format!("not a finite number: {f}")));
    }
    // `i64::MAX as f64` and `u64::MAX as f64` round up to 2^63 and 2^64, so the
    // upper bounds are exclusive.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Ok(Value::from(f as i64));
    }
    if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
        return Ok(Value::from(f as u64));
    }
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| RpcError::InvalidArgument(format!("not a finite number: {f}")))
}

fn coerce_bool(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn coerce_obj(raw: Value) -> Result<Value, RpcError> {
    match raw {
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|e| RpcError::InvalidArgument(format!("malformed JSON `{s}`: {e}"))),
        other => Ok(other),
    }
}
