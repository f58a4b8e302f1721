//! Cell text normalization and typed conversion.
//!
//! Conversion never fails loudly: a cell that does not parse under its
//! converter is simply absent, without affecting the cells around it.

use std::fmt;

use serde::Serialize;

use crate::schema::Converter;

/// A converted cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Decimal(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Trim and lowercase cell text. `None` stays `None`.
pub fn normalize(text: Option<&str>) -> Option<String> {
    text.map(|t| t.trim().to_lowercase())
}

/// Normalize `text`, cut it at `delimiter`, and parse it with `converter`.
///
/// ```
/// use surfboard::{convert, Converter, Value};
///
/// let freq = convert(Some("699000000 Hz"), Converter::Integer, Some(" "));
/// assert_eq!(freq, Some(Value::Integer(699000000)));
/// assert_eq!(convert(Some("N/A"), Converter::Integer, None), None);
/// ```
pub fn convert(text: Option<&str>, converter: Converter, delimiter: Option<&str>) -> Option<Value> {
    let text = normalize(text)?;
    let text = match delimiter {
        Some(delimiter) if !delimiter.is_empty() => text
            .split_once(delimiter)
            .map_or(text.as_str(), |(head, _)| head),
        _ => text.as_str(),
    };

    let value = match converter {
        Converter::Integer => text.trim().parse::<i64>().ok().map(Value::Integer),
        Converter::Decimal => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Decimal),
        Converter::String => Some(Value::Text(text.to_string())),
    };

    if value.is_none() {
        tracing::trace!(text, ?converter, "cell did not convert");
    }
    value
}
