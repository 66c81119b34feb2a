// Domain rules - Coercion of raw collaborator values into schema types

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{MediaMetaError, MediaMetaResult};

/// Raw name/value mapping handed over by a collaborator.
///
/// Keys are field names, values are whatever the collaborator produced: strings,
/// numbers or nulls. A key mapped to `null` is treated exactly like an absent key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    values: Map<String, Value>,
}

impl RawFields {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut fields = Self::new();
        for (key, value) in pairs {
            fields.insert(key, value);
        }
        fields
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Insert a field only when a value is present
    pub fn insert_opt<V: Into<Value>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Present, non-null value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }

    /// Copy `from` in this mapping to `to` in `target`, if present
    pub fn forward(&self, from: &str, target: &mut RawFields, to: &str) {
        if let Some(value) = self.get(from) {
            target.insert(to, value.clone());
        }
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn required(&self, field: &str, expected: &'static str) -> MediaMetaResult<&Value> {
        self.get(field)
            .ok_or_else(|| MediaMetaError::schema(field, expected, "no value"))
    }

    /// Required string field
    pub fn string(&self, field: &str) -> MediaMetaResult<String> {
        to_string(field, self.required(field, "a string")?)
    }

    /// Optional string field
    pub fn opt_string(&self, field: &str) -> MediaMetaResult<Option<String>> {
        self.get(field).map(|value| to_string(field, value)).transpose()
    }

    /// Required integer field
    pub fn integer<T: TryFrom<i128>>(&self, field: &str) -> MediaMetaResult<T> {
        let value = self.required(field, "an integer")?;
        narrow(field, to_integer(field, value)?, value)
    }

    /// Optional integer field
    pub fn opt_integer<T: TryFrom<i128>>(&self, field: &str) -> MediaMetaResult<Option<T>> {
        self.get(field)
            .map(|value| narrow(field, to_integer(field, value)?, value))
            .transpose()
    }

    /// Required integer millisecond duration, truncating fractional input
    pub fn millis(&self, field: &str) -> MediaMetaResult<i64> {
        let value = self.required(field, "an integer duration")?;
        to_millis(field, value)
    }

    /// Required exact decimal field
    pub fn decimal(&self, field: &str) -> MediaMetaResult<Decimal> {
        to_decimal(field, self.required(field, "a decimal")?)
    }

    /// Optional exact decimal field
    pub fn opt_decimal(&self, field: &str) -> MediaMetaResult<Option<Decimal>> {
        self.get(field).map(|value| to_decimal(field, value)).transpose()
    }
}

impl From<Map<String, Value>> for RawFields {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "no value".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "a sequence".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    }
}

/// Strings pass through, numbers are rendered; anything else is rejected.
pub fn to_string(field: &str, value: &Value) -> MediaMetaResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(MediaMetaError::schema(field, "a string", describe(other))),
    }
}

/// Integers, integral floats and integer strings are accepted.
pub fn to_integer(field: &str, value: &Value) -> MediaMetaResult<i128> {
    let parsed = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(i128::from(u))
            } else {
                n.as_f64().and_then(integral_float)
            }
        }
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| MediaMetaError::schema(field, "an integer", describe(value)))
}

fn integral_float(f: f64) -> Option<i128> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i128)
    } else {
        None
    }
}

fn narrow<T: TryFrom<i128>>(field: &str, raw: i128, value: &Value) -> MediaMetaResult<T> {
    T::try_from(raw)
        .map_err(|_| MediaMetaError::schema(field, "an integer in range", describe(value)))
}

/// Millisecond durations: any string or float is parsed as a float and
/// truncated toward zero.
pub fn to_millis(field: &str, value: &Value) -> MediaMetaResult<i64> {
    let as_float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.as_f64()
        }
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match as_float {
        Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
        _ => Err(MediaMetaError::schema(
            field,
            "an integer duration",
            describe(value),
        )),
    }
}

/// Exact decimals are parsed from the textual form, never through a binary float.
pub fn to_decimal(field: &str, value: &Value) -> MediaMetaResult<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => return Err(MediaMetaError::schema(field, "a decimal", describe(other))),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| MediaMetaError::schema(field, "a decimal", describe(value)))
}
