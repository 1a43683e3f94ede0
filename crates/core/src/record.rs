//! The per-request input record and helpers for reading untyped values.

use serde_json::{Map, Value};

/// Suffix marking a form key whose values accumulate into an array.
const ARRAY_KEY_SUFFIX: &str = "[]";

/// Field values extracted from one request, keyed by field name.
///
/// Insertion order is preserved. A field that was never supplied is absent,
/// which is distinct from a field explicitly set to `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRecord {
    fields: Map<String, Value>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from decoded `application/x-www-form-urlencoded` pairs.
    ///
    /// `key[]=a&key[]=b` collects into an array under `key`. A repeated plain
    /// key keeps its last value.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            let key: String = key.into();
            let value = Value::String(value.into());
            match key.strip_suffix(ARRAY_KEY_SUFFIX) {
                Some(name) => record.push(name, value),
                None => record.insert(key, value),
            }
        }
        record
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn push(&mut self, field: &str, value: Value) {
        match self.fields.get_mut(field) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                self.fields
                    .insert(field.to_string(), Value::Array(vec![value]));
            }
        }
    }
}

impl From<Map<String, Value>> for InputRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, Value)> for InputRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Read a value as a finite number.
///
/// JSON numbers are taken as-is; strings count when they parse as a finite
/// decimal after trimming surrounding whitespace.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Whether a value holds a whole number of any width.
///
/// `12`, `12.0`, `"12"` and integers past `i64::MAX` all count.
pub(crate) fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        _ => as_number(value).is_some_and(|n| n.fract() == 0.0),
    }
}

/// Absent, `null`, empty or whitespace-only strings, and empty arrays.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

pub(crate) fn is_null(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Human-readable form used in violation parameters (strings unquoted).
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
