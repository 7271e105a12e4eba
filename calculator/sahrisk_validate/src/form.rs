//! Raw form values as entered by the user.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single value as submitted by the form, before any coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("null"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i64::from(i))
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

#[derive(Debug, Error)]
pub enum FormParseError {
    #[error("form input is not a JSON object of field values: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected 'key=value', got '{0}'")]
    MalformedPair(String),
}

/// Mapping from form field name to the raw value entered for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormInput {
    fields: BTreeMap<String, RawValue>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object such as `{"wfns": 4, "ld": true}`.
    pub fn from_json_str(text: &str) -> Result<Self, FormParseError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds a form from `key=value` pairs; every value is kept as text.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, FormParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut form = FormInput::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, value)) = pair.split_once('=') else {
                return Err(FormParseError::MalformedPair(pair.to_string()));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(FormParseError::MalformedPair(pair.to_string()));
            }
            form.insert(key, value.trim());
        }
        Ok(form)
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder-style variant of [`FormInput::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.fields.remove(key)
    }

    /// Copies every field of `other` over this form.
    pub fn merge(&mut self, other: FormInput) {
        self.fields.extend(other.fields);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
