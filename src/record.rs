//! Read-only view over a source metadata record.
//!
//! Dataset and resource records arrive as loosely typed JSON objects. A field
//! counts as *defined* when it is present and truthy: not null, not `false`,
//! not zero, and not an empty string, list, or object.

use serde_json::{Map, Value};

use crate::error::{ConvertError, Result};

/// A dataset or resource record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecord {
    fields: Map<String, Value>,
}

impl SourceRecord {
    /// Wraps an already decoded JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        SourceRecord { fields }
    }

    /// Builds a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NotAnObject`] if the value is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(SourceRecord { fields }),
            _ => Err(ConvertError::NotAnObject),
        }
    }

    /// Parses a record from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Returns the raw value of a top-level field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the top-level field is present and non-empty.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some_and(is_truthy)
    }

    /// Returns the text of a defined top-level field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| is_truthy(v)).map(value_text)
    }

    /// Follows a dotted path through nested objects.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_in(&self.fields, path)
    }

    /// Returns a nested object field as a record of its own.
    #[must_use]
    pub fn nested(&self, name: &str) -> Option<SourceRecord> {
        match self.get(name) {
            Some(Value::Object(fields)) if !fields.is_empty() => {
                Some(SourceRecord::new(fields.clone()))
            },
            _ => None,
        }
    }

    /// Iterates the object entries of a list field, skipping non-objects.
    pub fn objects<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
        self.get(name)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for SourceRecord {
    fn from(fields: Map<String, Value>) -> Self {
        SourceRecord::new(fields)
    }
}

/// Follows a dotted path through nested objects of `fields`.
pub(crate) fn lookup_in<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Truthiness as the host platform applies it to metadata values.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Renders a scalar value as element text.
///
/// Strings are returned verbatim; numbers and booleans use their JSON
/// spelling; lists and objects fall back to compact JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Returns the text of the first defined key of `fields`.
pub(crate) fn first_defined(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|v| is_truthy(v))
        .map(value_text)
}
