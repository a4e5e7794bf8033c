//! Ordered key/value container for one configuration layer.

use super::definition::Definition;
use super::merge::deep_merge;
use crate::error::{ConfigError, Result, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One configuration layer: an ordered mapping from option name to a
/// JSON-shaped value.
///
/// `union` and `intersection` never touch their inputs; they return new
/// repositories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repository {
    values: Map<String, Value>,
}

impl Repository {
    /// Create a blank repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a parsed document. `null` (an empty document) gives a blank
    /// repository; anything other than a mapping is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        Self::from_document(value, "value")
    }

    /// Like [`Repository::from_value`], naming `origin` in the error.
    pub fn from_document(value: Value, origin: &str) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            _ => Err(ConfigError::NotAMapping {
                origin: origin.to_string(),
            }),
        }
    }

    /// Wrap the result of merging two mappings.
    pub(crate) fn from_merged(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Insert or replace `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Copy of the repository as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Every key of `self` and `other`. On conflicts the value of `self`
    /// wins; mappings held by both sides are unioned recursively.
    ///
    /// Order matters: `env.union(&local.union(&global))` lets the
    /// environment override local and local override global.
    pub fn union(&self, other: &Repository) -> Repository {
        Self::from_merged(deep_merge(other.to_value(), self.to_value()))
    }

    /// Keys present in both `self` and `other`, with the values of `self`.
    pub fn intersection(&self, other: &Repository) -> Repository {
        self.values
            .iter()
            .filter(|(key, _)| other.contains_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Check every key currently in the repository against `definition`.
    pub fn validate_with(&self, definition: &dyn Definition) -> std::result::Result<(), ValidationError> {
        definition.validate(self)
    }
}

impl From<Map<String, Value>> for Repository {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Repository {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Repository {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
