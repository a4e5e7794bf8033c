//! Option definitions used to validate configuration repositories.
//!
//! A definition is keyed by option name. Keys the definition does not know
//! are accepted as-is, so site authors can introduce their own options.

use super::repository::Repository;
use crate::error::{ValidationError, Violation};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Validates the keys present in a repository.
pub trait Definition {
    fn validate(&self, repository: &Repository) -> Result<(), ValidationError>;
}

/// Expected shape of an option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Anything, including null.
    Any,
    String,
    /// Integral number.
    Integer,
    /// Integral or floating-point number.
    Number,
    Boolean,
    /// Sequence of any values.
    List,
    /// Sequence whose items all match the inner shape.
    ListOf(Box<Shape>),
    Mapping,
    /// The inner shape, or null.
    Nullable(Box<Shape>),
    /// Any one of the listed shapes.
    OneOf(Vec<Shape>),
}

impl Shape {
    pub fn nullable(inner: Shape) -> Self {
        Shape::Nullable(Box::new(inner))
    }

    pub fn list_of(inner: Shape) -> Self {
        Shape::ListOf(Box::new(inner))
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Shape::Any => true,
            Shape::String => value.is_string(),
            Shape::Integer => value.is_i64() || value.is_u64(),
            Shape::Number => value.is_number(),
            Shape::Boolean => value.is_boolean(),
            Shape::List => value.is_array(),
            Shape::ListOf(inner) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| inner.matches(item))),
            Shape::Mapping => value.is_object(),
            Shape::Nullable(inner) => value.is_null() || inner.matches(value),
            Shape::OneOf(shapes) => shapes.iter().any(|s| s.matches(value)),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => write!(f, "any value"),
            Shape::String => write!(f, "string"),
            Shape::Integer => write!(f, "integer"),
            Shape::Number => write!(f, "number"),
            Shape::Boolean => write!(f, "boolean"),
            Shape::List => write!(f, "list"),
            Shape::ListOf(inner) => write!(f, "list of {}", inner),
            Shape::Mapping => write!(f, "mapping"),
            Shape::Nullable(inner) => write!(f, "{} or null", inner),
            Shape::OneOf(shapes) => {
                let names: Vec<String> = shapes.iter().map(|s| s.to_string()).collect();
                write!(f, "one of {}", names.join(", "))
            }
        }
    }
}

/// Describe the shape of a concrete value, for error messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Definition built from a map of option name to [`Shape`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    options: BTreeMap<String, Shape>,
}

impl Schema {
    /// An empty schema accepts every repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the shape of one option.
    pub fn option(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.options.insert(name.into(), shape);
        self
    }

    pub fn shape_of(&self, name: &str) -> Option<&Shape> {
        self.options.get(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Built-in definition of the site generator's options.
    pub fn site() -> Self {
        let string_list = || Shape::list_of(Shape::String);
        Self::new()
            .option("site_name", Shape::nullable(Shape::String))
            .option("url", Shape::nullable(Shape::String))
            .option("baseurl", Shape::nullable(Shape::String))
            .option("host", Shape::String)
            .option("port", Shape::Integer)
            .option("timezone", Shape::nullable(Shape::String))
            .option("safe", Shape::Boolean)
            .option("debug", Shape::Boolean)
            .option("drafts", Shape::Boolean)
            .option("paginate", Shape::nullable(Shape::Integer))
            .option("paginate_path", Shape::String)
            .option("limit_to", Shape::nullable(Shape::Integer))
            .option("source", Shape::String)
            .option("destination", Shape::String)
            .option("layouts", Shape::String)
            .option("includes", Shape::String)
            .option("posts", Shape::String)
            .option("plugins", Shape::String)
            .option("data_sources", Shape::nullable(Shape::Mapping))
            .option("permalink", Shape::nullable(Shape::String))
            .option("relative_permalinks", Shape::Boolean)
            .option("preserve_path_title", Shape::Boolean)
            .option("processable_ext", string_list())
            .option("markdown_ext", string_list())
            .option("include", string_list())
            .option("exclude", string_list())
    }
}

impl Definition for Schema {
    fn validate(&self, repository: &Repository) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = repository
            .iter()
            .filter_map(|(key, value)| {
                let shape = self.options.get(key)?;
                if shape.matches(value) {
                    return None;
                }
                Some(Violation {
                    key: key.to_string(),
                    expected: shape.to_string(),
                    actual: describe(value).to_string(),
                })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

/// Definition that accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Definition for AcceptAll {
    fn validate(&self, _repository: &Repository) -> Result<(), ValidationError> {
        Ok(())
    }
}
