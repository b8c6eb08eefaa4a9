//! Structural validation of decoded response bodies.
//!
//! A [`Shape`] declares what a resource should look like. [`validate`] walks a
//! JSON value against it, collects every mismatch, and only then converts the
//! value into its Rust type. A broken response is reported in full rather than
//! one field at a time.
//!
//! # Examples
//!
//! ```
//! use togglr::schema::{self, Field, Shape};
//! use serde_json::json;
//!
//! let shape = Shape::object([
//!     Field::required("id", Shape::Number),
//!     Field::required("name", Shape::String),
//! ]);
//!
//! let err = schema::validate::<serde_json::Value>(&shape, json!({"id": "abc", "name": 123}))
//!     .unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Validation error: id: Expected number, received string, name: Expected string, received number"
//! );
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// The expected structure of a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Anything, including `null`.
    Any,
    /// A boolean.
    Bool,
    /// A number.
    Number,
    /// A string.
    String,
    /// An array whose items all have the given shape.
    Array(Box<Shape>),
    /// An object with the given fields. Unlisted keys are ignored.
    Object(Vec<Field>),
    /// The inner shape, or `null`.
    Nullable(Box<Shape>),
}

impl Shape {
    /// An object shape.
    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Shape::Object(fields.into_iter().collect())
    }

    /// An array shape.
    pub fn array(items: Shape) -> Self {
        Shape::Array(Box::new(items))
    }

    /// Wraps this shape so `null` is also accepted.
    pub fn nullable(self) -> Self {
        Shape::Nullable(Box::new(self))
    }

    /// Checks `value` against this shape.
    ///
    /// # Errors
    ///
    /// Returns every violation found, not just the first.
    pub fn check(&self, value: &Value) -> Result<(), SchemaError> {
        let mut violations = Vec::new();
        let mut path = Vec::new();
        self.walk(value, &mut path, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError { violations })
        }
    }

    fn walk(&self, value: &Value, path: &mut Vec<String>, out: &mut Vec<Violation>) {
        match (self, value) {
            (Shape::Any, _) => {}
            (Shape::Nullable(_), Value::Null) => {}
            (Shape::Nullable(inner), value) => inner.walk(value, path, out),
            (Shape::Bool, Value::Bool(_))
            | (Shape::Number, Value::Number(_))
            | (Shape::String, Value::String(_)) => {}
            (Shape::Array(items), Value::Array(values)) => {
                for (index, item) in values.iter().enumerate() {
                    path.push(index.to_string());
                    items.walk(item, path, out);
                    path.pop();
                }
            }
            (Shape::Object(fields), Value::Object(map)) => {
                for field in fields {
                    path.push(field.name.to_string());
                    match map.get(field.name) {
                        Some(value) => field.shape.walk(value, path, out),
                        None if field.required => out.push(Violation::new(path, "Required")),
                        None => {}
                    }
                    path.pop();
                }
            }
            (expected, actual) => out.push(Violation::new(
                path,
                format!(
                    "Expected {}, received {}",
                    expected.name(),
                    received_name(actual)
                ),
            )),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Shape::Any => "any",
            Shape::Bool => "boolean",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Array(_) => "array",
            Shape::Object(_) => "object",
            Shape::Nullable(inner) => inner.name(),
        }
    }
}

fn received_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A named member of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The JSON key.
    pub name: &'static str,
    /// The value's shape.
    pub shape: Shape,
    /// Whether the key must be present.
    pub required: bool,
}

impl Field {
    /// A key that must be present.
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    /// A key that may be absent.
    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// One mismatch between a value and its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending value. Empty for the root.
    pub path: String,
    /// What was wrong.
    pub reason: String,
}

impl Violation {
    fn new(path: &[String], reason: impl Into<String>) -> Self {
        Self {
            path: path.join("."),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// A response that did not match its declared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    violations: Vec<Violation>,
}

impl SchemaError {
    /// Every violation found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation error: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Checks `value` against `shape`, then converts it into `T`.
///
/// Validating into `serde_json::Value` hands back the input unchanged.
///
/// # Errors
///
/// Returns a [`SchemaError`] listing every structural violation, or the
/// conversion failure if the value passes the shape but still can't become a `T`.
pub fn validate<T: DeserializeOwned>(shape: &Shape, value: Value) -> Result<T, SchemaError> {
    shape.check(&value)?;

    serde_json::from_value(value).map_err(|e| SchemaError {
        violations: vec![Violation {
            path: String::new(),
            reason: e.to_string(),
        }],
    })
}
