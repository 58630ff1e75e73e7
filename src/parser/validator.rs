//! Declarative structural validation of decoded JSON.
//!
//! A [`Shape`] describes what a value must look like. [`validate`] walks the
//! value once, records every violation in an [`ErrorTree`] that mirrors the
//! input (object keys and array indices), and only deserializes into the typed
//! target when nothing was found. There is no partial result.

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Expected structure of a JSON value
#[derive(Debug, Clone)]
pub enum Shape {
    String,
    /// Non-negative whole number
    Integer,
    Number,
    Bool,
    Literal(&'static str),
    OneOf(&'static [&'static str]),
    Array(Box<Shape>),
    /// Keys not listed are ignored
    Object(Vec<Field>),
}

impl Shape {
    pub fn array(item: Shape) -> Self {
        Shape::Array(Box::new(item))
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Shape::Object(fields)
    }
}

/// One key of an object shape
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    /// Absent or `null` both pass
    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// Violations keyed by location
///
/// Each node carries the messages for its own value plus one child per
/// offending field or array element, in the order they were met.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorTree {
    pub errors: Vec<String>,
    pub children: Vec<(String, ErrorTree)>,
}

impl ErrorTree {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.children.iter().all(|(_, child)| child.is_empty())
    }

    /// Look up a direct child by field name or index
    pub fn child(&self, key: &str) -> Option<&ErrorTree> {
        self.children
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, child)| child)
    }

    /// Follow a path of keys, e.g. `["sampling", "events", "0", "type"]`
    pub fn at(&self, path: &[&str]) -> Option<&ErrorTree> {
        path.iter().try_fold(self, |node, key| node.child(key))
    }

    /// Total number of messages in the tree
    pub fn count(&self) -> usize {
        self.errors.len()
            + self
                .children
                .iter()
                .map(|(_, child)| child.count())
                .sum::<usize>()
    }

    fn attach(&mut self, key: String, child: ErrorTree) {
        if !child.is_empty() {
            self.children.push((key, child));
        }
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let own = usize::from(!self.errors.is_empty());
        let mut map = serializer.serialize_map(Some(own + self.children.len()))?;
        if !self.errors.is_empty() {
            map.serialize_entry("_errors", &self.errors)?;
        }
        for (key, child) in &self.children {
            map.serialize_entry(key, child)?;
        }
        map.end()
    }
}

/// A value did not match its shape
#[derive(Debug, Clone)]
pub struct ValidationError {
    tree: ErrorTree,
}

impl ValidationError {
    pub fn tree(&self) -> &ErrorTree {
        &self.tree
    }

    /// Indented JSON view of every violation and where it occurred
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.tree).unwrap_or_else(|_| format!("{:?}", self.tree))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unexpected wperf output structure ({} issue(s)):\n{}",
            self.tree.count(),
            self.render()
        )
    }
}

impl std::error::Error for ValidationError {}

/// Check `value` against `shape` and deserialize it
///
/// # Errors
/// Returns a [`ValidationError`] holding every mismatch found. The typed value
/// is only produced when the whole input conforms.
pub fn validate<T: DeserializeOwned>(shape: &Shape, value: Value) -> Result<T, ValidationError> {
    let tree = check(shape, &value);
    if !tree.is_empty() {
        return Err(ValidationError { tree });
    }

    serde_json::from_value(value).map_err(|e| ValidationError {
        tree: ErrorTree {
            errors: vec![e.to_string()],
            children: Vec::new(),
        },
    })
}

/// Collect violations without deserializing
pub fn check(shape: &Shape, value: &Value) -> ErrorTree {
    let mut tree = ErrorTree::default();
    check_into(shape, value, &mut tree);
    tree
}

fn check_into(shape: &Shape, value: &Value, tree: &mut ErrorTree) {
    match shape {
        Shape::String => {
            if !value.is_string() {
                tree.errors.push(expected("a string", value));
            }
        }
        Shape::Integer => {
            if value.as_u64().is_none() {
                tree.errors.push(expected("a non-negative integer", value));
            }
        }
        Shape::Number => {
            if !value.is_number() {
                tree.errors.push(expected("a number", value));
            }
        }
        Shape::Bool => {
            if !value.is_boolean() {
                tree.errors.push(expected("a boolean", value));
            }
        }
        Shape::Literal(literal) => {
            if value.as_str() != Some(*literal) {
                tree.errors.push(format!("Expected literal {:?}, received {}", literal, value));
            }
        }
        Shape::OneOf(options) => match value.as_str() {
            Some(s) if options.contains(&s) => {}
            _ => tree.errors.push(format!(
                "Expected one of {:?}, received {}",
                options, value
            )),
        },
        Shape::Array(item) => match value.as_array() {
            Some(items) => {
                for (index, element) in items.iter().enumerate() {
                    let mut child = ErrorTree::default();
                    check_into(item, element, &mut child);
                    tree.attach(index.to_string(), child);
                }
            }
            None => tree.errors.push(expected("an array", value)),
        },
        Shape::Object(fields) => match value.as_object() {
            Some(map) => {
                for field in fields {
                    let mut child = ErrorTree::default();
                    match map.get(field.name) {
                        Some(Value::Null) if !field.required => {}
                        Some(inner) => check_into(&field.shape, inner, &mut child),
                        None if field.required => child.errors.push("Required".to_string()),
                        None => {}
                    }
                    tree.attach(field.name.to_string(), child);
                }
            }
            None => tree.errors.push(expected("an object", value)),
        },
    }
}

fn expected(what: &str, value: &Value) -> String {
    format!("Expected {}, received {}", what, kind_of(value))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
