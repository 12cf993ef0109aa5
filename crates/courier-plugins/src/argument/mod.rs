//! Loosely typed call arguments.
//!
//! Arguments arrive as JSON and are converted into an [`Argument`] tree that
//! mirrors the JSON shape, with one extra variant carrying uploaded files.
//! Callables receive them positionally through [`Arguments`], whose typed
//! accessors report mismatches as [`ArgumentError`].

use std::collections::BTreeMap;
use std::mem;

use courier_multipart::UploadedFile;
use serde_json::{Number, Value};

use crate::error::ArgumentError;

/// One argument value.
#[derive(Debug, Default)]
pub enum Argument {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number, kept in its original representation.
    Number(Number),
    /// JSON string.
    String(String),
    /// JSON array.
    List(Vec<Argument>),
    /// JSON object with string keys.
    Map(BTreeMap<String, Argument>),
    /// Uploaded files substituted for a file reference.
    Files(Vec<UploadedFile>),
}

impl Argument {
    /// Name of the variant, used in mismatch errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Files(_) => "files",
        }
    }

    /// Returns the string content, if this is a string.
    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

/// Positional arguments for one call.
///
/// # Example
///
/// ```
/// use courier_plugins::{Argument, Arguments};
/// use serde_json::json;
///
/// let args = Arguments::from_json(vec![json!(2), json!("x")]);
/// assert_eq!(args.integer(0).unwrap(), 2);
/// assert_eq!(args.string(1).unwrap(), "x");
/// assert!(args.integer(1).is_err());
/// ```
#[derive(Debug, Default)]
pub struct Arguments {
    values: Vec<Argument>,
}

impl Arguments {
    /// Wraps already converted arguments.
    #[must_use]
    pub const fn new(values: Vec<Argument>) -> Self {
        Self { values }
    }

    /// Converts JSON values without any file substitution.
    #[must_use]
    pub fn from_json(values: Vec<Value>) -> Self {
        Self::new(values.into_iter().map(Argument::from).collect())
    }

    /// Number of arguments supplied.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument at `index`, if supplied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.values.get(index)
    }

    /// Iterates over the arguments in call order.
    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.values.iter()
    }

    /// Consumes the wrapper, returning the raw values.
    #[must_use]
    pub fn into_inner(self) -> Vec<Argument> {
        self.values
    }

    fn require(&self, index: usize) -> Result<&Argument, ArgumentError> {
        self.values
            .get(index)
            .ok_or(ArgumentError::Missing { index })
    }

    /// Reads a number that fits in `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn integer(&self, index: usize) -> Result<i64, ArgumentError> {
        match self.require(index)? {
            Argument::Number(number) => number.as_i64().ok_or(ArgumentError::TypeMismatch {
                index,
                expected: "integer",
                found: "number",
            }),
            other => Err(mismatch(index, "integer", other)),
        }
    }

    /// Reads any JSON number.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn number(&self, index: usize) -> Result<&Number, ArgumentError> {
        match self.require(index)? {
            Argument::Number(number) => Ok(number),
            other => Err(mismatch(index, "number", other)),
        }
    }

    /// Reads a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn boolean(&self, index: usize) -> Result<bool, ArgumentError> {
        match self.require(index)? {
            Argument::Bool(flag) => Ok(*flag),
            other => Err(mismatch(index, "boolean", other)),
        }
    }

    /// Reads a string.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn string(&self, index: usize) -> Result<&str, ArgumentError> {
        match self.require(index)? {
            Argument::String(text) => Ok(text.as_str()),
            other => Err(mismatch(index, "string", other)),
        }
    }

    /// Reads a list.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn list(&self, index: usize) -> Result<&[Argument], ArgumentError> {
        match self.require(index)? {
            Argument::List(items) => Ok(items),
            other => Err(mismatch(index, "list", other)),
        }
    }

    /// Reads a string-keyed map.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn map(&self, index: usize) -> Result<&BTreeMap<String, Argument>, ArgumentError> {
        match self.require(index)? {
            Argument::Map(entries) => Ok(entries),
            other => Err(mismatch(index, "map", other)),
        }
    }

    /// Takes ownership of the files substituted at `index`.
    ///
    /// The argument is left as an empty file list.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] or [`ArgumentError::TypeMismatch`].
    pub fn take_files(&mut self, index: usize) -> Result<Vec<UploadedFile>, ArgumentError> {
        match self.values.get_mut(index) {
            Some(Argument::Files(files)) => Ok(mem::take(files)),
            Some(other) => Err(mismatch(index, "files", other)),
            None => Err(ArgumentError::Missing { index }),
        }
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(values: Vec<Argument>) -> Self {
        Self::new(values)
    }
}

const fn mismatch(index: usize, expected: &'static str, found: &Argument) -> ArgumentError {
    ArgumentError::TypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests;
