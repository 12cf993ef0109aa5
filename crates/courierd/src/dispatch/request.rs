//! Call-map decoding.
//!
//! The call-map is a JSON array of `[methodName, [args...]]` pairs. Each pair
//! becomes a [`Call`]; argument values are kept as JSON until the dispatcher
//! marshals them.

use serde_json::Value;

use super::errors::DispatchError;

/// One requested call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    method: String,
    args: Vec<Value>,
}

impl Call {
    /// Creates a call.
    #[must_use]
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Qualified method name as sent by the client.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Arguments in call order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Value>) {
        (self.method, self.args)
    }
}

/// Ordered list of calls decoded from one call-map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallBatch {
    calls: Vec<Call>,
}

impl CallBatch {
    /// Decodes a call-map.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedCallMap`] when the text is not a JSON
    /// array and [`DispatchError::InvalidCall`] when an entry is not a
    /// `[string, array]` pair.
    pub fn parse(text: &str) -> Result<Self, DispatchError> {
        let value: Value = serde_json::from_str(text).map_err(DispatchError::from_json_error)?;
        let Value::Array(entries) = value else {
            return Err(DispatchError::malformed("call-map must be a JSON array"));
        };
        let calls = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| parse_call(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { calls })
    }

    /// Calls in request order.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of calls.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl From<Vec<Call>> for CallBatch {
    fn from(calls: Vec<Call>) -> Self {
        Self { calls }
    }
}

impl IntoIterator for CallBatch {
    type Item = Call;
    type IntoIter = std::vec::IntoIter<Call>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.into_iter()
    }
}

fn parse_call(index: usize, entry: Value) -> Result<Call, DispatchError> {
    let Value::Array(pair) = entry else {
        return Err(DispatchError::invalid_call(index, "expected a [method, args] pair"));
    };
    let mut elements = pair.into_iter();
    match (elements.next(), elements.next(), elements.next()) {
        (Some(Value::String(method)), Some(Value::Array(args)), None) => {
            if method.trim().is_empty() {
                return Err(DispatchError::invalid_call(index, "method name is empty"));
            }
            Ok(Call::new(method, args))
        }
        (Some(Value::String(_)), Some(_), None) => Err(DispatchError::invalid_call(
            index,
            "arguments must be a JSON array",
        )),
        (Some(_), Some(_), None) => Err(DispatchError::invalid_call(
            index,
            "method name must be a string",
        )),
        _ => Err(DispatchError::invalid_call(
            index,
            "expected exactly two elements",
        )),
    }
}
