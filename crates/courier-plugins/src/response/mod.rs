//! Result values returned by callables.
//!
//! A [`Response`] always carries an `Error` code and a `Message`. Callables
//! add their own keys; the dispatcher attaches `Name`, `Instance` and `Uid`
//! after the call. Serialization produces one flat JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Keys managed by the response itself rather than by callables.
const RESERVED_KEYS: [&str; 6] = ["Error", "Message", "Name", "Instance", "Uid", "Trace"];

/// Outcome of one call.
///
/// # Example
///
/// ```
/// use courier_plugins::Response;
///
/// let response = Response::success("OK").with("Sum", 3);
/// let json = serde_json::to_value(&response).unwrap();
/// assert_eq!(json["Error"], 0);
/// assert_eq!(json["Sum"], 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "Error")]
    error: i64,
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Instance", default, skip_serializing_if = "Option::is_none")]
    instance: Option<u32>,
    #[serde(rename = "Uid", default, skip_serializing_if = "Option::is_none")]
    uid: Option<Uuid>,
    #[serde(rename = "Trace", default, skip_serializing_if = "Vec::is_empty")]
    trace: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Response {
    /// Error code of a successful call.
    pub const SUCCESS: i64 = 0;
    /// Error code when no callable is registered under the requested name.
    pub const NOT_FOUND: i64 = 1;
    /// Error code when the callable failed.
    pub const INVOCATION_FAILED: i64 = 2;

    /// Creates a response with an explicit error code.
    #[must_use]
    pub fn new(error: i64, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            name: None,
            instance: None,
            uid: None,
            trace: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Creates a successful response.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Self::SUCCESS, message)
    }

    /// Response for a method that is not registered.
    #[must_use]
    pub fn not_found(method: &str) -> Self {
        Self::new(Self::NOT_FOUND, format!("Method {method} not found."))
    }

    /// Response for a callable that failed.
    #[must_use]
    pub fn invocation_failed(message: impl Into<String>, trace: Vec<String>) -> Self {
        Self {
            trace,
            ..Self::new(Self::INVOCATION_FAILED, message)
        }
    }

    /// Adds a caller-defined key. Reserved keys are ignored.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a caller-defined key, returning whether it was accepted.
    ///
    /// Reserved keys (`Error`, `Message`, `Name`, `Instance`, `Uid`, `Trace`)
    /// are rejected.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if RESERVED_KEYS.contains(&key) {
            return false;
        }
        self.extra.insert(key.to_owned(), value.into());
        true
    }

    /// Attaches the dispatcher's transport metadata.
    pub fn attach_metadata(&mut self, name: impl Into<String>, instance: u32, uid: Uuid) {
        self.name = Some(name.into());
        self.instance = Some(instance);
        self.uid = Some(uid);
    }

    /// Replaces the result key recorded in `Name`.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Error code; zero means success.
    #[must_use]
    pub const fn error_code(&self) -> i64 {
        self.error
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error == Self::SUCCESS
    }

    /// Human-readable message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Result key attached by the dispatcher.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Instance number attached by the dispatcher.
    #[must_use]
    pub const fn instance(&self) -> Option<u32> {
        self.instance
    }

    /// Unique id attached by the dispatcher.
    #[must_use]
    pub const fn uid(&self) -> Option<Uuid> {
        self.uid
    }

    /// Error chain of a failed call, outermost first.
    #[must_use]
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Caller-defined value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests;
