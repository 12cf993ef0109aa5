//! Ordered batch responses.

use std::io::Write;

use courier_plugins::Response;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::errors::DispatchError;

/// Responses for one batch, keyed by result key in call order.
///
/// Serializes as a single JSON object whose keys keep the call order.
#[derive(Debug, Default)]
pub struct BatchResponse {
    entries: Vec<(String, Response)>,
}

impl BatchResponse {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, key: String, response: Response) {
        self.entries.push((key, response));
    }

    /// Moves the entry at `position` to `key`, updating its `Name`.
    pub(crate) fn rename(&mut self, position: usize, key: String) {
        if let Some((slot, response)) = self.entries.get_mut(position) {
            response.rename(key.as_str());
            *slot = key;
        }
    }

    /// Response stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Response> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, response)| response)
    }

    /// Result keys in call order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Entries in call order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Response)> {
        self.entries
            .iter()
            .map(|(key, response)| (key.as_str(), response))
    }

    /// Number of entries, always equal to the number of calls.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch had no calls.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the batch as one JSON object followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SerializeResponse`] or [`DispatchError::Io`].
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut writer, self).map_err(DispatchError::SerializeResponse)?;
        writer.write_all(b"\n").map_err(DispatchError::io)?;
        writer.flush().map_err(DispatchError::io)
    }
}

impl Serialize for BatchResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, response) in &self.entries {
            map.serialize_entry(key, response)?;
        }
        map.end()
    }
}
