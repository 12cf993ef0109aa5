//! Builders for multipart request bodies used in tests.

use std::io::{self, Cursor};

use crate::body::StreamBody;
use crate::token::FileToken;

/// Assembles a request body in the layout the splitter reads.
///
/// # Example
///
/// ```
/// use courier_multipart::testing::MultipartBodyBuilder;
///
/// let body = MultipartBodyBuilder::new("XyZ")
///     .call_map(r#"[["Math.Add",[1,2]]]"#)
///     .build();
/// assert!(body.starts_with(b"--XyZ\r\n"));
/// assert!(body.ends_with(b"--XyZ--\r\n"));
/// ```
#[derive(Debug, Clone)]
pub struct MultipartBodyBuilder {
    boundary: String,
    parts: Vec<Vec<u8>>,
}

impl MultipartBodyBuilder {
    /// Starts a body delimited by `--<boundary>`.
    #[must_use]
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Adds the `map` field carrying the call batch.
    #[must_use]
    pub fn call_map(self, json: &str) -> Self {
        self.field("map", json.as_bytes())
    }

    /// Adds the `id` field carrying the correlation id.
    #[must_use]
    pub fn correlation_id(self, id: &str) -> Self {
        self.field("id", id.as_bytes())
    }

    /// Adds a plain form field.
    #[must_use]
    pub fn field(mut self, name: &str, content: &[u8]) -> Self {
        let mut part = format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").into_bytes();
        part.extend_from_slice(content);
        self.parts.push(part);
        self
    }

    /// Adds a file part for `token`.
    #[must_use]
    pub fn file(self, token: &FileToken, file_name: &str, content_type: &str, content: &[u8]) -> Self {
        self.file_field(&token.field_name(), file_name, content_type, content)
    }

    /// Adds a file part with an arbitrary field name.
    #[must_use]
    pub fn file_field(
        mut self,
        field: &str,
        file_name: &str,
        content_type: &str,
        content: &[u8],
    ) -> Self {
        let mut part = format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(content);
        self.parts.push(part);
        self
    }

    /// Adds a part verbatim, headers included.
    #[must_use]
    pub fn raw_part(mut self, part: &[u8]) -> Self {
        self.parts.push(part.to_vec());
        self
    }

    /// Produces the encoded body.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let delimiter = format!("--{}", self.boundary);
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(delimiter.as_bytes());
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(delimiter.as_bytes());
        body.extend_from_slice(b"--\r\n");
        body
    }

    /// Produces the body wrapped in a reader with its full length declared.
    ///
    /// # Errors
    ///
    /// Propagates failures while filling the preloaded prefix.
    pub fn reader(&self) -> io::Result<StreamBody<Cursor<Vec<u8>>>> {
        let body = self.build();
        let len = body.len() as u64;
        StreamBody::new(Cursor::new(body), len)
    }
}
