//! Files and fields extracted from one request body.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempPath;
use uuid::Uuid;

use crate::error::{MultipartError, PartIssue};
use crate::token::FileToken;

/// A binary attachment spooled to its own temporary file.
///
/// The backing file is deleted when the value is dropped unless it has been
/// moved elsewhere with [`UploadedFile::persist`].
#[derive(Debug)]
pub struct UploadedFile {
    path: TempPath,
    file_name: String,
    content_type: String,
    token: FileToken,
    len: u64,
}

impl UploadedFile {
    pub(crate) fn new(
        path: TempPath,
        file_name: String,
        content_type: String,
        token: FileToken,
        len: u64,
    ) -> Self {
        Self {
            path,
            file_name,
            content_type,
            token,
            len,
        }
    }

    /// Location of the backing temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name supplied by the client.
    #[must_use]
    pub const fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Content type supplied by the client.
    #[must_use]
    pub const fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    /// Reference parsed from the field name.
    #[must_use]
    pub const fn token(&self) -> &FileToken {
        &self.token
    }

    /// Method the file was uploaded for.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.token.method()
    }

    /// Call instance the file was uploaded for.
    #[must_use]
    pub const fn instance(&self) -> u32 {
        self.token.instance()
    }

    /// Argument field number.
    #[must_use]
    pub const fn field(&self) -> u32 {
        self.token.field()
    }

    /// File number within the field.
    #[must_use]
    pub const fn file(&self) -> u32 {
        self.token.file()
    }

    /// Size of the attachment in bytes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the attachment is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this file is the one `token` refers to.
    #[must_use]
    pub fn matches(&self, token: &FileToken) -> bool {
        &self.token == token
    }

    /// Opens the backing file for reading.
    ///
    /// # Errors
    ///
    /// Propagates the open failure.
    pub fn open(&self) -> io::Result<File> {
        File::open(&self.path)
    }

    /// Reads the whole attachment into memory.
    ///
    /// # Errors
    ///
    /// Propagates the read failure.
    pub fn read_to_vec(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    /// Moves the backing file to `destination` so it outlives the request.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::Persist`] when the file cannot be moved; the
    /// temporary file is removed in that case.
    pub fn persist(self, destination: &Path) -> Result<(), MultipartError> {
        self.path
            .persist(destination)
            .map_err(|err| MultipartError::Persist {
                destination: destination.to_path_buf(),
                source: Arc::new(err.error),
            })
    }
}

/// Everything the splitter extracted from one request body.
///
/// Created once per request and consumed once by the dispatcher.
#[derive(Debug, Default)]
pub struct Mapper {
    call_map: Option<String>,
    correlation_id: Option<Uuid>,
    files: Vec<UploadedFile>,
    issues: Vec<PartIssue>,
}

impl Mapper {
    /// Raw JSON text of the call batch, when a `map` field was present.
    #[must_use]
    pub fn call_map(&self) -> Option<&str> {
        self.call_map.as_deref()
    }

    /// Correlation id, when an `id` field was present and valid.
    #[must_use]
    pub const fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    /// Attachments in body order.
    #[must_use]
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Parts that were skipped.
    #[must_use]
    pub fn issues(&self) -> &[PartIssue] {
        &self.issues
    }

    /// Splits the mapper into call-map, correlation id and attachments.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Option<Uuid>, Vec<UploadedFile>) {
        (self.call_map, self.correlation_id, self.files)
    }

    pub(crate) const fn has_call_map(&self) -> bool {
        self.call_map.is_some()
    }

    pub(crate) const fn has_correlation_id(&self) -> bool {
        self.correlation_id.is_some()
    }

    pub(crate) fn set_call_map(&mut self, call_map: String) {
        self.call_map = Some(call_map);
    }

    pub(crate) fn set_correlation_id(&mut self, id: Uuid) {
        self.correlation_id = Some(id);
    }

    pub(crate) fn push_file(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub(crate) fn push_issue(&mut self, issue: PartIssue) {
        self.issues.push(issue);
    }
}
