//! Streaming splitter that turns a request body into a [`Mapper`].
//!
//! The body is spooled to a temporary file in bounded chunks, the spool is
//! scanned for every boundary occurrence, and each part between two
//! occurrences is classified and extracted. Memory use is bounded by the
//! chunk size and the per-part header limit; attachment content only ever
//! moves between files.
//!
//! Parts that cannot be understood are recorded as [`PartIssue`]s and
//! skipped. Boundary, storage and cancellation failures abort the request;
//! every temporary file created so far is removed when the partial results
//! are dropped.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::body::BodyReader;
use crate::error::{MultipartError, PartIssue};
use crate::part::{self, CORRELATION_ID_LEN, MAX_HEADER_BYTES, PartHead, Signature};
use crate::progress::{ProgressEvent, ProgressSink, UploadPhase};
use crate::scanner::{self, Boundary, PartLocation};
use crate::token::FileToken;
use crate::upload::{Mapper, UploadedFile};

/// Tracing target for splitter operations.
const SPLITTER_TARGET: &str = "courier_multipart::splitter";

/// Default size of one bounded read or copy.
pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

/// Content type assumed when a file part does not declare one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Tuning for [`MultipartSplitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterOptions {
    chunk_size: usize,
    spool_dir: Option<PathBuf>,
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            spool_dir: None,
        }
    }
}

impl SplitterOptions {
    /// Overrides the chunk size; zero is treated as one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Places temporary files in `dir` instead of the system temp directory.
    #[must_use]
    pub fn with_spool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spool_dir = Some(dir.into());
        self
    }

    /// Chunk size in bytes.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Directory for temporary files, if overridden.
    #[must_use]
    pub fn spool_dir(&self) -> Option<&Path> {
        self.spool_dir.as_deref()
    }
}

/// Byte range of one part inside the spool file.
#[derive(Debug, Clone, Copy)]
struct PartRange {
    index: usize,
    start: u64,
    end: u64,
}

impl PartRange {
    const fn len(self) -> u64 {
        self.end - self.start
    }

    /// End of the content: the CRLF preceding the next boundary is dropped.
    fn content_end(self, content_start: u64) -> u64 {
        self.end.saturating_sub(2).max(content_start)
    }
}

/// Splits request bodies into call-map, correlation id and attachments.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use courier_multipart::{MultipartSplitter, NoProgress, SplitterOptions, StreamBody};
///
/// let body = b"--b\r\nContent-Disposition: form-data; name=\"map\"\r\n\r\n[]\r\n--b--\r\n";
/// let mut reader = StreamBody::new(Cursor::new(body.to_vec()), body.len() as u64).unwrap();
/// let splitter = MultipartSplitter::new(SplitterOptions::default());
/// let mapper = splitter.split(&mut reader, "upload-1", &NoProgress).unwrap();
/// assert_eq!(mapper.call_map(), Some("[]"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultipartSplitter {
    options: SplitterOptions,
}

impl MultipartSplitter {
    /// Creates a splitter with the given options.
    #[must_use]
    pub const fn new(options: SplitterOptions) -> Self {
        Self { options }
    }

    /// Returns the splitter options.
    #[must_use]
    pub const fn options(&self) -> &SplitterOptions {
        &self.options
    }

    /// Splits one request body.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::MalformedBoundary`] or
    /// [`MultipartError::EmptyBoundary`] when the first line is not a usable
    /// boundary, [`MultipartError::Cancelled`] when the body ends early, and
    /// [`MultipartError::Io`] when temporary storage fails.
    pub fn split<B>(
        &self,
        body: &mut B,
        upload_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Mapper, MultipartError>
    where
        B: BodyReader + ?Sized,
    {
        let boundary = scanner::find_boundary_token(body.preloaded())?;
        debug!(
            target: SPLITTER_TARGET,
            upload = upload_id,
            boundary = %boundary,
            "extracted boundary"
        );

        let (mut spool, total) = self.spool_body(body, upload_id, progress)?;
        progress.publish(&ProgressEvent::new(
            upload_id,
            total,
            total,
            UploadPhase::Splitting,
        ));

        let offsets = boundary_offsets(spool.as_file_mut(), &boundary)?;
        let mut mapper = Mapper::default();
        for (index, pair) in offsets.windows(2).enumerate() {
            let &[start, end] = pair else {
                continue;
            };
            let range = PartRange { index, start, end };
            self.extract_part(spool.as_file_mut(), &boundary, range, &mut mapper)?;
        }

        spool
            .close()
            .map_err(|err| MultipartError::io("removing spool file", err))?;

        info!(
            target: SPLITTER_TARGET,
            upload = upload_id,
            parts = offsets.len().saturating_sub(1),
            files = mapper.files().len(),
            skipped = mapper.issues().len(),
            has_call_map = mapper.call_map().is_some(),
            "split request body"
        );
        progress.publish(&ProgressEvent::complete(upload_id, total));
        Ok(mapper)
    }

    fn temp_file(&self, prefix: &str) -> Result<NamedTempFile, MultipartError> {
        let mut builder = Builder::new();
        builder.prefix(prefix);
        match self.options.spool_dir() {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|err| MultipartError::io("creating temporary file", err))
    }

    /// Writes the whole body into a spool file, reporting progress per chunk.
    fn spool_body<B>(
        &self,
        body: &mut B,
        upload_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<(NamedTempFile, u64), MultipartError>
    where
        B: BodyReader + ?Sized,
    {
        let mut spool = self.temp_file("courier-spool-")?;
        let preloaded = body.preloaded();
        let mut bytes_read = preloaded.len() as u64;
        let total = body.total_len().max(bytes_read);

        spool
            .write_all(preloaded)
            .map_err(|err| MultipartError::io("spooling body", err))?;
        progress.publish(&ProgressEvent::new(
            upload_id,
            bytes_read,
            total,
            UploadPhase::Uploading,
        ));

        let mut buffer = vec![0u8; self.options.chunk_size()];
        while bytes_read < total {
            let wanted = usize::try_from(total - bytes_read)
                .map_or(buffer.len(), |left| left.min(buffer.len()));
            let (chunk, _) = buffer.split_at_mut(wanted);
            let read = match body.read_chunk(chunk) {
                Ok(read) => read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(MultipartError::io("reading request body", err)),
            };
            if read == 0 {
                warn!(
                    target: SPLITTER_TARGET,
                    upload = upload_id,
                    bytes_read,
                    bytes_total = total,
                    "client disconnected mid-upload"
                );
                return Err(MultipartError::Cancelled {
                    upload_id: upload_id.to_owned(),
                    bytes_read,
                    bytes_total: total,
                });
            }
            let (filled, _) = chunk.split_at(read);
            spool
                .write_all(filled)
                .map_err(|err| MultipartError::io("spooling body", err))?;
            bytes_read += read as u64;
            progress.publish(&ProgressEvent::new(
                upload_id,
                bytes_read,
                total,
                UploadPhase::Uploading,
            ));
        }

        spool
            .flush()
            .map_err(|err| MultipartError::io("spooling body", err))?;
        Ok((spool, total))
    }

    fn extract_part(
        &self,
        spool: &mut File,
        boundary: &Boundary,
        range: PartRange,
        mapper: &mut Mapper,
    ) -> Result<(), MultipartError> {
        let head = read_head(spool, range)?;
        match part::signature(&head, boundary.len()) {
            Signature::CallMap if !mapper.has_call_map() => {
                self.extract_call_map(spool, &head, boundary, range, mapper)
            }
            Signature::CorrelationId if !mapper.has_correlation_id() => {
                extract_correlation_id(spool, &head, boundary, range, mapper)
            }
            _ => self.extract_file(spool, &head, boundary, range, mapper),
        }
    }

    fn extract_call_map(
        &self,
        spool: &mut File,
        head: &[u8],
        boundary: &Boundary,
        range: PartRange,
        mapper: &mut Mapper,
    ) -> Result<(), MultipartError> {
        let Some(parsed) = parse_head_or_record(head, boundary, range, mapper) else {
            return Ok(());
        };
        let content_start = range.start + parsed.content_offset as u64;
        let mut content = Vec::new();
        scanner::copy_range(
            spool,
            content_start,
            range.content_end(content_start),
            &mut content,
            self.options.chunk_size(),
        )
        .map_err(|err| MultipartError::io("reading call-map", err))?;

        if let Ok(call_map) = String::from_utf8(content) {
            debug!(
                target: SPLITTER_TARGET,
                part = range.index,
                bytes = call_map.len(),
                "found call-map"
            );
            mapper.set_call_map(call_map);
        } else {
            record(mapper, PartIssue::InvalidCallMap { index: range.index });
        }
        Ok(())
    }

    fn extract_file(
        &self,
        spool: &mut File,
        head: &[u8],
        boundary: &Boundary,
        range: PartRange,
        mapper: &mut Mapper,
    ) -> Result<(), MultipartError> {
        let Some(parsed) = parse_head_or_record(head, boundary, range, mapper) else {
            return Ok(());
        };
        let Some(field_name) = parsed.field_name.as_deref() else {
            record(mapper, PartIssue::MissingDisposition { index: range.index });
            return Ok(());
        };
        let token = match FileToken::from_field_name(field_name) {
            Ok(token) => token,
            Err(source) => {
                record(
                    mapper,
                    PartIssue::InvalidFieldName {
                        index: range.index,
                        source,
                    },
                );
                return Ok(());
            }
        };

        let content_start = range.start + parsed.content_offset as u64;
        let mut target = self.temp_file("courier-upload-")?;
        let len = scanner::copy_range(
            spool,
            content_start,
            range.content_end(content_start),
            &mut target,
            self.options.chunk_size(),
        )
        .map_err(|err| MultipartError::io("copying attachment", err))?;
        target
            .flush()
            .map_err(|err| MultipartError::io("copying attachment", err))?;

        debug!(
            target: SPLITTER_TARGET,
            part = range.index,
            token = %token,
            bytes = len,
            "extracted attachment"
        );
        mapper.push_file(UploadedFile::new(
            target.into_temp_path(),
            parsed.file_name.unwrap_or_default(),
            parsed
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            token,
            len,
        ));
        Ok(())
    }
}

fn extract_correlation_id(
    spool: &mut File,
    head: &[u8],
    boundary: &Boundary,
    range: PartRange,
    mapper: &mut Mapper,
) -> Result<(), MultipartError> {
    let Some(parsed) = parse_head_or_record(head, boundary, range, mapper) else {
        return Ok(());
    };
    let content_start = range.start + parsed.content_offset as u64;
    let id_end = (content_start + CORRELATION_ID_LEN as u64).min(range.end);
    let mut raw = Vec::with_capacity(CORRELATION_ID_LEN);
    scanner::copy_range(spool, content_start, id_end, &mut raw, CORRELATION_ID_LEN)
        .map_err(|err| MultipartError::io("reading correlation id", err))?;

    let text = String::from_utf8_lossy(&raw);
    match Uuid::try_parse(&text) {
        Ok(id) if raw.len() == CORRELATION_ID_LEN => mapper.set_correlation_id(id),
        _ => record(
            mapper,
            PartIssue::InvalidCorrelationId {
                index: range.index,
                value: text.into_owned(),
            },
        ),
    }
    Ok(())
}

fn parse_head_or_record(
    head: &[u8],
    boundary: &Boundary,
    range: PartRange,
    mapper: &mut Mapper,
) -> Option<PartHead> {
    let parsed = part::parse_head(head, boundary.len());
    if parsed.is_none() {
        let issue = if head.len() >= MAX_HEADER_BYTES {
            PartIssue::HeadersTooLarge {
                index: range.index,
                limit: MAX_HEADER_BYTES,
            }
        } else {
            PartIssue::MissingDisposition { index: range.index }
        };
        record(mapper, issue);
    }
    parsed
}

fn record(mapper: &mut Mapper, issue: PartIssue) {
    warn!(
        target: SPLITTER_TARGET,
        part = issue.index(),
        issue = %issue,
        "skipping unreadable part"
    );
    mapper.push_issue(issue);
}

/// Reads the boundary line and header block of a part, capped in size.
fn read_head(spool: &mut File, range: PartRange) -> Result<Vec<u8>, MultipartError> {
    let limit = range.len().min(MAX_HEADER_BYTES as u64);
    let mut head = Vec::new();
    scanner::copy_range(spool, range.start, range.start + limit, &mut head, MAX_HEADER_BYTES)
        .map_err(|err| MultipartError::io("reading part headers", err))?;
    Ok(head)
}

/// Offsets of every boundary occurrence in the spool, in body order.
fn boundary_offsets(spool: &mut File, boundary: &Boundary) -> Result<Vec<u64>, MultipartError> {
    let needle = boundary.as_bytes();
    let mut offsets = Vec::new();
    let mut from = 0u64;
    loop {
        match scanner::find_position(spool, needle, from)
            .map_err(|err| MultipartError::io("scanning for boundaries", err))?
        {
            PartLocation::At(offset) => {
                offsets.push(offset);
                from = offset + needle.len() as u64;
            }
            PartLocation::End => break,
        }
    }
    Ok(offsets)
}
