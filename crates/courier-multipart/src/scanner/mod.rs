//! Byte-level primitives for locating boundaries in spooled bodies.
//!
//! The scanner works on any seekable stream so the splitter can search a
//! spool file without holding the body in memory. Searches walk forward one
//! byte at a time with a match cursor; on a mismatch the cursor falls back
//! along the needle's own prefixes, so runs of repeated bytes (boundaries are
//! usually long dash runs) never hide a match.

use std::fmt;
use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::MultipartError;

/// Maximum number of leading bytes inspected when extracting the boundary.
pub const BOUNDARY_SCAN_LIMIT: usize = 60;

/// Opaque byte sequence separating the parts of a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(Vec<u8>);

impl Boundary {
    /// Raw boundary bytes, including any leading dashes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Boundary length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; extraction rejects empty boundaries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Offset of a boundary occurrence, or the end of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartLocation {
    /// The boundary starts at this byte offset.
    At(u64),
    /// No further occurrence before the end of the stream.
    End,
}

/// Extracts the boundary token from the first bytes of a body.
///
/// The token is everything before the first carriage return. At most
/// [`BOUNDARY_SCAN_LIMIT`] bytes are inspected.
///
/// # Errors
///
/// Returns [`MultipartError::MalformedBoundary`] when no carriage return
/// appears within the limit, and [`MultipartError::EmptyBoundary`] when the
/// body starts with one.
pub fn find_boundary_token(first_bytes: &[u8]) -> Result<Boundary, MultipartError> {
    let window = first_bytes.get(..BOUNDARY_SCAN_LIMIT).unwrap_or(first_bytes);
    let end = window
        .iter()
        .position(|&byte| byte == b'\r')
        .ok_or(MultipartError::MalformedBoundary {
            limit: BOUNDARY_SCAN_LIMIT,
        })?;
    if end == 0 {
        return Err(MultipartError::EmptyBoundary);
    }
    let (token, _) = window.split_at(end);
    Ok(Boundary(token.to_vec()))
}

/// Finds the first occurrence of `needle` at or after `from_offset`.
///
/// An empty needle matches immediately at `from_offset`.
///
/// # Errors
///
/// Propagates seek and read failures from the stream.
pub fn find_position<R>(stream: &mut R, needle: &[u8], from_offset: u64) -> io::Result<PartLocation>
where
    R: Read + Seek,
{
    if needle.is_empty() {
        return Ok(PartLocation::At(from_offset));
    }

    stream.seek(SeekFrom::Start(from_offset))?;
    let fallback = prefix_table(needle);
    let needle_len = needle.len() as u64;
    let mut cursor = 0usize;
    let mut offset = from_offset;

    for read_byte in BufReader::new(stream).bytes() {
        let byte = read_byte?;
        while cursor > 0 && needle.get(cursor) != Some(&byte) {
            cursor = fallback.get(cursor - 1).copied().unwrap_or(0);
        }
        if needle.get(cursor) == Some(&byte) {
            cursor += 1;
        }
        offset += 1;
        if cursor == needle.len() {
            return Ok(PartLocation::At(offset - needle_len));
        }
    }

    Ok(PartLocation::End)
}

/// Length of the longest proper prefix of `needle[..=i]` that is also a suffix.
fn prefix_table(needle: &[u8]) -> Vec<usize> {
    let mut table = vec![0usize; needle.len()];
    let mut matched = 0usize;
    for (index, byte) in needle.iter().enumerate().skip(1) {
        while matched > 0 && needle.get(matched) != Some(byte) {
            matched = table.get(matched - 1).copied().unwrap_or(0);
        }
        if needle.get(matched) == Some(byte) {
            matched += 1;
        }
        if let Some(slot) = table.get_mut(index) {
            *slot = matched;
        }
    }
    table
}

/// Copies the byte range `start..end` of `source` into `destination`.
///
/// Data moves through a buffer of at most `chunk_size` bytes (minimum one).
/// Copying stops early, without error, when the source ends before `end`.
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Propagates seek, read and write failures.
pub fn copy_range<R, W>(
    source: &mut R,
    start: u64,
    end: u64,
    destination: &mut W,
    chunk_size: usize,
) -> io::Result<u64>
where
    R: Read + Seek,
    W: Write,
{
    if end <= start {
        return Ok(0);
    }

    source.seek(SeekFrom::Start(start))?;
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut remaining = end - start;
    let mut copied = 0u64;

    while remaining > 0 {
        let wanted = usize::try_from(remaining).map_or(buffer.len(), |left| left.min(buffer.len()));
        let (chunk, _) = buffer.split_at_mut(wanted);
        let read = match source.read(chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };
        let (filled, _) = chunk.split_at(read);
        destination.write_all(filled)?;
        remaining -= read as u64;
        copied += read as u64;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests;
