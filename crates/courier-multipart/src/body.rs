//! Pull-style access to request bodies supplied by the host.

use std::io::{self, Read};

/// Body reader exposed by the hosting server.
///
/// Hosts typically hold the first few kilobytes of a body in memory before
/// the application sees it; [`BodyReader::preloaded`] exposes that prefix and
/// [`BodyReader::read_chunk`] pulls the rest. A read returning `Ok(0)` before
/// [`BodyReader::total_len`] bytes arrived means the client went away.
pub trait BodyReader {
    /// Declared body length in bytes, including the preloaded prefix.
    fn total_len(&self) -> u64;

    /// Prefix already held in memory.
    fn preloaded(&self) -> &[u8];

    /// Reads the next bytes after the prefix into `buf`.
    ///
    /// # Errors
    ///
    /// Returns any transport error raised while receiving the body.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// [`BodyReader`] over any [`Read`] implementation.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use courier_multipart::{BodyReader, StreamBody};
///
/// let bytes = b"--b\r\n...".to_vec();
/// let total = bytes.len() as u64;
/// let body = StreamBody::new(Cursor::new(bytes), total).unwrap();
/// assert_eq!(body.preloaded(), b"--b\r\n...");
/// ```
#[derive(Debug)]
pub struct StreamBody<R> {
    inner: R,
    total_len: u64,
    preloaded: Vec<u8>,
}

impl<R: Read> StreamBody<R> {
    /// Number of bytes preloaded by [`StreamBody::new`].
    pub const DEFAULT_PRELOAD: usize = 4096;

    /// Wraps `inner`, preloading up to [`Self::DEFAULT_PRELOAD`] bytes.
    ///
    /// # Errors
    ///
    /// Propagates read failures while filling the prefix.
    pub fn new(inner: R, total_len: u64) -> io::Result<Self> {
        Self::with_preload(inner, total_len, Self::DEFAULT_PRELOAD)
    }

    /// Wraps `inner`, preloading up to `preload` bytes.
    ///
    /// # Errors
    ///
    /// Propagates read failures while filling the prefix.
    pub fn with_preload(mut inner: R, total_len: u64, preload: usize) -> io::Result<Self> {
        let limit = u64::try_from(preload).map_or(total_len, |requested| requested.min(total_len));
        let mut preloaded = Vec::new();
        (&mut inner).take(limit).read_to_end(&mut preloaded)?;
        Ok(Self {
            inner,
            total_len,
            preloaded,
        })
    }
}

impl<R: Read> BodyReader for StreamBody<R> {
    fn total_len(&self) -> u64 {
        self.total_len
    }

    fn preloaded(&self) -> &[u8] {
        &self.preloaded
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
