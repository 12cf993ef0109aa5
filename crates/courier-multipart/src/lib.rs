//! Streaming multipart splitting for plugin call requests.
//!
//! A request body carries a JSON call batch in a `map` field, an optional
//! correlation id in an `id` field, and any number of binary attachments
//! whose field names reference the call argument they belong to. The
//! [`MultipartSplitter`] spools the body to disk in bounded chunks, locates
//! every part with the byte-level scanner in [`scanner`], and produces a
//! [`Mapper`] holding the call batch and one [`UploadedFile`] per
//! attachment.

mod body;
mod error;
mod part;
mod progress;
pub mod scanner;
mod splitter;
pub mod token;
mod upload;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use body::{BodyReader, StreamBody};
pub use error::{MultipartError, PartIssue};
pub use progress::{
    NoProgress, ProgressBroadcaster, ProgressEvent, ProgressSink, TracingProgress, UploadPhase,
};
pub use scanner::{Boundary, PartLocation};
pub use splitter::{DEFAULT_CHUNK_SIZE, MultipartSplitter, SplitterOptions};
pub use token::{FILE_SENTINEL, FileToken, TokenError};
pub use upload::{Mapper, UploadedFile};
