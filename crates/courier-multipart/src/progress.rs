//! Upload progress reporting.
//!
//! The splitter publishes a [`ProgressEvent`] after every chunk it spools and
//! a final event once the body has been split. Hosts choose a sink:
//! [`NoProgress`] discards events, [`TracingProgress`] logs them, and
//! [`ProgressBroadcaster`] fans them out to any number of subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;

/// Tracing target for progress events.
const PROGRESS_TARGET: &str = "courier_multipart::progress";

/// Stage of an upload a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    /// Body bytes are still arriving.
    Uploading,
    /// The body is spooled and parts are being extracted.
    Splitting,
    /// Splitting finished.
    Complete,
}

impl UploadPhase {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Splitting => "splitting",
            Self::Complete => "complete",
        }
    }
}

/// One progress notification for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    id: String,
    bytes_read: u64,
    bytes_total: u64,
    phase: UploadPhase,
    complete: bool,
}

impl ProgressEvent {
    /// Creates an in-flight event for the given phase.
    #[must_use]
    pub fn new(id: impl Into<String>, bytes_read: u64, bytes_total: u64, phase: UploadPhase) -> Self {
        Self {
            id: id.into(),
            bytes_read,
            bytes_total,
            phase,
            complete: phase == UploadPhase::Complete,
        }
    }

    /// Creates the terminal event for an upload.
    #[must_use]
    pub fn complete(id: impl Into<String>, bytes_total: u64) -> Self {
        Self::new(id, bytes_total, bytes_total, UploadPhase::Complete)
    }

    /// Upload identifier supplied by the host.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Bytes received so far.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Declared body length.
    #[must_use]
    pub const fn bytes_total(&self) -> u64 {
        self.bytes_total
    }

    /// Upload stage.
    #[must_use]
    pub const fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Whether this is the terminal event.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Receiver of upload progress events.
pub trait ProgressSink: Send + Sync {
    /// Publishes one event.
    fn publish(&self, event: &ProgressEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn publish(&self, _event: &ProgressEvent) {}
}

/// Sink that records events as debug-level tracing output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn publish(&self, event: &ProgressEvent) {
        debug!(
            target: PROGRESS_TARGET,
            upload = event.id(),
            bytes_read = event.bytes_read(),
            bytes_total = event.bytes_total(),
            phase = event.phase().as_str(),
            complete = event.is_complete(),
            "upload progress"
        );
    }
}

/// Sink that forwards every event to each live subscriber.
///
/// Subscribers whose receiver has been dropped are pruned on the next
/// publish.
///
/// # Example
///
/// ```
/// use courier_multipart::{ProgressBroadcaster, ProgressEvent, ProgressSink};
///
/// let broadcaster = ProgressBroadcaster::new();
/// let events = broadcaster.subscribe();
/// broadcaster.publish(&ProgressEvent::complete("upload-1", 10));
/// assert!(events.try_recv().unwrap().is_complete());
/// ```
#[derive(Debug, Default)]
pub struct ProgressBroadcaster {
    subscribers: Mutex<Vec<Sender<ProgressEvent>>>,
}

impl ProgressBroadcaster {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Receiver<ProgressEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Number of subscribers still registered.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ProgressSink for ProgressBroadcaster {
    fn publish(&self, event: &ProgressEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
