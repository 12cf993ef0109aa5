//! End-to-end handling of one request body.

use std::sync::Arc;

use courier_config::Config;
use courier_multipart::{
    BodyReader, MultipartError, MultipartSplitter, ProgressSink, SplitterOptions,
};
use courier_plugins::CallRegistry;
use thiserror::Error;

use crate::dispatch::{BatchResponse, CallBatch, DispatchError, RpcDispatcher};

const PIPELINE_TARGET: &str = "courierd::pipeline";

/// Errors that abort a whole request before any call runs.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The body could not be split.
    #[error(transparent)]
    Split(#[from] MultipartError),

    /// The body carried no `map` field.
    #[error("request '{upload_id}' carries no call-map")]
    MissingCallMap {
        /// Host-supplied upload identifier.
        upload_id: String,
    },

    /// The call-map could not be decoded.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Splits request bodies and dispatches their call batches.
///
/// One processor serves any number of requests; the registry is shared
/// read-only.
#[derive(Debug, Clone)]
pub struct RequestProcessor {
    splitter: MultipartSplitter,
    dispatcher: RpcDispatcher,
}

impl RequestProcessor {
    /// Creates a processor with explicit splitter options.
    #[must_use]
    pub fn new(registry: Arc<CallRegistry>, options: SplitterOptions) -> Self {
        Self {
            splitter: MultipartSplitter::new(options),
            dispatcher: RpcDispatcher::new(registry),
        }
    }

    /// Creates a processor using the chunk size and spool directory from
    /// `config`.
    #[must_use]
    pub fn from_config(registry: Arc<CallRegistry>, config: &Config) -> Self {
        let mut options = SplitterOptions::default().with_chunk_size(config.splitter_chunk_size());
        if let Some(dir) = config.spool_dir() {
            options = options.with_spool_dir(dir.as_std_path());
        }
        Self::new(registry, options)
    }

    /// Dispatcher used for decoded batches.
    #[must_use]
    pub const fn dispatcher(&self) -> &RpcDispatcher {
        &self.dispatcher
    }

    /// Splitter options in effect.
    #[must_use]
    pub const fn options(&self) -> &SplitterOptions {
        self.splitter.options()
    }

    /// Processes one request body.
    ///
    /// Uploaded files that no callable persisted are removed when this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when splitting fails, the call-map is absent,
    /// or it cannot be decoded. No call runs in those cases.
    pub fn process<B>(
        &self,
        body: &mut B,
        upload_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<BatchResponse, ProcessError>
    where
        B: BodyReader + ?Sized,
    {
        let mapper = self.splitter.split(body, upload_id, progress)?;
        let skipped = mapper.issues().len();
        let (maybe_call_map, correlation_id, files) = mapper.into_parts();
        let correlation = correlation_id.map(|id| id.to_string());

        let Some(call_map) = maybe_call_map else {
            tracing::warn!(
                target: PIPELINE_TARGET,
                upload_id,
                correlation_id = correlation.as_deref(),
                skipped_parts = skipped,
                "request has no call-map"
            );
            return Err(ProcessError::MissingCallMap {
                upload_id: upload_id.to_owned(),
            });
        };

        let batch = CallBatch::parse(&call_map)?;
        tracing::info!(
            target: PIPELINE_TARGET,
            upload_id,
            correlation_id = correlation.as_deref(),
            calls = batch.len(),
            files = files.len(),
            skipped_parts = skipped,
            "dispatching call batch"
        );
        Ok(self.dispatcher.dispatch(batch, files))
    }
}
