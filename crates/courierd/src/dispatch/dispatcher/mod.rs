//! Sequential execution of a call batch against the call registry.

use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use courier_multipart::UploadedFile;
use courier_plugins::{Arguments, CallError, CallRegistry, CallableMethod, Response};
use uuid::Uuid;

use super::DISPATCH_TARGET;
use super::keys::ResultKeys;
use super::marshal::{FilePool, marshal_arguments};
use super::request::CallBatch;
use super::response::BatchResponse;

/// Runs call batches against a shared, read-only [`CallRegistry`].
///
/// Every call produces exactly one entry in the [`BatchResponse`]; unknown
/// methods and failing callables are reported in that entry and never abort
/// the rest of the batch.
#[derive(Debug, Clone)]
pub struct RpcDispatcher {
    registry: Arc<CallRegistry>,
}

impl RpcDispatcher {
    /// Creates a dispatcher over `registry`.
    #[must_use]
    pub const fn new(registry: Arc<CallRegistry>) -> Self {
        Self { registry }
    }

    /// Registry the dispatcher resolves names against.
    #[must_use]
    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    /// Executes `batch` in order, handing uploaded `files` to the calls that
    /// reference them.
    #[must_use]
    pub fn dispatch(&self, batch: CallBatch, files: Vec<UploadedFile>) -> BatchResponse {
        let mut keys = ResultKeys::default();
        let mut pool = FilePool::new(files);
        let mut responses = BatchResponse::with_capacity(batch.len());

        for (position, call) in batch.into_iter().enumerate() {
            let (method, args) = call.into_parts();
            let assignment = keys.assign(&method, position);
            if let Some(renamed) = assignment.renamed {
                responses.rename(renamed.position, renamed.key);
            }

            let mut response = match self.registry.get(&method) {
                Some(callable) => {
                    let arguments = marshal_arguments(args, &mut pool);
                    invoke(callable, arguments)
                }
                None => {
                    tracing::debug!(
                        target: DISPATCH_TARGET,
                        method = method.as_str(),
                        "method not registered"
                    );
                    Response::not_found(&method)
                }
            };
            response.attach_metadata(assignment.key.as_str(), assignment.instance, Uuid::new_v4());
            responses.push(assignment.key, response);
        }

        let unclaimed = pool.len();
        if unclaimed > 0 {
            tracing::debug!(
                target: DISPATCH_TARGET,
                unclaimed,
                "uploaded files not referenced by any call"
            );
        }
        responses
    }
}

fn invoke(callable: &CallableMethod, arguments: Arguments) -> Response {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| callable.handle().invoke(arguments)));
    let error = match outcome {
        Ok(Ok(response)) => return response,
        Ok(Err(error)) => error,
        Err(payload) => CallError::from(panic_message(payload.as_ref())),
    };

    let trace = error_chain(&*error);
    let innermost = trace.last().cloned().unwrap_or_default();
    tracing::warn!(
        target: DISPATCH_TARGET,
        method = callable.name(),
        plugin = callable.plugin(),
        error = innermost.as_str(),
        "method invocation failed"
    );
    Response::invocation_failed(
        format!(
            "Method {} failed in plugin {}: {innermost}",
            callable.name(),
            callable.plugin()
        ),
        trace,
    )
}

/// Renders `error` and each of its sources, outermost first.
fn error_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = Some(error);
    while let Some(item) = current {
        chain.push(item.to_string());
        current = item.source();
    }
    chain
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panic: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panic: {text}")
    } else {
        String::from("panic with a non-string payload")
    }
}
