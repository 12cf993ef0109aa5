//! Request runtime hosting plugin-provided methods.
//!
//! Bootstrap loads [`courier_config::Config`], installs structured telemetry
//! and activates the built-in plugin catalog in dependency order. The
//! resulting [`Runtime`] owns a [`RequestProcessor`] that takes one
//! multipart request body at a time:
//!
//! 1. the body is spooled and split into a call-map, an optional correlation
//!    id and uploaded files;
//! 2. the call-map is decoded into a [`CallBatch`];
//! 3. the [`RpcDispatcher`] runs every call against the shared call registry
//!    and gathers one response per call into a [`BatchResponse`].
//!
//! Failures of individual calls are reported inside their response. Only a
//! malformed body or call-map aborts the request, as a [`ProcessError`].
//!
//! Health reporting hooks emit structured telemetry at each bootstrap stage
//! so operators can see which plugins were activated and how many methods
//! were registered.

mod bootstrap;
pub mod builtin;
pub mod dispatch;
mod health;
mod pipeline;
pub mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Runtime, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{BatchResponse, Call, CallBatch, DispatchError, RpcDispatcher};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use pipeline::{ProcessError, RequestProcessor};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
