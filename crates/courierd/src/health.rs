//! Structured health reporting for runtime lifecycle events.

use std::sync::Arc;

use courier_config::Config;
use courier_plugins::PluginDescriptor;

use crate::bootstrap::BootstrapError;

/// Tracing target for lifecycle events.
const HEALTH_TARGET: &str = "courierd::health";

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once per plugin, in activation order.
    fn plugin_activated(&self, descriptor: &PluginDescriptor);

    /// Invoked after the call registry has been built.
    fn methods_registered(&self, count: usize);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn plugin_activated(&self, descriptor: &PluginDescriptor) {
        (**self).plugin_activated(descriptor);
    }

    fn methods_registered(&self, count: usize) {
        (**self).methods_registered(count);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting runtime bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            chunk_size = config.splitter_chunk_size(),
            spool_dir = ?config.spool_dir(),
            "runtime bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "runtime bootstrap failed"
        );
    }

    fn plugin_activated(&self, descriptor: &PluginDescriptor) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "plugin_activated",
            plugin = descriptor.id(),
            version = descriptor.version(),
            kind = %descriptor.kind(),
            "plugin active"
        );
    }

    fn methods_registered(&self, count: usize) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "methods_registered",
            count,
            "call registry ready"
        );
    }
}
