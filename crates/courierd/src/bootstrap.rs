//! Runtime bootstrap orchestration.

use std::sync::Arc;

use courier_config::Config;
use courier_plugins::{CallRegistry, LoaderError, PluginCatalog, PluginLoader};
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use crate::health::HealthReporter;
use crate::pipeline::RequestProcessor;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the runtime configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The plugin catalog could not be built or activated.
    #[error("failed to load plugins: {source}")]
    Plugins {
        /// Underlying loader error.
        #[source]
        source: LoaderError,
    },
}

/// Result of a successful bootstrap invocation.
#[derive(Debug)]
pub struct Runtime {
    config: Config,
    plugins: Vec<String>,
    registry: Arc<CallRegistry>,
    telemetry: TelemetryHandle,
    processor: RequestProcessor,
}

impl Runtime {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Plugin identities in activation order.
    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Shared registry of callable methods.
    #[must_use]
    pub fn registry(&self) -> Arc<CallRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Request processor configured from the runtime settings.
    #[must_use]
    pub const fn processor(&self) -> &RequestProcessor {
        &self.processor
    }
}

/// Bootstraps the runtime using the supplied collaborators.
///
/// `catalog` is only invoked once configuration and telemetry are ready, so
/// plugin factories can log through the installed subscriber.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration, telemetry or plugin loading
/// fails. The reporter is told about the failure before it is returned.
pub fn bootstrap_with<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    catalog: F,
) -> Result<Runtime, BootstrapError>
where
    F: FnOnce() -> Result<PluginCatalog, LoaderError>,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let loaded = match catalog().and_then(|entries| PluginLoader::new().load(entries)) {
        Ok(loaded) => loaded,
        Err(source) => {
            let error = BootstrapError::Plugins { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    for descriptor in loaded.descriptors() {
        reporter.plugin_activated(descriptor);
    }
    let plugins = loaded
        .activation_order()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let registry = Arc::new(loaded.into_registry());
    reporter.methods_registered(registry.len());

    let processor = RequestProcessor::from_config(Arc::clone(&registry), &config);
    reporter.bootstrap_succeeded(&config);

    Ok(Runtime {
        config,
        plugins,
        registry,
        telemetry,
        processor,
    })
}
