//! BDD test world: loader, reporter, catalog choice and runtime state for step functions.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;

use courier_multipart::{FileToken, NoProgress};
use courier_multipart::testing::MultipartBodyBuilder;
use courier_plugins::{LoaderError, Plugin, PluginCatalog, PluginDescriptor, PluginKind};

use serde_json::{Value, json};

use crate::bootstrap::{BootstrapError, ConfigLoader, Runtime, bootstrap_with};
use crate::builtin;
use crate::dispatch::BatchResponse;
use crate::pipeline::ProcessError;

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;

/// Which plugin catalog bootstrap should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogChoice {
    /// The shipped plugins.
    Builtin,
    /// The shipped providers without the `core` plugin they require.
    WithoutCore,
    /// Two plugins requiring each other.
    Cyclic,
}

struct Marker;

impl Plugin for Marker {}

fn marker(id: &str, requires: &str) -> PluginDescriptor {
    PluginDescriptor::new(id, "1.0", PluginKind::Plugin, |_| Ok(Arc::new(Marker))).requires([requires])
}

impl CatalogChoice {
    fn build(self) -> Result<PluginCatalog, LoaderError> {
        match self {
            Self::Builtin => builtin::catalog(),
            Self::WithoutCore => {
                let mut catalog = PluginCatalog::new();
                for descriptor in builtin::descriptors() {
                    if descriptor.id() != builtin::CORE_PLUGIN {
                        catalog.add(descriptor)?;
                    }
                }
                Ok(catalog)
            }
            Self::Cyclic => {
                let mut catalog = PluginCatalog::new();
                catalog.add(marker("alpha", "beta"))?;
                catalog.add(marker("beta", "alpha"))?;
                Ok(catalog)
            }
        }
    }
}

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    loader: Box<dyn ConfigLoader>,
    spool_dir: Option<PathBuf>,
    pub reporter: Arc<RecordingHealthReporter>,
    catalog: CatalogChoice,
    runtime: Option<Runtime>,
    bootstrap_error: Option<BootstrapError>,
    calls: Vec<Value>,
    body: MultipartBodyBuilder,
    outcome: Option<Result<BatchResponse, ProcessError>>,
}

impl TestWorld {
    /// Builds a world with a successful configuration loader and the
    /// built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        let loader = TestConfigLoader::new();
        Self {
            spool_dir: Some(loader.spool_path().to_path_buf()),
            loader: Box::new(loader),
            reporter: Arc::new(RecordingHealthReporter::default()),
            catalog: CatalogChoice::Builtin,
            runtime: None,
            bootstrap_error: None,
            calls: Vec::new(),
            body: MultipartBodyBuilder::new("courier-bdd"),
            outcome: None,
        }
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
        self.spool_dir = None;
        self.reset_results();
    }

    /// Selects the catalog bootstrap loads.
    pub fn use_catalog(&mut self, catalog: CatalogChoice) {
        self.catalog = catalog;
        self.reset_results();
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.runtime.is_some() || self.bootstrap_error.is_some() {
            return;
        }

        let catalog = self.catalog;
        match bootstrap_with(&*self.loader, self.reporter.clone(), move || catalog.build()) {
            Ok(runtime) => self.runtime = Some(runtime),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Returns the bootstrap error, if any.
    pub const fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    /// Returns the runtime produced by bootstrap.
    pub const fn runtime(&self) -> Option<&Runtime> {
        self.runtime.as_ref()
    }

    /// Installs a loader that succeeds.
    pub fn use_successful_loader(&mut self) {
        let loader = TestConfigLoader::new();
        self.spool_dir = Some(loader.spool_path().to_path_buf());
        self.loader = Box::new(loader);
        self.reset_results();
    }

    /// Queues a call for the request's call-map.
    pub fn add_call(&mut self, method: &str, args: Vec<Value>) {
        self.calls.push(json!([method, args]));
    }

    /// Appends a file part to the request body.
    pub fn add_file(&mut self, token: &FileToken, file_name: &str, content: &[u8]) {
        self.body = self
            .body
            .clone()
            .file(token, file_name, "application/octet-stream", content);
    }

    /// Bootstraps if needed and processes the assembled body.
    pub fn process(&mut self) {
        self.bootstrap();
        let runtime = self.runtime.as_ref().expect("bootstrap should succeed");
        let call_map = Value::Array(self.calls.clone()).to_string();
        let mut reader = self
            .body
            .clone()
            .call_map(&call_map)
            .reader()
            .expect("body reader");
        self.outcome = Some(
            runtime
                .processor()
                .process(&mut reader, "bdd-upload", &NoProgress),
        );
    }

    /// Batch response of the processed request.
    pub fn responses(&self) -> &BatchResponse {
        self.outcome
            .as_ref()
            .expect("request not processed")
            .as_ref()
            .expect("processing should succeed")
    }

    /// Number of entries left in the spool directory.
    pub fn spooled_entries(&self) -> usize {
        self.spool_dir.as_ref().map_or(0, |dir| {
            std::fs::read_dir(dir)
                .expect("read spool directory")
                .count()
        })
    }

    fn reset_results(&mut self) {
        self.runtime = None;
        self.bootstrap_error = None;
        self.outcome = None;
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default test world fixture.
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
