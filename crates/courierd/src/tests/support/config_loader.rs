//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use courier_config::Config;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use crate::bootstrap::ConfigLoader;

/// Loader that spools uploads into a private temporary directory.
pub struct TestConfigLoader {
    spool_dir: TempDir,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary spool directory");
        Self { spool_dir: dir }
    }

    /// Directory handed to the splitter.
    pub fn spool_path(&self) -> &std::path::Path {
        self.spool_dir.path()
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let spool_dir = Utf8PathBuf::from_path_buf(self.spool_dir.path().to_path_buf())
            .expect("temporary spool path was not valid UTF-8");
        Ok(Config {
            spool_dir: Some(spool_dir),
            chunk_size: 64,
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing invalid CLI arguments.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("courierd"),
            OsString::from("--log-format"),
            OsString::from("bogus"),
        ];
        Config::load_from_iter(args)
    }
}
