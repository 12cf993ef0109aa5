//! Shared configuration for the Courier request runtime.
//!
//! [`Config`] is layered by `ortho_config`: compiled defaults are overridden
//! by a configuration file, then by `COURIER_*` environment variables, then
//! by command-line flags. The daemon reads it once during bootstrap and hands
//! the relevant pieces to the multipart splitter and telemetry.

mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CHUNK_SIZE, DEFAULT_LOG_FILTER, default_chunk_size, default_log_filter_string,
    default_log_format,
};
pub use logging::LogFormat;

/// Runtime configuration shared by the daemon binary and its library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "COURIER")]
pub struct Config {
    /// Tracing filter expression, e.g. `info` or `courierd=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Directory receiving spool and attachment temp files.
    pub spool_dir: Option<Utf8PathBuf>,
    /// Size in bytes of each bounded read and copy.
    #[ortho_config(default = default_chunk_size())]
    pub chunk_size: usize,
    /// Request body processed by the binary as a single request.
    pub body_path: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            spool_dir: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            body_path: None,
        }
    }
}

impl Config {
    /// Tracing filter expression.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Selected log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Directory for temp files, when one is configured.
    #[must_use]
    pub fn spool_dir(&self) -> Option<&Utf8Path> {
        self.spool_dir.as_deref()
    }

    /// Chunk size for the splitter; a zero setting is clamped to one byte.
    #[must_use]
    pub fn splitter_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }

    /// Body file to process, when one is configured.
    #[must_use]
    pub fn body_path(&self) -> Option<&Utf8Path> {
        self.body_path.as_deref()
    }
}
