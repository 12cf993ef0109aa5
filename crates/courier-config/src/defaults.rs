/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default size in bytes of one bounded read or copy while splitting bodies.
pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Default chunk size used by the multipart splitter.
pub const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
