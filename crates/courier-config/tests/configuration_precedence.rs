//! Checks that command-line flags and configuration files override defaults.

use std::ffi::OsString;
use std::fs;

use ortho_config::OrthoConfig;
use rstest::rstest;
use tempfile::TempDir;

use courier_config::{Config, DEFAULT_CHUNK_SIZE, LogFormat};

fn args(extra: &[&str]) -> Vec<OsString> {
    std::iter::once("courierd")
        .chain(extra.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn bare_invocation_uses_defaults() {
    let config = Config::load_from_iter(args(&[])).expect("defaults should load");
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert!(config.body_path().is_none());
}

#[rstest]
#[case::filter(&["--log-filter", "debug"], "debug", LogFormat::Json)]
#[case::format(&["--log-format", "compact"], "info", LogFormat::Compact)]
fn cli_flags_override_logging(
    #[case] flags: &[&str],
    #[case] filter: &str,
    #[case] format: LogFormat,
) {
    let config = Config::load_from_iter(args(flags)).expect("flags should load");
    assert_eq!(config.log_filter(), filter);
    assert_eq!(config.log_format(), format);
}

#[test]
fn cli_flag_overrides_chunk_size() {
    let config =
        Config::load_from_iter(args(&["--chunk-size", "4096"])).expect("chunk size should load");
    assert_eq!(config.splitter_chunk_size(), 4096);
}

#[test]
fn configuration_file_sets_spool_directory() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("courier.toml");
    fs::write(&path, "spool_dir = \"/var/spool/courier\"\n").expect("write config");

    let path_text = path.to_str().expect("utf-8 temp path");
    let config = Config::load_from_iter(args(&["--config-path", path_text]))
        .expect("config file should load");
    assert_eq!(
        config.spool_dir().map(camino::Utf8Path::as_str),
        Some("/var/spool/courier")
    );
}
