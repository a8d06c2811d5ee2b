//! Configuration file loading tests

use std::io::Write;

use usechain_config::{ConfigError, ExporterConfig, LogFormat};

#[test]
fn load_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[rpc]
url = "http://node.internal:8545"
timeout_secs = 5
user = "scraper"
password = "secret"

[server]
listen = "127.0.0.1:9200"

[block]
expose_fetch_failures = true

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let config = ExporterConfig::load(file.path()).unwrap();
    assert_eq!(config.rpc.url, "http://node.internal:8545");
    assert_eq!(config.rpc.timeout_secs, 5);
    assert_eq!(config.rpc.user.as_deref(), Some("scraper"));
    assert_eq!(config.server.listen.port(), 9200);
    assert_eq!(config.server.metrics_path, "/metrics");
    assert!(config.block.expose_fetch_failures);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ExporterConfig::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn load_reports_malformed_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rpc\nurl = ").unwrap();
    let result = ExporterConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn load_or_default_without_path() {
    let config = ExporterConfig::load_or_default(None).unwrap();
    assert_eq!(config, ExporterConfig::default());
}
