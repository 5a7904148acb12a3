#![allow(clippy::unwrap_used)]
// File-based config loading and saving.

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;

use habconn_config::{
    Config, ConfigError, Endpoint, load_config_from, save_config_to, to_server_config,
};
use habconn_core::{NetworkType, TlsMode};

// ── Helpers ─────────────────────────────────────────────────────────

fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

// ── Loading ─────────────────────────────────────────────────────────

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.local, Endpoint::default());
    assert_eq!(cfg.remote, Endpoint::default());
    assert_eq!(cfg.transport.timeout, 30);
    assert!(!cfg.demo_mode);
}

#[test]
fn test_load_full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
default_network = "ethernet"

[transport]
ignore_hostname = true
timeout = 10
client_cert = "/etc/habconn/client.pem"

[local]
url = "http://192.168.1.10:8080"

[remote]
url = "https://home.example.org"
username = "me"
password = "hunter2"
"#,
    );

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.default_network, Some(NetworkType::Ethernet));
    assert_eq!(cfg.local.url.as_deref(), Some("http://192.168.1.10:8080"));
    assert_eq!(cfg.remote.username.as_deref(), Some("me"));

    let server = to_server_config(&cfg).unwrap();
    assert_eq!(
        server.local.url.as_ref().map(url::Url::as_str),
        Some("http://192.168.1.10:8080/")
    );
    assert_eq!(
        server.remote.url.as_ref().map(url::Url::as_str),
        Some("https://home.example.org/")
    );
    assert_eq!(server.remote.credentials().unwrap().username(), "me");
    assert!(server.local.credentials().is_none());
    assert_eq!(server.transport.tls, TlsMode::System);
    assert!(server.transport.accept_invalid_hostnames);
    assert_eq!(server.transport.timeout, Duration::from_secs(10));
    let identity = server.transport.client_identity.unwrap();
    assert_eq!(identity.cert, PathBuf::from("/etc/habconn/client.pem"));
    assert_eq!(identity.key, None);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[local\nurl = ");

    let err = load_config_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Figment(_)));
}

#[test]
fn test_unknown_network_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "default_network = \"carrier-pigeon\"\n");

    assert!(load_config_from(&path).is_err());
}

// ── Saving ──────────────────────────────────────────────────────────

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config {
        default_network: Some(NetworkType::Mobile),
        demo_mode: true,
        ..Config::default()
    };
    cfg.remote.url = Some("https://home.example.org".into());
    cfg.transport.ca_cert = Some(PathBuf::from("/etc/ssl/home.pem"));

    save_config_to(&cfg, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[remote]"));
    assert!(!written.contains("password"));

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, cfg);
}
