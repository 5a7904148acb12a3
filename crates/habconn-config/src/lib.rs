//! Persisted configuration for habconn.
//!
//! A single TOML file with a `[local]` and a `[remote]` endpoint section,
//! overlaid with `HABCONN_`-prefixed environment variables. Passwords are
//! resolved from an environment variable, the OS keyring, or plaintext,
//! in that order, and the result is translated into
//! `habconn_core::ServerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use habconn_core::{
    ClientIdentity, EndpointConfig, NetworkType, ServerConfig, TlsMode, TransportConfig,
};

/// Keyring service name; entries are keyed `"{endpoint}/password"`.
pub const KEYRING_SERVICE: &str = "habconn";

/// Prefix of environment overrides, e.g. `HABCONN_REMOTE__URL`.
pub const ENV_PREFIX: &str = "HABCONN_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Network type assumed when none is given on the command line.
    pub default_network: Option<NetworkType>,

    /// Talk to the public demo server instead of the configured endpoints.
    #[serde(default)]
    pub demo_mode: bool,

    #[serde(default)]
    pub transport: TransportSettings,

    /// Server on the local network.
    #[serde(default)]
    pub local: Endpoint,

    /// Externally reachable address of the same server.
    #[serde(default)]
    pub remote: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransportSettings {
    /// Accept any TLS certificate.
    #[serde(default)]
    pub insecure: bool,

    /// Skip hostname verification only.
    #[serde(default)]
    pub ignore_hostname: bool,

    /// Path to a PEM CA certificate for self-signed servers.
    pub ca_cert: Option<PathBuf>,

    /// PEM client certificate for servers that require one.
    pub client_cert: Option<PathBuf>,

    /// PEM private key for `client_cert`, unless that file holds it.
    pub client_key: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            insecure: false,
            ignore_hostname: false,
            ca_cert: None,
            client_cert: None,
            client_key: None,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// One server endpoint as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Endpoint {
    /// Base URL (e.g., "http://192.168.1.10:8080").
    pub url: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

/// Which endpoint section a setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointName {
    Local,
    Remote,
}

impl EndpointName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl Config {
    pub fn endpoint(&self, name: EndpointName) -> &Endpoint {
        match name {
            EndpointName::Local => &self.local,
            EndpointName::Remote => &self.remote,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "habconn", "habconn").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("habconn");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` + environment. A missing file is not an
/// error; defaults and environment values still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an endpoint's password.
///
/// Order: the variable named by `password_env`, the system keyring,
/// plaintext in the config. Nothing is looked up without a username,
/// since a password alone never produces credentials.
pub fn resolve_password(endpoint: &Endpoint, name: EndpointName) -> Option<SecretString> {
    resolve_password_with(
        endpoint,
        |var| std::env::var(var).ok(),
        || keyring_password(name),
    )
}

fn resolve_password_with(
    endpoint: &Endpoint,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn() -> Option<String>,
) -> Option<SecretString> {
    endpoint.username.as_ref()?;

    // 1. Endpoint's password_env → env var lookup
    if let Some(value) = endpoint.password_env.as_deref().and_then(&env) {
        return Some(SecretString::from(value));
    }

    // 2. System keyring
    if let Some(value) = keyring() {
        return Some(SecretString::from(value));
    }

    // 3. Plaintext in config
    endpoint.password.clone().map(SecretString::from)
}

fn keyring_password(name: EndpointName) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/password", name.as_str())).ok()?;
    entry.get_password().ok()
}

/// Store an endpoint's password in the system keyring.
pub fn store_password(name: EndpointName, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/password", name.as_str()))?;
    entry.set_password(password)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the runtime `ServerConfig`.
///
/// A URL that is set but unusable is reported instead of being silently
/// treated as "not configured".
pub fn to_server_config(cfg: &Config) -> Result<ServerConfig, ConfigError> {
    let local = endpoint_config(cfg, EndpointName::Local)?;
    let remote = endpoint_config(cfg, EndpointName::Remote)?;

    let tls = if cfg.transport.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.transport.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    if cfg.transport.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "transport.timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let client_identity = match (&cfg.transport.client_cert, &cfg.transport.client_key) {
        (Some(cert), key) => Some(ClientIdentity {
            cert: cert.clone(),
            key: key.clone(),
        }),
        (None, Some(_)) => {
            return Err(ConfigError::Validation {
                field: "transport.client_key".into(),
                reason: "set transport.client_cert as well".into(),
            });
        }
        (None, None) => None,
    };

    Ok(ServerConfig {
        local,
        remote,
        transport: TransportConfig {
            tls,
            accept_invalid_hostnames: cfg.transport.ignore_hostname,
            client_identity,
            timeout: Duration::from_secs(cfg.transport.timeout),
        },
        demo_mode: cfg.demo_mode,
    })
}

fn endpoint_config(cfg: &Config, name: EndpointName) -> Result<EndpointConfig, ConfigError> {
    let endpoint = cfg.endpoint(name);
    let raw = endpoint.url.as_deref().unwrap_or_default();
    let resolved = EndpointConfig::new(
        raw,
        endpoint.username.clone(),
        resolve_password(endpoint, name),
    );

    if !raw.trim().is_empty() && !resolved.is_configured() {
        return Err(ConfigError::Validation {
            field: format!("{}.url", name.as_str()),
            reason: format!("not an http(s) URL: {raw}"),
        });
    }
    Ok(resolved)
}
