//! CLI-side configuration: honours `--config` and applies flag overrides
//! on top of what `habconn-config` loads.

use std::path::PathBuf;
use std::time::Duration;

use habconn_config::{Config, to_server_config};
use habconn_core::{EndpointConfig, NetworkType, ServerConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Network assumed when neither `--network` nor the config names one.
const FALLBACK_NETWORK: NetworkType = NetworkType::Wifi;

pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(habconn_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(habconn_config::load_config_from(&config_path(global))?)
}

/// Network to resolve against: flag, then config, then WiFi.
pub fn network(global: &GlobalOpts, cfg: &Config) -> NetworkType {
    global
        .network
        .or(cfg.default_network)
        .unwrap_or(FALLBACK_NETWORK)
}

/// Build the runtime `ServerConfig` with CLI flag overrides applied.
pub fn server_config(global: &GlobalOpts, cfg: &Config) -> Result<ServerConfig, CliError> {
    let mut server = to_server_config(cfg)?;

    if let Some(ref url) = global.local {
        server.local = override_endpoint("--local", url, &server.local)?;
    }
    if let Some(ref url) = global.remote {
        server.remote = override_endpoint("--remote", url, &server.remote)?;
    }
    if global.demo {
        server.demo_mode = true;
    }
    if global.insecure {
        server.transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        server.transport.timeout = Duration::from_secs(secs);
    }
    Ok(server)
}

/// Effective request timeout in seconds, for error messages.
pub fn timeout_secs(server: &ServerConfig) -> u64 {
    server.transport.timeout.as_secs()
}

// Keeps the configured login so `--remote` can point at a test server
// without re-entering credentials.
fn override_endpoint(
    flag: &str,
    url: &str,
    current: &EndpointConfig,
) -> Result<EndpointConfig, CliError> {
    let endpoint = EndpointConfig::new(url, current.username.clone(), current.password.clone());
    if endpoint.is_configured() {
        Ok(endpoint)
    } else {
        Err(CliError::Validation {
            field: flag.into(),
            reason: format!("not an http(s) URL: {url}"),
        })
    }
}
