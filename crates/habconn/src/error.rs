//! CLI error types with miette diagnostics.
//!
//! Maps connection-selection, transport, and config errors into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use habconn_config::ConfigError;
use habconn_core::{ConnectionError, ConnectionKind, NetworkType};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFIG: i32 = 5;
    pub const NETWORK: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection selection ─────────────────────────────────────────

    #[error("No network connection is available")]
    #[diagnostic(
        code(habconn::no_network),
        help("Pass the current network with --network (e.g., --network wifi).")
    )]
    NoNetwork,

    #[error("Network type '{network}' is not supported")]
    #[diagnostic(
        code(habconn::unsupported_network),
        help("Only wifi, ethernet, vpn and mobile networks are used to reach the server.")
    )]
    UnsupportedNetwork { network: NetworkType },

    #[error("No server URL is configured for the current network")]
    #[diagnostic(code(habconn::no_url), help("{hint}\nConfig file: {path}"))]
    NoUrl { hint: String, path: String },

    #[error("No {kind} server is configured")]
    #[diagnostic(
        code(habconn::not_configured),
        help("Set it with: habconn config set {kind}.url <URL>")
    )]
    NotConfigured { kind: ConnectionKind },

    // ── Transport ────────────────────────────────────────────────────

    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(habconn::connection_failed),
        help("Check that the server is running and reachable from this network.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: habconn_api::Error,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(habconn::tls_error),
        help(
            "Use --insecure (-k) to accept self-signed certificates, \
             or set transport.ca_cert in the config file."
        )
    )]
    TlsError { message: String },

    #[error("Authentication failed for {url}")]
    #[diagnostic(
        code(habconn::auth_failed),
        help(
            "Verify the username and password of this endpoint.\n\
             Run: habconn config set-password <local|remote>"
        )
    )]
    AuthFailed { url: String },

    #[error("{url} not found")]
    #[diagnostic(code(habconn::not_found))]
    NotFound { url: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(habconn::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Request failed: {0}")]
    #[diagnostic(code(habconn::request_failed))]
    Request(habconn_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(habconn::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(habconn::config),
        help("Check the config file; `habconn config path` shows where it is.")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(code(habconn::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(habconn::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoNetwork | Self::UnsupportedNetwork { .. } => exit_code::NETWORK,
            Self::NoUrl { .. } | Self::NotConfigured { .. } | Self::Config(_) | Self::ConfigExists { .. } => {
                exit_code::CONFIG
            }
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Request(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }

    /// Map a connection-selection failure, naming the config file in the hint.
    pub fn from_connection(err: ConnectionError, config_path: &str) -> Self {
        match err {
            ConnectionError::NetworkNotAvailable => Self::NoNetwork,
            ConnectionError::NetworkNotSupported { network } => Self::UnsupportedNetwork { network },
            ConnectionError::NoUrlInformation {
                would_have_used_local,
            } => Self::NoUrl {
                hint: if would_have_used_local {
                    "Configure a local or remote URL: habconn config set local.url <URL>".into()
                } else {
                    "Only the remote server is used on mobile data: habconn config set remote.url <URL>"
                        .into()
                },
                path: config_path.into(),
            },
        }
    }

    /// Map a transport failure for a request to `url`.
    pub fn from_api(err: habconn_api::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_unauthorized() {
            return Self::AuthFailed { url: url.into() };
        }
        if err.is_not_found() {
            return Self::NotFound { url: url.into() };
        }
        match err {
            habconn_api::Error::Tls(message) => Self::TlsError { message },
            habconn_api::Error::Transport(e) if e.is_timeout() => Self::Timeout {
                seconds: timeout_secs,
            },
            habconn_api::Error::Transport(e) if e.is_connect() => Self::ConnectionFailed {
                url: url.into(),
                source: habconn_api::Error::Transport(e),
            },
            other => Self::Request(other),
        }
    }
}
