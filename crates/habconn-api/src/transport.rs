// Shared transport configuration for building reqwest clients.
//
// The async and blocking handles of a connection must agree on TLS trust,
// timeout, and default headers, so both are built from one config here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

const USER_AGENT: &str = concat!("habconn/", env!("CARGO_PKG_VERSION"));

/// Certificate trust mode for server connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled web PKI roots.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed home servers).
    DangerAcceptInvalid,
}

/// Client certificate presented during the TLS handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// PEM file holding the certificate chain.
    pub cert: PathBuf,
    /// PEM file holding the private key. `None` when the key sits in `cert`.
    pub key: Option<PathBuf>,
}

impl ClientIdentity {
    fn load(&self) -> Result<reqwest::Identity, Error> {
        let mut pem = read_pem("client cert", &self.cert)?;
        if let Some(key) = &self.key {
            pem.push(b'\n');
            pem.extend(read_pem("client key", key)?);
        }
        reqwest::Identity::from_pem(&pem)
            .map_err(|e| Error::Tls(format!("invalid client identity: {e}")))
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Skip hostname verification while still checking the chain.
    pub accept_invalid_hostnames: bool,
    pub client_identity: Option<ClientIdentity>,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            accept_invalid_hostnames: false,
            client_identity: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build an async `reqwest::Client` carrying the given default headers.
    pub fn build_async(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_hostnames(self.accept_invalid_hostnames);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                builder = builder.add_root_certificate(load_ca(path)?);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }
        if let Some(identity) = &self.client_identity {
            builder = builder.identity(identity.load()?);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Build a blocking `reqwest::blocking::Client` carrying the given default headers.
    ///
    /// reqwest refuses to construct a blocking client on a thread that is
    /// driving a tokio runtime, so inside one the build runs on a scratch
    /// thread. Requests on the returned client still block the caller.
    pub fn build_blocking(&self, headers: HeaderMap) -> Result<reqwest::blocking::Client, Error> {
        if tokio::runtime::Handle::try_current().is_err() {
            return self.blocking_client(headers);
        }
        let config = self.clone();
        std::thread::spawn(move || config.blocking_client(headers))
            .join()
            .map_err(|_| Error::Tls("HTTP client builder thread panicked".into()))?
    }

    fn blocking_client(&self, headers: HeaderMap) -> Result<reqwest::blocking::Client, Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_hostnames(self.accept_invalid_hostnames);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                builder = builder.add_root_certificate(load_ca(path)?);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }
        if let Some(identity) = &self.client_identity {
            builder = builder.identity(identity.load()?);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

fn read_pem(what: &str, path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::Tls(format!("failed to read {what} {}: {e}", path.display())))
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let cert_pem = read_pem("CA cert", path)?;
    reqwest::Certificate::from_pem(&cert_pem)
        .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))
}
