// ── Runtime server configuration ──
//
// These types describe *where* the server lives and how to authenticate.
// They never touch disk: `habconn-config` (or any other settings store)
// builds a `ServerConfig` and hands it to the factory.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use habconn_api::{BasicCredentials, TransportConfig, normalize_url};

/// One server endpoint (local or remote): URL plus optional login.
#[derive(Debug, Clone, Default)]
pub struct EndpointConfig {
    /// Normalized base URL. `None` means "not configured".
    pub url: Option<Url>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl EndpointConfig {
    /// Build an endpoint from raw settings values.
    ///
    /// The URL is normalized; empty or unusable input leaves the endpoint
    /// unconfigured.
    pub fn new(url: &str, username: Option<String>, password: Option<SecretString>) -> Self {
        Self {
            url: normalize_url(url),
            username,
            password,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Basic-auth credentials, if both username and password are set.
    pub fn credentials(&self) -> Option<BasicCredentials> {
        BasicCredentials::from_parts(self.username.as_deref(), self.password.as_ref())
    }
}

impl PartialEq for EndpointConfig {
    fn eq(&self, other: &Self) -> bool {
        let password = |e: &Self| e.password.as_ref().map(|p| p.expose_secret().to_owned());
        self.url == other.url && self.username == other.username && password(self) == password(other)
    }
}

impl Eq for EndpointConfig {}

/// Everything needed to resolve a server connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server on the local network.
    pub local: EndpointConfig,
    /// Directly reachable external address (or cloud relay).
    pub remote: EndpointConfig,
    /// TLS trust and timeout applied to every connection.
    pub transport: TransportConfig,
    /// Ignore the endpoints and talk to the public demo server.
    pub demo_mode: bool,
}

impl ServerConfig {
    /// Convenience constructor for URL-only setups.
    pub fn with_urls(local: Option<&str>, remote: Option<&str>) -> Self {
        Self {
            local: EndpointConfig::new(local.unwrap_or_default(), None, None),
            remote: EndpointConfig::new(remote.unwrap_or_default(), None, None),
            ..Self::default()
        }
    }
}
