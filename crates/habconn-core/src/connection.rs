// ── Resolved server connection ──
//
// A `Connection` is one concrete way to reach the server: kind, base URL,
// credentials, and the HTTP handles built from them. Handles are built on
// first use and then reused for the lifetime of the connection.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use habconn_api::{AsyncHttpClient, BasicCredentials, SyncHttpClient, TransportConfig};

/// Public demo server used when demo mode is enabled.
pub const DEMO_SERVER_URL: &str = "https://demo.openhab.org:8443/";

/// Kind of a resolved connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Server on the local network.
    Local,
    /// Directly configured external address.
    Remote,
    /// Remote server tagged as offering cloud features (notifications).
    Cloud,
}

/// What a caller asks the factory for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionRequest {
    /// Whatever is most likely to work on the current network.
    Any,
    Local,
    Remote,
    Cloud,
}

impl From<ConnectionKind> for ConnectionRequest {
    fn from(kind: ConnectionKind) -> Self {
        match kind {
            ConnectionKind::Local => Self::Local,
            ConnectionKind::Remote => Self::Remote,
            ConnectionKind::Cloud => Self::Cloud,
        }
    }
}

/// A resolved way to reach the server.
#[derive(Debug)]
pub struct Connection {
    kind: ConnectionKind,
    base_url: Url,
    credentials: Option<BasicCredentials>,
    transport: TransportConfig,
    demo: bool,
    async_client: OnceLock<AsyncHttpClient>,
    sync_client: OnceLock<SyncHttpClient>,
}

impl Connection {
    pub fn new(
        kind: ConnectionKind,
        base_url: Url,
        credentials: Option<BasicCredentials>,
        transport: TransportConfig,
    ) -> Self {
        Self {
            kind,
            base_url,
            credentials,
            transport,
            demo: false,
            async_client: OnceLock::new(),
            sync_client: OnceLock::new(),
        }
    }

    /// Connection to the public demo server. No client certificate is
    /// presented to it.
    pub(crate) fn demo(transport: TransportConfig) -> Self {
        let mut connection = Self::new(
            ConnectionKind::Remote,
            Url::parse(DEMO_SERVER_URL).unwrap_or_else(|_| unreachable!("demo URL is valid")),
            None,
            TransportConfig {
                client_identity: None,
                ..transport
            },
        );
        connection.demo = true;
        connection
    }

    /// A copy of this connection with a different kind, sharing URL,
    /// credentials and transport settings. HTTP handles are rebuilt lazily.
    pub fn with_kind(&self, kind: ConnectionKind) -> Self {
        Self {
            kind,
            base_url: self.base_url.clone(),
            credentials: self.credentials.clone(),
            transport: self.transport.clone(),
            demo: self.demo,
            async_client: OnceLock::new(),
            sync_client: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    /// `true` for Remote and Cloud: both talk to the remote endpoint.
    pub fn is_remote_compatible(&self) -> bool {
        matches!(self.kind, ConnectionKind::Remote | ConnectionKind::Cloud)
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(BasicCredentials::username)
    }

    pub fn credentials(&self) -> Option<&BasicCredentials> {
        self.credentials.as_ref()
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// The asynchronous HTTP handle, built on first call.
    pub fn async_client(&self) -> Result<&AsyncHttpClient, habconn_api::Error> {
        if let Some(client) = self.async_client.get() {
            return Ok(client);
        }
        let client =
            AsyncHttpClient::new(self.base_url.clone(), self.credentials.as_ref(), &self.transport)?;
        Ok(self.async_client.get_or_init(|| client))
    }

    /// The blocking HTTP handle, built on first call. Safe to build from
    /// async code; its requests block the calling thread.
    pub fn sync_client(&self) -> Result<&SyncHttpClient, habconn_api::Error> {
        if let Some(client) = self.sync_client.get() {
            return Ok(client);
        }
        let client =
            SyncHttpClient::new(self.base_url.clone(), self.credentials.as_ref(), &self.transport)?;
        Ok(self.sync_client.get_or_init(|| client))
    }
}

#[cfg(test)]
mod tests {
    use habconn_api::ClientIdentity;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;

    const TEST_BASE_URL: &str = "https://demo.local:8443/";

    fn connection(kind: ConnectionKind, credentials: Option<BasicCredentials>) -> Connection {
        Connection::new(
            kind,
            Url::parse(TEST_BASE_URL).expect("valid"),
            credentials,
            TransportConfig::default(),
        )
    }

    fn credentials() -> Option<BasicCredentials> {
        let password = SecretString::from("Test-Password".to_owned());
        BasicCredentials::from_parts(Some("Test-User"), Some(&password))
    }

    #[test]
    fn kind_and_url_are_kept() {
        let local = connection(ConnectionKind::Local, None);
        assert_eq!(local.kind(), ConnectionKind::Local);
        assert_eq!(local.base_url().as_str(), TEST_BASE_URL);
        assert!(!local.is_remote_compatible());
        assert_eq!(local.username(), None);
    }

    #[test]
    fn cloud_is_remote_compatible() {
        let remote = connection(ConnectionKind::Remote, credentials());
        let cloud = remote.with_kind(ConnectionKind::Cloud);
        assert_eq!(cloud.kind(), ConnectionKind::Cloud);
        assert!(cloud.is_remote_compatible());
        assert_eq!(cloud.base_url(), remote.base_url());
        assert_eq!(cloud.username(), Some("Test-User"));
    }

    #[test]
    fn sync_client_is_cached() {
        let conn = connection(ConnectionKind::Local, None);
        let first = conn.sync_client().expect("client");
        let second = conn.sync_client().expect("client");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn async_client_is_cached() {
        let conn = connection(ConnectionKind::Local, None);
        let first = conn.async_client().expect("client");
        let second = conn.async_client().expect("client");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn handles_without_credentials_have_no_authorization() {
        let conn = connection(ConnectionKind::Local, None);
        let async_headers = conn.async_client().expect("client").headers();
        let sync_headers = conn.sync_client().expect("client").headers();
        assert!(!async_headers.contains_key("authorization"));
        assert!(!sync_headers.contains_key("authorization"));
    }

    #[test]
    fn both_handles_carry_the_same_basic_auth() {
        let conn = connection(ConnectionKind::Local, credentials());
        let expected = "Basic VGVzdC1Vc2VyOlRlc3QtUGFzc3dvcmQ=";

        let async_auth = conn.async_client().expect("client").headers().get("authorization");
        let sync_auth = conn.sync_client().expect("client").headers().get("authorization");
        assert_eq!(async_auth.and_then(|v| v.to_str().ok()), Some(expected));
        assert_eq!(sync_auth.and_then(|v| v.to_str().ok()), Some(expected));
    }

    #[test]
    fn demo_connection_points_at_demo_server() {
        let demo = Connection::demo(TransportConfig::default());
        assert!(demo.is_demo());
        assert_eq!(demo.kind(), ConnectionKind::Remote);
        assert_eq!(demo.base_url().as_str(), DEMO_SERVER_URL);
        assert!(demo.credentials().is_none());
    }

    #[test]
    fn demo_connection_drops_client_identity() {
        let transport = TransportConfig {
            client_identity: Some(ClientIdentity {
                cert: "/etc/habconn/client.pem".into(),
                key: None,
            }),
            ..TransportConfig::default()
        };
        let demo = Connection::demo(transport);
        assert_eq!(demo.transport().client_identity, None);
    }

    #[tokio::test]
    async fn sync_client_can_be_built_from_async_code() {
        let conn = connection(ConnectionKind::Remote, credentials());
        let sync_auth = conn.sync_client().expect("client").headers().get("authorization");
        assert_eq!(
            sync_auth.and_then(|v| v.to_str().ok()),
            Some("Basic VGVzdC1Vc2VyOlRlc3QtUGFzc3dvcmQ=")
        );
    }
}
