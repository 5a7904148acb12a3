//! HTTP transport for openHAB clients.
//!
//! Builds the async and blocking client handles a resolved server
//! connection hands out: base URL, TLS trust mode, timeout, and HTTP
//! basic auth, applied identically to both handles.

pub mod auth;
pub mod client;
pub mod error;
pub mod normalize;
pub mod transport;

pub use auth::BasicCredentials;
pub use client::{AsyncHttpClient, SyncHttpClient, default_headers};
pub use error::Error;
pub use normalize::{normalize_url, resolve_url};
pub use transport::{ClientIdentity, TlsMode, TransportConfig};
