//! Connection selection for openHAB clients.
//!
//! Decides how to reach the home-automation server from the configured
//! endpoints and the current network:
//!
//! - **[`ConnectionFactory`]**: resolves [`ConnectionRequest`]s (`Any`,
//!   `Local`, `Remote`, `Cloud`) to shared [`Connection`] handles and
//!   caches one per kind until the network or the configuration changes.
//!   [`select_kind`] is the pure decision table behind `Any`.
//!
//! - **[`Connection`]**: kind, base URL, credentials, and lazily built
//!   async/blocking HTTP handles from `habconn-api`.
//!
//! - **[`ConnectionError`]**: typed, user-recoverable failures:
//!   no network, unsupported network, no URL configured.
//!
//! - **[`ReachabilityProbe`]**: TCP probe used by
//!   [`ConnectionFactory::resolve_reachable`] to skip a local server that
//!   is not actually on the current LAN.

pub mod config;
pub mod connection;
pub mod error;
pub mod factory;
pub mod network;
pub mod reachability;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{EndpointConfig, ServerConfig};
pub use connection::{Connection, ConnectionKind, ConnectionRequest, DEMO_SERVER_URL};
pub use error::ConnectionError;
pub use factory::{Availability, ConnectionFactory, select_kind};
pub use network::{NetworkClass, NetworkMonitor, NetworkType, StaticNetwork};
pub use reachability::ReachabilityProbe;

pub use habconn_api::{ClientIdentity, TlsMode, TransportConfig};
