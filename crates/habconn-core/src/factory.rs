// ── Connection factory ──
//
// Resolves connection requests against the server configuration and a
// sampled network state, caching one `Connection` per kind. Callers hold
// `Arc` handles; the cache is the only long-lived owner and is cleared
// when the network or the configuration changes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{EndpointConfig, ServerConfig};
use crate::connection::{Connection, ConnectionKind, ConnectionRequest};
use crate::error::ConnectionError;
use crate::network::{NetworkClass, NetworkMonitor, NetworkType};
use crate::reachability::ReachabilityProbe;

// ── Availability ─────────────────────────────────────────────────

/// Outcome of the most recent "usable connection" resolution.
///
/// Observable through [`ConnectionFactory::subscribe`].
#[derive(Debug, Clone, Default)]
pub enum Availability {
    /// Nothing resolved since the last invalidation.
    #[default]
    Unknown,
    Available(Arc<Connection>),
    Failed(ConnectionError),
}

impl Availability {
    pub fn connection(&self) -> Option<&Arc<Connection>> {
        match self {
            Self::Available(connection) => Some(connection),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ConnectionError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether publishing `other` over `self` would tell watchers nothing
    /// new. Two failures never compare equal.
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unknown, Self::Unknown) => true,
            (Self::Available(a), Self::Available(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&Result<Arc<Connection>, ConnectionError>> for Availability {
    fn from(result: &Result<Arc<Connection>, ConnectionError>) -> Self {
        match result {
            Ok(connection) => Self::Available(Arc::clone(connection)),
            Err(err) => Self::Failed(err.clone()),
        }
    }
}

// ── Decision table ───────────────────────────────────────────────

/// Pick the connection kind an `Any` request resolves to.
///
/// Pure function of configuration and network type:
///
/// | network class  | local set | remote set | result                    |
/// |----------------|-----------|------------|---------------------------|
/// | unavailable    | -         | -          | `NetworkNotAvailable`     |
/// | unsupported    | -         | -          | `NetworkNotSupported`     |
/// | local-capable  | yes       | -          | `Local`                   |
/// | local-capable  | no        | yes        | `Remote`                  |
/// | local-capable  | no        | no         | `NoUrlInformation(local)` |
/// | remote-only    | -         | yes        | `Remote`                  |
/// | remote-only    | -         | no         | `NoUrlInformation`        |
///
/// The local server is never attempted off a LAN-like network.
pub fn select_kind(
    config: &ServerConfig,
    network: NetworkType,
) -> Result<ConnectionKind, ConnectionError> {
    match network.class() {
        NetworkClass::Unavailable => Err(ConnectionError::NetworkNotAvailable),
        NetworkClass::Unsupported => Err(ConnectionError::NetworkNotSupported { network }),
        NetworkClass::RemoteOnly => {
            if config.remote.is_configured() {
                Ok(ConnectionKind::Remote)
            } else {
                Err(ConnectionError::NoUrlInformation {
                    would_have_used_local: false,
                })
            }
        }
        NetworkClass::LocalCapable => {
            if config.local.is_configured() {
                Ok(ConnectionKind::Local)
            } else if config.remote.is_configured() {
                Ok(ConnectionKind::Remote)
            } else {
                Err(ConnectionError::NoUrlInformation {
                    would_have_used_local: true,
                })
            }
        }
    }
}

// ── Cache ────────────────────────────────────────────────────────

#[derive(Default)]
struct ConnectionCache {
    by_kind: HashMap<ConnectionKind, Arc<Connection>>,
    /// Result of the last `Any` request and the network it was decided on.
    any: Option<(NetworkType, Arc<Connection>)>,
}

impl ConnectionCache {
    fn get_or_build(&mut self, config: &ServerConfig, kind: ConnectionKind) -> Option<Arc<Connection>> {
        if let Some(existing) = self.by_kind.get(&kind) {
            return Some(Arc::clone(existing));
        }

        let connection = match kind {
            ConnectionKind::Local => build_endpoint(kind, &config.local, config)?,
            ConnectionKind::Remote => build_endpoint(kind, &config.remote, config)?,
            ConnectionKind::Cloud => self
                .get_or_build(config, ConnectionKind::Remote)?
                .with_kind(ConnectionKind::Cloud),
        };

        let connection = Arc::new(connection);
        debug!(%kind, url = %connection.base_url(), "connection created");
        self.by_kind.insert(kind, Arc::clone(&connection));
        Some(connection)
    }

    /// The demo connection, shared by the Local and Remote slots.
    fn demo(&mut self, config: &ServerConfig) -> Arc<Connection> {
        if let Some(existing) = self.by_kind.get(&ConnectionKind::Remote) {
            if existing.is_demo() {
                return Arc::clone(existing);
            }
        }
        let demo = Arc::new(Connection::demo(config.transport.clone()));
        self.by_kind.insert(ConnectionKind::Local, Arc::clone(&demo));
        self.by_kind.insert(ConnectionKind::Remote, Arc::clone(&demo));
        demo
    }

    fn clear(&mut self) {
        self.by_kind.clear();
        self.any = None;
    }
}

fn build_endpoint(
    kind: ConnectionKind,
    endpoint: &EndpointConfig,
    config: &ServerConfig,
) -> Option<Connection> {
    let url = endpoint.url.clone()?;
    Some(Connection::new(
        kind,
        url,
        endpoint.credentials(),
        config.transport.clone(),
    ))
}

// ── ConnectionFactory ────────────────────────────────────────────

/// Main entry point for obtaining server connections.
///
/// Share it via `Arc`; all methods take `&self` and are safe to call
/// from multiple threads.
pub struct ConnectionFactory {
    config: RwLock<ServerConfig>,
    cache: Mutex<ConnectionCache>,
    /// Bumped on every invalidation; lets slow resolutions detect that
    /// their result is stale.
    generation: AtomicU64,
    probe: ReachabilityProbe,
    availability: watch::Sender<Availability>,
}

impl ConnectionFactory {
    pub fn new(config: ServerConfig) -> Self {
        let (availability, _) = watch::channel(Availability::Unknown);
        Self {
            config: RwLock::new(config),
            cache: Mutex::new(ConnectionCache::default()),
            generation: AtomicU64::new(0),
            probe: ReachabilityProbe::default(),
            availability,
        }
    }

    /// Replace the probe used by [`resolve_reachable`](Self::resolve_reachable).
    pub fn with_probe(mut self, probe: ReachabilityProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn is_demo_mode(&self) -> bool {
        self.config.read().unwrap_or_else(PoisonError::into_inner).demo_mode
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ServerConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    // ── Resolution ───────────────────────────────────────────────

    /// Resolve a connection request.
    ///
    /// `Local`, `Remote` and `Cloud` return `Ok(None)` when the respective
    /// server is not configured; they never fail. `Any` always yields a
    /// connection or a typed error.
    pub fn connection(
        &self,
        request: ConnectionRequest,
        network: NetworkType,
    ) -> Result<Option<Arc<Connection>>, ConnectionError> {
        let kind = match request {
            ConnectionRequest::Any => return self.resolve_any(network).map(Some),
            ConnectionRequest::Local => ConnectionKind::Local,
            ConnectionRequest::Remote => ConnectionKind::Remote,
            ConnectionRequest::Cloud => ConnectionKind::Cloud,
        };

        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if config.demo_mode {
            return Ok(match kind {
                ConnectionKind::Cloud => None,
                ConnectionKind::Local | ConnectionKind::Remote => Some(cache.demo(&config)),
            });
        }
        Ok(cache.get_or_build(&config, kind))
    }

    /// The connection most likely to work on the given network.
    pub fn usable_connection(&self, network: NetworkType) -> Result<Arc<Connection>, ConnectionError> {
        self.resolve_any(network)
    }

    /// Like [`usable_connection`](Self::usable_connection), sampling the
    /// network from a monitor.
    pub fn usable_connection_from(
        &self,
        monitor: &dyn NetworkMonitor,
    ) -> Result<Arc<Connection>, ConnectionError> {
        self.resolve_any(monitor.current())
    }

    /// Resolve `Any`, but on a LAN-like network only pick the local server
    /// if a TCP connection to it succeeds; otherwise fall back to remote.
    ///
    /// This is the only resolution path that performs network I/O.
    pub async fn resolve_reachable(
        &self,
        network: NetworkType,
    ) -> Result<Arc<Connection>, ConnectionError> {
        if self.is_demo_mode() || network.class() != NetworkClass::LocalCapable {
            return self.resolve_any(network);
        }

        let generation = self.generation.load(Ordering::Acquire);

        if let Some(local) = self.connection(ConnectionRequest::Local, network)? {
            if self.probe.is_reachable(local.base_url()).await {
                debug!(url = %local.base_url(), "connecting to local URL");
                let result = Ok(local);
                self.publish_if_current(generation, &result);
                return result;
            }
            info!(url = %local.base_url(), "local server unreachable, trying remote");
        }

        let result = self
            .connection(ConnectionRequest::Remote, network)?
            .ok_or(ConnectionError::NoUrlInformation {
                would_have_used_local: true,
            });
        match &result {
            Ok(remote) => debug!(url = %remote.base_url(), "connecting to remote URL"),
            Err(err) => warn!(error = %err, "no usable connection"),
        }
        self.publish_if_current(generation, &result);
        result
    }

    fn resolve_any(&self, network: NetworkType) -> Result<Arc<Connection>, ConnectionError> {
        let generation = self.generation.load(Ordering::Acquire);
        let result = {
            let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Self::resolve_any_locked(&config, &mut cache, network)
        };

        if let Err(ref err) = result {
            warn!(%network, error = %err, "no usable connection");
        }
        self.publish_if_current(generation, &result);
        result
    }

    fn resolve_any_locked(
        config: &ServerConfig,
        cache: &mut ConnectionCache,
        network: NetworkType,
    ) -> Result<Arc<Connection>, ConnectionError> {
        if config.demo_mode {
            return Ok(cache.demo(config));
        }

        if let Some((decided_on, connection)) = &cache.any {
            if *decided_on == network {
                return Ok(Arc::clone(connection));
            }
        }

        let kind = select_kind(config, network)?;
        let connection = cache
            .get_or_build(config, kind)
            .ok_or(ConnectionError::NoUrlInformation {
                would_have_used_local: network.class() == NetworkClass::LocalCapable,
            })?;
        debug!(%network, %kind, url = %connection.base_url(), "selected connection");
        cache.any = Some((network, Arc::clone(&connection)));
        Ok(connection)
    }

    /// Peek at a cached connection without resolving.
    pub fn cached(&self, kind: ConnectionKind) -> Option<Arc<Connection>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_kind
            .get(&kind)
            .cloned()
    }

    // ── Invalidation ─────────────────────────────────────────────

    /// Drop every cached connection.
    pub fn invalidate(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
        debug!("connection cache cleared");
    }

    /// Hook for network change notifications.
    pub fn network_changed(&self) {
        self.invalidate();
        self.publish(Availability::Unknown);
    }

    /// Swap in new configuration.
    ///
    /// Returns `true` if anything changed, in which case the cache is
    /// cleared. An identical configuration keeps every cached connection.
    pub fn update_config(&self, new: ServerConfig) -> bool {
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            if *config == new {
                return false;
            }
            *config = new;
            // Cleared under the config lock so no reader pairs the new
            // config with connections built from the old one.
            self.invalidate();
        }
        info!("server configuration changed");
        self.publish(Availability::Unknown);
        true
    }

    // ── Notifications ────────────────────────────────────────────

    /// Subscribe to availability changes.
    pub fn subscribe(&self) -> watch::Receiver<Availability> {
        self.availability.subscribe()
    }

    /// The most recently published availability.
    pub fn availability(&self) -> Availability {
        self.availability.borrow().clone()
    }

    fn publish(&self, next: Availability) {
        self.availability.send_if_modified(|current| {
            if current.same_as(&next) {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn publish_if_current(&self, generation: u64, result: &Result<Arc<Connection>, ConnectionError>) {
        if self.generation.load(Ordering::Acquire) == generation {
            self.publish(Availability::from(result));
        } else {
            debug!("discarding stale resolution result");
        }
    }
}

impl std::fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("config", &self.config())
            .field("availability", &self.availability())
            .finish_non_exhaustive()
    }
}
