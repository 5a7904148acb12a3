//! Command dispatch: builds the connection factory from config + flags
//! and hands it to the server-bound handlers.

pub mod config_cmd;
pub mod get;
pub mod probe;
pub mod resolve;

use std::sync::Arc;

use serde::Serialize;

use habconn_core::{
    Connection, ConnectionFactory, ConnectionKind, ConnectionRequest, NetworkType,
};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Everything a server-bound command needs.
pub struct Context {
    pub factory: ConnectionFactory,
    pub network: NetworkType,
    pub config_path: String,
    pub timeout_secs: u64,
}

impl Context {
    pub fn new(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load(global)?;
        let server = config::server_config(global, &cfg)?;
        let network = config::network(global, &cfg);
        tracing::debug!(%network, demo = server.demo_mode, "building connection factory");

        Ok(Self {
            timeout_secs: config::timeout_secs(&server),
            factory: ConnectionFactory::new(server),
            network,
            config_path: config::config_path(global).display().to_string(),
        })
    }

    /// Resolve a connection request, turning "not configured" into an error.
    pub async fn connection(
        &self,
        request: ConnectionRequest,
        reachable: bool,
    ) -> Result<Arc<Connection>, CliError> {
        let kind = match request {
            ConnectionRequest::Any => {
                let result = if reachable {
                    self.factory.resolve_reachable(self.network).await
                } else {
                    self.factory.usable_connection(self.network)
                };
                return result.map_err(|e| CliError::from_connection(e, &self.config_path));
            }
            ConnectionRequest::Local => ConnectionKind::Local,
            ConnectionRequest::Remote => ConnectionKind::Remote,
            ConnectionRequest::Cloud => ConnectionKind::Cloud,
        };

        self.factory
            .connection(request, self.network)
            .map_err(|e| CliError::from_connection(e, &self.config_path))?
            .ok_or(CliError::NotConfigured { kind })
    }
}

/// Serializable summary of a resolved connection.
#[derive(Debug, Serialize)]
pub struct ConnectionReport {
    pub kind: ConnectionKind,
    pub url: String,
    pub network: NetworkType,
    pub username: Option<String>,
    pub authenticated: bool,
    pub remote_compatible: bool,
    pub demo: bool,
}

impl ConnectionReport {
    pub fn new(connection: &Connection, network: NetworkType) -> Self {
        Self {
            kind: connection.kind(),
            url: connection.base_url().to_string(),
            network,
            username: connection.username().map(str::to_owned),
            authenticated: connection.credentials().is_some(),
            remote_compatible: connection.is_remote_compatible(),
            demo: connection.is_demo(),
        }
    }
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Resolve(args) => resolve::handle(args, ctx, global).await,
        Command::Probe => probe::handle(ctx, global).await,
        Command::Get(args) => get::handle(args, ctx, global).await,
        // Config and Completions never reach the factory.
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "not a server command".into(),
        }),
    }
}
