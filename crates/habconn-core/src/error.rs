// ── Connection selection errors ──
//
// Every variant is something the user can fix (turn on a network, fill
// in a URL). None of them are internal failures, and none are retried
// here: the caller decides whether to prompt or show a "no network" state.

use thiserror::Error;

use crate::network::NetworkType;

/// Why no usable connection could be selected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// There is no active network interface at all.
    #[error("No network connection is available")]
    NetworkNotAvailable,

    /// The active interface is of a type we never route server traffic over.
    #[error("Network type '{network}' is not supported")]
    NetworkNotSupported { network: NetworkType },

    /// No URL is configured for the path the current network allows.
    #[error("No server URL is configured for the current network")]
    NoUrlInformation {
        /// `true` when the network would have allowed the local server,
        /// so configuring a local URL would have helped.
        would_have_used_local: bool,
    },
}

impl ConnectionError {
    /// Returns `true` if fixing the configuration (not the network) resolves this.
    pub fn is_configuration_issue(&self) -> bool {
        matches!(self, Self::NoUrlInformation { .. })
    }

    /// Returns `true` if the device network state is the problem.
    pub fn is_network_issue(&self) -> bool {
        matches!(
            self,
            Self::NetworkNotAvailable | Self::NetworkNotSupported { .. }
        )
    }
}
