// ── Network state snapshot ──
//
// The active network type is sampled by the caller (platform glue, CLI
// flag, test) and passed in explicitly. Nothing in this crate queries the
// operating system for it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Type of the currently active network interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// No active network.
    None,
    Wifi,
    Ethernet,
    Vpn,
    /// Cellular data.
    Mobile,
    /// Bluetooth tethering.
    Bluetooth,
    /// Connected, but of a type the platform could not classify.
    Unknown,
}

/// How a network type affects server selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkClass {
    /// No network at all.
    Unavailable,
    /// A LAN-like network where the local server may be reachable.
    LocalCapable,
    /// A network where only the remote server is assumed reachable.
    RemoteOnly,
    /// A network we do not route server traffic over.
    Unsupported,
}

impl NetworkType {
    pub fn class(self) -> NetworkClass {
        match self {
            Self::None => NetworkClass::Unavailable,
            Self::Wifi | Self::Ethernet | Self::Vpn => NetworkClass::LocalCapable,
            Self::Mobile => NetworkClass::RemoteOnly,
            Self::Bluetooth | Self::Unknown => NetworkClass::Unsupported,
        }
    }

    pub fn is_connected(self) -> bool {
        self != Self::None
    }
}

/// Source of the current network type.
///
/// Platform integrations implement this; the factory only ever sees the
/// sampled value.
pub trait NetworkMonitor: Send + Sync {
    fn current(&self) -> NetworkType;
}

/// A monitor that always reports the same network type.
#[derive(Debug, Clone, Copy)]
pub struct StaticNetwork(pub NetworkType);

impl NetworkMonitor for StaticNetwork {
    fn current(&self) -> NetworkType {
        self.0
    }
}
