//! Shared types for receiver discovery.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to bind UDP socket for discovery.
    #[error("failed to bind UDP socket: {0}")]
    SocketBind(#[source] std::io::Error),

    /// No usable network interfaces found.
    #[error("no usable network interfaces found")]
    NoInterfaces,

    /// Device description could not be fetched.
    #[error("failed to fetch device description: {0}")]
    Description(#[from] reqwest::Error),

    /// Device description does not describe a YNC-capable receiver.
    #[error("not a Yamaha receiver: {0}")]
    NotYamahaDevice(String),
}

/// Convenient Result alias for receiver discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// A discovered receiver with resolved metadata.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Absolute YNC control URL; doubles as the platform device id.
    pub ctrl_url: String,
    /// Friendly name from the device description.
    pub friendly_name: String,
    /// Model name (e.g. "RX-V677").
    pub model_name: String,
}

impl Receiver {
    /// Display name reported to the platform.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.friendly_name, self.model_name)
    }
}

/// Virtual interface prefixes to filter out during discovery.
pub const VIRTUAL_INTERFACE_PREFIXES: &[&str] = &[
    "lo", "docker", "veth", "br-", "virbr", "vmnet", "vbox", "tun", "tap",
];

/// Checks if an interface name belongs to a virtual/container interface.
pub fn is_virtual_interface(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    VIRTUAL_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| name_lower.starts_with(prefix))
}
