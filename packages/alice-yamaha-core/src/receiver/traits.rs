//! Trait abstractions for receiver operations.
//!
//! These traits enable dependency injection for testability. The capability
//! layer and services depend on traits rather than on the YNC implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DiscoveryResult, YncResult};
use crate::receiver::discovery::Receiver;

/// Capability-agnostic view of a single receiver's controls.
///
/// Every call is one synchronous request/response against the device; no
/// state is cached between calls.
#[async_trait]
pub trait DeviceStatePort: Send + Sync {
    /// Returns `true` when the main zone is powered on (not in standby).
    async fn get_power(&self) -> YncResult<bool>;

    /// Powers the main zone on (`true`) or puts it into standby (`false`).
    async fn set_power(&self, on: bool) -> YncResult<()>;

    /// Gets the master volume in whole decibels.
    async fn get_volume(&self) -> YncResult<i32>;

    /// Sets the master volume in whole decibels.
    ///
    /// The value is forwarded as-is; bounds are the caller's concern.
    async fn set_volume(&self, volume_db: i32) -> YncResult<()>;

    /// Gets the mute flag.
    async fn get_mute(&self) -> YncResult<bool>;

    /// Sets the mute flag.
    async fn set_mute(&self, mute: bool) -> YncResult<()>;

    /// Gets the selected input identifier (e.g. `"HDMI1"`).
    async fn get_input(&self) -> YncResult<String>;

    /// Selects an input by its receiver identifier.
    async fn set_input(&self, input: &str) -> YncResult<()>;
}

/// Trait for receiver discovery on the local network.
#[async_trait]
pub trait ReceiverDiscovery: Send + Sync {
    /// Discovers reachable receivers using SSDP.
    async fn discover_receivers(&self) -> DiscoveryResult<Vec<Receiver>>;
}

/// Opens a state port for a receiver addressed by its control URL.
pub trait ReceiverConnector: Send + Sync {
    /// Returns a port bound to `ctrl_url`. No I/O happens until a port method is called.
    fn connect(&self, ctrl_url: &str) -> Arc<dyn DeviceStatePort>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Combined Traits (for trait objects)
// ─────────────────────────────────────────────────────────────────────────────

/// Combined trait for all receiver operations.
///
/// Used by `AppState` to provide a unified client to the services.
pub trait ReceiverClient: ReceiverDiscovery + ReceiverConnector {}

/// Blanket implementation for any type implementing both traits.
impl<T: ReceiverDiscovery + ReceiverConnector> ReceiverClient for T {}
