//! Yamaha AV receiver control and discovery.
//!
//! # Module Structure
//!
//! - `traits` - [`DeviceStatePort`] and client trait abstractions
//! - `client` - `YamahaReceiver` / `ReceiverClientImpl` concrete implementations
//! - `discovery` - SSDP search and device description parsing
//! - `ync` - Low-level Yamaha Network Control transport
//! - `utils` - XML helpers

pub mod client;
pub mod discovery;
pub mod traits;
pub mod utils;
pub mod ync;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export trait abstractions
pub use traits::{DeviceStatePort, ReceiverClient, ReceiverConnector, ReceiverDiscovery};

// Re-export concrete implementations
pub use client::{ReceiverClientImpl, YamahaReceiver};
pub use discovery::Receiver;
