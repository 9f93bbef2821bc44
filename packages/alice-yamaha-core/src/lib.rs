//! Alice Yamaha Core - shared library for the Alice Yamaha adapter.
//!
//! This crate exposes Yamaha AV receivers to the Alice smart-home platform.
//! Platform requests (listing, state query, state change) are translated into
//! Yamaha Network Control (YNC) calls and the receiver state is translated
//! back into the platform's JSON schema.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`capabilities`]: Capability variants, their registry and platform schema
//! - [`services`]: Listing, query and action operations
//! - [`receiver`]: Receiver control (YNC) and discovery (SSDP)
//! - [`auth`]: Identity validation and the request extractor
//! - [`api`]: HTTP router and server startup
//! - [`bootstrap`]: Production dependency wiring
//! - [`state`]: Application configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! The crate defines traits at its I/O seams so the capability layer and the
//! services can be tested without a network:
//!
//! - [`DeviceStatePort`](receiver::DeviceStatePort): Power, volume, mute and input of one receiver
//! - [`ReceiverClient`](receiver::ReceiverClient): Discovery plus port construction
//! - [`IdentityProvider`](auth::IdentityProvider): Token to user profile exchange

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod capabilities;
pub mod error;
pub mod protocol_constants;
pub mod receiver;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types at the crate root
pub use error::{BridgeError, BridgeResult, DiscoveryResult, ErrorCode, YncResult};
pub use state::{Config, VolumeLimits};
pub use utils::{validate_control_url, ControlUrlError};

// Re-export capability types
pub use capabilities::{Capability, CapabilityKind, CapabilityRegistry, InputMap};

// Re-export receiver types
pub use receiver::discovery::DiscoveryConfig;
pub use receiver::{
    DeviceStatePort, Receiver, ReceiverClient, ReceiverClientImpl, ReceiverConnector,
    ReceiverDiscovery, YamahaReceiver,
};

// Re-export auth types
pub use auth::{AuthenticatedUser, Identity, IdentityProvider, OAuthIdentityProvider};

// Re-export service types
pub use services::{DeviceService, PlatformResponse};

// Re-export bootstrap
pub use bootstrap::bootstrap_state;

// Re-export API types
pub use api::{start_server, AppState, AppStateBuilder, ServerError};
