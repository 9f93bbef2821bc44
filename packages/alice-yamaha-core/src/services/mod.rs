//! Application services layer.
//!
//! [`DeviceService`] implements the three platform operations on top of the
//! receiver client and the capability registry:
//! - `listing` - describe every discovered receiver
//! - `query` - read live capability state of the requested receivers
//! - `action` - apply capability changes and collect per-capability results
//!
//! Every response is wrapped in a [`PlatformResponse`] envelope carrying a
//! fresh request id and the authenticated user's id.

pub mod action;
pub mod listing;
pub mod query;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::capabilities::CapabilityRegistry;
use crate::receiver::ReceiverClient;

pub use action::{ActionPayload, ActionRequest, DeviceAction, DeviceActionResult};
pub use listing::{CustomData, DeviceDescriptor, DeviceInfo};
pub use query::{DeviceRef, DeviceState, QueryRequest};

/// `{request_id, payload: {user_id, devices}}` response envelope.
#[derive(Debug, Serialize)]
pub struct PlatformResponse<T> {
    pub request_id: Uuid,
    pub payload: DevicesPayload<T>,
}

/// Payload part of a [`PlatformResponse`].
#[derive(Debug, Serialize)]
pub struct DevicesPayload<T> {
    pub user_id: String,
    pub devices: Vec<T>,
}

impl<T> PlatformResponse<T> {
    /// Wraps `devices` for `user` under a new request id.
    pub fn new(user: &Identity, devices: Vec<T>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            payload: DevicesPayload {
                user_id: user.id.clone(),
                devices,
            },
        }
    }
}

/// Response to an account unlink request.
#[derive(Debug, Serialize)]
pub struct UnlinkResponse {
    pub request_id: Uuid,
}

impl UnlinkResponse {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }
}

impl Default for UnlinkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Facade over receiver access and the capability registry.
///
/// Holds no per-request state; it is shared by all handlers.
pub struct DeviceService {
    receivers: Arc<dyn ReceiverClient>,
    registry: Arc<CapabilityRegistry>,
}

impl DeviceService {
    /// Creates a new DeviceService.
    ///
    /// # Arguments
    /// * `receivers` - Discovers receivers and opens state ports to them
    /// * `registry` - Capability registry built from the configuration
    pub fn new(receivers: Arc<dyn ReceiverClient>, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            receivers,
            registry,
        }
    }

    /// The capability registry this service reports.
    #[cfg(test)]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_user_and_fresh_request_id() {
        let user = test_support::owner();
        let first = PlatformResponse::new(&user, vec![1, 2]);
        let second = PlatformResponse::<i32>::new(&user, Vec::new());

        assert_ne!(first.request_id, second.request_id);
        let json = serde_json::to_value(&first).unwrap();
        assert_eq!(json["payload"]["user_id"], "1001");
        assert_eq!(json["payload"]["devices"], serde_json::json!([1, 2]));
        assert!(json["request_id"].as_str().is_some());
    }
}
