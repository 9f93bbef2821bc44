//! Device listing.

use serde::Serialize;

use super::{DeviceService, PlatformResponse};
use crate::auth::Identity;
use crate::capabilities::{CapabilityDescriptor, CapabilityRegistry};
use crate::error::BridgeResult;
use crate::protocol_constants::{DEVICE_DESCRIPTION, DEVICE_MANUFACTURER, DEVICE_TYPE_MEDIA};
use crate::receiver::Receiver;

/// Platform descriptor of one receiver.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceDescriptor {
    pub id: String,
    pub name: String,
    pub description: &'static str,
    pub room: String,
    #[serde(rename = "type")]
    pub device_type: &'static str,
    pub custom_data: CustomData,
    pub capabilities: Vec<CapabilityDescriptor>,
    pub device_info: DeviceInfo,
}

/// Opaque data the platform echoes back in query and action requests.
#[derive(Debug, Clone, Serialize)]
pub struct CustomData {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub manufacturer: &'static str,
    pub model: String,
}

impl DeviceDescriptor {
    /// Describes `receiver` with the registry's full capability list.
    pub fn describe(receiver: &Receiver, registry: &CapabilityRegistry) -> Self {
        Self {
            id: receiver.ctrl_url.clone(),
            name: receiver.display_name(),
            description: DEVICE_DESCRIPTION,
            room: String::new(),
            device_type: DEVICE_TYPE_MEDIA,
            custom_data: CustomData {
                base_url: receiver.ctrl_url.clone(),
            },
            capabilities: registry.descriptors(),
            device_info: DeviceInfo {
                manufacturer: DEVICE_MANUFACTURER,
                model: receiver.model_name.clone(),
            },
        }
    }
}

impl DeviceService {
    /// Lists every receiver discovery can reach.
    pub async fn list_devices(&self, user: &Identity) -> BridgeResult<PlatformResponse<DeviceDescriptor>> {
        let receivers = self.receivers.discover_receivers().await?;
        log::info!("[Devices] Listing {} receiver(s) for user {}", receivers.len(), user.id);

        let devices = receivers
            .iter()
            .map(|receiver| DeviceDescriptor::describe(receiver, &self.registry))
            .collect();

        Ok(PlatformResponse::new(user, devices))
    }
}
