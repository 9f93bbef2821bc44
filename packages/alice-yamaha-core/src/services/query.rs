//! Device state query.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DeviceService, PlatformResponse};
use crate::auth::Identity;
use crate::capabilities::CapabilityStateEntry;
use crate::error::BridgeResult;
use crate::utils::validate_control_url;

/// `{devices: [{id, custom_data?}]}` query body.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub devices: Vec<DeviceRef>,
}

/// Reference to one previously listed device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRef {
    pub id: String,
    #[serde(default)]
    pub custom_data: Option<Value>,
}

/// Live state of one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceState {
    pub id: String,
    pub capabilities: Vec<CapabilityStateEntry>,
}

impl DeviceService {
    /// Reads the live state of every requested device, in request order.
    ///
    /// All ids are validated before the first receiver is contacted. A
    /// receiver fault aborts the whole query.
    pub async fn query_devices(
        &self,
        user: &Identity,
        request: &QueryRequest,
    ) -> BridgeResult<PlatformResponse<DeviceState>> {
        for device in &request.devices {
            validate_control_url(&device.id)?;
        }

        let mut devices = Vec::with_capacity(request.devices.len());
        for device in &request.devices {
            let port = self.receivers.connect(&device.id);
            let capabilities = self.registry.states(port.as_ref()).await?;
            devices.push(DeviceState {
                id: device.id.clone(),
                capabilities,
            });
        }

        log::debug!("[Devices] Queried {} device(s) for user {}", devices.len(), user.id);
        Ok(PlatformResponse::new(user, devices))
    }
}
