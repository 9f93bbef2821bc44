//! Device actions.
//!
//! An action request is planned before it is executed: every device id is
//! validated and every capability type is resolved first, so a malformed
//! request never reaches a receiver. Execution is then sequential in request
//! order. Rejected changes are reported per capability; the first receiver
//! fault aborts the request.

use serde::{Deserialize, Serialize};

use super::{DeviceService, PlatformResponse};
use crate::auth::Identity;
use crate::capabilities::{Capability, CapabilityActionRequest, CapabilityActionResult};
use crate::error::BridgeResult;
use crate::utils::validate_control_url;

/// Action body, in the platform's `{payload: {devices}}` form or bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActionRequest {
    Platform { payload: ActionPayload },
    Bare(ActionPayload),
}

impl ActionRequest {
    pub fn devices(&self) -> &[DeviceAction] {
        match self {
            Self::Platform { payload } | Self::Bare(payload) => &payload.devices,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionPayload {
    pub devices: Vec<DeviceAction>,
}

/// Requested changes for one device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAction {
    pub id: String,
    #[serde(default)]
    pub capabilities: Vec<CapabilityActionRequest>,
}

/// Per-capability outcomes for one device, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceActionResult {
    pub id: String,
    pub capabilities: Vec<CapabilityActionResult>,
}

struct PlannedDevice<'a> {
    id: &'a str,
    changes: Vec<(Box<dyn Capability>, &'a CapabilityActionRequest)>,
}

impl DeviceService {
    /// Applies every requested capability change.
    pub async fn perform_actions(
        &self,
        user: &Identity,
        request: &ActionRequest,
    ) -> BridgeResult<PlatformResponse<DeviceActionResult>> {
        let plan = self.plan(request.devices())?;

        let mut devices = Vec::with_capacity(plan.len());
        for planned in plan {
            let port = self.receivers.connect(planned.id);
            let mut capabilities = Vec::with_capacity(planned.changes.len());

            for (capability, change) in &planned.changes {
                log::info!(
                    "[Action] {} {} {} = {}",
                    planned.id,
                    capability.kind(),
                    change.state.instance,
                    change.state.value
                );
                capabilities.push(capability.change_device_state(port.as_ref(), change).await?);
            }

            devices.push(DeviceActionResult {
                id: planned.id.to_string(),
                capabilities,
            });
        }

        log::debug!("[Action] Completed {} device(s) for user {}", devices.len(), user.id);
        Ok(PlatformResponse::new(user, devices))
    }

    fn plan<'a>(&self, devices: &'a [DeviceAction]) -> BridgeResult<Vec<PlannedDevice<'a>>> {
        let mut plan = Vec::with_capacity(devices.len());
        for device in devices {
            validate_control_url(&device.id)?;

            let mut changes = Vec::with_capacity(device.capabilities.len());
            for change in &device.capabilities {
                changes.push((self.registry.resolve(&change.kind)?, change));
            }

            plan.push(PlannedDevice {
                id: &device.id,
                changes,
            });
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::services::test_support::{owner, service};
    use serde_json::json;

    const CTRL: &str = "http://192.168.1.20/YamahaRemoteControl/ctrl";
    const BEDROOM: &str = "http://192.168.1.21/YamahaRemoteControl/ctrl";

    fn request(body: serde_json::Value) -> ActionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn applies_changes_in_order_and_reports_each() {
        let (service, _, port) = service();

        let response = service
            .perform_actions(
                &owner(),
                &request(json!({"payload": {"devices": [{
                    "id": CTRL,
                    "capabilities": [
                        {"type": "devices.capabilities.on_off", "state": {"instance": "on", "value": true}},
                        {"type": "devices.capabilities.range", "state": {"instance": "volume", "value": -30}},
                        {"type": "devices.capabilities.mode", "state": {"instance": "input_source", "value": "two"}},
                    ]
                }]}})),
            )
            .await
            .unwrap();

        assert_eq!(port.writes(), vec!["power=true", "volume=-30", "input=AV1"]);

        let json = serde_json::to_value(&response).unwrap();
        let device = &json["payload"]["devices"][0];
        assert_eq!(device["id"], CTRL);
        assert_eq!(
            device["capabilities"],
            json!([
                {"type": "devices.capabilities.on_off", "state": {"instance": "on", "action_result": {"status": "DONE"}}},
                {"type": "devices.capabilities.range", "state": {"instance": "volume", "action_result": {"status": "DONE"}}},
                {"type": "devices.capabilities.mode", "state": {"instance": "input_source", "action_result": {"status": "DONE"}}},
            ])
        );
    }

    #[tokio::test]
    async fn invalid_change_does_not_stop_the_batch() {
        let (service, _, port) = service();

        let response = service
            .perform_actions(
                &owner(),
                &request(json!({"devices": [{
                    "id": CTRL,
                    "capabilities": [
                        {"type": "devices.capabilities.mode", "state": {"instance": "input_source", "value": "three"}},
                        {"type": "devices.capabilities.toggle", "state": {"instance": "mute", "value": true}},
                    ]
                }]})),
            )
            .await
            .unwrap();

        assert_eq!(port.writes(), vec!["mute=true"]);
        assert_eq!(port.state().input, "HDMI1");

        let results = &response.payload.devices[0].capabilities;
        assert!(!results[0].state.action_result.is_done());
        assert!(results[1].state.action_result.is_done());
    }

    #[tokio::test]
    async fn unknown_kind_fails_before_any_io() {
        let (service, client, port) = service();

        let err = service
            .perform_actions(
                &owner(),
                &request(json!({"devices": [{
                    "id": CTRL,
                    "capabilities": [
                        {"type": "devices.capabilities.on_off", "state": {"instance": "on", "value": false}},
                        {"type": "devices.capabilities.color_setting", "state": {"instance": "rgb", "value": 1}},
                    ]
                }]})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::UnknownCapability(_)));
        assert!(client.connected().is_empty());
        assert!(port.writes().is_empty());
    }

    #[tokio::test]
    async fn invalid_device_id_fails_before_any_io() {
        let (service, client, _) = service();

        let err = service
            .perform_actions(&owner(), &request(json!({"devices": [{"id": "living-room", "capabilities": []}]})))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::InvalidRequest(_)));
        assert!(client.connected().is_empty());
    }

    #[tokio::test]
    async fn receiver_fault_aborts_the_request() {
        let (service, _, port) = service();
        port.fail();

        let err = service
            .perform_actions(
                &owner(),
                &request(json!({"devices": [{
                    "id": CTRL,
                    "capabilities": [
                        {"type": "devices.capabilities.on_off", "state": {"instance": "on", "value": true}},
                    ]
                }]})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Receiver(_)));
    }

    #[tokio::test]
    async fn devices_are_handled_in_request_order() {
        let (service, client, port) = service();

        let response = service
            .perform_actions(
                &owner(),
                &request(json!({"devices": [
                    {
                        "id": BEDROOM,
                        "capabilities": [
                            {"type": "devices.capabilities.toggle", "state": {"instance": "mute", "value": true}},
                        ]
                    },
                    {
                        "id": CTRL,
                        "capabilities": [
                            {"type": "devices.capabilities.on_off", "state": {"instance": "on", "value": false}},
                        ]
                    },
                ]})),
            )
            .await
            .unwrap();

        assert_eq!(client.connected(), vec![BEDROOM, CTRL]);
        assert_eq!(port.writes(), vec!["mute=true", "power=false"]);

        let json = serde_json::to_value(&response).unwrap();
        let devices = &json["payload"]["devices"];
        assert_eq!(devices[0]["id"], BEDROOM);
        assert_eq!(devices[0]["capabilities"][0]["type"], "devices.capabilities.toggle");
        assert_eq!(devices[1]["id"], CTRL);
        assert_eq!(devices[1]["capabilities"][0]["type"], "devices.capabilities.on_off");
    }

    #[tokio::test]
    async fn receiver_fault_skips_the_rest_of_the_batch() {
        let (service, client, port) = service();
        port.fail_after(1);

        let err = service
            .perform_actions(
                &owner(),
                &request(json!({"devices": [
                    {
                        "id": CTRL,
                        "capabilities": [
                            {"type": "devices.capabilities.on_off", "state": {"instance": "on", "value": false}},
                            {"type": "devices.capabilities.range", "state": {"instance": "volume", "value": -30}},
                            {"type": "devices.capabilities.toggle", "state": {"instance": "mute", "value": true}},
                        ]
                    },
                    {
                        "id": BEDROOM,
                        "capabilities": [
                            {"type": "devices.capabilities.mode", "state": {"instance": "input_source", "value": "two"}},
                        ]
                    },
                ]})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Receiver(_)));
        assert_eq!(port.writes(), vec!["power=false"]);
        assert_eq!(client.connected(), vec![CTRL]);

        let state = port.state();
        assert_eq!(state.volume, -40);
        assert!(!state.mute);
        assert_eq!(state.input, "HDMI1");
    }

    #[test]
    fn accepts_both_body_forms() {
        let platform = request(json!({"payload": {"devices": [{"id": CTRL, "capabilities": []}]}}));
        let bare = request(json!({"devices": [{"id": CTRL}]}));
        assert!(matches!(platform, ActionRequest::Platform { .. }));
        assert!(matches!(bare, ActionRequest::Bare(_)));
        assert_eq!(platform.devices()[0].id, bare.devices()[0].id);
    }
}
