//! Input source capability.
//!
//! Platform mode names are translated to receiver inputs through the
//! configured [`InputMap`]. Reading an input that no mode maps to yields
//! `null`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::input_map::InputMap;
use super::traits::{ActionError, Capability};
use super::types::{CapabilityKind, CapabilityParameters, CapabilityState, ModeValue};
use crate::error::YncResult;
use crate::receiver::DeviceStatePort;

/// Selects the receiver input by platform mode name.
#[derive(Debug, Clone)]
pub struct InputSourceCapability {
    input_map: Arc<InputMap>,
}

impl InputSourceCapability {
    pub fn new(input_map: Arc<InputMap>) -> Self {
        Self { input_map }
    }
}

#[async_trait]
impl Capability for InputSourceCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Mode
    }

    fn instance(&self) -> &'static str {
        "input_source"
    }

    fn parameters(&self) -> Option<CapabilityParameters> {
        Some(CapabilityParameters::Mode {
            instance: self.instance(),
            modes: self
                .input_map
                .modes()
                .map(|mode| ModeValue {
                    value: mode.to_string(),
                })
                .collect(),
        })
    }

    async fn read_value(&self, device: &dyn DeviceStatePort) -> YncResult<Value> {
        let input = device.get_input().await?;
        Ok(match self.input_map.mode_for(&input) {
            Some(mode) => Value::String(mode.to_string()),
            None => {
                log::debug!("[Capability] Input {} has no configured mode", input);
                Value::Null
            }
        })
    }

    async fn apply_action(
        &self,
        device: &dyn DeviceStatePort,
        state: &CapabilityState,
    ) -> Result<(), ActionError> {
        // Membership is checked before the instance name.
        let input = state
            .value
            .as_str()
            .and_then(|mode| self.input_map.input_for(mode))
            .ok_or_else(|| {
                let requested = state
                    .value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| state.value.to_string());
                ActionError::Invalid(format!(
                    "Source {} is not configured, check settings.",
                    requested
                ))
            })?;
        self.check_instance(state)?;

        device.set_input(input).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::types::{ActionResult, CapabilityActionRequest};
    use crate::receiver::test_fixtures::FakeReceiver;
    use serde_json::json;

    fn capability() -> InputSourceCapability {
        InputSourceCapability::new(Arc::new(
            [("one", "HDMI1"), ("two", "AV1")].into_iter().collect(),
        ))
    }

    fn request(instance: &str, value: Value) -> CapabilityActionRequest {
        CapabilityActionRequest {
            kind: CapabilityKind::Mode.as_str().to_string(),
            state: CapabilityState {
                instance: instance.to_string(),
                value,
                relative: false,
            },
        }
    }

    #[tokio::test]
    async fn switching_to_configured_mode_sets_input() {
        let device = FakeReceiver::default();
        assert_eq!(device.state().input, "HDMI1");

        let result = capability()
            .change_device_state(&device, &request("input_source", json!("two")))
            .await
            .unwrap();

        assert_eq!(device.state().input, "AV1");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "type": "devices.capabilities.mode",
                "state": {"instance": "input_source", "action_result": {"status": "DONE"}}
            })
        );
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected_and_input_unchanged() {
        let device = FakeReceiver::default();

        let result = capability()
            .change_device_state(&device, &request("input_source", json!("three")))
            .await
            .unwrap();

        assert_eq!(device.state().input, "HDMI1");
        assert!(device.writes().is_empty());
        match result.state.action_result {
            ActionResult::Error { error_code, error_message } => {
                assert_eq!(error_code, "INVALID_ACTION");
                assert!(error_message.contains("three"));
            }
            ActionResult::Done => panic!("expected an error result"),
        }
    }

    #[tokio::test]
    async fn every_configured_mode_round_trips() {
        let capability = capability();
        let device = FakeReceiver::default();
        let modes: Vec<String> = capability.input_map.modes().map(str::to_string).collect();

        for mode in modes {
            capability
                .change_device_state(&device, &request("input_source", json!(mode)))
                .await
                .unwrap();
            assert_eq!(
                capability.read_state(&device).await.unwrap().state.value,
                json!(mode)
            );
        }
    }

    #[tokio::test]
    async fn unmapped_input_reads_null() {
        let device = FakeReceiver::default();
        device.set_input("TUNER").await.unwrap();
        let entry = capability().read_state(&device).await.unwrap();
        assert_eq!(entry.state.instance, "input_source");
        assert_eq!(entry.state.value, Value::Null);
    }

    #[tokio::test]
    async fn wrong_instance_is_rejected_after_membership() {
        let device = FakeReceiver::default();

        let result = capability()
            .change_device_state(&device, &request("source", json!("two")))
            .await
            .unwrap();
        match &result.state.action_result {
            ActionResult::Error { error_message, .. } => assert!(error_message.contains("source")),
            ActionResult::Done => panic!("expected an error result"),
        }

        let result = capability()
            .change_device_state(&device, &request("source", json!("three")))
            .await
            .unwrap();
        match &result.state.action_result {
            ActionResult::Error { error_message, .. } => {
                assert!(error_message.contains("not configured"))
            }
            ActionResult::Done => panic!("expected an error result"),
        }
        assert!(device.writes().is_empty());
    }

    #[test]
    fn descriptor_lists_modes_in_map_order() {
        assert_eq!(
            serde_json::to_value(capability().descriptor()).unwrap(),
            json!({
                "type": "devices.capabilities.mode",
                "parameters": {
                    "instance": "input_source",
                    "modes": [{"value": "one"}, {"value": "two"}]
                }
            })
        );
    }
}
