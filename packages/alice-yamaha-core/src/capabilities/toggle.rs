//! Mute capability.

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{expect_bool, ActionError, Capability};
use super::types::{CapabilityKind, CapabilityParameters, CapabilityState};
use crate::error::YncResult;
use crate::receiver::DeviceStatePort;

/// Mutes (`true`) or unmutes (`false`) the main zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteCapability;

#[async_trait]
impl Capability for MuteCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Toggle
    }

    fn instance(&self) -> &'static str {
        "mute"
    }

    fn parameters(&self) -> Option<CapabilityParameters> {
        Some(CapabilityParameters::Toggle {
            instance: self.instance(),
        })
    }

    async fn read_value(&self, device: &dyn DeviceStatePort) -> YncResult<Value> {
        Ok(Value::Bool(device.get_mute().await?))
    }

    async fn apply_action(
        &self,
        device: &dyn DeviceStatePort,
        state: &CapabilityState,
    ) -> Result<(), ActionError> {
        self.check_instance(state)?;
        let mute = expect_bool(&state.value)?;
        device.set_mute(mute).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::types::{ActionResult, CapabilityActionRequest};
    use crate::receiver::test_fixtures::FakeReceiver;
    use serde_json::json;

    fn request(value: Value) -> CapabilityActionRequest {
        CapabilityActionRequest {
            kind: CapabilityKind::Toggle.as_str().to_string(),
            state: CapabilityState {
                instance: "mute".to_string(),
                value,
                relative: false,
            },
        }
    }

    #[tokio::test]
    async fn read_follows_write() {
        let device = FakeReceiver::default();
        for mute in [true, false] {
            let result = MuteCapability
                .change_device_state(&device, &request(json!(mute)))
                .await
                .unwrap();
            assert_eq!(result.state.action_result, ActionResult::Done);
            assert_eq!(
                MuteCapability.read_state(&device).await.unwrap().state.value,
                json!(mute)
            );
        }
        assert_eq!(device.writes(), vec!["mute=true", "mute=false"]);
    }

    #[tokio::test]
    async fn numeric_value_is_invalid() {
        let device = FakeReceiver::default();
        let result = MuteCapability
            .change_device_state(&device, &request(json!(1)))
            .await
            .unwrap();
        assert!(!result.state.action_result.is_done());
        assert!(device.writes().is_empty());
    }

    #[test]
    fn descriptor_names_instance() {
        assert_eq!(
            serde_json::to_value(MuteCapability.descriptor()).unwrap(),
            json!({
                "type": "devices.capabilities.toggle",
                "parameters": {"instance": "mute"}
            })
        );
    }
}
