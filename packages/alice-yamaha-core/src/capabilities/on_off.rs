//! Power capability.

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{expect_bool, ActionError, Capability};
use super::types::{CapabilityKind, CapabilityState};
use crate::error::YncResult;
use crate::receiver::DeviceStatePort;

/// Powers the receiver on (`true`) or into standby (`false`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OnOffCapability;

#[async_trait]
impl Capability for OnOffCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::OnOff
    }

    fn instance(&self) -> &'static str {
        "on"
    }

    async fn read_value(&self, device: &dyn DeviceStatePort) -> YncResult<Value> {
        Ok(Value::Bool(device.get_power().await?))
    }

    async fn apply_action(
        &self,
        device: &dyn DeviceStatePort,
        state: &CapabilityState,
    ) -> Result<(), ActionError> {
        self.check_instance(state)?;
        let on = expect_bool(&state.value)?;
        device.set_power(on).await?;
        Ok(())
    }
}
