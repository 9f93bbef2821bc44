//! Volume capability.
//!
//! Values are whole decibels. Requests outside the configured bounds, and
//! relative requests, are rejected before the receiver is touched.

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{ActionError, Capability};
use super::types::{CapabilityKind, CapabilityParameters, CapabilityState, RangeBounds};
use crate::error::YncResult;
use crate::receiver::DeviceStatePort;
use crate::state::VolumeLimits;

/// Master volume in decibels.
#[derive(Debug, Clone, Copy)]
pub struct VolumeCapability {
    limits: VolumeLimits,
}

impl VolumeCapability {
    pub fn new(limits: VolumeLimits) -> Self {
        Self { limits }
    }
}

#[async_trait]
impl Capability for VolumeCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Range
    }

    fn instance(&self) -> &'static str {
        "volume"
    }

    fn parameters(&self) -> Option<CapabilityParameters> {
        Some(CapabilityParameters::Range {
            instance: self.instance(),
            random_access: true,
            range: RangeBounds {
                min: self.limits.min,
                max: self.limits.max,
                precision: 1,
            },
        })
    }

    async fn read_value(&self, device: &dyn DeviceStatePort) -> YncResult<Value> {
        Ok(Value::from(device.get_volume().await?))
    }

    async fn apply_action(
        &self,
        device: &dyn DeviceStatePort,
        state: &CapabilityState,
    ) -> Result<(), ActionError> {
        self.check_instance(state)?;
        if state.relative {
            return Err(ActionError::Invalid(
                "Relative volume changes are not supported".to_string(),
            ));
        }

        let volume = state
            .value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| {
                ActionError::Invalid(format!("Expected an integer volume, got {}", state.value))
            })?;

        if !self.limits.contains(volume) {
            return Err(ActionError::Invalid(format!(
                "Volume {} is out of range [{}, {}]",
                volume, self.limits.min, self.limits.max
            )));
        }

        device.set_volume(volume).await?;
        Ok(())
    }
}
