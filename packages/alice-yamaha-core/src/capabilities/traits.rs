//! The [`Capability`] abstraction shared by all capability kinds.
//!
//! A capability knows its static descriptor, how to read its live value from a
//! receiver, and how to validate and apply a requested change. The provided
//! [`Capability::change_device_state`] turns the outcome of an action into a
//! platform result: validation failures become `INVALID_ACTION` results, while
//! receiver I/O failures propagate to the caller.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::{
    ActionResult, CapabilityActionRequest, CapabilityActionResult, CapabilityDescriptor,
    CapabilityKind, CapabilityParameters, CapabilityState, CapabilityStateEntry,
};
use crate::error::YncResult;
use crate::receiver::{ync::YncError, DeviceStatePort};

/// Why a requested change was not applied.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The request was rejected before touching the receiver.
    #[error("{0}")]
    Invalid(String),

    /// The receiver failed while applying the change.
    #[error(transparent)]
    Device(#[from] YncError),
}

/// One controllable aspect of a receiver.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Kind of this capability.
    fn kind(&self) -> CapabilityKind;

    /// Instance name carried in state and action payloads.
    fn instance(&self) -> &'static str;

    /// Static parameters, if the kind has any.
    fn parameters(&self) -> Option<CapabilityParameters> {
        None
    }

    /// Static descriptor for device listings.
    fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            kind: self.kind(),
            parameters: self.parameters(),
        }
    }

    /// Reads the current platform value from the receiver.
    async fn read_value(&self, device: &dyn DeviceStatePort) -> YncResult<Value>;

    /// Validates `state` and applies it to the receiver.
    async fn apply_action(
        &self,
        device: &dyn DeviceStatePort,
        state: &CapabilityState,
    ) -> Result<(), ActionError>;

    /// Live state entry for query responses.
    async fn read_state(&self, device: &dyn DeviceStatePort) -> YncResult<CapabilityStateEntry> {
        let value = self.read_value(device).await?;
        Ok(CapabilityStateEntry {
            kind: self.kind(),
            state: CapabilityState {
                instance: self.instance().to_string(),
                value,
                relative: false,
            },
        })
    }

    /// Shapes the platform result for a change request.
    ///
    /// `error` is the rejection message, or `None` if the change was applied.
    fn shape_result(&self, state: &CapabilityState, error: Option<String>) -> CapabilityActionResult {
        let action_result = match error {
            None => ActionResult::Done,
            Some(message) => ActionResult::invalid_action(message),
        };
        CapabilityActionResult::from_state(self.kind(), state, action_result)
    }

    /// Applies a change request and shapes its result.
    ///
    /// Rejections are reported in the result. Receiver I/O failures are
    /// returned as errors.
    async fn change_device_state(
        &self,
        device: &dyn DeviceStatePort,
        request: &CapabilityActionRequest,
    ) -> YncResult<CapabilityActionResult> {
        match self.apply_action(device, &request.state).await {
            Ok(()) => Ok(self.shape_result(&request.state, None)),
            Err(ActionError::Invalid(message)) => {
                log::info!("[Capability] Rejected {} action: {}", self.kind(), message);
                Ok(self.shape_result(&request.state, Some(message)))
            }
            Err(ActionError::Device(e)) => Err(e),
        }
    }

    /// Rejects a request addressed to a different instance.
    fn check_instance(&self, state: &CapabilityState) -> Result<(), ActionError> {
        if state.instance == self.instance() {
            Ok(())
        } else {
            Err(ActionError::Invalid(format!(
                "Unsupported instance '{}', expected '{}'",
                state.instance,
                self.instance()
            )))
        }
    }
}

/// Extracts a boolean request value.
pub(crate) fn expect_bool(value: &Value) -> Result<bool, ActionError> {
    value
        .as_bool()
        .ok_or_else(|| ActionError::Invalid(format!("Expected a boolean value, got {}", value)))
}
