//! Platform-facing capability schema.
//!
//! These types mirror the JSON the smart-home platform exchanges with the
//! adapter. Descriptors are static; state entries, action requests and action
//! results are built per request and never stored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol_constants::ERROR_CODE_INVALID_ACTION;

/// Closed set of capability kinds the adapter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    /// Power on / standby.
    #[serde(rename = "devices.capabilities.on_off")]
    OnOff,
    /// Master volume.
    #[serde(rename = "devices.capabilities.range")]
    Range,
    /// Mute.
    #[serde(rename = "devices.capabilities.toggle")]
    Toggle,
    /// Input source selection.
    #[serde(rename = "devices.capabilities.mode")]
    Mode,
}

impl CapabilityKind {
    /// Platform type identifier of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnOff => "devices.capabilities.on_off",
            Self::Range => "devices.capabilities.range",
            Self::Toggle => "devices.capabilities.toggle",
            Self::Mode => "devices.capabilities.mode",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static Descriptors
// ─────────────────────────────────────────────────────────────────────────────

/// Static description of a capability, as embedded in device listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityDescriptor {
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<CapabilityParameters>,
}

/// Capability-specific static parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CapabilityParameters {
    Range {
        instance: &'static str,
        random_access: bool,
        range: RangeBounds,
    },
    Toggle {
        instance: &'static str,
    },
    Mode {
        instance: &'static str,
        modes: Vec<ModeValue>,
    },
}

/// Advertised bounds of a range capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    pub min: i32,
    pub max: i32,
    pub precision: i32,
}

/// One selectable mode of a mode capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeValue {
    pub value: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Live State
// ─────────────────────────────────────────────────────────────────────────────

/// `{instance, value}` pair shared by state readings and change requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityState {
    pub instance: String,
    pub value: Value,
    /// Set on range requests meaning "change by `value`".
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub relative: bool,
}

/// Live reading of one capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityStateEntry {
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    pub state: CapabilityState,
}

/// Requested change of one capability.
///
/// `type` stays a raw string so that an unknown kind can be reported by the
/// registry instead of failing JSON decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityActionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub state: CapabilityState,
}

// ─────────────────────────────────────────────────────────────────────────────
// Action Results
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one capability change. `value` is replaced by `action_result`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityActionResult {
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    pub state: ActionResultState,
}

/// State part of a [`CapabilityActionResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResultState {
    pub instance: String,
    pub action_result: ActionResult,
}

/// Per-capability action status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum ActionResult {
    #[serde(rename = "DONE")]
    Done,
    #[serde(rename = "ERROR")]
    Error {
        error_code: &'static str,
        error_message: String,
    },
}

impl ActionResult {
    /// An `INVALID_ACTION` error carrying `message`.
    pub fn invalid_action(message: impl Into<String>) -> Self {
        Self::Error {
            error_code: ERROR_CODE_INVALID_ACTION,
            error_message: message.into(),
        }
    }

    /// Returns true for [`ActionResult::Done`].
    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl CapabilityActionResult {
    /// Copies `state` without its value and attaches `action_result`.
    pub fn from_state(kind: CapabilityKind, state: &CapabilityState, action_result: ActionResult) -> Self {
        Self {
            kind,
            state: ActionResultState {
                instance: state.instance.clone(),
                action_result,
            },
        }
    }
}
