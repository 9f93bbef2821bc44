//! Capability layer between the platform schema and the receiver.
//!
//! # Module Structure
//!
//! - `types` - Platform-facing descriptors, states, requests and results
//! - `traits` - The [`Capability`] trait and its result-shaping combinator
//! - `on_off`, `range`, `toggle`, `mode` - The four capability variants
//! - `input_map` - Ordered mode name ↔ receiver input mapping
//! - `registry` - Static kind → variant table

pub mod input_map;
pub mod mode;
pub mod on_off;
pub mod range;
pub mod registry;
pub mod toggle;
pub mod traits;
pub mod types;

pub use input_map::InputMap;
pub use mode::InputSourceCapability;
pub use on_off::OnOffCapability;
pub use range::VolumeCapability;
pub use registry::{CapabilityRegistry, RegistryError};
pub use toggle::MuteCapability;
pub use traits::{ActionError, Capability};
pub use types::{
    ActionResult, ActionResultState, CapabilityActionRequest, CapabilityActionResult,
    CapabilityDescriptor, CapabilityKind, CapabilityParameters, CapabilityState,
    CapabilityStateEntry, ModeValue, RangeBounds,
};
