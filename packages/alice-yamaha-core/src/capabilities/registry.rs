//! Static capability registry.
//!
//! The set of capabilities is closed: [`REGISTRATIONS`] maps every
//! [`CapabilityKind`] to the factory of its variant, in the order state
//! entries and descriptors are reported.

use std::sync::Arc;

use thiserror::Error;

use super::input_map::InputMap;
use super::mode::InputSourceCapability;
use super::on_off::OnOffCapability;
use super::range::VolumeCapability;
use super::toggle::MuteCapability;
use super::traits::Capability;
use super::types::{CapabilityDescriptor, CapabilityKind, CapabilityStateEntry};
use crate::error::YncResult;
use crate::receiver::DeviceStatePort;
use crate::state::{Config, VolumeLimits};

/// Errors from capability lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No variant is registered for the requested type.
    #[error("unknown capability kind '{0}'")]
    UnknownKind(String),
}

type CapabilityFactory = fn(&CapabilityRegistry) -> Box<dyn Capability>;

/// Registered kinds in reporting order.
static REGISTRATIONS: [(CapabilityKind, CapabilityFactory); 4] = [
    (CapabilityKind::OnOff, build_on_off),
    (CapabilityKind::Range, build_volume),
    (CapabilityKind::Toggle, build_mute),
    (CapabilityKind::Mode, build_input_source),
];

fn build_on_off(_: &CapabilityRegistry) -> Box<dyn Capability> {
    Box::new(OnOffCapability)
}

fn build_volume(registry: &CapabilityRegistry) -> Box<dyn Capability> {
    Box::new(VolumeCapability::new(registry.volume))
}

fn build_mute(_: &CapabilityRegistry) -> Box<dyn Capability> {
    Box::new(MuteCapability)
}

fn build_input_source(registry: &CapabilityRegistry) -> Box<dyn Capability> {
    Box::new(InputSourceCapability::new(Arc::clone(&registry.input_map)))
}

/// Process-wide capability registry. Immutable after construction.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    input_map: Arc<InputMap>,
    volume: VolumeLimits,
}

impl CapabilityRegistry {
    pub fn new(input_map: InputMap, volume: VolumeLimits) -> Self {
        for input in input_map.shared_inputs() {
            log::warn!(
                "[Capability] Input {} is mapped by several modes; it will read as the last one",
                input
            );
        }
        Self {
            input_map: Arc::new(input_map),
            volume,
        }
    }

    /// Builds the registry from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.input_map.clone(), config.volume)
    }

    /// Registered kinds in reporting order.
    pub fn kinds() -> impl Iterator<Item = CapabilityKind> {
        REGISTRATIONS.iter().map(|(kind, _)| *kind)
    }

    /// Resolves a platform type identifier to a fresh capability instance.
    pub fn resolve(&self, type_name: &str) -> Result<Box<dyn Capability>, RegistryError> {
        REGISTRATIONS
            .iter()
            .find(|(kind, _)| kind.as_str() == type_name)
            .map(|(_, factory)| factory(self))
            .ok_or_else(|| RegistryError::UnknownKind(type_name.to_string()))
    }

    /// Static descriptors of every registered capability.
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        REGISTRATIONS
            .iter()
            .map(|(_, factory)| factory(self).descriptor())
            .collect()
    }

    /// Live state of every registered capability, read one after another.
    pub async fn states(&self, device: &dyn DeviceStatePort) -> YncResult<Vec<CapabilityStateEntry>> {
        let mut entries = Vec::with_capacity(REGISTRATIONS.len());
        for (_, factory) in REGISTRATIONS.iter() {
            entries.push(factory(self).read_state(device).await?);
        }
        Ok(entries)
    }
}
