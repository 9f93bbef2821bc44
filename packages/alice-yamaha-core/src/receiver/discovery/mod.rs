//! Receiver discovery.
//!
//! Discovery runs in two phases:
//! 1. SSDP M-SEARCH collects device description locations of media renderers.
//! 2. Each description is fetched and parsed; renderers without a YNC control
//!    URL are dropped.

mod description;
pub mod ssdp;
mod types;

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;

pub use description::{fetch_receiver, parse_description};
pub use ssdp::SsdpConfig;
pub use types::{is_virtual_interface, DiscoveryError, DiscoveryResult, Receiver};

/// Configuration for receiver discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// SSDP timing parameters.
    pub ssdp: SsdpConfig,
}

impl DiscoveryConfig {
    /// Builds a discovery configuration with the given SSDP receive window.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            ssdp: SsdpConfig {
                discovery_timeout: timeout,
                ..SsdpConfig::default()
            },
        }
    }
}

/// Discovers Yamaha receivers on the local network.
///
/// A description that cannot be fetched or is not a Yamaha receiver is
/// skipped; only socket-level failures fail the whole discovery.
pub async fn discover_receivers(
    client: &Client,
    config: &DiscoveryConfig,
) -> DiscoveryResult<Vec<Receiver>> {
    let locations = ssdp::discover_locations(&config.ssdp).await?;

    let results = join_all(
        locations
            .iter()
            .map(|location| fetch_receiver(client, location)),
    )
    .await;

    let mut receivers: Vec<Receiver> = Vec::new();
    for (location, result) in locations.iter().zip(results) {
        match result {
            Ok(receiver) => {
                if !receivers.iter().any(|r| r.ctrl_url == receiver.ctrl_url) {
                    receivers.push(receiver);
                }
            }
            Err(DiscoveryError::NotYamahaDevice(_)) => {
                log::debug!("[Discovery] Ignoring non-Yamaha renderer at {}", location);
            }
            Err(e) => {
                log::warn!("[Discovery] Skipping {}: {}", location, e);
            }
        }
    }

    receivers.sort_by(|a, b| a.ctrl_url.cmp(&b.ctrl_url));
    log::info!("[Discovery] Found {} receiver(s)", receivers.len());

    Ok(receivers)
}
