//! Core application configuration.
//!
//! [`Config`] is loaded once at startup by the server binary and shared
//! read-only behind an `Arc` for the lifetime of the process.

use serde::{Deserialize, Serialize};

use crate::capabilities::InputMap;
use crate::protocol_constants::{DEFAULT_IDENTITY_URL, DEFAULT_URL_PREFIX, YNC_VOLUME_LIMIT_DB};

/// Volume bounds advertised by the range capability, in decibels.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct VolumeLimits {
    pub min: i32,
    pub max: i32,
}

impl VolumeLimits {
    /// Returns true when `volume` lies within the inclusive bounds.
    #[must_use]
    pub fn contains(&self, volume: i32) -> bool {
        (self.min..=self.max).contains(&volume)
    }
}

impl Default for VolumeLimits {
    fn default() -> Self {
        Self { min: -80, max: 16 }
    }
}

/// Configuration for the Alice Yamaha adapter.
///
/// All fields except `users` and `input_map` have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// E-mail addresses allowed to use the skill.
    pub users: Vec<String>,

    /// Platform mode name → receiver input name, in advertised order.
    pub input_map: InputMap,

    /// Volume bounds for the range capability.
    pub volume: VolumeLimits,

    // Server
    /// Preferred port for the HTTP server (0 = auto-allocate).
    pub preferred_port: u16,

    /// Path prefix for the platform endpoints (e.g. `/alice/v1.0`).
    pub url_prefix: String,

    // Identity
    /// Endpoint that exchanges an OAuth token for a user profile.
    pub identity_url: String,

    // Discovery
    /// SSDP receive window (milliseconds).
    pub discovery_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            input_map: InputMap::default(),
            volume: VolumeLimits::default(),
            preferred_port: 8000,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            discovery_timeout_ms: 3000,
        }
    }
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.volume.min >= self.volume.max {
            return Err(format!(
                "volume.min ({}) must be below volume.max ({})",
                self.volume.min, self.volume.max
            ));
        }
        if self.volume.min < -YNC_VOLUME_LIMIT_DB || self.volume.max > YNC_VOLUME_LIMIT_DB {
            return Err(format!(
                "volume bounds must lie within [-{limit}, {limit}] dB",
                limit = YNC_VOLUME_LIMIT_DB
            ));
        }
        if !self.url_prefix.starts_with('/') || self.url_prefix.ends_with('/') {
            return Err(format!(
                "url_prefix '{}' must start with '/' and must not end with '/'",
                self.url_prefix
            ));
        }
        if self.discovery_timeout_ms == 0 {
            return Err("discovery_timeout_ms must be >= 1".to_string());
        }
        Ok(())
    }

    /// Returns true when `email` is on the allow-list.
    #[must_use]
    pub fn is_user_allowed(&self, email: &str) -> bool {
        self.users.iter().any(|u| u == email)
    }
}
