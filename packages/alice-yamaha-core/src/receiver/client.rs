//! High-level receiver commands.
//!
//! [`YamahaReceiver`] implements [`DeviceStatePort`] for one receiver on top
//! of the YNC transport. [`ReceiverClientImpl`] discovers receivers and hands
//! out ports for control URLs.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{DiscoveryResult, YncResult};
use crate::protocol_constants::{YNC_MAIN_ZONE, YNC_VOLUME_EXP};
use crate::receiver::discovery::{discover_receivers, DiscoveryConfig, Receiver};
use crate::receiver::traits::{DeviceStatePort, ReceiverConnector, ReceiverDiscovery};
use crate::receiver::ync::{require_path, YncError, YncRequestBuilder};

const POWER_PATH: &[&str] = &["Basic_Status", "Power_Control", "Power"];
const VOLUME_VAL_PATH: &[&str] = &["Basic_Status", "Volume", "Lvl", "Val"];
const VOLUME_EXP_PATH: &[&str] = &["Basic_Status", "Volume", "Lvl", "Exp"];
const MUTE_PATH: &[&str] = &["Basic_Status", "Volume", "Mute"];
const INPUT_PATH: &[&str] = &["Basic_Status", "Input", "Input_Sel"];

// ─────────────────────────────────────────────────────────────────────────────
// Basic_Status Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Power state from a `Basic_Status` response. Anything but `On` is standby.
pub fn parse_power(response: &str) -> YncResult<bool> {
    Ok(require_path(response, POWER_PATH)? == "On")
}

/// Master volume in whole decibels from a `Basic_Status` response.
///
/// YNC reports `Val` scaled by `10^Exp`; half-decibel steps are rounded.
pub fn parse_volume(response: &str) -> YncResult<i32> {
    let val: i32 = require_path(response, VOLUME_VAL_PATH)?
        .parse()
        .map_err(|_| YncError::Parse)?;
    let exp: i32 = match require_path(response, VOLUME_EXP_PATH) {
        Ok(exp) => exp.parse().map_err(|_| YncError::Parse)?,
        Err(_) => YNC_VOLUME_EXP,
    };

    Ok((f64::from(val) / 10f64.powi(exp)).round() as i32)
}

/// Mute flag from a `Basic_Status` response.
pub fn parse_mute(response: &str) -> YncResult<bool> {
    Ok(require_path(response, MUTE_PATH)? == "On")
}

/// Selected input from a `Basic_Status` response.
pub fn parse_input(response: &str) -> YncResult<String> {
    require_path(response, INPUT_PATH)
}

// ─────────────────────────────────────────────────────────────────────────────
// Device State Port
// ─────────────────────────────────────────────────────────────────────────────

/// A single receiver addressed by its YNC control URL.
#[derive(Clone)]
pub struct YamahaReceiver {
    http: Client,
    ctrl_url: String,
}

impl YamahaReceiver {
    /// Creates a port for `ctrl_url` sharing the given HTTP client.
    pub fn new(http: Client, ctrl_url: impl Into<String>) -> Self {
        Self {
            http,
            ctrl_url: ctrl_url.into(),
        }
    }

    /// The control URL this port talks to.
    #[cfg(test)]
    pub fn ctrl_url(&self) -> &str {
        &self.ctrl_url
    }

    async fn basic_status(&self) -> YncResult<String> {
        YncRequestBuilder::get(&self.http, &self.ctrl_url)
            .path(&[YNC_MAIN_ZONE, "Basic_Status"])
            .text("GetParam")
            .send()
            .await
    }

    async fn put_text(&self, path: &[&str], value: &str) -> YncResult<()> {
        YncRequestBuilder::put(&self.http, &self.ctrl_url)
            .path(&[YNC_MAIN_ZONE])
            .path(path)
            .text(value)
            .send()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DeviceStatePort for YamahaReceiver {
    async fn get_power(&self) -> YncResult<bool> {
        parse_power(&self.basic_status().await?)
    }

    async fn set_power(&self, on: bool) -> YncResult<()> {
        log::info!("[YNC] {} power -> {}", self.ctrl_url, on);
        self.put_text(&["Power_Control", "Power"], if on { "On" } else { "Standby" })
            .await
    }

    async fn get_volume(&self) -> YncResult<i32> {
        parse_volume(&self.basic_status().await?)
    }

    async fn set_volume(&self, volume_db: i32) -> YncResult<()> {
        log::info!("[YNC] {} volume -> {} dB", self.ctrl_url, volume_db);
        let scaled = volume_db.saturating_mul(10i32.pow(YNC_VOLUME_EXP as u32));

        YncRequestBuilder::put(&self.http, &self.ctrl_url)
            .path(&[YNC_MAIN_ZONE, "Volume", "Lvl"])
            .child("Val", scaled.to_string())
            .child("Exp", YNC_VOLUME_EXP.to_string())
            .child("Unit", "dB")
            .send()
            .await?;
        Ok(())
    }

    async fn get_mute(&self) -> YncResult<bool> {
        parse_mute(&self.basic_status().await?)
    }

    async fn set_mute(&self, mute: bool) -> YncResult<()> {
        log::info!("[YNC] {} mute -> {}", self.ctrl_url, mute);
        self.put_text(&["Volume", "Mute"], if mute { "On" } else { "Off" })
            .await
    }

    async fn get_input(&self) -> YncResult<String> {
        parse_input(&self.basic_status().await?)
    }

    async fn set_input(&self, input: &str) -> YncResult<()> {
        log::info!("[YNC] {} input -> {}", self.ctrl_url, input);
        self.put_text(&["Input", "Input_Sel"], input).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Concrete receiver client backed by SSDP discovery and YNC.
pub struct ReceiverClientImpl {
    http: Client,
    discovery: DiscoveryConfig,
}

impl ReceiverClientImpl {
    /// Creates a client with the given discovery settings.
    pub fn new(http: Client, discovery: DiscoveryConfig) -> Self {
        Self { http, discovery }
    }
}

#[async_trait]
impl ReceiverDiscovery for ReceiverClientImpl {
    async fn discover_receivers(&self) -> DiscoveryResult<Vec<Receiver>> {
        discover_receivers(&self.http, &self.discovery).await
    }
}

impl ReceiverConnector for ReceiverClientImpl {
    fn connect(&self, ctrl_url: &str) -> Arc<dyn DeviceStatePort> {
        Arc::new(YamahaReceiver::new(self.http.clone(), ctrl_url))
    }
}
