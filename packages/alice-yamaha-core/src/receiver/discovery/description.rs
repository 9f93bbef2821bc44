//! UPnP device description fetching and parsing.
//!
//! Yamaha receivers publish their YNC endpoint in a vendor extension of the
//! device description:
//!
//! ```xml
//! <yamaha:X_device>
//!   <yamaha:X_URLBase>http://192.168.1.20:80/</yamaha:X_URLBase>
//!   <yamaha:X_serviceList><yamaha:X_service>
//!     <yamaha:X_controlURL>/YamahaRemoteControl/ctrl</yamaha:X_controlURL>
//!   </yamaha:X_service></yamaha:X_serviceList>
//! </yamaha:X_device>
//! ```

use std::time::Duration;

use reqwest::{Client, Url};

use super::types::{DiscoveryError, DiscoveryResult, Receiver};
use crate::protocol_constants::DESCRIPTION_TIMEOUT_SECS;
use crate::receiver::utils::extract_xml_text;

/// Fetches and parses the device description at `location`.
pub async fn fetch_receiver(client: &Client, location: &str) -> DiscoveryResult<Receiver> {
    let xml = client
        .get(location)
        .timeout(Duration::from_secs(DESCRIPTION_TIMEOUT_SECS))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_description(&xml, location)
}

/// Builds a [`Receiver`] from a device description document.
///
/// A relative `X_URLBase` (or a missing one) is resolved against the
/// description's own location.
pub fn parse_description(xml: &str, location: &str) -> DiscoveryResult<Receiver> {
    let control_path = extract_xml_text(xml, "X_controlURL")
        .filter(|p| !p.is_empty())
        .ok_or_else(|| DiscoveryError::NotYamahaDevice(location.to_string()))?;

    let base = extract_xml_text(xml, "X_URLBase")
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| location.to_string());

    let ctrl_url = Url::parse(location)
        .and_then(|loc| loc.join(&base))
        .and_then(|base| base.join(&control_path))
        .map_err(|_| DiscoveryError::NotYamahaDevice(location.to_string()))?;

    let model_name = extract_xml_text(xml, "modelName").unwrap_or_default();
    let friendly_name = extract_xml_text(xml, "friendlyName").unwrap_or_else(|| model_name.clone());

    Ok(Receiver {
        ctrl_url: ctrl_url.to_string(),
        friendly_name,
        model_name,
    })
}
