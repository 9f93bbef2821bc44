//! SSDP-based receiver discovery.
//!
//! Sends M-SEARCH queries for UPnP media renderers to 239.255.255.250:1900 on
//! every non-virtual interface and collects the `LOCATION` headers of the
//! replies. The same socket is used for send AND receive since devices reply
//! unicast back to the sending socket/port.

use local_ip_address::list_afinet_netifas;
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::timeout;

use super::types::{is_virtual_interface, DiscoveryError};
use crate::protocol_constants::SSDP_SEARCH_TARGET;

/// Standard SSDP multicast address and port (protocol specification).
const MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// Checks if `s` starts with `prefix` (ASCII case-insensitive, no allocation).
#[inline]
fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Build the M-SEARCH message.
fn build_msearch_message(mx: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: 239.255.255.250:1900\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\r\n",
        mx, SSDP_SEARCH_TARGET
    )
}

/// Network interface information for discovery.
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "en0", "eth0").
    pub name: String,
    /// IPv4 address bound to this interface.
    pub ip: Ipv4Addr,
}

/// Gets all usable network interfaces for discovery.
///
/// Filters out virtual/container interfaces and loopback.
pub fn get_interfaces() -> Vec<InterfaceInfo> {
    list_afinet_netifas()
        .unwrap_or_else(|e| {
            log::warn!("Failed to list network interfaces: {}", e);
            Vec::new()
        })
        .into_iter()
        .filter_map(|(name, addr)| {
            if is_virtual_interface(&name) {
                log::debug!("Skipping virtual interface: {}", name);
                return None;
            }
            match addr {
                IpAddr::V4(ipv4) if !ipv4.is_loopback() => {
                    log::debug!("Using interface {} ({})", name, ipv4);
                    Some(InterfaceInfo { name, ip: ipv4 })
                }
                _ => None,
            }
        })
        .collect()
}

/// Creates a UDP socket bound to a specific interface.
fn create_socket(iface_ip: Ipv4Addr) -> Result<UdpSocket, DiscoveryError> {
    let bind_addr = SocketAddr::new(IpAddr::V4(iface_ip), 0);

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(DiscoveryError::SocketBind)?;

    if let Err(e) = socket.set_reuse_address(true) {
        log::warn!("Failed to set SO_REUSEADDR on {}: {}", iface_ip, e);
    }

    // UPnP 1.0 recommends TTL of 4 for SSDP multicast
    if let Err(e) = socket.set_multicast_ttl_v4(4) {
        log::warn!("Failed to set multicast TTL on {}: {}", iface_ip, e);
    }

    socket
        .set_nonblocking(true)
        .map_err(DiscoveryError::SocketBind)?;
    socket
        .bind(&bind_addr.into())
        .map_err(DiscoveryError::SocketBind)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(DiscoveryError::SocketBind)
}

/// Extracts the `LOCATION` header from an SSDP response.
///
/// Returns None for responses that are not search replies for media renderers.
fn parse_ssdp_location(response: &str) -> Option<String> {
    let is_renderer = response.lines().any(|l| {
        (starts_with_ignore_ascii_case(l, "st:") || starts_with_ignore_ascii_case(l, "nt:"))
            && l.contains(SSDP_SEARCH_TARGET)
    });
    if !is_renderer {
        return None;
    }

    // Find the first colon only, URL colons must survive
    response
        .lines()
        .find(|l| starts_with_ignore_ascii_case(l, "location:"))
        .and_then(|l| l.find(':').map(|idx| l[idx + 1..].trim().to_string()))
        .filter(|loc| !loc.is_empty())
}

/// Configuration for SSDP discovery.
#[derive(Debug, Clone)]
pub struct SsdpConfig {
    /// Number of M-SEARCH packets to send.
    pub send_count: u64,
    /// Delay between M-SEARCH retries.
    pub retry_delay: Duration,
    /// Total discovery timeout.
    pub discovery_timeout: Duration,
    /// MX value (max response delay in seconds).
    pub mx_value: u64,
}

impl Default for SsdpConfig {
    fn default() -> Self {
        Self {
            send_count: 3,
            retry_delay: Duration::from_millis(800),
            discovery_timeout: Duration::from_secs(3),
            mx_value: 1,
        }
    }
}

/// Collects device description locations of media renderers via SSDP multicast.
///
/// Locations are deduplicated and sorted for consistent ordering.
pub async fn discover_locations(config: &SsdpConfig) -> Result<Vec<String>, DiscoveryError> {
    let interfaces = get_interfaces();
    if interfaces.is_empty() {
        return Err(DiscoveryError::NoInterfaces);
    }

    let msg = build_msearch_message(config.mx_value);

    let mut sockets: Vec<(InterfaceInfo, Arc<UdpSocket>)> = Vec::new();
    for iface in &interfaces {
        match create_socket(iface.ip) {
            Ok(socket) => sockets.push((iface.clone(), Arc::new(socket))),
            Err(e) => {
                log::warn!(
                    "Failed to create socket for {} ({}): {}",
                    iface.name,
                    iface.ip,
                    e
                );
            }
        }
    }

    if sockets.is_empty() {
        return Err(DiscoveryError::NoInterfaces);
    }

    log::debug!(
        "[SSDP] Starting discovery on {} interface(s) ({} sends with {}ms spacing)",
        sockets.len(),
        config.send_count,
        config.retry_delay.as_millis()
    );

    let discovered: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));

    let send_futures: Vec<_> = sockets
        .iter()
        .map(|(iface, socket)| {
            let socket = Arc::clone(socket);
            let iface_name = iface.name.clone();
            let msg = msg.as_bytes().to_vec();
            let send_count = config.send_count;
            let retry_delay = config.retry_delay;

            async move {
                for i in 0..send_count {
                    if i > 0 {
                        tokio::time::sleep(retry_delay).await;
                    }
                    if let Err(e) = socket.send_to(&msg, MULTICAST_ADDR).await {
                        log::warn!(
                            "[SSDP] Failed to send M-SEARCH on {} (attempt {}): {}",
                            iface_name,
                            i + 1,
                            e
                        );
                    }
                }
            }
        })
        .collect();

    let recv_futures: Vec<_> = sockets
        .iter()
        .map(|(iface, socket)| {
            let socket = Arc::clone(socket);
            let iface_name = iface.name.clone();
            let discovered = Arc::clone(&discovered);
            let discovery_timeout = config.discovery_timeout;

            async move {
                let mut buf = [0u8; 2048];
                let start = std::time::Instant::now();

                while start.elapsed() < discovery_timeout {
                    let remaining = discovery_timeout.saturating_sub(start.elapsed());
                    match timeout(remaining, socket.recv_from(&mut buf)).await {
                        Ok(Ok((amt, src))) => {
                            let response = String::from_utf8_lossy(&buf[..amt]);
                            if let Some(location) = parse_ssdp_location(&response) {
                                log::debug!(
                                    "[SSDP] Renderer at {} via {}: {}",
                                    src.ip(),
                                    iface_name,
                                    location
                                );
                                discovered.lock().await.insert(location);
                            }
                        }
                        Ok(Err(e)) => {
                            log::warn!("[SSDP] Socket recv error on {}: {}", iface_name, e);
                        }
                        Err(_) => break,
                    }
                }
            }
        })
        .collect();

    tokio::join!(
        futures::future::join_all(send_futures),
        futures::future::join_all(recv_futures)
    );

    let mut locations: Vec<String> = std::mem::take(&mut *discovered.lock().await)
        .into_iter()
        .collect();
    locations.sort();

    log::debug!(
        "[SSDP] Discovery complete: {} renderer location(s)",
        locations.len()
    );

    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_msearch_message() {
        let msg = build_msearch_message(1);
        assert!(msg.contains("M-SEARCH * HTTP/1.1"));
        assert!(msg.contains("HOST: 239.255.255.250:1900"));
        assert!(msg.contains("MX: 1"));
        assert!(msg.contains("ST: urn:schemas-upnp-org:device:MediaRenderer:1"));
    }

    #[test]
    fn parse_location_from_renderer_reply() {
        let response = "HTTP/1.1 200 OK\r\n\
CACHE-CONTROL: max-age=1800\r\n\
LOCATION: http://192.168.1.20:49154/MediaRenderer/desc.xml\r\n\
SERVER: Network_Module/1.0 (RX-V677) UPnP/1.0\r\n\
ST: urn:schemas-upnp-org:device:MediaRenderer:1\r\n\
USN: uuid:5f9ec1b3-ed59-1900-4530-00a0dea5a1b2::urn:schemas-upnp-org:device:MediaRenderer:1\r\n\r\n";

        assert_eq!(
            parse_ssdp_location(response),
            Some("http://192.168.1.20:49154/MediaRenderer/desc.xml".to_string())
        );
    }

    #[test]
    fn parse_location_is_case_insensitive() {
        let response = "HTTP/1.1 200 OK\r\n\
location: http://192.168.1.20:49154/MediaRenderer/desc.xml\r\n\
st: urn:schemas-upnp-org:device:MediaRenderer:1\r\n\r\n";

        assert!(parse_ssdp_location(response).is_some());
    }

    #[test]
    fn parse_location_ignores_other_search_targets() {
        let response = "HTTP/1.1 200 OK\r\n\
LOCATION: http://192.168.1.30:1400/xml/device_description.xml\r\n\
ST: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\r\n";

        assert_eq!(parse_ssdp_location(response), None);
    }

    #[test]
    fn parse_location_requires_location_header() {
        let response = "HTTP/1.1 200 OK\r\n\
ST: urn:schemas-upnp-org:device:MediaRenderer:1\r\n\r\n";

        assert_eq!(parse_ssdp_location(response), None);
    }

    #[test]
    fn test_starts_with_ignore_ascii_case() {
        assert!(starts_with_ignore_ascii_case("LOCATION: http://...", "location:"));
        assert!(starts_with_ignore_ascii_case("St: urn", "st:"));
        assert!(!starts_with_ignore_ascii_case("X-Custom: value", "st:"));
    }
}
