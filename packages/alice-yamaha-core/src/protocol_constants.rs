//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by external contracts (the Alice smart-home API,
//! Yamaha Network Control, UPnP) and changing them would break compatibility.

// ─────────────────────────────────────────────────────────────────────────────
// Alice Smart-Home Platform
// ─────────────────────────────────────────────────────────────────────────────

/// Device type tag reported for every receiver.
pub const DEVICE_TYPE_MEDIA: &str = "devices.types.media_device";

/// Human-readable description attached to listed devices.
pub const DEVICE_DESCRIPTION: &str = "AV Receiver";

/// Manufacturer reported in `device_info`.
pub const DEVICE_MANUFACTURER: &str = "Yamaha Corporation";

/// Platform error code for a rejected change.
pub const ERROR_CODE_INVALID_ACTION: &str = "INVALID_ACTION";

// ─────────────────────────────────────────────────────────────────────────────
// Yamaha Network Control (YNC)
// ─────────────────────────────────────────────────────────────────────────────

/// Timeout for YNC HTTP requests (seconds).
///
/// 10 seconds is reasonable for LAN operations.
pub const YNC_TIMEOUT_SECS: u64 = 10;

/// Root element of every YNC request and response.
pub const YNC_ROOT: &str = "YAMAHA_AV";

/// Zone all capabilities operate on.
pub const YNC_MAIN_ZONE: &str = "Main_Zone";

/// Exponent used when encoding volume levels (tenths of a decibel).
pub const YNC_VOLUME_EXP: i32 = 1;

/// Widest volume bounds accepted in configuration (dB).
pub const YNC_VOLUME_LIMIT_DB: i32 = 100;

// ─────────────────────────────────────────────────────────────────────────────
// UPnP / SSDP
// ─────────────────────────────────────────────────────────────────────────────

/// SSDP search target for network AV receivers.
pub const SSDP_SEARCH_TARGET: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

/// Timeout for fetching a device description document (seconds).
pub const DESCRIPTION_TIMEOUT_SECS: u64 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Application Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Service identifier reported by the health endpoint.
pub const SERVICE_ID: &str = "alice-yamaha";

/// Default identity endpoint that exchanges an OAuth token for a user profile.
pub const DEFAULT_IDENTITY_URL: &str = "https://login.yandex.ru/info";

/// Timeout for identity provider requests (seconds).
pub const IDENTITY_TIMEOUT_SECS: u64 = 10;

/// Default URL prefix of the platform endpoints.
pub const DEFAULT_URL_PREFIX: &str = "/alice/v1.0";
