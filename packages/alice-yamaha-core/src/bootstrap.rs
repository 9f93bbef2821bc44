//! Application bootstrap and dependency wiring.
//!
//! This module contains the composition root: the single place where the
//! production receiver client and identity provider are instantiated and
//! wired into an [`AppState`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::api::AppState;
use crate::auth::OAuthIdentityProvider;
use crate::error::{BridgeError, BridgeResult};
use crate::protocol_constants::YNC_TIMEOUT_SECS;
use crate::receiver::discovery::DiscoveryConfig;
use crate::receiver::ReceiverClientImpl;
use crate::state::Config;

/// Creates the HTTP client shared by receiver control, discovery and identity
/// lookups.
fn create_http_client() -> BridgeResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(YNC_TIMEOUT_SECS))
        .build()
        .map_err(|e| BridgeError::Internal(format!("failed to create HTTP client: {}", e)))
}

/// Bootstraps the application state with production dependencies.
///
/// # Errors
///
/// Fails if the configuration is invalid or the HTTP client cannot be built.
pub fn bootstrap_state(config: Config) -> BridgeResult<AppState> {
    let http = create_http_client()?;

    let discovery =
        DiscoveryConfig::with_timeout(Duration::from_millis(config.discovery_timeout_ms));
    let receivers = ReceiverClientImpl::new(http.clone(), discovery);
    let identity = OAuthIdentityProvider::new(http, config.identity_url.clone());

    log::info!(
        "[Bootstrap] identity_url={}, discovery_timeout_ms={}",
        config.identity_url,
        config.discovery_timeout_ms
    );

    AppState::builder()
        .receivers(Arc::new(receivers))
        .identity(Arc::new(identity))
        .config(config)
        .build()
}
