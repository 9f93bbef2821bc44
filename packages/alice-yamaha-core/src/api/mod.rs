//! HTTP API layer.
//!
//! This module contains thin handlers that delegate to services.
//! It provides the router construction and server startup functionality.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use crate::auth::IdentityProvider;
use crate::capabilities::CapabilityRegistry;
use crate::error::BridgeError;
use crate::receiver::ReceiverClient;
use crate::services::DeviceService;
use crate::state::Config;

pub mod http;

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to a TCP port.
    #[error("Failed to bind to port: {0}")]
    Bind(#[from] std::io::Error),
}

/// Shared application state for the API layer.
///
/// This is a thin wrapper that holds references to services.
/// All business logic lives in the services themselves.
#[derive(Clone)]
pub struct AppState {
    /// Listing, query and action operations.
    pub devices: Arc<DeviceService>,
    /// Resolves bearer tokens to user identities.
    pub identity: Arc<dyn IdentityProvider>,
    /// Application configuration.
    pub config: Arc<Config>,
}

/// Builder for constructing an `AppState`.
#[derive(Default)]
pub struct AppStateBuilder {
    receivers: Option<Arc<dyn ReceiverClient>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    config: Option<Config>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the receiver client.
    pub fn receivers(mut self, receivers: Arc<dyn ReceiverClient>) -> Self {
        self.receivers = Some(receivers);
        self
    }

    /// Sets the identity provider.
    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Validates the configuration and builds the `AppState`.
    pub fn build(self) -> Result<AppState, BridgeError> {
        let missing = |what: &str| BridgeError::Configuration(format!("{} is required", what));

        let receivers = self.receivers.ok_or_else(|| missing("receiver client"))?;
        let identity = self.identity.ok_or_else(|| missing("identity provider"))?;
        let config = self.config.ok_or_else(|| missing("config"))?;
        config.validate().map_err(BridgeError::Configuration)?;

        let registry = Arc::new(CapabilityRegistry::from_config(&config));

        Ok(AppState {
            devices: Arc::new(DeviceService::new(receivers, registry)),
            identity,
            config: Arc::new(config),
        })
    }
}

impl AppState {
    /// Creates a new builder for constructing an `AppState`.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }
}

/// Starts the HTTP server on the configured port and serves until `shutdown`
/// completes.
///
/// Port 0 lets the operating system pick a free port.
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.preferred_port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local = listener.local_addr()?;

    log::info!(
        "Server listening on http://{}{}",
        local,
        state.config.url_prefix
    );
    let app = http::create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("Server stopped");
    Ok(())
}
