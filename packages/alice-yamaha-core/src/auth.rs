//! Identity validation for platform requests.
//!
//! The platform forwards the user's OAuth token in the `Authorization` header.
//! The token is exchanged with an identity provider for the user's profile and
//! the profile's e-mail is checked against the configured allow-list. Handlers
//! receive the result through the [`AuthenticatedUser`] extractor, so no
//! handler body runs for an unauthenticated request.

use std::time::Duration;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::AppState;
use crate::error::BridgeError;
use crate::protocol_constants::IDENTITY_TIMEOUT_SECS;
use crate::state::Config;

/// Errors from identity validation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header or an empty one.
    #[error("Access denied")]
    MissingCredential,

    /// The identity provider rejected the token.
    #[error("identity provider rejected the token")]
    InvalidToken,

    /// The user is authenticated but not on the allow-list.
    #[error("user {0} is not listed in the config file")]
    UserNotAllowed(String),

    /// The identity provider could not be reached.
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The identity provider answered with an unexpected status or body.
    #[error("unexpected identity provider response: {0}")]
    Provider(String),
}

/// User profile returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub default_email: String,
}

/// Exchanges a bearer token for a user profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Identity provider speaking the `Authorization: OAuth <token>` profile API.
pub struct OAuthIdentityProvider {
    http: Client,
    url: String,
}

impl OAuthIdentityProvider {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for OAuthIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let response = self
            .http
            .get(&self.url)
            .header(AUTHORIZATION, format!("OAuth {}", token))
            .timeout(Duration::from_secs(IDENTITY_TIMEOUT_SECS))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!("HTTP {}", status.as_u16())));
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))
    }
}

/// Returns the credential from an `Authorization` header value.
///
/// The scheme is not checked; the last whitespace-separated token wins.
pub fn extract_credential(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.split_whitespace().last())
        .ok_or(AuthError::MissingCredential)
}

/// Resolves the caller's identity and checks it against the allow-list.
pub async fn authorize(
    provider: &dyn IdentityProvider,
    config: &Config,
    header: Option<&str>,
) -> Result<Identity, AuthError> {
    let token = extract_credential(header)?;
    let identity = provider.resolve(token).await?;

    if !config.is_user_allowed(&identity.default_email) {
        log::warn!("[Auth] Rejected user {}", identity.default_email);
        return Err(AuthError::UserNotAllowed(identity.default_email));
    }

    log::debug!("[Auth] Authenticated user {}", identity.id);
    Ok(identity)
}

/// Extractor yielding the validated identity of the caller.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = BridgeError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let identity = authorize(state.identity.as_ref(), &state.config, header).await?;
        Ok(Self(identity))
    }
}
