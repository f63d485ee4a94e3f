//! Session resolution against the hosted auth provider.
//!
//! Read paths are public; only the save operation consults the provider.
//! The provider is reached through the `AuthProvider` trait so tests can
//! substitute a fake, carried in `AppState` as `Arc<dyn AuthProvider>`.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub mod client;

/// Name of the session cookie set by the frontend after sign-in.
pub const SESSION_COOKIE: &str = "session";

/// A caller identity resolved by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Resolves session tokens to user identities.
///
/// `Ok(None)` means "no logged-in user" (missing, expired, or revoked token);
/// `Err` is reserved for provider-level failures so callers can tell the two
/// apart.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self, session_token: &str) -> Result<Option<AuthUser>, AppError>;
}

/// Extracts the session token from a request: `Authorization: Bearer` first,
/// then the `session` cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
