use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{AuthProvider, AuthUser};
use crate::errors::AppError;

const USER_INFO_PATH: &str = "/v1/user";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the hosted auth provider's user-info endpoint.
///
/// Replays the caller's session token with bearer auth; the provider answers
/// with the account it belongs to, or 401 for a dead token.
#[derive(Clone)]
pub struct HttpAuthProvider {
    client: Client,
    endpoint: String,
    project_id: String,
}

impl HttpAuthProvider {
    pub fn new(endpoint: &str, project_id: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    id: Uuid,
    email: String,
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn current_user(&self, session_token: &str) -> Result<Option<AuthUser>, AppError> {
        let url = format!("{}{}", self.endpoint, USER_INFO_PATH);

        let response = self
            .client
            .get(&url)
            .bearer_auth(session_token)
            .header("X-Auth-Project", &self.project_id)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("provider unreachable: {e}")))?;

        match response.status() {
            StatusCode::OK => {
                let user: UserInfoResponse = response
                    .json()
                    .await
                    .map_err(|e| AppError::AuthProvider(format!("malformed user response: {e}")))?;
                Ok(Some(AuthUser {
                    id: user.id,
                    email: user.email,
                }))
            }
            // A dead token is "not logged in", not a failure
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Session token rejected by auth provider");
                Ok(None)
            }
            status => Err(AppError::AuthProvider(format!(
                "provider returned status {status}"
            ))),
        }
    }
}
