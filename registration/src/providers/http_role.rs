//! HTTP client for the auth service's role endpoint.

use crate::error::{RegistrationError, Result};
use crate::models::UserId;
use crate::providers::{ATTENDEE_ROLE, RoleService};
use reqwest::Client;
use serde::Serialize;

#[derive(Serialize)]
struct RoleGrant<'a> {
    id: &'a str,
    role: &'a str,
}

/// Role service backed by the auth service.
///
/// Issues `PUT {auth_url}/auth/roles/add/` with `{"id", "role"}`.
#[derive(Clone)]
pub struct HttpRoleService {
    http_client: Client,
    auth_url: String,
}

impl HttpRoleService {
    /// Create a role service client.
    ///
    /// # Arguments
    ///
    /// * `auth_url` - Auth service base URL (e.g., `http://localhost:8002`)
    #[must_use]
    pub fn new(auth_url: String) -> Self {
        Self {
            http_client: Client::new(),
            auth_url,
        }
    }
}

impl RoleService for HttpRoleService {
    async fn grant_attendee_role(&self, user_id: &UserId) -> Result<()> {
        let failed = |reason: String| RegistrationError::RoleGrantFailed {
            user_id: user_id.to_string(),
            reason,
        };

        let response = self
            .http_client
            .put(format!("{}/auth/roles/add/", self.auth_url.trim_end_matches('/')))
            .json(&RoleGrant {
                id: user_id.as_str(),
                role: ATTENDEE_ROLE,
            })
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(user_id = %user_id, status = status.as_u16(), "Role grant rejected: {}", body);
            return Err(failed(format!("auth service returned {status}")));
        }

        Ok(())
    }
}
