//! HTTP client for the user service.

use crate::error::{RegistrationError, Result};
use crate::models::{UserId, UserInfo};
use crate::providers::UserDirectory;
use reqwest::{Client, StatusCode, Url};

/// User directory backed by the user service.
///
/// Issues `GET {user_url}/user/{id}/`.
#[derive(Clone)]
pub struct HttpUserDirectory {
    http_client: Client,
    user_url: String,
}

impl HttpUserDirectory {
    /// Create a directory client.
    ///
    /// # Arguments
    ///
    /// * `user_url` - User service base URL (e.g., `http://localhost:8003`)
    #[must_use]
    pub fn new(user_url: String) -> Self {
        Self {
            http_client: Client::new(),
            user_url,
        }
    }

    /// `{user_url}/user/{id}/`, with `id` escaped as a single path segment.
    fn user_endpoint(&self, user_id: &UserId) -> Result<Url> {
        let invalid =
            || RegistrationError::Config(format!("Invalid user service URL: {}", self.user_url));

        let mut url = Url::parse(&self.user_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(["user", user_id.as_str(), ""]);
        Ok(url)
    }
}

impl UserDirectory for HttpUserDirectory {
    async fn user_info(&self, user_id: &UserId) -> Result<UserInfo> {
        let response = self
            .http_client
            .get(self.user_endpoint(user_id)?)
            .send()
            .await
            .map_err(|e| RegistrationError::LookupFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<UserInfo>()
                .await
                .map_err(|e| RegistrationError::LookupFailed(format!("Invalid user info: {e}"))),
            StatusCode::NOT_FOUND => Err(RegistrationError::not_found("user", user_id.as_str())),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(user_id = %user_id, status = status.as_u16(), "User lookup failed: {}", body);
                Err(RegistrationError::LookupFailed(format!(
                    "user service returned {status}"
                )))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_endpoint() {
        let directory = HttpUserDirectory::new("http://localhost:8003".to_string());
        assert_eq!(
            directory.user_endpoint(&UserId::new("u1")).unwrap().as_str(),
            "http://localhost:8003/user/u1/"
        );
    }

    #[test]
    fn test_user_endpoint_keeps_base_path() {
        let directory = HttpUserDirectory::new("http://gateway/api/".to_string());
        assert_eq!(
            directory.user_endpoint(&UserId::new("u1")).unwrap().as_str(),
            "http://gateway/api/user/u1/"
        );
    }

    #[test]
    fn test_user_endpoint_escapes_id() {
        let directory = HttpUserDirectory::new("http://localhost:8003".to_string());
        let url = directory.user_endpoint(&UserId::new("a/b?c#d")).unwrap();

        assert_eq!(url.path(), "/user/a%2Fb%3Fc%23d/");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let directory = HttpUserDirectory::new("not a url".to_string());
        let err = directory.user_endpoint(&UserId::new("u1")).unwrap_err();
        assert!(matches!(err, RegistrationError::Config(_)));
    }
}
