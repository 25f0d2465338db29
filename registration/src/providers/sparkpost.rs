//! SparkPost transmissions client.

use crate::config::MailConfig;
use crate::error::{RegistrationError, Result};
use crate::models::{MailInfo, MailStatus};
use crate::providers::MailProvider;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

/// SparkPost mail provider.
///
/// Posts each transmission to `{api_url}/transmissions/`, authenticated with
/// the static API key.
///
/// # Examples
///
/// ```no_run
/// use event_registration::config::MailConfig;
/// use event_registration::providers::SparkPostProvider;
///
/// let provider = SparkPostProvider::from_config(&MailConfig::new("api-key".to_string()));
/// ```
#[derive(Clone)]
pub struct SparkPostProvider {
    http_client: Client,
    api_key: String,
    api_url: String,
}

impl SparkPostProvider {
    /// Create a provider for an explicit endpoint.
    #[must_use]
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            api_url,
        }
    }

    /// Create a provider from configuration.
    #[must_use]
    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.api_key.clone(), config.api_url.clone())
    }

    fn transmissions_url(&self) -> String {
        format!("{}/transmissions/", self.api_url.trim_end_matches('/'))
    }
}

impl MailProvider for SparkPostProvider {
    async fn send(&self, mail_info: &MailInfo) -> Result<MailStatus> {
        let response = self
            .http_client
            .post(self.transmissions_url())
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(mail_info)
            .send()
            .await
            .map_err(|e| RegistrationError::DispatchFailed {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "SparkPost rejected transmission");
            return Err(RegistrationError::DispatchFailed {
                status: Some(status.as_u16()),
                reason: body,
            });
        }

        response
            .json::<MailStatus>()
            .await
            .map_err(|e| RegistrationError::InvalidProviderResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmissions_url() {
        let provider = SparkPostProvider::new(
            "key".to_string(),
            "https://api.sparkpost.com/api/v1/".to_string(),
        );
        assert_eq!(
            provider.transmissions_url(),
            "https://api.sparkpost.com/api/v1/transmissions/"
        );
    }

    #[test]
    fn test_from_config() {
        let config = MailConfig::new("key".to_string()).with_api_url("http://localhost:9000");
        let provider = SparkPostProvider::from_config(&config);
        assert_eq!(provider.api_key, "key");
        assert_eq!(provider.transmissions_url(), "http://localhost:9000/transmissions/");
    }
}
