//! Registration configuration.
//!
//! Loaded from environment variables with defaults for local development.
//! Only the mail provider API key is mandatory.

use crate::error::{RegistrationError, Result};
use std::env;

/// Default SparkPost API base URL.
pub const DEFAULT_SPARKPOST_API: &str = "https://api.sparkpost.com/api/v1";

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Mail provider configuration.
    pub mail: MailConfig,

    /// Peer service locations.
    pub services: ServiceConfig,

    /// `PostgreSQL` configuration, if a database is configured.
    pub database: Option<DatabaseConfig>,
}

/// Mail provider configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// API base URL; transmissions go to `{api_url}/transmissions/`.
    pub api_url: String,

    /// API key sent verbatim in the `Authorization` header.
    pub api_key: String,
}

impl MailConfig {
    /// Create mail configuration for the public SparkPost endpoint.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            api_url: DEFAULT_SPARKPOST_API.to_string(),
            api_key,
        }
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Locations of the services this crate calls into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Auth service base URL (role grants).
    ///
    /// Default: `http://localhost:8002`
    pub auth_url: String,

    /// User service base URL (directory lookups).
    ///
    /// Default: `http://localhost:8003`
    pub user_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://localhost:8002".to_string(),
            user_url: "http://localhost:8003".to_string(),
        }
    }
}

/// `PostgreSQL` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,

    /// Maximum number of pooled connections.
    ///
    /// Default: 10
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create database configuration with the default pool size.
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self {
            url,
            max_connections: 10,
        }
    }

    /// Set the pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

impl RegistrationConfig {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SPARKPOST_APIKEY` | required |
    /// | `SPARKPOST_API` | [`DEFAULT_SPARKPOST_API`] |
    /// | `AUTH_SERVICE` | `http://localhost:8002` |
    /// | `USER_SERVICE` | `http://localhost:8003` |
    /// | `DATABASE_URL` | none (no database) |
    /// | `DATABASE_MAX_CONNECTIONS` | `10` |
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::Config` if `SPARKPOST_APIKEY` is unset or
    /// a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`RegistrationConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("SPARKPOST_APIKEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RegistrationError::Config("SPARKPOST_APIKEY is not set".to_string()))?;

        let mut mail = MailConfig::new(api_key);
        if let Some(api_url) = lookup("SPARKPOST_API") {
            mail = mail.with_api_url(api_url);
        }

        let defaults = ServiceConfig::default();
        let services = ServiceConfig {
            auth_url: lookup("AUTH_SERVICE").unwrap_or(defaults.auth_url),
            user_url: lookup("USER_SERVICE").unwrap_or(defaults.user_url),
        };

        let database = match lookup("DATABASE_URL") {
            Some(url) => {
                let mut database = DatabaseConfig::new(url);
                if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
                    let max_connections = raw.parse().map_err(|e| {
                        RegistrationError::Config(format!(
                            "DATABASE_MAX_CONNECTIONS must be a positive integer: {e}"
                        ))
                    })?;
                    database = database.with_max_connections(max_connections);
                }
                Some(database)
            }
            None => None,
        };

        Ok(Self {
            mail,
            services,
            database,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RegistrationConfig::from_lookup(lookup(&[("SPARKPOST_APIKEY", "secret")])).unwrap();

        assert_eq!(config.mail.api_key, "secret");
        assert_eq!(config.mail.api_url, DEFAULT_SPARKPOST_API);
        assert_eq!(config.services, ServiceConfig::default());
        assert!(config.database.is_none());
    }

    #[test]
    fn test_missing_api_key() {
        let err = RegistrationConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, RegistrationError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = RegistrationConfig::from_lookup(lookup(&[
            ("SPARKPOST_APIKEY", "secret"),
            ("SPARKPOST_API", "http://mail.internal/api/v1"),
            ("AUTH_SERVICE", "http://auth:8002"),
            ("USER_SERVICE", "http://user:8003"),
            ("DATABASE_URL", "postgres://localhost/registration"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.mail.api_url, "http://mail.internal/api/v1");
        assert_eq!(config.services.auth_url, "http://auth:8002");
        assert_eq!(config.services.user_url, "http://user:8003");
        assert_eq!(
            config.database,
            Some(DatabaseConfig::new("postgres://localhost/registration".to_string()).with_max_connections(4))
        );
    }

    #[test]
    fn test_bad_pool_size() {
        let err = RegistrationConfig::from_lookup(lookup(&[
            ("SPARKPOST_APIKEY", "secret"),
            ("DATABASE_URL", "postgres://localhost/registration"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
