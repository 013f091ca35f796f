//! Configuration structures for Self-host clients.
//!
//! Configuration is resolved once, at client construction: explicit values
//! win, then the `SELF_HOST_*` environment variables, otherwise construction
//! fails. Nothing reads the environment after that point.

use crate::error::{Error, Result};
use crate::types::DEFAULT_API_VERSION;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the platform base URL.
pub const ENV_BASE_URL: &str = "SELF_HOST_BASE_URL";

/// Environment variable holding the username (the domain name).
pub const ENV_USERNAME: &str = "SELF_HOST_USERNAME";

/// Environment variable holding the password (the access key).
pub const ENV_PASSWORD: &str = "SELF_HOST_PASSWORD";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default credential-exchange path, relative to the versioned API root.
pub const DEFAULT_AUTH_PATH: &str = "users/me";

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("selfhost-rust/", env!("CARGO_PKG_VERSION"));

/// Credentials used to establish a session.
///
/// Exactly one authentication mode is active per client.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Username and password, exchanged against the authentication endpoint.
    Password {
        /// Username (the domain name)
        username: String,
        /// Password (the access key)
        password: SecretString,
    },
    /// Pre-issued bearer token; no exchange is performed.
    Token(SecretString),
}

impl Credentials {
    /// Username/password credentials.
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Pre-issued token credentials.
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(SecretString::from(token.into()))
    }

    fn ensure_complete(&self) -> Result<()> {
        match self {
            Self::Password { username, password } => {
                if username.trim().is_empty() || password.expose_secret().is_empty() {
                    return Err(Error::ConfigError(
                        "Username and password must both be non-empty".to_string(),
                    ));
                }
            }
            Self::Token(token) => {
                if token.expose_secret().trim().is_empty() {
                    return Err(Error::ConfigError("Token must be non-empty".to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Configuration for a Self-host client instance.
#[derive(Debug, Clone, Validate)]
pub struct SelfHostConfig {
    /// Platform root URL (e.g., "https://selfhost.example.com")
    #[validate(url)]
    pub base_url: String,

    /// Credentials for the single active authentication mode
    pub credentials: Credentials,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// API version path segment
    #[validate(length(min = 1))]
    pub api_version: String,

    /// Credential-exchange path, relative to the versioned API root
    #[validate(length(min = 1))]
    pub auth_path: String,

    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl SelfHostConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The platform root URL
    /// * `credentials` - Username/password or token
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let config = Self {
            base_url: base_url.into().trim().to_string(),
            credentials,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api_version: DEFAULT_API_VERSION.to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        };

        config.check()?;
        Ok(config)
    }

    /// Resolve configuration from explicit values, falling back to the
    /// process environment for anything omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL or no credentials can be found.
    pub fn resolve(base_url: Option<String>, credentials: Option<Credentials>) -> Result<Self> {
        Self::resolve_with(base_url, credentials, |key| std::env::var(key).ok())
    }

    /// Resolve configuration entirely from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None)
    }

    /// Resolve configuration using a custom variable lookup.
    ///
    /// Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL or no credentials can be found.
    pub fn resolve_with<F>(
        base_url: Option<String>,
        credentials: Option<Credentials>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .or_else(|| lookup(ENV_BASE_URL))
            .ok_or_else(|| Error::ConfigError("No base_url provided to client".to_string()))?;

        let credentials = match credentials {
            Some(credentials) => credentials,
            None => match (lookup(ENV_USERNAME), lookup(ENV_PASSWORD)) {
                (Some(username), Some(password)) => Credentials::password(username, password),
                _ => {
                    return Err(Error::ConfigError(
                        "No credentials provided to client".to_string(),
                    ))
                }
            },
        };

        Self::new(base_url, credentials)
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the API version segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the credential-exchange path.
    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = path.into();
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate every field, including the credential mode.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        self.credentials.ensure_complete()?;
        self.parse_base_url().map(|_| ())
    }

    /// Parse and normalise the base URL.
    ///
    /// Trailing slashes are stripped and only `http`/`https` are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or uses another scheme.
    pub fn parse_base_url(&self) -> Result<Url> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))?;

        match url.scheme() {
            "http" | "https" if !url.cannot_be_a_base() => Ok(url),
            scheme => Err(Error::ConfigError(format!(
                "Unsupported base URL scheme '{scheme}', expected http or https"
            ))),
        }
    }
}
