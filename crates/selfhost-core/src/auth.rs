//! Session establishment and the authorization header slot.
//!
//! An [`AuthSession`] owns the credentials and the single [`Session`] slot read
//! by every dispatched request. The slot only changes through explicit calls:
//! [`AuthSession::establish`], [`AuthSession::reestablish`] and
//! [`AuthSession::use_token`]. Expired credentials are never refreshed behind
//! the caller's back; they surface as `Unauthorized` on the next request.

use crate::config::{Credentials, SelfHostConfig};
use crate::error::{extract_message, Error, ErrorKind, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};
use url::Url;

/// The authorization context used for requests: header value plus base URL.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: Url,
    authorization: SecretString,
    established_at: DateTime<Utc>,
}

impl Session {
    /// Create a session from an already-normalised base URL and header value.
    #[must_use]
    pub fn new(base_url: Url, authorization: impl Into<String>) -> Self {
        Self {
            base_url,
            authorization: SecretString::from(authorization.into()),
            established_at: Utc::now(),
        }
    }

    /// Session for a pre-issued bearer token.
    #[must_use]
    pub fn bearer(base_url: Url, token: &str) -> Self {
        Self::new(base_url, format!("Bearer {token}"))
    }

    /// Session for HTTP basic credentials.
    #[must_use]
    pub fn basic(base_url: Url, username: &str, password: &str) -> Self {
        Self::new(base_url, basic_header(username, password))
    }

    /// Base URL the session targets.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `Authorization` header value for requests made with this session.
    #[must_use]
    pub fn current_header(&self) -> String {
        self.authorization.expose_secret().to_string()
    }

    /// When the session was established.
    #[must_use]
    pub const fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// Build the absolute URL for `path` under the versioned API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn endpoint(&self, api_version: &str, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!("{} cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(api_version.split('/').filter(|s| !s.is_empty()));
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

/// Encode a `Basic` authorization header value.
#[must_use]
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Source of the session in effect for the next request.
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider: Send + Sync {
    /// Snapshot of the current session.
    fn current_session(&self) -> Arc<Session>;
}

/// Owns credentials and the current [`Session`].
#[derive(Debug)]
pub struct AuthSession {
    credentials: Credentials,
    api_version: String,
    auth_path: String,
    slot: RwLock<Arc<Session>>,
}

impl AuthSession {
    /// Establish a session for the given configuration.
    ///
    /// Password credentials are checked against the authentication endpoint;
    /// token credentials are used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the endpoint rejects the
    /// credentials, [`Error::Transport`] if it cannot be reached, and
    /// [`Error::ConfigError`] for an invalid configuration.
    pub async fn establish(http: &reqwest::Client, config: &SelfHostConfig) -> Result<Self> {
        config.check()?;
        let base_url = config.parse_base_url()?;
        let session = exchange(
            http,
            base_url,
            &config.api_version,
            &config.auth_path,
            &config.credentials,
        )
        .await?;

        Ok(Self {
            credentials: config.credentials.clone(),
            api_version: config.api_version.clone(),
            auth_path: config.auth_path.clone(),
            slot: RwLock::new(Arc::new(session)),
        })
    }

    /// Wrap an existing session without performing an exchange.
    ///
    /// `api_version` and `auth_path` are used by later calls to
    /// [`AuthSession::reestablish`].
    #[must_use]
    pub fn from_session(
        session: Session,
        credentials: Credentials,
        api_version: impl Into<String>,
        auth_path: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            api_version: api_version.into(),
            auth_path: auth_path.into(),
            slot: RwLock::new(Arc::new(session)),
        }
    }

    /// API version segment the session authenticates against.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `Authorization` header value currently in effect.
    #[must_use]
    pub fn current_header(&self) -> String {
        self.current_session().current_header()
    }

    /// Base URL of the current session.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.current_session().base_url().clone()
    }

    /// Re-run the credential exchange and replace the current session.
    ///
    /// The old session stays in effect if the exchange fails.
    ///
    /// # Errors
    ///
    /// Same as [`AuthSession::establish`].
    pub async fn reestablish(&self, http: &reqwest::Client) -> Result<()> {
        let previous = self.current_session();
        let base_url = previous.base_url().clone();
        let session = exchange(
            http,
            base_url,
            &self.api_version,
            &self.auth_path,
            &self.credentials,
        )
        .await?;
        debug!(
            previous_established_at = %previous.established_at(),
            "replacing session"
        );
        self.replace(session);
        Ok(())
    }

    /// Switch the session to a bearer token, e.g. one returned when a user
    /// token is created.
    pub fn use_token(&self, token: &SecretString) {
        let session = Session::bearer(self.base_url(), token.expose_secret());
        self.replace(session);
    }

    fn replace(&self, session: Session) {
        match self.slot.write() {
            Ok(mut slot) => *slot = Arc::new(session),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(session),
        }
    }
}

impl SessionProvider for AuthSession {
    fn current_session(&self) -> Arc<Session> {
        match self.slot.read() {
            Ok(slot) => Arc::clone(&*slot),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }
}

async fn exchange(
    http: &reqwest::Client,
    base_url: Url,
    api_version: &str,
    auth_path: &str,
    credentials: &Credentials,
) -> Result<Session> {
    let (username, password) = match credentials {
        Credentials::Token(token) => return Ok(Session::bearer(base_url, token.expose_secret())),
        Credentials::Password { username, password } => (username, password),
    };

    let session = Session::basic(base_url, username, password.expose_secret());
    let url = session.endpoint(api_version, auth_path)?;
    debug!(url = %url, username = %username, "establishing session");

    let response = http
        .get(url.clone())
        .header(AUTHORIZATION, session.current_header())
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        debug!(url = %url, status = status.as_u16(), "session established");
        return Ok(session);
    }

    let message = match response.bytes().await {
        Ok(body) => extract_message(&String::from_utf8_lossy(&body)),
        Err(e) => {
            warn!(url = %url, error = %e, "failed to read credential exchange body");
            None
        }
    }
    .unwrap_or_else(|| ErrorKind::from_status(status.as_u16()).default_message().to_string());
    warn!(url = %url, status = status.as_u16(), "credential exchange rejected");

    Err(Error::Authentication {
        status: Some(status.as_u16()),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn password_config(server: &MockServer) -> SelfHostConfig {
        SelfHostConfig::new(server.uri(), Credentials::password("test", "test")).unwrap()
    }

    #[test]
    fn basic_header_matches_manual_encoding() {
        // base64("test:test")
        assert_eq!(basic_header("test", "test"), "Basic dGVzdDp0ZXN0");
    }

    #[test]
    fn endpoint_joins_version_and_path() {
        let session = Session::bearer(Url::parse("http://example.com").unwrap(), "t");
        let url = session.endpoint("v2", "alerts/abc").unwrap();
        assert_eq!(url.as_str(), "http://example.com/v2/alerts/abc");

        let session = Session::bearer(Url::parse("https://example.com/api").unwrap(), "t");
        let url = session.endpoint("v2", "/things/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v2/things");
    }

    #[test]
    fn current_header_is_idempotent() {
        let auth = AuthSession::from_session(
            Session::bearer(Url::parse("http://example.com").unwrap(), "abc"),
            Credentials::token("abc"),
            "v2",
            "users/me",
        );

        let first = auth.current_header();
        let second = auth.current_header();
        assert_eq!(first, "Bearer abc");
        assert_eq!(first, second);
    }

    #[test]
    fn use_token_rotates_header() {
        let auth = AuthSession::from_session(
            Session::basic(Url::parse("http://example.com").unwrap(), "test", "test"),
            Credentials::password("test", "test"),
            "v2",
            "users/me",
        );
        assert!(auth.current_header().starts_with("Basic "));

        auth.use_token(&SecretString::from("secret-token.abc".to_string()));
        assert_eq!(auth.current_header(), "Bearer secret-token.abc");
        assert_eq!(auth.base_url().as_str(), "http://example.com/");
    }

    #[tokio::test]
    async fn establish_with_token_skips_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let config = SelfHostConfig::new(server.uri(), Credentials::token("abc")).unwrap();
        let auth = AuthSession::establish(&reqwest::Client::new(), &config)
            .await
            .unwrap();
        assert_eq!(auth.current_header(), "Bearer abc");
    }

    #[tokio::test]
    async fn establish_with_password_exchanges_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users/me"))
            .and(header("authorization", "Basic dGVzdDp0ZXN0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": "5ecb8dbc-9b7f-4eae-97b2-7c286ec97d86",
                "name": "test"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = AuthSession::establish(&reqwest::Client::new(), &password_config(&server))
            .await
            .unwrap();
        assert_eq!(auth.current_header(), "Basic dGVzdDp0ZXN0");
    }

    #[tokio::test]
    async fn establish_rejected_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "bad key"})),
            )
            .mount(&server)
            .await;

        let err = AuthSession::establish(&reqwest::Client::new(), &password_config(&server))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Authentication {
                status: Some(401),
                message: "bad key".to_string()
            }
        );
    }

    #[tokio::test]
    async fn reestablish_keeps_old_session_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users/me"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/users/me"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let auth = AuthSession::establish(&http, &password_config(&server))
            .await
            .unwrap();
        let before = auth.current_session();

        let err = auth.reestablish(&http).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(Arc::ptr_eq(&before, &auth.current_session()));
    }

    #[tokio::test]
    async fn reestablish_uses_wrapped_version_and_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/whoami"))
            .and(header("authorization", "Basic dGVzdDp0ZXN0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let auth = AuthSession::from_session(
            Session::bearer(Url::parse(&server.uri()).unwrap(), "stale"),
            Credentials::password("test", "test"),
            "v3",
            "whoami",
        );
        assert_eq!(auth.api_version(), "v3");

        auth.reestablish(&reqwest::Client::new()).await.unwrap();
        assert_eq!(auth.current_header(), "Basic dGVzdDp0ZXN0");
    }
}
