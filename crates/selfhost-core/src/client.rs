//! Request dispatch for the Self-host API.
//!
//! [`Dispatcher`] turns a [`RequestSpec`] into exactly one HTTP request,
//! carrying the authorization header of the session in effect at send time,
//! and interprets the response: 2xx bodies become an [`ApiResponse`], anything
//! else becomes a classified [`PlatformError`]. Nothing is retried.

use crate::auth::{AuthSession, SessionProvider};
use crate::config::SelfHostConfig;
use crate::error::{Error, PlatformError, Result};
use crate::query::QueryParams;
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A single request to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the versioned API root (e.g. `alerts/{uuid}`).
    pub path: String,
    /// Ordered query parameters; keys may repeat.
    pub query: QueryParams,
    /// JSON body. `None` sends no body at all.
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Create a request without query or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<QueryParams>) -> Self {
        self.query = query.into();
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize and attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn with_json<B>(self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body).map_err(|e| Error::Decode {
            path: self.path.clone(),
            message: format!("request body: {e}"),
        })?;
        Ok(self.with_body(value))
    }
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Decoded JSON (object, array or scalar).
    Json(Value),
    /// The server returned no body.
    NoContent,
}

/// Successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status (always 2xx).
    pub status: StatusCode,
    /// Response body.
    pub body: ResponseBody,
    /// Request path, for diagnostics.
    pub path: String,
}

impl ApiResponse {
    /// Returns true for the no-content sentinel.
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        matches!(self.body, ResponseBody::NoContent)
    }

    /// Borrow the JSON body, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::NoContent => None,
        }
    }

    /// Decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for the no-content sentinel or a body that
    /// does not match `T`.
    pub fn json<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        match self.body {
            ResponseBody::Json(value) => serde_json::from_value(value).map_err(|e| Error::Decode {
                path: self.path,
                message: e.to_string(),
            }),
            ResponseBody::NoContent => Err(Error::Decode {
                path: self.path,
                message: "expected a JSON body, server returned no content".to_string(),
            }),
        }
    }

    /// Discard the body.
    pub fn into_unit(self) {}
}

/// Raw bytes returned by a content-download operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    /// HTTP status (always 2xx).
    pub status: StatusCode,
    /// `Content-Type` header as sent by the server.
    pub content_type: Option<String>,
    /// Body, unmodified.
    pub bytes: Bytes,
}

struct DispatcherInner {
    http: reqwest::Client,
    sessions: Arc<dyn SessionProvider>,
    api_version: String,
}

/// Sends requests on behalf of every resource client.
///
/// Cheap to clone; clones share the HTTP connection pool and session.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.inner.sessions.current_session().base_url().as_str())
            .field("api_version", &self.inner.api_version)
            .finish_non_exhaustive()
    }
}

/// Build the HTTP client used for dispatch and session establishment.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_http_client(config: &SelfHostConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))
}

impl Dispatcher {
    /// Create a dispatcher over an existing client and session source.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        sessions: Arc<dyn SessionProvider>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                http,
                sessions,
                api_version: api_version.into(),
            }),
        }
    }

    /// Establish a session for `config` and return a dispatcher bound to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the credential
    /// exchange fails.
    pub async fn connect(config: &SelfHostConfig) -> Result<Self> {
        let http = build_http_client(config)?;
        let session = AuthSession::establish(&http, config).await?;
        Ok(Self::new(http, Arc::new(session), config.api_version.clone()))
    }

    /// HTTP client shared by this dispatcher.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// API version segment.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// `Authorization` header value the next request will carry.
    #[must_use]
    pub fn current_header(&self) -> String {
        self.inner.sessions.current_session().current_header()
    }

    /// Send a request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response arrived,
    /// [`Error::Platform`] for non-2xx statuses and [`Error::Decode`] for an
    /// undecodable 2xx body.
    pub async fn dispatch(&self, spec: &RequestSpec) -> Result<ApiResponse> {
        let response = self.send(spec, "application/json").await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse {
                status,
                body: ResponseBody::NoContent,
                path: spec.path.clone(),
            });
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            path: spec.path.clone(),
            message: e.to_string(),
        })?;

        Ok(ApiResponse {
            status,
            body: ResponseBody::Json(value),
            path: spec.path.clone(),
        })
    }

    /// Send a request and return the body bytes and content type unmodified.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`], minus decoding.
    pub async fn dispatch_raw(&self, spec: &RequestSpec) -> Result<RawContent> {
        let response = self.send(spec, "*/*").await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(RawContent {
            status,
            content_type,
            bytes,
        })
    }

    /// Dispatch and decode the body into `R`.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`] and [`ApiResponse::json`].
    pub async fn send_json<R>(&self, spec: &RequestSpec) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.dispatch(spec).await?.json()
    }

    /// Send a request whose success body carries nothing the caller needs.
    ///
    /// Only the status is checked; a 2xx body is drained without decoding, so
    /// a plain-text acknowledgement still counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response arrived and
    /// [`Error::Platform`] for non-2xx statuses.
    pub async fn send_unit(&self, spec: &RequestSpec) -> Result<()> {
        let response = self.send(spec, "application/json").await?;
        let drained = response.bytes().await?;
        if !drained.is_empty() {
            debug!(path = %spec.path, len = drained.len(), "ignored response body");
        }
        Ok(())
    }

    async fn send(&self, spec: &RequestSpec, accept: &str) -> Result<reqwest::Response> {
        let session = self.inner.sessions.current_session();
        let url = session.endpoint(&self.inner.api_version, &spec.path)?;

        let mut request = self
            .inner
            .http
            .request(spec.method.clone(), url.clone())
            .header(AUTHORIZATION, session.current_header())
            .header(ACCEPT, accept);

        if !spec.query.is_empty() {
            request = request.query(spec.query.as_pairs());
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %spec.method, url = %url, error = %e, "request failed before a response");
            Error::from(e)
        })?;

        let status = response.status();
        debug!(
            method = %spec.method,
            url = %url,
            status = status.as_u16(),
            has_body = spec.body.is_some(),
            "API request sent"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), path = %spec.path, error = %e, "failed to read error body");
                Bytes::new()
            }
        };
        let error = PlatformError::from_response(status, spec.path.clone(), body);
        if status.is_server_error() || !status.is_client_error() {
            warn!(status = status.as_u16(), path = %spec.path, message = %error.message, "platform error");
        }
        Err(Error::Platform(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockSessionProvider, Session};
    use crate::error::{ErrorKind, TransportError};
    use serde_json::json;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn session_for(server: &MockServer) -> Arc<Session> {
        session_at(&server.uri())
    }

    fn session_at(base_url: &str) -> Arc<Session> {
        Arc::new(Session::bearer(Url::parse(base_url).unwrap(), "test-token"))
    }

    fn dispatcher_at(base_url: &str) -> Dispatcher {
        let session = session_at(base_url);
        let mut sessions = MockSessionProvider::new();
        sessions
            .expect_current_session()
            .returning(move || Arc::clone(&session));
        Dispatcher::new(reqwest::Client::new(), Arc::new(sessions), "v2")
    }

    fn test_dispatcher(server: &MockServer) -> Dispatcher {
        dispatcher_at(&server.uri())
    }

    #[tokio::test]
    async fn dispatch_attaches_auth_and_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/things"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "t-1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let response = test_dispatcher(&server)
            .dispatch(&RequestSpec::get("things"))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, ResponseBody::Json(json!([{"uuid": "t-1"}])));
    }

    #[tokio::test]
    async fn documented_statuses_produce_exact_kind() {
        let server = MockServer::start().await;
        let cases = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (405, ErrorKind::MethodNotAllowed),
            (409, ErrorKind::Conflict),
            (429, ErrorKind::TooManyRequests),
            (500, ErrorKind::InternalServer),
        ];
        for (status, _) in cases {
            Mock::given(method("GET"))
                .and(path(format!("/v2/status/{status}").as_str()))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let dispatcher = test_dispatcher(&server);
        for (status, kind) in cases {
            let err = dispatcher
                .dispatch(&RequestSpec::get(format!("status/{status}")))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), Some(kind), "status {status}");
            assert_eq!(err.status(), Some(status));
        }
    }

    #[tokio::test]
    async fn undocumented_statuses_are_fatal() {
        let server = MockServer::start().await;
        for status in [402, 418, 422, 502, 503] {
            Mock::given(method("GET"))
                .and(path(format!("/v2/status/{status}").as_str()))
                .respond_with(ResponseTemplate::new(status).set_body_string("upstream gone"))
                .mount(&server)
                .await;
        }

        let dispatcher = test_dispatcher(&server);
        for status in [402, 418, 422, 502, 503] {
            let err = dispatcher
                .dispatch(&RequestSpec::get(format!("status/{status}")))
                .await
                .unwrap_err();
            match err {
                Error::Platform(platform) => {
                    assert_eq!(platform.kind, ErrorKind::Fatal);
                    assert_eq!(platform.status, status);
                    assert_eq!(platform.body, "upstream gone");
                    assert_eq!(platform.path, format!("status/{status}"));
                }
                other => panic!("expected platform error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn empty_body_is_no_content_and_empty_object_is_json() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/alerts/a-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/alerts/a-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let dispatcher = test_dispatcher(&server);
        let deleted = dispatcher
            .dispatch(&RequestSpec::delete("alerts/a-1"))
            .await
            .unwrap();
        assert!(deleted.is_no_content());
        assert_eq!(deleted.status, StatusCode::NO_CONTENT);

        let fetched = dispatcher
            .dispatch(&RequestSpec::get("alerts/a-1"))
            .await
            .unwrap();
        assert!(!fetched.is_no_content());
        assert_eq!(fetched.as_json(), Some(&json!({})));
    }

    #[tokio::test]
    async fn no_content_cannot_be_decoded_as_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = test_dispatcher(&server)
            .send_json::<serde_json::Value>(&RequestSpec::get("users/me"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn repeated_query_keys_keep_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/programs"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut query = QueryParams::new();
        query.push("limit", 5);
        query.push_each("tags", ["zeta", "alpha", "zeta"]);

        test_dispatcher(&server)
            .dispatch(&RequestSpec::get("programs").with_query(query))
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.query(),
            Some("limit=5&tags=zeta&tags=alpha&tags=zeta")
        );
    }

    #[tokio::test]
    async fn body_is_json_only_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/groups"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "ops"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "g-1", "name": "ops"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v2/groups/g-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let dispatcher = test_dispatcher(&server);
        dispatcher
            .dispatch(&RequestSpec::post("groups").with_body(json!({"name": "ops"})))
            .await
            .unwrap();
        dispatcher
            .dispatch(&RequestSpec::delete("groups/g-1"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let delete = requests
            .iter()
            .find(|r| r.method.as_str() == "DELETE")
            .unwrap();
        assert!(delete.body.is_empty());
        assert!(delete.headers.get("content-type").is_none());
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "token expired"})))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server);
        let mut sessions = MockSessionProvider::new();
        sessions
            .expect_current_session()
            .times(1)
            .returning(move || Arc::clone(&session));
        let dispatcher = Dispatcher::new(reqwest::Client::new(), Arc::new(sessions), "v2");

        let err = dispatcher
            .dispatch(&RequestSpec::get("users"))
            .await
            .unwrap_err();
        match err {
            Error::Platform(platform) => {
                assert_eq!(platform.kind, ErrorKind::Unauthorized);
                assert_eq!(platform.message, "token expired");
            }
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let mut sessions = MockSessionProvider::new();
        sessions
            .expect_current_session()
            .returning(move || Arc::clone(&session));
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(http, Arc::new(sessions), "v2");

        let err = dispatcher
            .dispatch(&RequestSpec::get("things"))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_server_is_connect_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dispatcher = dispatcher_at(&format!("http://127.0.0.1:{port}"));

        let err = dispatcher
            .dispatch(&RequestSpec::get("things"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Transport(TransportError::Connect(_))),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn send_unit_accepts_text_acknowledgement() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2/users/u-1/rate"))
            .and(body_json(json!({"rate": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v2/things/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = test_dispatcher(&server);
        dispatcher
            .send_unit(&RequestSpec::put("users/u-1/rate").with_body(json!({"rate": 5})))
            .await
            .unwrap();
        dispatcher
            .send_unit(&RequestSpec::delete("things/t-1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_unit_still_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such thing"))
            .mount(&server)
            .await;

        let err = test_dispatcher(&server)
            .send_unit(&RequestSpec::delete("things/t-1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(err.to_string(), "Not Found (404) at things/t-1: no such thing");
    }

    #[tokio::test]
    async fn dispatch_raw_keeps_bytes_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/datasets/d-1/raw"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/csv")
                    .set_body_bytes(b"a,b\n1,2\n".to_vec()),
            )
            .mount(&server)
            .await;

        let raw = test_dispatcher(&server)
            .dispatch_raw(&RequestSpec::get("datasets/d-1/raw"))
            .await
            .unwrap();
        assert_eq!(raw.content_type.as_deref(), Some("text/csv"));
        assert_eq!(raw.bytes, Bytes::from_static(b"a,b\n1,2\n"));
    }

    #[tokio::test]
    async fn connect_with_token_builds_dispatcher() {
        let server = MockServer::start().await;
        let config = SelfHostConfig::new(server.uri(), crate::config::Credentials::token("abc"))
            .unwrap();
        let dispatcher = Dispatcher::connect(&config).await.unwrap();
        assert_eq!(dispatcher.current_header(), "Bearer abc");
        assert_eq!(dispatcher.current_header(), dispatcher.current_header());
        assert_eq!(dispatcher.api_version(), "v2");
    }

    #[test]
    fn request_spec_with_json_serializes_body() {
        #[derive(Serialize)]
        struct Payload<'a> {
            name: &'a str,
        }

        let spec = RequestSpec::put("groups/g-1")
            .with_json(&Payload { name: "ops" })
            .unwrap();
        assert_eq!(spec.method, Method::PUT);
        assert_eq!(spec.body, Some(json!({"name": "ops"})));
    }
}
