//! Error types for Self-host operations.
//!
//! This module provides the error taxonomy shared by every resource client:
//! HTTP status classification into [`ErrorKind`], the [`PlatformError`] record
//! attached to a rejected request, and transport-level failures that never
//! reached a server-classified answer.

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

/// Classification of a non-2xx response from the platform.
///
/// The mapping is a pure function of the status code and is shared by every
/// resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400: malformed input, e.g. an invalid filter combination.
    BadRequest,
    /// 401: missing, invalid or expired credential.
    Unauthorized,
    /// 403: authenticated but not granted by any policy.
    Forbidden,
    /// 404: the resource identifier does not exist.
    NotFound,
    /// 405: operation unsupported for this resource/identity combination.
    MethodNotAllowed,
    /// 409: duplicate name or other unique constraint violation.
    Conflict,
    /// 429: rate limit exceeded.
    TooManyRequests,
    /// 500: server-side failure.
    InternalServer,
    /// Any other non-2xx status.
    Fatal,
}

impl ErrorKind {
    /// Classify an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            409 => Self::Conflict,
            429 => Self::TooManyRequests,
            500 => Self::InternalServer,
            _ => Self::Fatal,
        }
    }

    /// Returns the error code for this kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Conflict => "CONFLICT",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::InternalServer => "INTERNAL_SERVER",
            Self::Fatal => "FATAL_ERROR",
        }
    }

    /// Message used when the server did not provide one.
    #[must_use]
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Conflict => "Conflict",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServer => "Internal Server Error",
            Self::Fatal => "A fatal error occurred",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_message())
    }
}

/// A request the platform answered with a non-2xx status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} ({status}) at {path}: {message}")]
pub struct PlatformError {
    /// Classified kind.
    pub kind: ErrorKind,
    /// HTTP status code.
    pub status: u16,
    /// Server-provided message, or the kind's default label.
    pub message: String,
    /// Request path that triggered the error.
    pub path: String,
    /// Original response body, byte for byte.
    pub body: Bytes,
}

impl PlatformError {
    /// Build the error record for a rejected response.
    ///
    /// Invalid UTF-8 is replaced only in the extracted message; `body` keeps
    /// the bytes as received.
    #[must_use]
    pub fn from_response(status: StatusCode, path: impl Into<String>, body: Bytes) -> Self {
        let kind = ErrorKind::from_status(status.as_u16());
        let message = extract_message(&String::from_utf8_lossy(&body))
            .unwrap_or_else(|| kind.default_message().to_string());

        Self {
            kind,
            status: status.as_u16(),
            message,
            path: path.into(),
            body,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers the JSON `error` or `message` string fields, then falls back to the
/// trimmed raw text. Returns `None` for blank bodies.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let field = ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(serde_json::Value::as_str));
        if let Some(message) = field {
            return Some(message.to_string());
        }
    }

    Some(trimmed.to_string())
}

/// Failure before a server-classified answer was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request deadline elapsed.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport failure (TLS, broken body stream, ...).
    #[error("Transport failure: {0}")]
    Other(String),
}

/// Main error type for Self-host operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Session establishment was rejected by the authentication endpoint.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Status returned by the authentication endpoint, if any
        status: Option<u16>,
        /// Server message or default label
        message: String,
    },

    /// Network or timeout failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The platform rejected the request.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid UUID format
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    /// A successful response could not be decoded.
    #[error("Failed to decode response from {path}: {message}")]
    Decode {
        /// Request path
        path: String,
        /// Decoder message
        message: String,
    },
}

/// Specialized result type for Self-host operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::Transport(TransportError::Timeout(_)) => "TIMEOUT",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Platform(err) => err.kind.error_code(),
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidUuid(_) => "INVALID_UUID",
            Self::Decode { .. } => "DECODE_ERROR",
        }
    }

    /// Kind of the platform rejection, if this is one.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Platform(err) => Some(err.kind),
            _ => None,
        }
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Platform(err) => Some(err.status),
            Self::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the platform answered and rejected the request.
    #[must_use]
    pub const fn is_platform(&self) -> bool {
        matches!(self, Self::Platform(_))
    }

    /// Returns true if the request timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout(_)))
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        match self {
            Self::Platform(err) => matches!(err.kind, ErrorKind::InternalServer | ErrorKind::Fatal),
            Self::ConfigError(_) | Self::Decode { .. } => true,
            _ => false,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(TransportError::Timeout(err.to_string()))
        } else if err.is_connect() {
            Self::Transport(TransportError::Connect(err.to_string()))
        } else if err.is_builder() {
            Self::InvalidEndpoint(err.to_string())
        } else {
            Self::Transport(TransportError::Other(err.to_string()))
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidUuid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_statuses_map_to_their_kind() {
        let expected = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (405, ErrorKind::MethodNotAllowed),
            (409, ErrorKind::Conflict),
            (429, ErrorKind::TooManyRequests),
            (500, ErrorKind::InternalServer),
        ];

        for (status, kind) in expected {
            assert_eq!(ErrorKind::from_status(status), kind, "status {status}");
        }
    }

    #[test]
    fn undocumented_statuses_are_fatal() {
        for status in [300, 304, 402, 406, 410, 418, 422, 501, 502, 503, 504, 599] {
            assert_eq!(ErrorKind::from_status(status), ErrorKind::Fatal, "status {status}");
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::Conflict.error_code(), "CONFLICT");
        assert_eq!(ErrorKind::Fatal.error_code(), "FATAL_ERROR");
        assert_eq!(
            Error::Authentication {
                status: Some(401),
                message: "nope".to_string()
            }
            .error_code(),
            "AUTHENTICATION_FAILED"
        );
        assert_eq!(
            Error::Transport(TransportError::Timeout("t".to_string())).error_code(),
            "TIMEOUT"
        );
        assert_eq!(
            Error::Transport(TransportError::Connect("c".to_string())).error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(Error::ConfigError("test".to_string()).error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn message_prefers_error_field() {
        let body = r#"{"error":"invalid filter","message":"ignored"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("invalid filter"));
    }

    #[test]
    fn message_falls_back_to_message_field() {
        let body = r#"{"message":"duplicate alert"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("duplicate alert"));
    }

    #[test]
    fn message_falls_back_to_raw_text() {
        assert_eq!(extract_message("  gateway exploded \n").as_deref(), Some("gateway exploded"));
        assert_eq!(extract_message(r#"{"code":7}"#).as_deref(), Some(r#"{"code":7}"#));
        assert!(extract_message("   ").is_none());
    }

    #[test]
    fn platform_error_uses_default_message_for_empty_body() {
        let err = PlatformError::from_response(StatusCode::CONFLICT, "alerts", Bytes::new());
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.status, 409);
        assert_eq!(err.message, "Conflict");
        assert_eq!(err.path, "alerts");
        assert!(err.body.is_empty());
    }

    #[test]
    fn platform_error_keeps_non_utf8_body() {
        let raw = Bytes::from_static(b"bad \xff gateway");
        let err = PlatformError::from_response(StatusCode::BAD_GATEWAY, "things", raw.clone());
        assert_eq!(err.body, raw);
        assert_eq!(err.message, "bad \u{fffd} gateway");
        assert_eq!(err.kind, ErrorKind::Fatal);
    }

    #[test]
    fn test_error_display() {
        let err = Error::from(PlatformError::from_response(
            StatusCode::NOT_FOUND,
            "things/abc",
            Bytes::from_static(br#"{"error":"thing missing"}"#),
        ));
        assert_eq!(err.to_string(), "Not Found (404) at things/abc: thing missing");
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_platform());
    }

    #[test]
    fn test_should_log() {
        let internal = Error::from(PlatformError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "users",
            Bytes::new(),
        ));
        let fatal = Error::from(PlatformError::from_response(
            StatusCode::BAD_GATEWAY,
            "users",
            Bytes::new(),
        ));
        let not_found = Error::from(PlatformError::from_response(
            StatusCode::NOT_FOUND,
            "users",
            Bytes::new(),
        ));

        assert!(internal.should_log());
        assert!(fatal.should_log());
        assert!(!not_found.should_log());
        assert!(!Error::Transport(TransportError::Timeout("t".into())).should_log());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let selfhost_err: Error = err.into();
        assert!(matches!(selfhost_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_uuid_error() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let selfhost_err: Error = err.into();
        assert!(matches!(selfhost_err, Error::InvalidUuid(_)));
        assert_eq!(selfhost_err.error_code(), "INVALID_UUID");
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::ConfigError("test".to_string());
        let err2 = Error::ConfigError("test".to_string());
        let err3 = Error::ConfigError("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
