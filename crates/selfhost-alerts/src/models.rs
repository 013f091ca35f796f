//! Alert models shared by the client and its callers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use selfhost_core::query::QueryParams;
use selfhost_core::uuid::AlertUuid;
use serde::{Deserialize, Serialize};

/// Filters supported by the `alerts` list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlertListParams {
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Filter by resource.
    pub resource: Option<String>,
    /// Filter by environment.
    pub environment: Option<String>,
    /// Filter by event name.
    pub event: Option<String>,
    /// Filter by origin.
    pub origin: Option<String>,
    /// Filter by status (open, closed, ...).
    pub status: Option<String>,
    /// Severity at or below this level.
    pub severity_le: Option<String>,
    /// Severity at or above this level.
    pub severity_ge: Option<String>,
    /// Exact severity.
    pub severity: Option<String>,
    /// Alerts carrying these tags. Sent as one `tags` pair per value.
    pub tags: Vec<String>,
    /// Alerts for these services. Sent as one `service` pair per value.
    pub service: Vec<String>,
}

impl AlertListParams {
    /// Convert the filters into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("limit", self.limit);
        params.push_opt("offset", self.offset);
        params.push_opt("resource", self.resource.as_deref());
        params.push_opt("environment", self.environment.as_deref());
        params.push_opt("event", self.event.as_deref());
        params.push_opt("origin", self.origin.as_deref());
        params.push_opt("status", self.status.as_deref());
        params.push_opt("severity_le", self.severity_le.as_deref());
        params.push_opt("severity_ge", self.severity_ge.as_deref());
        params.push_opt("severity", self.severity.as_deref());
        params.push_each("tags", &self.tags);
        params.push_each("service", &self.service);
        params
    }
}

/// Alert as returned by the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Alert UUID.
    pub uuid: AlertUuid,
    /// Resource the alert concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Environment the alert was raised in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Severity (critical, major, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Status (open, closed, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Affected services.
    #[serde(default)]
    pub service: Vec<String>,
    /// Event value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Origin of the alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Tags pinned on the alert.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Base64 encoded raw data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawdata: Option<String>,
    /// Number of duplicates received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<i64>,
    /// Severity before the last change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_severity: Option<String>,
    /// When the alert was last received (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_receive_time: Option<String>,
}

/// Response to an alert creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedAlert {
    /// UUID of the new alert.
    pub uuid: AlertUuid,
}

/// Payload for creating an alert.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateAlertRequest {
    /// Resource the alert concerns.
    pub resource: String,
    /// Environment.
    pub environment: String,
    /// Event name.
    pub event: String,
    /// Event value.
    pub value: String,
    /// Description.
    pub description: String,
    /// Origin.
    pub origin: String,
    /// Severity.
    pub severity: String,
    /// Initial status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Affected services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<String>>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Base64 encoded raw data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawdata: Option<String>,
}

impl CreateAlertRequest {
    /// Set the initial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the affected services.
    #[must_use]
    pub fn with_service<I, S>(mut self, service: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service = Some(service.into_iter().map(Into::into).collect());
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: i64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Attach raw data, base64 encoding it.
    #[must_use]
    pub fn with_rawdata(mut self, raw: impl AsRef<[u8]>) -> Self {
        self.rawdata = Some(STANDARD.encode(raw));
        self
    }
}

/// Partial update for an alert. Unset fields are left out of the body.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateAlertRequest {
    /// Resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Event value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Severity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Affected services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<String>>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Base64 encoded raw data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawdata: Option<String>,
}
