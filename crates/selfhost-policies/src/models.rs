//! Policy models.

use selfhost_core::query::QueryParams;
use selfhost_core::uuid::{GroupUuid, PolicyUuid};
use serde::{Deserialize, Serialize};

/// Filters supported by the `policies` list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PolicyListParams {
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Only policies attached to these groups; one `group_uuids` pair each.
    pub group_uuids: Vec<GroupUuid>,
}

impl PolicyListParams {
    /// Convert the filters into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("limit", self.limit);
        params.push_opt("offset", self.offset);
        params.push_each("group_uuids", &self.group_uuids);
        params
    }
}

/// An access policy attached to a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    /// Policy UUID.
    pub uuid: PolicyUuid,
    /// Group the policy belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_uuid: Option<GroupUuid>,
    /// Evaluation priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// `allow` or `deny`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// `create`, `read`, `update` or `delete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Resource pattern, e.g. `timeseries/%`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

/// Payload for creating a policy. Every field is required by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePolicyRequest {
    /// Owning group.
    pub group_uuid: GroupUuid,
    /// Evaluation priority.
    pub priority: i64,
    /// `allow` or `deny`.
    pub effect: String,
    /// `create`, `read`, `update` or `delete`.
    pub action: String,
    /// Resource pattern.
    pub resource: String,
}

/// Partial update for a policy.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePolicyRequest {
    /// Owning group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_uuid: Option<GroupUuid>,
    /// Evaluation priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// `allow` or `deny`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// `create`, `read`, `update` or `delete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Resource pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}
