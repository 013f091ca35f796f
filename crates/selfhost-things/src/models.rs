//! Thing models.

use selfhost_core::query::QueryParams;
use selfhost_core::uuid::{ThingUuid, UserUuid};
use serde::{Deserialize, Serialize};

/// Filters supported by the `things` list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ThingListParams {
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Things carrying these tags.
    pub tags: Vec<String>,
}

impl ThingListParams {
    /// Convert the filters into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("limit", self.limit);
        params.push_opt("offset", self.offset);
        params.push_each("tags", &self.tags);
        params
    }
}

/// A registered thing: a device, a building, a room...
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thing {
    /// Thing UUID.
    pub uuid: ThingUuid,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// State (active, inactive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Free-form type, e.g. `office/building`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub thing_type: Option<String>,
    /// Creating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserUuid>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for creating a thing.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateThingRequest {
    /// Name.
    pub name: String,
    /// Type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub thing_type: Option<String>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateThingRequest {
    /// Thing named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the type.
    #[must_use]
    pub fn with_type(mut self, thing_type: impl Into<String>) -> Self {
        self.thing_type = Some(thing_type.into());
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
}

/// Partial update for a thing.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateThingRequest {
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// State.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub thing_type: Option<String>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
