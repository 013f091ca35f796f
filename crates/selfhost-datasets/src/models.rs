//! Dataset models.

use selfhost_core::uuid::{DatasetUuid, ThingUuid, UserUuid};
use serde::{Deserialize, Serialize};

/// A stored data set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    /// Dataset UUID.
    pub uuid: DatasetUuid,
    /// Name; does not have to be unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// File format of the content (csv, ini, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// SHA-256 checksum of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Content size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Thing the dataset is tracked against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_uuid: Option<ThingUuid>,
    /// Creation time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Creating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserUuid>,
    /// Last change (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// User behind the last change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserUuid>,
    /// Tags pinned on the dataset.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for creating a dataset.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDatasetRequest {
    /// Name.
    pub name: String,
    /// File format.
    pub format: String,
    /// Content, as text.
    pub content: String,
    /// Owning thing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_uuid: Option<ThingUuid>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateDatasetRequest {
    /// Create a payload with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, format: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Attach the dataset to a thing.
    #[must_use]
    pub fn with_thing(mut self, thing_uuid: ThingUuid) -> Self {
        self.thing_uuid = Some(thing_uuid);
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

/// Partial update for a dataset.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateDatasetRequest {
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// File format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Content, as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Owning thing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_uuid: Option<ThingUuid>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
