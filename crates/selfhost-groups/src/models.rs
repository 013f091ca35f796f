//! Group models.

use selfhost_core::uuid::GroupUuid;
use serde::{Deserialize, Serialize};

/// A user group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Group UUID.
    pub uuid: GroupUuid,
    /// Group name.
    #[serde(default)]
    pub name: String,
}

/// Body for creating or renaming a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupRequest {
    /// Group name.
    pub name: String,
}

impl GroupRequest {
    /// Request carrying `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn group_round_trips_through_json() {
        let group: Group = serde_json::from_value(json!({
            "uuid": "7e7823cc-44fa-403d-853f-d5ce48a002e4",
            "name": "My group"
        }))
        .unwrap();
        assert_eq!(group.name, "My group");
        assert_eq!(
            serde_json::to_value(&group).unwrap()["uuid"],
            "7e7823cc-44fa-403d-853f-d5ce48a002e4"
        );
    }

    #[test]
    fn request_body_is_name_only() {
        assert_eq!(
            serde_json::to_value(GroupRequest::new("ops")).unwrap(),
            json!({"name": "ops"})
        );
    }
}
