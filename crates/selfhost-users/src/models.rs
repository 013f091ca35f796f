//! User and user token models.

use chrono::{DateTime, FixedOffset};
use secrecy::SecretString;
use selfhost_core::uuid::{GroupUuid, TokenUuid, UserUuid};
use selfhost_groups::Group;
use serde::{Deserialize, Deserializer, Serialize};

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User UUID.
    pub uuid: UserUuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Groups the user belongs to.
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Body for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Name.
    pub name: String,
}

impl CreateUserRequest {
    /// User named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Partial update for a user.
///
/// `groups` replaces the membership list; `groups_add` and `groups_remove`
/// edit it incrementally.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUserRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full replacement of the user's groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupUuid>>,
    /// Groups to join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_add: Option<Vec<GroupUuid>>,
    /// Groups to leave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_remove: Option<Vec<GroupUuid>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RateRequest {
    pub(crate) rate: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub(crate) name: &'a str,
}

/// An API token issued to a user. The secret is only returned at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserToken {
    /// Token UUID.
    pub uuid: TokenUuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Creation time, with the server's offset.
    pub created: DateTime<FixedOffset>,
}

/// A freshly created token, including its secret.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUserToken {
    /// Token UUID.
    pub uuid: TokenUuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Secret; usable as a bearer token.
    #[serde(deserialize_with = "secret_from_string")]
    pub secret: SecretString,
}

fn secret_from_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
