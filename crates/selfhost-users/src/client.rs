//! Asynchronous users client implementation.

use crate::models::{
    CreateUserRequest, CreatedUserToken, RateRequest, TokenRequest, UpdateUserRequest, User,
    UserToken,
};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::{Dispatcher, RequestSpec};
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ListParams, ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::{TokenUuid, UserUuid};
use selfhost_policies::Policy;
use tracing::debug;

/// Client for the `users` resource family.
#[derive(Debug, Clone)]
pub struct UsersClient {
    endpoint: ResourceEndpoint,
}

impl UsersClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Users),
        }
    }

    /// Establish a session and build a standalone client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or authentication fails.
    pub async fn connect(config: &SelfHostConfig) -> Result<Self> {
        Ok(Self::new(Dispatcher::connect(config).await?))
    }

    /// List users.
    pub async fn list_users(&self, params: &ListParams) -> Result<Vec<User>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a user named `name`.
    pub async fn create_user(&self, name: &str) -> Result<User> {
        self.endpoint.create(&CreateUserRequest::new(name)).await
    }

    /// The user the session authenticates as.
    pub async fn get_my_user(&self) -> Result<User> {
        self.endpoint.get(&"me").await
    }

    /// Fetch a user.
    pub async fn get_user(&self, uuid: &UserUuid) -> Result<User> {
        self.endpoint.get(uuid).await
    }

    /// Update a user's name or group membership.
    pub async fn update_user(&self, uuid: &UserUuid, request: &UpdateUserRequest) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete a user.
    pub async fn delete_user(&self, uuid: &UserUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }

    /// Policies that apply to a user through its groups.
    pub async fn get_user_policies(&self, uuid: &UserUuid) -> Result<Vec<Policy>> {
        self.endpoint.get_sub(uuid, "policies").await
    }

    /// Set a user's request rate limit.
    pub async fn update_user_rate(&self, uuid: &UserUuid, rate: u32) -> Result<()> {
        let spec = RequestSpec::put(self.endpoint.sub_path(uuid, "rate"))
            .with_json(&RateRequest { rate })?;
        self.endpoint.dispatcher().send_unit(&spec).await
    }

    /// Tokens issued to a user.
    pub async fn get_user_tokens(&self, uuid: &UserUuid) -> Result<Vec<UserToken>> {
        self.endpoint.get_sub(uuid, "tokens").await
    }

    /// Issue a new token for a user. The secret is only available here.
    pub async fn create_user_token(&self, uuid: &UserUuid, name: &str) -> Result<CreatedUserToken> {
        let spec = RequestSpec::post(self.endpoint.sub_path(uuid, "tokens"))
            .with_json(&TokenRequest { name })?;
        let token: CreatedUserToken = self.endpoint.dispatcher().send_json(&spec).await?;
        debug!(user = %uuid, token = %token.uuid, "user token created");
        Ok(token)
    }

    /// Revoke a user token.
    pub async fn delete_user_token(&self, uuid: &UserUuid, token: &TokenUuid) -> Result<()> {
        let path = format!("{}/{token}", self.endpoint.sub_path(uuid, "tokens"));
        self.endpoint
            .dispatcher()
            .send_unit(&RequestSpec::delete(path))
            .await
    }
}

#[async_trait]
impl ResourceOperations for UsersClient {
    type Item = User;
    type Id = UserUuid;
    type ListParams = ListParams;
    type Create = CreateUserRequest;
    type Created = User;
    type Update = UpdateUserRequest;

    async fn list(&self, params: &ListParams) -> Result<Vec<User>> {
        self.list_users(params).await
    }

    async fn get(&self, id: &UserUuid) -> Result<User> {
        self.get_user(id).await
    }

    async fn create(&self, request: &CreateUserRequest) -> Result<User> {
        self.create_user(&request.name).await
    }

    async fn update(&self, id: &UserUuid, request: &UpdateUserRequest) -> Result<()> {
        self.update_user(id, request).await
    }

    async fn delete(&self, id: &UserUuid) -> Result<()> {
        self.delete_user(id).await
    }
}
