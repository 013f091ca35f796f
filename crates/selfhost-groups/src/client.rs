//! Asynchronous groups client implementation.

use crate::models::{Group, GroupRequest};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::Dispatcher;
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ListParams, ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::GroupUuid;
use selfhost_policies::Policy;
use tracing::debug;

/// Client for the `groups` resource family.
#[derive(Debug, Clone)]
pub struct GroupsClient {
    endpoint: ResourceEndpoint,
}

impl GroupsClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Groups),
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

    /// List groups.
    pub async fn list_groups(&self, params: &ListParams) -> Result<Vec<Group>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a group named `name`.
    pub async fn create_group(&self, name: &str) -> Result<Group> {
        let group: Group = self.endpoint.create(&GroupRequest::new(name)).await?;
        debug!(uuid = %group.uuid, name, "group created");
        Ok(group)
    }

    /// Fetch a group.
    pub async fn get_group(&self, uuid: &GroupUuid) -> Result<Group> {
        self.endpoint.get(uuid).await
    }

    /// Rename a group.
    pub async fn update_group(&self, uuid: &GroupUuid, name: &str) -> Result<()> {
        self.endpoint.update(uuid, &GroupRequest::new(name)).await
    }

    /// Delete a group.
    pub async fn delete_group(&self, uuid: &GroupUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }

    /// Policies attached to a group.
    pub async fn get_group_policies(&self, uuid: &GroupUuid) -> Result<Vec<Policy>> {
        self.endpoint.get_sub(uuid, "policies").await
    }
}

#[async_trait]
impl ResourceOperations for GroupsClient {
    type Item = Group;
    type Id = GroupUuid;
    type ListParams = ListParams;
    type Create = GroupRequest;
    type Created = Group;
    type Update = GroupRequest;

    async fn list(&self, params: &ListParams) -> Result<Vec<Group>> {
        self.list_groups(params).await
    }

    async fn get(&self, id: &GroupUuid) -> Result<Group> {
        self.get_group(id).await
    }

    async fn create(&self, request: &GroupRequest) -> Result<Group> {
        self.create_group(&request.name).await
    }

    async fn update(&self, id: &GroupUuid, request: &GroupRequest) -> Result<()> {
        self.update_group(id, &request.name).await
    }

    async fn delete(&self, id: &GroupUuid) -> Result<()> {
        self.delete_group(id).await
    }
}
