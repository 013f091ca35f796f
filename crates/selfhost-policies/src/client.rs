//! Asynchronous policies client implementation.

use crate::models::{CreatePolicyRequest, Policy, PolicyListParams, UpdatePolicyRequest};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::Dispatcher;
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::PolicyUuid;
use tracing::debug;

/// Client for the `policies` resource family.
#[derive(Debug, Clone)]
pub struct PoliciesClient {
    endpoint: ResourceEndpoint,
}

impl PoliciesClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Policies),
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

    /// List policies, optionally restricted to some groups.
    pub async fn list_policies(&self, params: &PolicyListParams) -> Result<Vec<Policy>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a policy.
    pub async fn create_policy(&self, request: &CreatePolicyRequest) -> Result<Policy> {
        let policy: Policy = self.endpoint.create(request).await?;
        debug!(
            uuid = %policy.uuid,
            group = %request.group_uuid,
            effect = %request.effect,
            action = %request.action,
            "policy created"
        );
        Ok(policy)
    }

    /// Fetch a policy.
    pub async fn get_policy(&self, uuid: &PolicyUuid) -> Result<Policy> {
        self.endpoint.get(uuid).await
    }

    /// Update a policy.
    pub async fn update_policy(&self, uuid: &PolicyUuid, request: &UpdatePolicyRequest) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete a policy.
    pub async fn delete_policy(&self, uuid: &PolicyUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }
}

#[async_trait]
impl ResourceOperations for PoliciesClient {
    type Item = Policy;
    type Id = PolicyUuid;
    type ListParams = PolicyListParams;
    type Create = CreatePolicyRequest;
    type Created = Policy;
    type Update = UpdatePolicyRequest;

    async fn list(&self, params: &PolicyListParams) -> Result<Vec<Policy>> {
        self.list_policies(params).await
    }

    async fn get(&self, id: &PolicyUuid) -> Result<Policy> {
        self.get_policy(id).await
    }

    async fn create(&self, request: &CreatePolicyRequest) -> Result<Policy> {
        self.create_policy(request).await
    }

    async fn update(&self, id: &PolicyUuid, request: &UpdatePolicyRequest) -> Result<()> {
        self.update_policy(id, request).await
    }

    async fn delete(&self, id: &PolicyUuid) -> Result<()> {
        self.delete_policy(id).await
    }
}
