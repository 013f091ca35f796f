//! Asynchronous alerts client implementation.

use crate::models::{Alert, AlertListParams, CreateAlertRequest, CreatedAlert, UpdateAlertRequest};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::Dispatcher;
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::AlertUuid;
use tracing::debug;

/// Client for the `alerts` resource family.
#[derive(Debug, Clone)]
pub struct AlertsClient {
    endpoint: ResourceEndpoint,
}

impl AlertsClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Alerts),
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

    /// List alerts matching the filters.
    pub async fn list_alerts(&self, params: &AlertListParams) -> Result<Vec<Alert>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create an alert.
    pub async fn create_alert(&self, request: &CreateAlertRequest) -> Result<CreatedAlert> {
        let created: CreatedAlert = self.endpoint.create(request).await?;
        debug!(uuid = %created.uuid, event = %request.event, "alert created");
        Ok(created)
    }

    /// Fetch a single alert.
    pub async fn get_alert(&self, uuid: &AlertUuid) -> Result<Alert> {
        self.endpoint.get(uuid).await
    }

    /// Update an alert.
    pub async fn update_alert(&self, uuid: &AlertUuid, request: &UpdateAlertRequest) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete an alert.
    pub async fn delete_alert(&self, uuid: &AlertUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }
}

#[async_trait]
impl ResourceOperations for AlertsClient {
    type Item = Alert;
    type Id = AlertUuid;
    type ListParams = AlertListParams;
    type Create = CreateAlertRequest;
    type Created = CreatedAlert;
    type Update = UpdateAlertRequest;

    async fn list(&self, params: &AlertListParams) -> Result<Vec<Alert>> {
        self.list_alerts(params).await
    }

    async fn get(&self, id: &AlertUuid) -> Result<Alert> {
        self.get_alert(id).await
    }

    async fn create(&self, request: &CreateAlertRequest) -> Result<CreatedAlert> {
        self.create_alert(request).await
    }

    async fn update(&self, id: &AlertUuid, request: &UpdateAlertRequest) -> Result<()> {
        self.update_alert(id, request).await
    }

    async fn delete(&self, id: &AlertUuid) -> Result<()> {
        self.delete_alert(id).await
    }
}
