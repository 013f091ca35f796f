//! Asynchronous datasets client implementation.

use crate::models::{CreateDatasetRequest, Dataset, UpdateDatasetRequest};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::{Dispatcher, RawContent};
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ListParams, ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::DatasetUuid;
use tracing::debug;

/// Client for the `datasets` resource family.
#[derive(Debug, Clone)]
pub struct DatasetsClient {
    endpoint: ResourceEndpoint,
}

impl DatasetsClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Datasets),
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

    /// List datasets.
    pub async fn list_datasets(&self, params: &ListParams) -> Result<Vec<Dataset>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a dataset.
    pub async fn create_dataset(&self, request: &CreateDatasetRequest) -> Result<Dataset> {
        self.endpoint.create(request).await
    }

    /// Fetch a dataset's metadata.
    pub async fn get_dataset(&self, uuid: &DatasetUuid) -> Result<Dataset> {
        self.endpoint.get(uuid).await
    }

    /// Update a dataset.
    pub async fn update_dataset(
        &self,
        uuid: &DatasetUuid,
        request: &UpdateDatasetRequest,
    ) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete a dataset.
    pub async fn delete_dataset(&self, uuid: &DatasetUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }

    /// Download the dataset content exactly as stored.
    pub async fn get_dataset_raw_content(&self, uuid: &DatasetUuid) -> Result<RawContent> {
        let raw = self.endpoint.get_raw(uuid, "raw").await?;
        debug!(
            uuid = %uuid,
            bytes = raw.bytes.len(),
            content_type = raw.content_type.as_deref().unwrap_or("unknown"),
            "dataset content downloaded"
        );
        Ok(raw)
    }
}

#[async_trait]
impl ResourceOperations for DatasetsClient {
    type Item = Dataset;
    type Id = DatasetUuid;
    type ListParams = ListParams;
    type Create = CreateDatasetRequest;
    type Created = Dataset;
    type Update = UpdateDatasetRequest;

    async fn list(&self, params: &ListParams) -> Result<Vec<Dataset>> {
        self.list_datasets(params).await
    }

    async fn get(&self, id: &DatasetUuid) -> Result<Dataset> {
        self.get_dataset(id).await
    }

    async fn create(&self, request: &CreateDatasetRequest) -> Result<Dataset> {
        self.create_dataset(request).await
    }

    async fn update(&self, id: &DatasetUuid, request: &UpdateDatasetRequest) -> Result<()> {
        self.update_dataset(id, request).await
    }

    async fn delete(&self, id: &DatasetUuid) -> Result<()> {
        self.delete_dataset(id).await
    }
}
