//! Asynchronous things client implementation.

use crate::models::{CreateThingRequest, Thing, ThingListParams, UpdateThingRequest};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::Dispatcher;
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::ThingUuid;
use selfhost_datasets::Dataset;
use selfhost_timeseries::Timeseries;
use tracing::debug;

/// Client for the `things` resource family.
#[derive(Debug, Clone)]
pub struct ThingsClient {
    endpoint: ResourceEndpoint,
}

impl ThingsClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Things),
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

    /// List things.
    pub async fn list_things(&self, params: &ThingListParams) -> Result<Vec<Thing>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a thing.
    pub async fn create_thing(&self, request: &CreateThingRequest) -> Result<Thing> {
        let thing: Thing = self.endpoint.create(request).await?;
        debug!(uuid = %thing.uuid, name = %request.name, "thing created");
        Ok(thing)
    }

    /// Fetch a thing.
    pub async fn get_thing(&self, uuid: &ThingUuid) -> Result<Thing> {
        self.endpoint.get(uuid).await
    }

    /// Update a thing.
    pub async fn update_thing(&self, uuid: &ThingUuid, request: &UpdateThingRequest) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete a thing.
    pub async fn delete_thing(&self, uuid: &ThingUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }

    /// Datasets tracked against a thing.
    pub async fn get_thing_datasets(&self, uuid: &ThingUuid) -> Result<Vec<Dataset>> {
        self.endpoint.get_sub(uuid, "datasets").await
    }

    /// Timeseries belonging to a thing.
    pub async fn get_thing_timeseries(&self, uuid: &ThingUuid) -> Result<Vec<Timeseries>> {
        self.endpoint.get_sub(uuid, "timeseries").await
    }
}

#[async_trait]
impl ResourceOperations for ThingsClient {
    type Item = Thing;
    type Id = ThingUuid;
    type ListParams = ThingListParams;
    type Create = CreateThingRequest;
    type Created = Thing;
    type Update = UpdateThingRequest;

    async fn list(&self, params: &ThingListParams) -> Result<Vec<Thing>> {
        self.list_things(params).await
    }

    async fn get(&self, id: &ThingUuid) -> Result<Thing> {
        self.get_thing(id).await
    }

    async fn create(&self, request: &CreateThingRequest) -> Result<Thing> {
        self.create_thing(request).await
    }

    async fn update(&self, id: &ThingUuid, request: &UpdateThingRequest) -> Result<()> {
        self.update_thing(id, request).await
    }

    async fn delete(&self, id: &ThingUuid) -> Result<()> {
        self.delete_thing(id).await
    }
}
