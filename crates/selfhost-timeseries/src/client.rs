//! Asynchronous timeseries client implementation.

use crate::models::{
    CreateTimeseriesRequest, DataPoint, DeleteTimeseriesDataParams, MultiTimeseriesQuery,
    Timeseries, TimeseriesData, TimeseriesDataQuery, TimeseriesListParams, UpdateTimeseriesRequest,
};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::{Dispatcher, RequestSpec};
use selfhost_core::config::SelfHostConfig;
use selfhost_core::query::QueryParams;
use selfhost_core::resource::{ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::TimeseriesUuid;
use tracing::debug;

/// Path of the multi-series query endpoint, outside the family prefix.
const TSQUERY_PATH: &str = "tsquery";

/// Client for the `timeseries` resource family.
#[derive(Debug, Clone)]
pub struct TimeseriesClient {
    endpoint: ResourceEndpoint,
}

impl TimeseriesClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Timeseries),
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

    /// List timeseries.
    pub async fn list_timeseries(&self, params: &TimeseriesListParams) -> Result<Vec<Timeseries>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a timeseries.
    pub async fn create_timeseries(&self, request: &CreateTimeseriesRequest) -> Result<Timeseries> {
        self.endpoint.create(request).await
    }

    /// Fetch a timeseries.
    pub async fn get_timeseries(&self, uuid: &TimeseriesUuid) -> Result<Timeseries> {
        self.endpoint.get(uuid).await
    }

    /// Update a timeseries.
    pub async fn update_timeseries(
        &self,
        uuid: &TimeseriesUuid,
        request: &UpdateTimeseriesRequest,
    ) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete a timeseries.
    pub async fn delete_timeseries(&self, uuid: &TimeseriesUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }

    /// Read data points of one timeseries.
    pub async fn get_timeseries_data(
        &self,
        uuid: &TimeseriesUuid,
        query: &TimeseriesDataQuery,
    ) -> Result<Vec<DataPoint>> {
        let spec = RequestSpec::get(self.data_path(uuid)).with_query(query.to_query());
        self.endpoint.dispatcher().send_json(&spec).await
    }

    /// Store data points, optionally stating the unit they are expressed in.
    pub async fn create_timeseries_data(
        &self,
        uuid: &TimeseriesUuid,
        points: &[DataPoint],
        unit: Option<&str>,
    ) -> Result<()> {
        let mut query = QueryParams::new();
        query.push_opt("unit", unit);
        let spec = RequestSpec::post(self.data_path(uuid))
            .with_query(query)
            .with_json(points)?;
        self.endpoint.dispatcher().send_unit(&spec).await?;
        debug!(uuid = %uuid, points = points.len(), "timeseries data stored");
        Ok(())
    }

    /// Delete data points in a range.
    pub async fn delete_timeseries_data(
        &self,
        uuid: &TimeseriesUuid,
        params: &DeleteTimeseriesDataParams,
    ) -> Result<()> {
        let spec = RequestSpec::delete(self.data_path(uuid)).with_query(params.to_query());
        self.endpoint.dispatcher().send_unit(&spec).await
    }

    /// Read data from several timeseries in one request.
    pub async fn query_timeseries_data(
        &self,
        query: &MultiTimeseriesQuery,
    ) -> Result<Vec<TimeseriesData>> {
        let spec = RequestSpec::get(TSQUERY_PATH).with_query(query.to_query());
        self.endpoint.dispatcher().send_json(&spec).await
    }

    fn data_path(&self, uuid: &TimeseriesUuid) -> String {
        self.endpoint.sub_path(uuid, "data")
    }
}

#[async_trait]
impl ResourceOperations for TimeseriesClient {
    type Item = Timeseries;
    type Id = TimeseriesUuid;
    type ListParams = TimeseriesListParams;
    type Create = CreateTimeseriesRequest;
    type Created = Timeseries;
    type Update = UpdateTimeseriesRequest;

    async fn list(&self, params: &TimeseriesListParams) -> Result<Vec<Timeseries>> {
        self.list_timeseries(params).await
    }

    async fn get(&self, id: &TimeseriesUuid) -> Result<Timeseries> {
        self.get_timeseries(id).await
    }

    async fn create(&self, request: &CreateTimeseriesRequest) -> Result<Timeseries> {
        self.create_timeseries(request).await
    }

    async fn update(&self, id: &TimeseriesUuid, request: &UpdateTimeseriesRequest) -> Result<()> {
        self.update_timeseries(id, request).await
    }

    async fn delete(&self, id: &TimeseriesUuid) -> Result<()> {
        self.delete_timeseries(id).await
    }
}
