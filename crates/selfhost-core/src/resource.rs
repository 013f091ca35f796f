//! Shared shape of per-family resource operations.
//!
//! Every family client (alerts, things, ...) is a thin wrapper over a
//! [`ResourceEndpoint`]: the dispatcher bound to the family's path prefix.
//! Payloads are forwarded as given; the server is the authority on validity.

use crate::client::{Dispatcher, RawContent, RequestSpec};
use crate::error::Result;
use crate::query::QueryParams;
use crate::types::ResourceFamily;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

/// Pagination shared by every list operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    /// Maximum number of items to return.
    pub limit: Option<u32>,
    /// Number of items to skip.
    pub offset: Option<u32>,
}

impl ListParams {
    /// No pagination.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Append `limit` and `offset` when set.
    pub fn push_into(&self, query: &mut QueryParams) {
        query.push_opt("limit", self.limit);
        query.push_opt("offset", self.offset);
    }

    /// Convert into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.push_into(&mut query);
        query
    }
}

/// A dispatcher bound to one resource family.
#[derive(Debug, Clone)]
pub struct ResourceEndpoint {
    dispatcher: Dispatcher,
    family: ResourceFamily,
}

impl ResourceEndpoint {
    /// Bind `dispatcher` to `family`.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher, family: ResourceFamily) -> Self {
        Self { dispatcher, family }
    }

    /// Family this endpoint serves.
    #[must_use]
    pub const fn family(&self) -> ResourceFamily {
        self.family
    }

    /// Underlying dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Path of the collection, e.g. `things`.
    #[must_use]
    pub fn collection_path(&self) -> String {
        self.family.path().to_string()
    }

    /// Path of one item, e.g. `things/{uuid}`.
    #[must_use]
    pub fn item_path(&self, id: &impl Display) -> String {
        format!("{}/{id}", self.family.path())
    }

    /// Path below one item, e.g. `things/{uuid}/datasets`.
    #[must_use]
    pub fn sub_path(&self, id: &impl Display, sub: &str) -> String {
        format!("{}/{id}/{sub}", self.family.path())
    }

    /// `GET {family}` with the given filters.
    ///
    /// # Errors
    ///
    /// Propagates dispatch and decode failures.
    pub async fn list<T>(&self, query: QueryParams) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let spec = RequestSpec::get(self.collection_path()).with_query(query);
        self.dispatcher.send_json(&spec).await
    }

    /// `GET {family}/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates dispatch and decode failures.
    pub async fn get<T>(&self, id: &impl Display) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.dispatcher
            .send_json(&RequestSpec::get(self.item_path(id)))
            .await
    }

    /// `POST {family}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Propagates dispatch and decode failures.
    pub async fn create<B, R>(&self, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let spec = RequestSpec::post(self.collection_path()).with_json(body)?;
        self.dispatcher.send_json(&spec).await
    }

    /// `PUT {family}/{id}` with a JSON body. Any response body is discarded.
    ///
    /// # Errors
    ///
    /// Propagates dispatch failures.
    pub async fn update<B>(&self, id: &impl Display, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let spec = RequestSpec::put(self.item_path(id)).with_json(body)?;
        self.dispatcher.send_unit(&spec).await
    }

    /// `DELETE {family}/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates dispatch failures.
    pub async fn delete(&self, id: &impl Display) -> Result<()> {
        self.dispatcher
            .send_unit(&RequestSpec::delete(self.item_path(id)))
            .await
    }

    /// `GET {family}/{id}/{sub}`.
    ///
    /// # Errors
    ///
    /// Propagates dispatch and decode failures.
    pub async fn get_sub<T>(&self, id: &impl Display, sub: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.dispatcher
            .send_json(&RequestSpec::get(self.sub_path(id, sub)))
            .await
    }

    /// `GET {family}/{id}/{sub}` returning bytes untouched.
    ///
    /// # Errors
    ///
    /// Propagates dispatch failures.
    pub async fn get_raw(&self, id: &impl Display, sub: &str) -> Result<RawContent> {
        self.dispatcher
            .dispatch_raw(&RequestSpec::get(self.sub_path(id, sub)))
            .await
    }
}

/// Uniform CRUD surface implemented by family clients.
#[async_trait]
pub trait ResourceOperations: Send + Sync {
    /// Resource representation returned by reads.
    type Item: DeserializeOwned + Send;
    /// Identifier type.
    type Id: Display + Send + Sync;
    /// List filters.
    type ListParams: Send + Sync;
    /// Create payload.
    type Create: Serialize + Send + Sync;
    /// Create response.
    type Created: DeserializeOwned + Send;
    /// Update payload.
    type Update: Serialize + Send + Sync;

    /// List resources.
    async fn list(&self, params: &Self::ListParams) -> Result<Vec<Self::Item>>;

    /// Fetch one resource.
    async fn get(&self, id: &Self::Id) -> Result<Self::Item>;

    /// Create a resource.
    async fn create(&self, request: &Self::Create) -> Result<Self::Created>;

    /// Update a resource.
    async fn update(&self, id: &Self::Id, request: &Self::Update) -> Result<()>;

    /// Delete a resource.
    async fn delete(&self, id: &Self::Id) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthSession, Session};
    use crate::config::Credentials;
    use crate::error::{Error, ErrorKind};
    use crate::uuid::ThingUuid;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        uuid: String,
        name: String,
    }

    fn endpoint(server: &MockServer, family: ResourceFamily) -> ResourceEndpoint {
        let session = AuthSession::from_session(
            Session::bearer(Url::parse(&server.uri()).unwrap(), "t"),
            Credentials::token("t"),
            "v2",
            "users/me",
        );
        let dispatcher = Dispatcher::new(reqwest::Client::new(), Arc::new(session), "v2");
        ResourceEndpoint::new(dispatcher, family)
    }

    #[test]
    fn list_params_to_query_skips_unset() {
        assert!(ListParams::new().to_query().is_empty());

        let query = ListParams::new().with_limit(10).with_offset(20).to_query();
        assert_eq!(
            query.as_pairs(),
            &[("limit", "10".to_string()), ("offset", "20".to_string())]
        );
    }

    #[tokio::test]
    async fn paths_follow_family_prefix() {
        let server = MockServer::start().await;
        let things = endpoint(&server, ResourceFamily::Things);
        let id = ThingUuid::new("abc-123");

        assert_eq!(things.collection_path(), "things");
        assert_eq!(things.item_path(&id), "things/abc-123");
        assert_eq!(things.sub_path(&id, "datasets"), "things/abc-123/datasets");
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/groups"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "g-1", "name": "ops"}])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/groups"))
            .and(body_json(json!({"name": "ops"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": "g-1", "name": "ops"})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v2/groups/g-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v2/groups/g-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let groups = endpoint(&server, ResourceFamily::Groups);
        let listed: Vec<Named> = groups
            .list(ListParams::new().with_limit(1).to_query())
            .await
            .unwrap();
        assert_eq!(listed[0].name, "ops");

        let created: Named = groups.create(&json!({"name": "ops"})).await.unwrap();
        assert_eq!(created.uuid, "g-1");

        groups.update(&"g-1", &json!({"name": "dev"})).await.unwrap();
        groups.delete(&"g-1").await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/policies/p-9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no such policy"})))
            .mount(&server)
            .await;

        let err = endpoint(&server, ResourceFamily::Policies)
            .get::<Named>(&"p-9")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        match err {
            Error::Platform(platform) => {
                assert_eq!(platform.message, "no such policy");
                assert_eq!(platform.path, "policies/p-9");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_raw_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/datasets/d-1/raw"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/octet-stream")
                    .set_body_bytes(vec![0_u8, 159, 146, 150]),
            )
            .mount(&server)
            .await;

        let raw = endpoint(&server, ResourceFamily::Datasets)
            .get_raw(&"d-1", "raw")
            .await
            .unwrap();
        assert_eq!(raw.bytes.as_ref(), &[0_u8, 159, 146, 150]);
        assert_eq!(raw.content_type.as_deref(), Some("application/octet-stream"));
    }
}
