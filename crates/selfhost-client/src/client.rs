//! The composite client: one session, one dispatcher, every resource family.

use crate::Result;
use secrecy::SecretString;
use selfhost_alerts::{Alert, AlertListParams, AlertsClient, CreateAlertRequest, CreatedAlert, UpdateAlertRequest};
use selfhost_core::auth::{AuthSession, SessionProvider};
use selfhost_core::client::{build_http_client, Dispatcher, RawContent};
use selfhost_core::config::{Credentials, SelfHostConfig};
use selfhost_core::resource::ListParams;
use selfhost_core::uuid::{
    AlertUuid, DatasetUuid, GroupUuid, PolicyUuid, ProgramUuid, ThingUuid, TimeseriesUuid,
    TokenUuid, UserUuid,
};
use selfhost_datasets::{CreateDatasetRequest, Dataset, DatasetsClient, UpdateDatasetRequest};
use selfhost_groups::{Group, GroupsClient};
use selfhost_policies::{
    CreatePolicyRequest, PoliciesClient, Policy, PolicyListParams, UpdatePolicyRequest,
};
use selfhost_programs::{
    CreateProgramRequest, Program, ProgramListParams, ProgramsClient, UpdateProgramRequest,
};
use selfhost_things::{CreateThingRequest, Thing, ThingListParams, ThingsClient, UpdateThingRequest};
use selfhost_timeseries::{
    CreateTimeseriesRequest, DataPoint, DeleteTimeseriesDataParams, MultiTimeseriesQuery,
    Timeseries, TimeseriesClient, TimeseriesData, TimeseriesDataQuery, TimeseriesListParams,
    UpdateTimeseriesRequest,
};
use selfhost_users::{CreatedUserToken, UpdateUserRequest, User, UserToken, UsersClient};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Builder for [`SelfHostClient`].
///
/// Unset base URL or credentials fall back to the `SELF_HOST_*` environment
/// variables when [`SelfHostClientBuilder::build`] runs.
#[derive(Debug, Default)]
pub struct SelfHostClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    timeout_secs: Option<u64>,
    api_version: Option<String>,
    auth_path: Option<String>,
    user_agent: Option<String>,
    http: Option<reqwest::Client>,
}

impl SelfHostClientBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform root URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Authenticate with username (domain) and password (access key).
    #[must_use]
    pub fn password(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::password(username, password));
        self
    }

    /// Authenticate with a pre-issued bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::token(token));
        self
    }

    /// Per-request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    /// API version segment (default `v2`).
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Credential-exchange path (default `users/me`).
    #[must_use]
    pub fn auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = Some(path.into());
        self
    }

    /// `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a preconfigured HTTP client. Its own timeout and user agent apply
    /// instead of the configured ones.
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Resolve configuration, establish the session and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`selfhost_core::Error::ConfigError`] when no base URL or
    /// credentials can be resolved, and [`selfhost_core::Error::Authentication`]
    /// when the credential exchange is rejected.
    pub async fn build(self) -> Result<SelfHostClient> {
        let mut config = SelfHostConfig::resolve(self.base_url, self.credentials)?;
        if let Some(seconds) = self.timeout_secs {
            config = config.with_timeout(seconds);
        }
        if let Some(version) = self.api_version {
            config = config.with_api_version(version);
        }
        if let Some(path) = self.auth_path {
            config = config.with_auth_path(path);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        config.check()?;

        let http = match self.http {
            Some(http) => http,
            None => build_http_client(&config)?,
        };
        SelfHostClient::establish(http, &config).await
    }
}

/// Client for the whole Self-host API.
///
/// All family clients share one HTTP connection pool and one session, so a
/// token rotation through [`SelfHostClient::use_token`] applies to every
/// family at once.
#[derive(Debug, Clone)]
pub struct SelfHostClient {
    session: Arc<AuthSession>,
    dispatcher: Dispatcher,
    alerts: AlertsClient,
    datasets: DatasetsClient,
    groups: GroupsClient,
    policies: PoliciesClient,
    programs: ProgramsClient,
    things: ThingsClient,
    timeseries: TimeseriesClient,
    users: UsersClient,
}

impl SelfHostClient {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> SelfHostClientBuilder {
        SelfHostClientBuilder::new()
    }

    /// Connect with a fully specified configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or authentication fails.
    pub async fn connect(config: &SelfHostConfig) -> Result<Self> {
        let http = build_http_client(config)?;
        Self::establish(http, config).await
    }

    /// Connect using only the `SELF_HOST_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is missing or authentication fails.
    pub async fn from_env() -> Result<Self> {
        Self::connect(&SelfHostConfig::from_env()?).await
    }

    async fn establish(http: reqwest::Client, config: &SelfHostConfig) -> Result<Self> {
        let session = Arc::new(AuthSession::establish(&http, config).await?);
        info!(base_url = %session.base_url(), api_version = %config.api_version, "Self-host client connected");
        Ok(Self::from_session(http, session))
    }

    /// Assemble a client over an already established session.
    ///
    /// Resource calls use the session's API version, so they stay on the
    /// same version as [`SelfHostClient::reauthenticate`].
    #[must_use]
    pub fn from_session(http: reqwest::Client, session: Arc<AuthSession>) -> Self {
        let api_version = session.api_version().to_string();
        let sessions: Arc<dyn SessionProvider> = session.clone();
        let dispatcher = Dispatcher::new(http, sessions, api_version);
        Self {
            session,
            alerts: AlertsClient::new(dispatcher.clone()),
            datasets: DatasetsClient::new(dispatcher.clone()),
            groups: GroupsClient::new(dispatcher.clone()),
            policies: PoliciesClient::new(dispatcher.clone()),
            programs: ProgramsClient::new(dispatcher.clone()),
            things: ThingsClient::new(dispatcher.clone()),
            timeseries: TimeseriesClient::new(dispatcher.clone()),
            users: UsersClient::new(dispatcher.clone()),
            dispatcher,
        }
    }

    /// Shared request dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Base URL of the current session.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.session.base_url()
    }

    /// `Authorization` header value the next request will carry.
    #[must_use]
    pub fn current_header(&self) -> String {
        self.session.current_header()
    }

    /// Re-run the credential exchange, e.g. after an `Unauthorized` error.
    ///
    /// # Errors
    ///
    /// Returns [`selfhost_core::Error::Authentication`] if the exchange is
    /// rejected; the previous session stays in effect.
    pub async fn reauthenticate(&self) -> Result<()> {
        self.session.reestablish(self.dispatcher.http()).await?;
        debug!("session re-established");
        Ok(())
    }

    /// Switch every family to a bearer token, such as the secret of a
    /// [`CreatedUserToken`].
    pub fn use_token(&self, token: &SecretString) {
        self.session.use_token(token);
        debug!("session switched to bearer token");
    }

    /// Alerts family client.
    #[must_use]
    pub const fn alerts(&self) -> &AlertsClient {
        &self.alerts
    }

    /// Datasets family client.
    #[must_use]
    pub const fn datasets(&self) -> &DatasetsClient {
        &self.datasets
    }

    /// Groups family client.
    #[must_use]
    pub const fn groups(&self) -> &GroupsClient {
        &self.groups
    }

    /// Policies family client.
    #[must_use]
    pub const fn policies(&self) -> &PoliciesClient {
        &self.policies
    }

    /// Programs family client.
    #[must_use]
    pub const fn programs(&self) -> &ProgramsClient {
        &self.programs
    }

    /// Things family client.
    #[must_use]
    pub const fn things(&self) -> &ThingsClient {
        &self.things
    }

    /// Timeseries family client.
    #[must_use]
    pub const fn timeseries(&self) -> &TimeseriesClient {
        &self.timeseries
    }

    /// Users family client.
    #[must_use]
    pub const fn users(&self) -> &UsersClient {
        &self.users
    }
}

/// Forward family operations so they can be called on the composite client.
macro_rules! delegate {
    ($($family:ident {
        $( $(#[$meta:meta])* fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty; )*
    })*) => {
        impl SelfHostClient {
            $($(
                $(#[$meta])*
                ///
                /// # Errors
                ///
                /// Propagates the family client's error.
                pub async fn $name(&self $(, $arg: $ty)*) -> Result<$ret> {
                    self.$family.$name($($arg),*).await
                }
            )*)*
        }
    };
}

delegate! {
    alerts {
        /// List alerts.
        fn list_alerts(&self, params: &AlertListParams) -> Vec<Alert>;
        /// Create an alert.
        fn create_alert(&self, request: &CreateAlertRequest) -> CreatedAlert;
        /// Fetch an alert.
        fn get_alert(&self, uuid: &AlertUuid) -> Alert;
        /// Update an alert.
        fn update_alert(&self, uuid: &AlertUuid, request: &UpdateAlertRequest) -> ();
        /// Delete an alert.
        fn delete_alert(&self, uuid: &AlertUuid) -> ();
    }
    datasets {
        /// List datasets.
        fn list_datasets(&self, params: &ListParams) -> Vec<Dataset>;
        /// Create a dataset.
        fn create_dataset(&self, request: &CreateDatasetRequest) -> Dataset;
        /// Fetch a dataset.
        fn get_dataset(&self, uuid: &DatasetUuid) -> Dataset;
        /// Update a dataset.
        fn update_dataset(&self, uuid: &DatasetUuid, request: &UpdateDatasetRequest) -> ();
        /// Delete a dataset.
        fn delete_dataset(&self, uuid: &DatasetUuid) -> ();
        /// Download a dataset's stored content.
        fn get_dataset_raw_content(&self, uuid: &DatasetUuid) -> RawContent;
    }
    groups {
        /// List groups.
        fn list_groups(&self, params: &ListParams) -> Vec<Group>;
        /// Create a group.
        fn create_group(&self, name: &str) -> Group;
        /// Fetch a group.
        fn get_group(&self, uuid: &GroupUuid) -> Group;
        /// Rename a group.
        fn update_group(&self, uuid: &GroupUuid, name: &str) -> ();
        /// Delete a group.
        fn delete_group(&self, uuid: &GroupUuid) -> ();
        /// Policies attached to a group.
        fn get_group_policies(&self, uuid: &GroupUuid) -> Vec<Policy>;
    }
    policies {
        /// List policies.
        fn list_policies(&self, params: &PolicyListParams) -> Vec<Policy>;
        /// Create a policy.
        fn create_policy(&self, request: &CreatePolicyRequest) -> Policy;
        /// Fetch a policy.
        fn get_policy(&self, uuid: &PolicyUuid) -> Policy;
        /// Update a policy.
        fn update_policy(&self, uuid: &PolicyUuid, request: &UpdatePolicyRequest) -> ();
        /// Delete a policy.
        fn delete_policy(&self, uuid: &PolicyUuid) -> ();
    }
    programs {
        /// List programs.
        fn list_programs(&self, params: &ProgramListParams) -> Vec<Program>;
        /// Create a program.
        fn create_program(&self, request: &CreateProgramRequest) -> Program;
        /// Fetch a program.
        fn get_program(&self, uuid: &ProgramUuid) -> Program;
        /// Update a program.
        fn update_program(&self, uuid: &ProgramUuid, request: &UpdateProgramRequest) -> ();
        /// Delete a program.
        fn delete_program(&self, uuid: &ProgramUuid) -> ();
    }
    things {
        /// List things.
        fn list_things(&self, params: &ThingListParams) -> Vec<Thing>;
        /// Create a thing.
        fn create_thing(&self, request: &CreateThingRequest) -> Thing;
        /// Fetch a thing.
        fn get_thing(&self, uuid: &ThingUuid) -> Thing;
        /// Update a thing.
        fn update_thing(&self, uuid: &ThingUuid, request: &UpdateThingRequest) -> ();
        /// Delete a thing.
        fn delete_thing(&self, uuid: &ThingUuid) -> ();
        /// Datasets tracked against a thing.
        fn get_thing_datasets(&self, uuid: &ThingUuid) -> Vec<Dataset>;
        /// Timeseries belonging to a thing.
        fn get_thing_timeseries(&self, uuid: &ThingUuid) -> Vec<Timeseries>;
    }
    timeseries {
        /// List timeseries.
        fn list_timeseries(&self, params: &TimeseriesListParams) -> Vec<Timeseries>;
        /// Create a timeseries.
        fn create_timeseries(&self, request: &CreateTimeseriesRequest) -> Timeseries;
        /// Fetch a timeseries.
        fn get_timeseries(&self, uuid: &TimeseriesUuid) -> Timeseries;
        /// Update a timeseries.
        fn update_timeseries(&self, uuid: &TimeseriesUuid, request: &UpdateTimeseriesRequest) -> ();
        /// Delete a timeseries.
        fn delete_timeseries(&self, uuid: &TimeseriesUuid) -> ();
        /// Read data points of one timeseries.
        fn get_timeseries_data(&self, uuid: &TimeseriesUuid, query: &TimeseriesDataQuery) -> Vec<DataPoint>;
        /// Store data points.
        fn create_timeseries_data(&self, uuid: &TimeseriesUuid, points: &[DataPoint], unit: Option<&str>) -> ();
        /// Delete data points in a range.
        fn delete_timeseries_data(&self, uuid: &TimeseriesUuid, params: &DeleteTimeseriesDataParams) -> ();
        /// Read several timeseries at once.
        fn query_timeseries_data(&self, query: &MultiTimeseriesQuery) -> Vec<TimeseriesData>;
    }
    users {
        /// List users.
        fn list_users(&self, params: &ListParams) -> Vec<User>;
        /// Create a user.
        fn create_user(&self, name: &str) -> User;
        /// The user the session authenticates as.
        fn get_my_user(&self) -> User;
        /// Fetch a user.
        fn get_user(&self, uuid: &UserUuid) -> User;
        /// Update a user.
        fn update_user(&self, uuid: &UserUuid, request: &UpdateUserRequest) -> ();
        /// Delete a user.
        fn delete_user(&self, uuid: &UserUuid) -> ();
        /// Policies that apply to a user.
        fn get_user_policies(&self, uuid: &UserUuid) -> Vec<Policy>;
        /// Set a user's request rate limit.
        fn update_user_rate(&self, uuid: &UserUuid, rate: u32) -> ();
        /// Tokens issued to a user.
        fn get_user_tokens(&self, uuid: &UserUuid) -> Vec<UserToken>;
        /// Issue a new token for a user.
        fn create_user_token(&self, uuid: &UserUuid, name: &str) -> CreatedUserToken;
        /// Revoke a user token.
        fn delete_user_token(&self, uuid: &UserUuid, token: &TokenUuid) -> ();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfhost_core::auth::Session;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SelfHostClient {
        let session = AuthSession::from_session(
            Session::bearer(Url::parse(&server.uri()).unwrap(), "first"),
            Credentials::token("first"),
            "v2",
            "users/me",
        );
        SelfHostClient::from_session(reqwest::Client::new(), Arc::new(session))
    }

    #[tokio::test]
    async fn families_share_one_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.current_header(), "Bearer first");

        client.use_token(&SecretString::from("second".to_string()));
        assert_eq!(client.current_header(), "Bearer second");

        client.list_groups(&ListParams::default()).await.unwrap();
        client.things().list_things(&ThingListParams::default()).await.unwrap();
    }

    #[tokio::test]
    async fn wrapped_session_version_drives_resources_and_reauthentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "u-1", "name": "me"})))
            .expect(2)
            .mount(&server)
            .await;

        let session = AuthSession::from_session(
            Session::basic(Url::parse(&server.uri()).unwrap(), "domain", "key"),
            Credentials::password("domain", "key"),
            "v3",
            "users/me",
        );
        let client = SelfHostClient::from_session(reqwest::Client::new(), Arc::new(session));
        assert_eq!(client.dispatcher().api_version(), "v3");

        client.get_my_user().await.unwrap();
        client.reauthenticate().await.unwrap();
    }

    #[tokio::test]
    async fn delegated_call_hits_family_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "u-1", "name": "me"})))
            .expect(1)
            .mount(&server)
            .await;

        let me = client_for(&server).get_my_user().await.unwrap();
        assert_eq!(me.name, "me");
    }

    #[tokio::test]
    async fn builder_applies_overrides() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/users/me"))
            .and(header("user-agent", "probe/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = SelfHostClient::builder()
            .base_url(server.uri())
            .token("abc")
            .api_version("v3")
            .user_agent("probe/1.0")
            .timeout_secs(5)
            .build()
            .await
            .unwrap();
        assert_eq!(client.dispatcher().api_version(), "v3");
        assert_eq!(client.current_header(), "Bearer abc");

        client.get_my_user().await.unwrap_err();
    }

    #[tokio::test]
    async fn builder_rejects_out_of_range_timeout() {
        let err = SelfHostClient::builder()
            .base_url("http://localhost:1")
            .token("abc")
            .timeout_secs(0)
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
