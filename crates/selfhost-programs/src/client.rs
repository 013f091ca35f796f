//! Asynchronous programs client implementation.

use crate::models::{CreateProgramRequest, Program, ProgramListParams, UpdateProgramRequest};
use crate::Result;
use async_trait::async_trait;
use selfhost_core::client::Dispatcher;
use selfhost_core::config::SelfHostConfig;
use selfhost_core::resource::{ResourceEndpoint, ResourceOperations};
use selfhost_core::types::ResourceFamily;
use selfhost_core::uuid::ProgramUuid;
use tracing::debug;

/// Client for the `programs` resource family.
#[derive(Debug, Clone)]
pub struct ProgramsClient {
    endpoint: ResourceEndpoint,
}

impl ProgramsClient {
    /// Create a client sharing an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(dispatcher, ResourceFamily::Programs),
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

    /// List programs.
    pub async fn list_programs(&self, params: &ProgramListParams) -> Result<Vec<Program>> {
        self.endpoint.list(params.to_query()).await
    }

    /// Create a program.
    pub async fn create_program(&self, request: &CreateProgramRequest) -> Result<Program> {
        let program: Program = self.endpoint.create(request).await?;
        debug!(uuid = %program.uuid, program_type = %request.program_type, "program created");
        Ok(program)
    }

    /// Fetch a program.
    pub async fn get_program(&self, uuid: &ProgramUuid) -> Result<Program> {
        self.endpoint.get(uuid).await
    }

    /// Update a program.
    pub async fn update_program(
        &self,
        uuid: &ProgramUuid,
        request: &UpdateProgramRequest,
    ) -> Result<()> {
        self.endpoint.update(uuid, request).await
    }

    /// Delete a program.
    pub async fn delete_program(&self, uuid: &ProgramUuid) -> Result<()> {
        self.endpoint.delete(uuid).await
    }
}

#[async_trait]
impl ResourceOperations for ProgramsClient {
    type Item = Program;
    type Id = ProgramUuid;
    type ListParams = ProgramListParams;
    type Create = CreateProgramRequest;
    type Created = Program;
    type Update = UpdateProgramRequest;

    async fn list(&self, params: &ProgramListParams) -> Result<Vec<Program>> {
        self.list_programs(params).await
    }

    async fn get(&self, id: &ProgramUuid) -> Result<Program> {
        self.get_program(id).await
    }

    async fn create(&self, request: &CreateProgramRequest) -> Result<Program> {
        self.create_program(request).await
    }

    async fn update(&self, id: &ProgramUuid, request: &UpdateProgramRequest) -> Result<()> {
        self.update_program(id, request).await
    }

    async fn delete(&self, id: &ProgramUuid) -> Result<()> {
        self.delete_program(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfhost_core::config::Credentials;
    use selfhost_core::error::{Error, ErrorKind};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_client(server: &MockServer) -> ProgramsClient {
        let config = SelfHostConfig::new(server.uri(), Credentials::token("t")).unwrap();
        ProgramsClient::connect(&config).await.unwrap()
    }

    #[tokio::test]
    async fn list_programs_repeats_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/programs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let params = ProgramListParams {
            tags: vec!["b".into(), "a".into()],
            ..ProgramListParams::default()
        };
        let programs = client.list_programs(&params).await.unwrap();
        assert!(programs.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("tags=b&tags=a"));
    }

    #[tokio::test]
    async fn create_program_returns_program() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/programs"))
            .and(body_json(json!({"name": "Hook", "type": "webhook", "state": "active"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "uuid": "pr-1",
                "name": "Hook",
                "type": "webhook",
                "state": "active"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let program = client
            .create_program(&CreateProgramRequest::new("Hook", "webhook").with_state("active"))
            .await
            .unwrap();
        assert_eq!(program.uuid.as_str(), "pr-1");
        assert_eq!(program.state.as_deref(), Some("active"));
    }

    #[tokio::test]
    async fn update_program_method_not_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2/programs/pr-1"))
            .respond_with(ResponseTemplate::new(405).set_body_string("read-only program"))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let err = client
            .update_program(&ProgramUuid::new("pr-1"), &UpdateProgramRequest::default())
            .await
            .unwrap_err();
        match err {
            Error::Platform(platform) => {
                assert_eq!(platform.kind, ErrorKind::MethodNotAllowed);
                assert_eq!(platform.message, "read-only program");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_internal_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/programs/pr-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let err = client.get_program(&ProgramUuid::new("pr-1")).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InternalServer));
        assert!(err.should_log());
    }

    #[tokio::test]
    async fn delete_program_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/programs/pr-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        client.delete_program(&ProgramUuid::new("pr-1")).await.unwrap();
    }
}
