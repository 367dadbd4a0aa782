//! rmcp wiring: the `ServerHandler` implementation.

use crate::{prompts, resources, tools};
use fmp_client::FmpClient;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, GetPromptRequestParam, GetPromptResult, Implementation,
    JsonObject, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler};

/// MCP service backed by one [`FmpClient`].
///
/// All three surfaces are static; every invocation is handled in isolation
/// with a single upstream call. The protocol entry points delegate to the
/// inherent methods below so dispatch can be exercised without a live
/// transport.
#[derive(Clone)]
pub struct FmpService {
    client: FmpClient,
}

impl FmpService {
    #[must_use]
    pub fn new(client: FmpClient) -> Self {
        Self { client }
    }

    /// Execute one tool call.
    ///
    /// # Errors
    ///
    /// Protocol error for unknown tools or invalid arguments.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        tools::dispatch(&self.client, name, arguments).await
    }

    /// Read one `fmp://` resource.
    ///
    /// # Errors
    ///
    /// Protocol error for unknown URIs or upstream failures.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        resources::read(&self.client, uri).await
    }

    /// Render one prompt.
    ///
    /// # Errors
    ///
    /// Protocol error for unknown prompts or missing arguments.
    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, ErrorData> {
        prompts::render(name, arguments)
    }
}

impl ServerHandler for FmpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "fmp-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Access the Financial Modeling Prep API: company profiles, quotes, financial \
                 statements, key metrics, ratios, DCF valuations, company search, and sector \
                 performance. All tools are read-only."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: tools::catalog(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments).await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult {
            resources: resources::catalog(),
            ..Default::default()
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        Ok(ListResourceTemplatesResult {
            resource_templates: resources::templates(),
            ..Default::default()
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read(&request.uri).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        Ok(ListPromptsResult {
            prompts: prompts::catalog(),
            ..Default::default()
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        self.prompt(&request.name, request.arguments)
    }
}
