// MCP server handler that exposes the Slack tool catalog and hands tool calls
// to the dispatch router. One instance is bound per connected session.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;
use tracing::info;

use crate::dispatch::{DispatchRouter, ToolCallRequest};
use crate::tools::ToolDescriptor;

pub const SERVER_NAME: &str = "Slack MCP Server";

#[derive(Clone)]
pub struct SlackBridge {
    router: DispatchRouter,
    catalog: &'static [ToolDescriptor],
}

impl SlackBridge {
    pub fn new(router: DispatchRouter, catalog: &'static [ToolDescriptor]) -> Self {
        Self { router, catalog }
    }

    fn advertised_tools(&self) -> Vec<Tool> {
        self.catalog
            .iter()
            .map(|t| {
                Tool::new(
                    t.name,
                    t.description,
                    Arc::new(t.input_schema.as_object().cloned().unwrap_or_default()),
                )
            })
            .collect()
    }
}

impl ServerHandler for SlackBridge {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo {
            instructions: Some("Slack workspace tools: channels, messages, threads, reactions and users".to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        };
        info.server_info.name = SERVER_NAME.to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Received ListToolsRequest");

        Ok(ListToolsResult {
            meta: None,
            tools: self.advertised_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let request = ToolCallRequest {
            name: params.name.to_string(),
            arguments: params.arguments,
        };

        // Application failures are already folded into the envelope
        Ok(self.router.dispatch(request).await.into())
    }
}
