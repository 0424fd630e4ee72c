//! MCP server that exposes a [`ToolRegistry`] via the MCP protocol.
//!
//! [`McpServer`] wraps a [`ToolRegistry`] and serves its tools over stdio.
//! [`McpServerHandler`] is the underlying rmcp handler and can be served over
//! any rmcp transport.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kinesis_tool::ToolRegistry;
use kinesis_types::{ContentItem, ToolContext, ToolDefinition, ToolError, ToolOutput};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::transport::io::stdio;
use rmcp::{ErrorData, ServerHandler, ServiceExt};

use crate::error::McpError;

/// MCP server that exposes tools from a [`ToolRegistry`].
///
/// Call [`serve_stdio`](McpServer::serve_stdio) to start serving via stdin/stdout.
pub struct McpServer {
    handler: McpServerHandler,
}

impl McpServer {
    /// Create a new MCP server wrapping the given tool registry.
    pub fn new(registry: ToolRegistry, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            handler: McpServerHandler {
                registry: Arc::new(registry),
                name: name.into(),
                version: version.into(),
                instructions: None,
                next_request: Arc::new(AtomicU64::new(1)),
            },
        }
    }

    /// Usage instructions sent to the client during initialization.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.handler.instructions = Some(instructions.into());
        self
    }

    /// The rmcp handler, for serving over a transport other than stdio.
    #[must_use]
    pub fn into_handler(self) -> McpServerHandler {
        self.handler
    }

    /// Serve the tools over stdio (stdin/stdout).
    ///
    /// This blocks until the client disconnects or an error occurs.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Initialization`] if the handshake fails and
    /// [`McpError::Transport`] if serving ends abnormally.
    pub async fn serve_stdio(self) -> Result<(), McpError> {
        let service = self
            .handler
            .serve(stdio())
            .await
            .map_err(|e| McpError::Initialization(e.to_string()))?;
        tracing::info!("mcp server ready on stdio");
        let reason = service
            .waiting()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;
        tracing::info!(?reason, "mcp server stopped");
        Ok(())
    }
}

/// rmcp [`ServerHandler`] backed by a [`ToolRegistry`].
#[derive(Clone)]
pub struct McpServerHandler {
    registry: Arc<ToolRegistry>,
    name: String,
    version: String,
    instructions: Option<String>,
    next_request: Arc<AtomicU64>,
}

impl McpServerHandler {
    fn next_request_id(&self) -> String {
        self.next_request.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

fn to_mcp_tool(def: ToolDefinition) -> McpTool {
    let schema = def.input_schema();
    let schema_obj = schema.as_object().cloned().unwrap_or_default();
    let annotations = def
        .annotations
        .as_ref()
        .and_then(|a| serde_json::to_value(a).ok())
        .and_then(|v| serde_json::from_value(v).ok());

    McpTool {
        name: Cow::Owned(def.name),
        title: def.title,
        description: Some(Cow::Owned(def.description)),
        input_schema: Arc::new(schema_obj),
        output_schema: None,
        annotations,
        execution: None,
        icons: None,
        meta: None,
    }
}

fn to_call_result(output: ToolOutput) -> CallToolResult {
    let content: Vec<Content> = output
        .content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text(text) => Content::text(text),
        })
        .collect();
    let mut result = if output.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    };
    result.structured_content = output.structured_content.filter(serde_json::Value::is_object);
    result
}

impl ServerHandler for McpServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Default::default()
            },
            instructions: self.instructions.clone(),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools: Vec<McpTool> = self.registry.definitions().into_iter().map(to_mcp_tool).collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Null);
        let ctx = ToolContext::new(self.next_request_id());

        match self.registry.execute(&request.name, input, &ctx).await {
            Ok(output) => Ok(to_call_result(output)),
            Err(ToolError::NotFound(name)) => Err(ErrorData::invalid_params(
                format!("tool not found: {name}"),
                None,
            )),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}
