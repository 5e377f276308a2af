//! Model Context Protocol server exposing the tool registry over stdio.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::tools::ToolRegistry;

pub const SERVER_NAME: &str = "biotools";

const INSTRUCTIONS: &str = "Bioinformatics tools: FastQC quality control, Salmon index \
construction and quantification, plus directory listing and file reading. Every tool \
takes string paths and replies with plain text; replies starting with 'Error' describe \
a failure.";

/// MCP handler backed by a [`ToolRegistry`]
#[derive(Clone)]
pub struct BiotoolsServer {
    tools: Arc<ToolRegistry>,
}

impl BiotoolsServer {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }

    /// Tool definitions advertised to clients
    pub fn tool_definitions(&self) -> Vec<McpTool> {
        self.tools
            .all()
            .into_iter()
            .map(|tool| {
                let schema = match tool.schema() {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                McpTool::new(
                    tool.name().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema),
                )
            })
            .collect()
    }

    /// Dispatch one call by name. Never fails: problems become an
    /// error-flagged text result.
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "call to unknown tool");
            return CallToolResult::error(vec![Content::text(format!(
                "Error: unknown tool '{}'",
                name
            ))]);
        };

        info!(tool = name, "handling tool call");
        let params = Value::Object(arguments.unwrap_or_default());
        match tool.execute(params).await {
            Ok(reply) => CallToolResult::success(vec![Content::text(reply)]),
            Err(e) => {
                error!(tool = name, error = %e, "tool call failed");
                CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
            }
        }
    }
}

impl ServerHandler for BiotoolsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.invoke(&request.name, request.arguments).await)
    }
}

/// Serve over stdin/stdout until the client disconnects
pub async fn serve_stdio(server: BiotoolsServer) -> Result<()> {
    info!(
        tools = server.tools.len(),
        "starting MCP server with stdio transport"
    );

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;

    let reason = service
        .waiting()
        .await
        .context("MCP server task failed")?;
    info!(?reason, "MCP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinaryConfig;
    use serde_json::json;

    fn server() -> BiotoolsServer {
        BiotoolsServer::new(ToolRegistry::bioinformatics(&BinaryConfig {
            fastqc: "ls".to_string(),
            salmon: "ls".to_string(),
        }))
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    fn args(value: Value) -> Option<JsonObject> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn advertises_five_tools_with_schemas() {
        let tools = server().tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();
        assert_eq!(
            names,
            vec![
                "create_salmon_index",
                "get_fastqc",
                "list_directory",
                "quantify_with_salmon",
                "read_file_lines",
            ]
        );
        let quant = &tools[3];
        assert_eq!(quant.input_schema["required"], json!(["index_dir", "reads", "output_dir"]));
    }

    #[test]
    fn server_info_names_the_server() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn index_failure_reply_starts_with_prefix() {
        let result = server()
            .invoke(
                "create_salmon_index",
                args(json!({
                    "transcript_fasta": "/nonexistent/tx.fa",
                    "index_dir": "/nonexistent/idx"
                })),
            )
            .await;
        assert!(text_of(&result).starts_with("Error creating Salmon index:"));
    }

    #[tokio::test]
    async fn unknown_tool_is_flagged() {
        let result = server().invoke("shell", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Error: unknown tool 'shell'");
    }

    #[tokio::test]
    async fn missing_arguments_become_reply_text() {
        let result = server().invoke("list_directory", None).await;
        assert_eq!(
            text_of(&result),
            "Error listing directory: missing 'directory_path' parameter"
        );
    }
}
