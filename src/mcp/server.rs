//! MCP server implementation.
//!
//! Runs an MCP server on stdio transport. Each history table is exposed as
//! one tool taking a single `sql_statement` argument.

use anyhow::Result;
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorCode, ErrorData as McpError,
        Implementation, JsonObject, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    transport::stdio,
    RoleServer, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::Config;
use crate::history::schema::{TableSchema, TABLES};
use crate::history::HistoryService;

/// Name of the single argument every tool takes.
const SQL_ARGUMENT: &str = "sql_statement";

// ============== Tool Parameter Types ==============

/// Parameters shared by every history tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SqlParams {
    /// SQL statement to execute.
    #[schemars(description = "SQL statement to execute")]
    pub sql_statement: String,
}

// ============== Server Implementation ==============

/// The Chrome history MCP server.
#[derive(Debug, Clone)]
pub struct HistoryServer {
    service: Arc<HistoryService>,
}

impl HistoryServer {
    pub fn new(service: HistoryService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Tool definitions, one per history table.
    pub fn tools() -> Vec<Tool> {
        let schema = input_schema();
        TABLES
            .iter()
            .map(|table| Tool::new(table.tool, table.description(), Arc::clone(&schema)))
            .collect()
    }

    /// Validates a tool call and runs it against the history snapshot.
    ///
    /// Unknown tools and bad arguments are rejected before any file or
    /// database access.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let table = TableSchema::by_tool(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {name}"), None))?;
        let sql = sql_statement(arguments)?;

        tracing::debug!("{} on {}: {}", table.tool, table.table, sql);

        let service = Arc::clone(&self.service);
        let result = tokio::task::spawn_blocking(move || service.fetch_lines(&sql))
            .await
            .map_err(|e| mcp_error(&format!("Query task failed: {e}")))?;

        match result {
            Ok(lines) => Ok(CallToolResult::success(
                lines.into_iter().map(Content::text).collect(),
            )),
            Err(e) => Err(mcp_error(&format!("Fetch from {} failed: {e}", table.table))),
        }
    }
}

/// Creates an McpError from an error message.
fn mcp_error(message: &str) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(message.to_string()),
        data: None,
    }
}

/// JSON Schema for [`SqlParams`], shared by all tools.
fn input_schema() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(SqlParams)) {
        Ok(serde_json::Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Extracts the SQL text from raw tool arguments.
fn sql_statement(arguments: Option<JsonObject>) -> Result<String, McpError> {
    let missing =
        || McpError::invalid_params(format!("Missing required argument '{SQL_ARGUMENT}'"), None);

    let mut arguments = arguments.ok_or_else(missing)?;
    match arguments.remove(SQL_ARGUMENT) {
        Some(serde_json::Value::String(sql)) => Ok(sql),
        Some(_) => Err(McpError::invalid_params(
            format!("Argument '{SQL_ARGUMENT}' must be a string"),
            None,
        )),
        None => Err(missing()),
    }
}

impl ServerHandler for HistoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Read-only SQL access to the local Chrome browsing history. Use \
                 fetch-urls-from-sqlite for the urls table and fetch-visits-info-from-sqlite \
                 for the visits table. Each result row is returned as one text item."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(Self::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }
}

/// Runs the MCP server on stdio transport.
///
/// This is a blocking call that processes MCP requests until the client
/// disconnects or an error occurs.
pub async fn run_server(config: Config) -> Result<()> {
    tracing::info!(
        "Serving {} (snapshot: {})",
        config.history_path.display(),
        config.snapshot_path.display()
    );

    let service = HistoryServer::new(HistoryService::new(config))
        .serve(stdio())
        .await?;
    service.waiting().await?;
    Ok(())
}
