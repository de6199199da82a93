//! MCP server implementation.

use super::handlers::{failure_context, ToolHandlers};
use super::protocol::*;
use super::tools::{get_tools, ToolRequest};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// MCP Server for ytmcp.
///
/// Stateless apart from its handlers, so one instance can serve any number of
/// concurrent requests and sessions.
#[derive(Clone)]
pub struct McpServer {
    handlers: ToolHandlers,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(handlers: ToolHandlers) -> Self {
        Self { handlers }
    }

    /// Handle one raw message.
    ///
    /// Returns `None` for notifications. Unparseable input yields a parse error
    /// with a null id.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        if request.has_null_id() {
            return Some(JsonRpcResponse::error(
                None,
                INVALID_REQUEST,
                "Invalid request: id must not be null",
            ));
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok()) {
            let client = params
                .client_info
                .map(|c| format!("{} {}", c.name, c.version.unwrap_or_default()))
                .unwrap_or_else(|| "unknown client".to_string());
            info!(
                "Initialize from {} (protocol {})",
                client.trim(),
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::from_result(id, &ToolsListResult { tools: get_tools() })
    }

    /// Handle tools/call request.
    ///
    /// Bad arguments are protocol errors; provider failures are tool results
    /// flagged with `isError`.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let request = match ToolRequest::parse(&params.name, params.arguments.as_ref()) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected call to {}: {}", params.name, e);
                return JsonRpcResponse::error(id, INVALID_PARAMS, &e.to_string());
            }
        };

        let result = match self.handlers.invoke(&request).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                warn!("{} failed: {}", request.tool_name(), e);
                ToolCallResult::error(format!("{}: {}", failure_context(&request), e))
            }
        };

        JsonRpcResponse::from_result(id, &result)
    }
}
