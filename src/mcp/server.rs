//! kube-mcp server binary - exposes Kubernetes CRUD via Model Context Protocol.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use kube_mcp::ai::{self, ChatBackend};
use kube_mcp::cluster::ClusterConnection;
use kube_mcp::config::ServerConfig;
use kube_mcp::dispatch::Dispatcher;
use kube_mcp::errors::ServerError;
use kube_mcp::mcp::tools;
use kube_mcp::scheme;

/// System prompt for the manifest-transformation call. The dispatcher expects
/// plain JSON back; code fences are tolerated but not invited.
const MANIFEST_TRANSFORM_PROMPT: &str = "You are a Kubernetes expert. \
Your job is to transform the Kubernetes resource manifest provided by the user \
from YAML into single-line JSON. You may refer to the Kubernetes API reference \
at https://kubernetes.io/docs/reference/kubernetes-api/ for field semantics. \
Respond with the JSON document only. DO NOT wrap it in a code block.";

/// JSON-RPC request structure
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// MCP server state
struct McpServer {
    name: String,
    dispatcher: Dispatcher,
    chat: Arc<dyn ChatBackend>,
}

impl McpServer {
    fn new(name: String, dispatcher: Dispatcher, chat: Arc<dyn ChatBackend>) -> Self {
        Self {
            name,
            dispatcher,
            chat,
        }
    }

    /// Handle one request. Notifications get no response.
    async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") {
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params.as_ref()).await,
            _ => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32601,
                    message: "Method not found".to_string(),
                    data: None,
                }),
            },
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": self.name,
                    "version": env!("CARGO_PKG_VERSION")
                }
            })),
            error: None,
        }
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(tools::get_tool_schemas()),
            error: None,
        }
    }

    async fn handle_tool_call(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32602,
                    message: "Missing params".to_string(),
                    data: None,
                }),
            };
        };

        let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = match tool_name {
            "create_resource" => self.tool_create_resource(&arguments).await,
            "update_resource" => self.tool_update_resource(&arguments).await,
            "get_resources" => self.tool_get_resources(&arguments).await,
            "get_resource" => self.tool_get_resource(&arguments).await,
            "delete_resource" => self.tool_delete_resource(&arguments).await,
            _ => Err(format!("Unknown tool: {tool_name}")),
        };

        // Tool failures are conversational text for the calling model, not
        // protocol errors.
        match result {
            Ok(content) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(json!({
                    "content": [{
                        "type": "text",
                        "text": content
                    }]
                })),
                error: None,
            },
            Err(e) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(json!({
                    "content": [{
                        "type": "text",
                        "text": format!("Error: {}", e)
                    }],
                    "isError": true
                })),
                error: None,
            },
        }
    }

    async fn tool_create_resource(&self, args: &Value) -> Result<String, String> {
        let resource = args.get("resource").and_then(|v| v.as_str()).unwrap_or("");
        let manifest_yaml = args
            .get("manifest_yaml")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'manifest_yaml' parameter")?;
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("");

        // Reject bad resource names before spending a model call on the
        // manifest transformation.
        self.dispatcher
            .check_resource(resource)
            .map_err(|e| e.to_string())?;

        debug!(resource, namespace, "Transforming manifest to JSON");
        let raw = self
            .chat
            .complete(MANIFEST_TRANSFORM_PROMPT, manifest_yaml)
            .await
            .map_err(|e| e.to_string())?;
        let manifest: Value = serde_json::from_str(ai::extract_json(&raw)).map_err(|e| {
            ServerError::InvalidManifest {
                reason: e.to_string(),
            }
            .to_string()
        })?;

        self.dispatcher
            .create(resource, manifest, namespace)
            .await
            .map_err(|e| e.to_string())
    }

    async fn tool_update_resource(&self, args: &Value) -> Result<String, String> {
        let resource = args.get("resource").and_then(|v| v.as_str()).unwrap_or("");
        let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("");

        // Clients send the patch either as a JSON object or as a
        // JSON-encoded string; accept both.
        let patch: Value = match args.get("patch") {
            Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|e| {
                ServerError::InvalidPatch {
                    reason: e.to_string(),
                }
                .to_string()
            })?,
            Some(value @ Value::Object(_)) => value.clone(),
            Some(_) => return Err("Patch must be a JSON object or JSON string".to_string()),
            None => return Err("Missing 'patch' parameter".to_string()),
        };

        self.dispatcher
            .update(resource, name, patch, namespace)
            .await
            .map_err(|e| e.to_string())
    }

    async fn tool_get_resources(&self, args: &Value) -> Result<String, String> {
        let resource = args.get("resource").and_then(|v| v.as_str()).unwrap_or("");
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("");

        self.dispatcher
            .list(resource, namespace)
            .await
            .map_err(|e| e.to_string())
    }

    async fn tool_get_resource(&self, args: &Value) -> Result<String, String> {
        let resource = args.get("resource").and_then(|v| v.as_str()).unwrap_or("");
        let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("");

        self.dispatcher
            .get(resource, name, namespace)
            .await
            .map_err(|e| e.to_string())
    }

    async fn tool_delete_resource(&self, args: &Value) -> Result<String, String> {
        let resource = args.get("resource").and_then(|v| v.as_str()).unwrap_or("");
        let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("");

        self.dispatcher
            .delete(resource, name, namespace)
            .await
            .map_err(|e| e.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the JSON-RPC stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                config
                    .mcp
                    .log_level
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(name = %config.mcp.name, "Starting MCP server");

    // Startup is the only phase allowed to abort: without a connection and a
    // scheme no tool call can be resolved.
    let connection = ClusterConnection::connect(&config.kubernetes)
        .await
        .context("Failed to connect to cluster")?;
    let scheme = scheme::discover(&config.kubernetes)
        .context("Failed to discover cluster API resources")?;
    info!(resources = scheme.len(), "Built resource scheme");

    let chat = ai::create_chat_backend(&config.llm).context("Failed to build chat backend")?;

    let server = McpServer::new(
        config.mcp.name.clone(),
        Dispatcher::new(Arc::new(scheme), connection),
        chat,
    );

    // Read from stdin, write to stdout (JSON-RPC over stdio)
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout();

    for line in reader.lines() {
        let Ok(line) = line else { break };

        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let error_response = JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: Value::Null,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32700,
                        message: format!("Parse error: {e}"),
                        data: None,
                    }),
                };
                writeln!(stdout, "{}", serde_json::to_string(&error_response)?)?;
                stdout.flush()?;
                continue;
            }
        };

        if let Some(response) = server.handle_request(&request).await {
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
