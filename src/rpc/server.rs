//! JSON-RPC server loop.

use std::io::{BufRead, BufReader, BufWriter, Stdin, Stdout, Write};

use serde_json::json;

use crate::types::config::Config;
use crate::StratusResult;

use super::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use super::tools::ToolHandler;
use super::transport::LineTransport;

/// Serves tool calls over a line transport until the input ends.
pub struct RpcServer<R, W> {
    transport: LineTransport<R, W>,
    tools: ToolHandler,
    initialized: bool,
}

impl RpcServer<BufReader<Stdin>, BufWriter<Stdout>> {
    /// Server on stdin/stdout with fresh state.
    pub fn stdio(config: &Config) -> Self {
        Self::new(LineTransport::stdio(), ToolHandler::new(config))
    }
}

impl<R: BufRead, W: Write> RpcServer<R, W> {
    pub fn new(transport: LineTransport<R, W>, tools: ToolHandler) -> Self {
        Self {
            transport,
            tools,
            initialized: false,
        }
    }

    /// Main loop; returns when the input is exhausted.
    pub fn run(&mut self) -> StratusResult<()> {
        tracing::info!("Stratus RPC server starting");

        loop {
            let response = match self.transport.read_message() {
                Ok(Some(request)) => {
                    // Notifications get no response.
                    let is_notification = request.is_notification();
                    let response = self.handle_request(request);
                    if is_notification {
                        continue;
                    }
                    response
                }
                Ok(None) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read message");
                    JsonRpcResponse::error(None, JsonRpcError::parse_error(&e))
                }
            };

            if let Err(e) = self.transport.write_response(&response) {
                tracing::error!(error = %e, "Failed to write response");
                return Err(e);
            }
        }

        tracing::info!("Stratus RPC server stopped");
        Ok(())
    }

    pub fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "Handling request");

        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!("Unsupported jsonrpc version '{}'", request.jsonrpc)),
            );
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "shutdown" => self.handle_shutdown(request),
            "tools/list" => Self::handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Consumes the server, returning its transport.
    pub fn into_transport(self) -> LineTransport<R, W> {
        self.transport
    }

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client initializing connection");
        self.initialized = true;

        match serde_json::to_value(InitializeResult::default()) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_shutdown(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client requested shutdown");
        self.initialized = false;
        JsonRpcResponse::success(request.id, json!(null))
    }

    fn handle_tools_list(request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: ToolHandler::list_tools(),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: CallToolParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                );
            }
        };

        let result = self.tools.handle_tool_call(&params.name, params.arguments);

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}
