//! Loop do servidor JSON-RPC.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde_json::json;

use crate::orchestrator::PlotService;
use crate::types::config::Config;
use crate::GeoplotResult;

use super::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use super::tools::ToolHandler;
use super::transport::{Incoming, LineTransport, StdioTransport};

/// Servidor de plotagem.
pub struct PlotServer {
    tools: ToolHandler,
    initialized: bool,
}

impl PlotServer {
    /// Cria o servidor com o renderizador padrão.
    pub fn new(config: Config) -> GeoplotResult<Self> {
        let service = PlotService::with_default_renderer(config)?;
        Ok(Self::with_service(Arc::new(service)))
    }

    /// Cria o servidor sobre um serviço existente.
    pub fn with_service(service: Arc<PlotService>) -> Self {
        Self {
            tools: ToolHandler::new(service),
            initialized: false,
        }
    }

    /// Se o cliente já mandou `initialize`.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Atende stdin/stdout até o fim da entrada.
    pub async fn run_stdio(&mut self) -> GeoplotResult<()> {
        let mut transport = StdioTransport::stdio();
        self.run(&mut transport).await
    }

    /// Atende o transporte até o fim da entrada ou até um `shutdown`.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        transport: &mut LineTransport<R, W>,
    ) -> GeoplotResult<()> {
        tracing::info!("geoplot server starting");

        loop {
            let request = match transport.read_message()? {
                Incoming::Request(request) => request,
                Incoming::Malformed(error) => {
                    tracing::warn!(code = error.code, message = %error.message, "Malformed message");
                    transport.write_response(&JsonRpcResponse::error(None, error))?;
                    continue;
                }
                Incoming::Closed => {
                    tracing::info!("Client disconnected");
                    break;
                }
            };

            let is_notification = request.is_notification();
            let is_shutdown = request.method == "shutdown";

            let response = self.handle_request(request).await;

            // Notificações nunca recebem resposta.
            if !is_notification {
                transport.write_response(&response)?;
            }

            if is_shutdown {
                break;
            }
        }

        tracing::info!("geoplot server stopped");
        Ok(())
    }

    /// Processa uma request.
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "Handling request");

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" | "notifications/initialized" => {
                tracing::info!("Client initialization complete");
                JsonRpcResponse::success(request.id, json!({}))
            }
            "shutdown" => {
                tracing::info!("Client requested shutdown");
                self.initialized = false;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client initializing connection");
        self.initialized = true;

        match serde_json::to_value(InitializeResult::default()) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: ToolHandler::list_tools(),
        };

        match serde_json::to_value(result) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
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

        let result = self
            .tools
            .handle_tool_call(&params.name, params.arguments)
            .await;

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}
