//! Servidor JSON-RPC do geoplot.
//!
//! Fala JSON-RPC 2.0 sobre linhas (stdin/stdout por padrão) e expõe o
//! [`PlotService`](crate::orchestrator::PlotService) como ferramentas.
//!
//! ## Ferramentas Expostas
//!
//! - `geoplot_chart` - Gráfico das somas parciais
//! - `geoplot_surface` - Superfície 3D de uma equação
//! - `geoplot_latex` - Documento LaTeX da série
//! - `geoplot_status` - Estado do cache
//!
//! ## Exemplo de Uso
//!
//! ```ignore
//! use geoplot::server::PlotServer;
//! use geoplot::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = PlotServer::new(Config::load_or_default()).unwrap();
//!     server.run_stdio().await.unwrap();
//! }
//! ```

mod dispatch;
mod protocol;
mod tools;
mod transport;

pub use dispatch::PlotServer;
pub use protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolContent, ToolDescription, ToolResult,
    ToolsCapability, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};
pub use tools::{SequenceParams, SurfaceParams, ToolHandler};
pub use transport::{Incoming, LineTransport, StdioTransport};
