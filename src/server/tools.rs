//! Ferramentas expostas pelo servidor de plotagem.
//!
//! 1. `geoplot_chart` - Gráfico das somas parciais de uma série geométrica
//! 2. `geoplot_surface` - Superfície 3D de uma equação em x e y
//! 3. `geoplot_latex` - Documento LaTeX da série
//! 4. `geoplot_status` - Estado do cache e do renderizador

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::orchestrator::PlotService;
use crate::types::requests::SurfaceRequest;
use crate::types::responses::Artifact;
use crate::GeoplotResult;

use super::protocol::{ToolDescription, ToolResult};

// ═══════════════════════════════════════════════════════════════════════════
// Parâmetros das ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Parâmetros de `geoplot_chart` e `geoplot_latex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceParams {
    /// Primeiro termo.
    pub first_term: f64,

    /// Razão.
    pub ratio: f64,
}

/// Parâmetros de `geoplot_surface`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceParams {
    /// Equação em x e y.
    pub equation: String,

    /// Sobrescreve o modo estrito da configuração.
    #[serde(default)]
    pub strict: Option<bool>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Handler de ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Despacha chamadas de ferramenta para o [`PlotService`].
///
/// Toda falha vira [`ToolResult::error`]; o servidor nunca cai por causa
/// de uma requisição.
pub struct ToolHandler {
    service: Arc<PlotService>,
}

impl ToolHandler {
    pub fn new(service: Arc<PlotService>) -> Self {
        Self { service }
    }

    /// Serviço compartilhado.
    pub fn service(&self) -> &Arc<PlotService> {
        &self.service
    }

    /// Lista as ferramentas disponíveis.
    pub fn list_tools() -> Vec<ToolDescription> {
        let sequence_schema = json!({
            "type": "object",
            "properties": {
                "first_term": {
                    "type": "number",
                    "description": "Primeiro termo da série (a)"
                },
                "ratio": {
                    "type": "number",
                    "description": "Razão da série (r)"
                }
            },
            "required": ["first_term", "ratio"]
        });

        vec![
            ToolDescription::new(
                "geoplot_chart",
                "Calcula as 29 primeiras somas parciais de a·r^(j-1) e devolve a descrição do gráfico.",
                sequence_schema.clone(),
            ),
            ToolDescription::new(
                "geoplot_surface",
                "Avalia uma equação em x e y sobre a malha 400x400 em [-10, 10] e devolve a descrição da superfície.",
                json!({
                    "type": "object",
                    "properties": {
                        "equation": {
                            "type": "string",
                            "description": "Equação, por exemplo sin(x) * cos(y)"
                        },
                        "strict": {
                            "type": "boolean",
                            "description": "Rejeita pontos não finitos em vez de marcá-los como NaN"
                        }
                    },
                    "required": ["equation"]
                }),
            ),
            ToolDescription::new(
                "geoplot_latex",
                "Gera o documento LaTeX com o gráfico e a fórmula da série.",
                sequence_schema,
            ),
            ToolDescription::new(
                "geoplot_status",
                "Mostra o estado do cache de artefatos.",
                json!({
                    "type": "object",
                    "properties": {}
                }),
            ),
        ]
    }

    /// Processa uma chamada de ferramenta.
    pub async fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolResult {
        tracing::info!(tool = name, "Processing tool call");

        match name {
            "geoplot_chart" => self.handle_chart(arguments).await,
            "geoplot_surface" => self.handle_surface(arguments).await,
            "geoplot_latex" => self.handle_latex(arguments).await,
            "geoplot_status" => self.handle_status(),
            _ => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers individuais
    // ═══════════════════════════════════════════════════════════════════════

    async fn handle_chart(&self, arguments: Value) -> ToolResult {
        let params: SequenceParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        self.run(move |service| service.chart(params.first_term, params.ratio))
            .await
    }

    async fn handle_surface(&self, arguments: Value) -> ToolResult {
        let params: SurfaceParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        self.run(move |service| {
            let strict = params
                .strict
                .unwrap_or(service.config().surface.strict);
            service.surface_with(SurfaceRequest::new(&params.equation).with_strict(strict))
        })
        .await
    }

    async fn handle_latex(&self, arguments: Value) -> ToolResult {
        let params: SequenceParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        self.run(move |service| service.document(params.first_term, params.ratio))
            .await
    }

    fn handle_status(&self) -> ToolResult {
        let stats = self.service.cache_stats();
        let keys: Vec<String> = self
            .service
            .cached_keys()
            .iter()
            .map(ToString::to_string)
            .collect();

        let response = json!({
            "renderer": self.service.renderer_name(),
            "strict": self.service.config().surface.strict,
            "cache": {
                "size": stats.size,
                "capacity": stats.capacity,
                "hits": stats.hits,
                "misses": stats.misses,
                "evictions": stats.evictions,
                "hit_rate": format!("{:.1}%", stats.hit_rate() * 100.0),
                "keys": keys,
            }
        });

        ToolResult::success_json(&response)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Métodos auxiliares
    // ═══════════════════════════════════════════════════════════════════════

    /// Roda o cálculo numa thread de bloqueio e formata o artefato.
    async fn run<F>(&self, job: F) -> ToolResult
    where
        F: FnOnce(&PlotService) -> GeoplotResult<Arc<Artifact>> + Send + 'static,
    {
        let service = Arc::clone(&self.service);

        match tokio::task::spawn_blocking(move || job(&service)).await {
            Ok(Ok(artifact)) => format_artifact(&artifact),
            Ok(Err(e)) => ToolResult::error(e.to_string()),
            Err(e) => ToolResult::error(format!("Worker failed: {}", e)),
        }
    }
}

/// Conteúdo JSON é embutido como objeto; o resto vai como texto.
fn format_artifact(artifact: &Artifact) -> ToolResult {
    let bytes = artifact.bytes();
    let content = serde_json::from_slice::<Value>(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()));

    let response = json!({
        "fingerprint": artifact.fingerprint,
        "kind": artifact.kind(),
        "content_type": artifact.content_type(),
        "created_at": artifact.created_at,
        "content": content,
    });

    ToolResult::success_json(&response)
}
