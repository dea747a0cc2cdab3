//! Serviço de plotagem.

use std::sync::Arc;

use crate::cache::{ArtifactCache, ArtifactKey, CacheStats};
use crate::render::{generate_document, DescriptionRenderer, Renderer};
use crate::sequence::SequenceReport;
use crate::surface::evaluate_surface;
use crate::types::config::Config;
use crate::types::errors::GeoplotResult;
use crate::types::requests::{SequenceParameters, SurfaceRequest};
use crate::types::responses::{Artifact, ArtifactBody};

/// Orquestra modelo, avaliador, renderizador e cache.
///
/// Responsável por:
/// - Validar as entradas
/// - Gerar cada artefato no máximo uma vez por chave enquanto ele estiver em cache
/// - Nunca guardar resultados de requisições que falharam
pub struct PlotService {
    config: Config,
    cache: ArtifactCache<ArtifactKey, Arc<Artifact>>,
    renderer: Arc<dyn Renderer>,
}

impl PlotService {
    /// Cria um novo serviço.
    ///
    /// Falha se a capacidade configurada do cache for zero.
    pub fn new(config: Config, renderer: Arc<dyn Renderer>) -> GeoplotResult<Self> {
        let cache = ArtifactCache::new(config.cache.capacity)?;

        tracing::debug!(
            capacity = config.cache.capacity,
            renderer = renderer.name(),
            "Plot service created"
        );

        Ok(Self {
            config,
            cache,
            renderer,
        })
    }

    /// Cria o serviço com o renderizador JSON padrão.
    pub fn with_default_renderer(config: Config) -> GeoplotResult<Self> {
        Self::new(config, Arc::new(DescriptionRenderer::new()))
    }

    /// Configuração em uso.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Nome do renderizador.
    pub fn renderer_name(&self) -> &str {
        self.renderer.name()
    }

    /// Gráfico das somas parciais de `a · r^(j-1)`.
    pub fn chart(&self, first_term: f64, ratio: f64) -> GeoplotResult<Arc<Artifact>> {
        let params = SequenceParameters::new(first_term, ratio)?;
        let key = ArtifactKey::chart(&params);

        self.fetch(key, |fingerprint| {
            let report = SequenceReport::compute(&params);
            let rendered = self.renderer.render_chart(&report)?;

            tracing::debug!(
                convergence = %report.convergence,
                overflow = report.limit.is_overflow(),
                "Chart rendered"
            );

            Ok(Artifact::new(
                fingerprint,
                ArtifactBody::Chart {
                    report,
                    rendered,
                    content_type: self.renderer.content_type().to_string(),
                },
            ))
        })
    }

    /// Superfície da equação sobre a malha padrão.
    ///
    /// O modo estrito vem da configuração.
    pub fn surface(&self, equation: &str) -> GeoplotResult<Arc<Artifact>> {
        self.surface_with(SurfaceRequest::new(equation).with_strict(self.config.surface.strict))
    }

    /// Superfície com modo estrito explícito.
    pub fn surface_with(&self, request: SurfaceRequest) -> GeoplotResult<Arc<Artifact>> {
        let key = ArtifactKey::surface(&request);

        self.fetch(key, |fingerprint| {
            let data = evaluate_surface(&request)?;
            let rendered = self.renderer.render_surface(&data)?;

            if data.non_finite > 0 {
                tracing::warn!(
                    equation = %data.equation,
                    non_finite = data.non_finite,
                    "Surface has undefined points"
                );
            }

            Ok(Artifact::new(
                fingerprint,
                ArtifactBody::Surface {
                    shape: data.z.shape(),
                    non_finite: data.non_finite,
                    equation: data.equation,
                    rendered,
                    content_type: self.renderer.content_type().to_string(),
                },
            ))
        })
    }

    /// Documento LaTeX da série.
    pub fn document(&self, first_term: f64, ratio: f64) -> GeoplotResult<Arc<Artifact>> {
        let params = SequenceParameters::new(first_term, ratio)?;
        let key = ArtifactKey::document(&params);

        self.fetch(key, |fingerprint| {
            let report = SequenceReport::compute(&params);
            Ok(Artifact::new(
                fingerprint,
                ArtifactBody::Document {
                    latex: generate_document(&report),
                },
            ))
        })
    }

    /// Estatísticas do cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Chaves em cache, da mais recente para a mais antiga.
    pub fn cached_keys(&self) -> Vec<ArtifactKey> {
        self.cache.keys_by_recency()
    }

    /// Esvazia o cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn fetch<F>(&self, key: ArtifactKey, build: F) -> GeoplotResult<Arc<Artifact>>
    where
        F: FnOnce(String) -> GeoplotResult<Artifact>,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::debug_span!("artifact", %request_id, key = %key);
        let _enter = span.enter();

        let mut computed = false;
        let result = self.cache.get_or_try_insert_with(key.clone(), || {
            computed = true;
            build(key.fingerprint()).map(Arc::new)
        });

        match &result {
            Ok(_) if computed => tracing::info!(kind = key.kind(), "Artifact generated"),
            Ok(_) => tracing::debug!(kind = key.kind(), "Cache hit"),
            Err(e) => tracing::warn!(kind = key.kind(), error = %e, "Artifact generation failed"),
        }

        result
    }
}
