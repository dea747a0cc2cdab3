//! Renderização de gráficos e documentos.
//!
//! O [`Renderer`] transforma resultados numéricos em bytes prontos para
//! entrega. O padrão é o [`DescriptionRenderer`], que gera descrições JSON;
//! outros formatos entram implementando o mesmo trait.

mod description;
pub mod latex;

use crate::sequence::SequenceReport;
use crate::surface::SurfaceData;
use crate::GeoplotResult;

pub use description::DescriptionRenderer;
pub use latex::{generate_document, write_document, DEFAULT_LATEX_FILE};

/// Backend de renderização.
pub trait Renderer: Send + Sync {
    /// Nome do backend.
    fn name(&self) -> &str;

    /// Tipo MIME dos bytes produzidos.
    fn content_type(&self) -> &str;

    /// Gráfico das somas parciais com limite e faixa.
    fn render_chart(&self, report: &SequenceReport) -> GeoplotResult<Vec<u8>>;

    /// Superfície sobre a malha.
    fn render_surface(&self, surface: &SurfaceData) -> GeoplotResult<Vec<u8>>;
}
