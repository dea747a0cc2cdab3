//! Renderizador padrão: descrições de gráfico em JSON.

use serde::Serialize;
use serde_json::json;

use crate::sequence::{ConfidenceBand, SequenceReport};
use crate::surface::SurfaceData;
use crate::GeoplotResult;

use super::Renderer;

/// Largura do eixo x do gráfico de somas parciais.
const CHART_X_MAX: f64 = 30.0;

/// Gera documentos JSON que um front-end de plotagem consome diretamente.
///
/// Valores não finitos viram `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionRenderer {
    /// JSON indentado.
    pub pretty: bool,
}

impl DescriptionRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ativa saída indentada.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn encode<T: Serialize>(&self, value: &T) -> GeoplotResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl Renderer for DescriptionRenderer {
    fn name(&self) -> &str {
        "description"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn render_chart(&self, report: &SequenceReport) -> GeoplotResult<Vec<u8>> {
        let x: Vec<usize> = (1..=report.partial_sums.len()).collect();
        let y: Vec<Option<f64>> = report.partial_sums.iter().map(|s| s.value()).collect();
        let y_max = report.max_finite().unwrap_or(0.0);

        let band = report
            .band
            .map(|ConfidenceBand { lower, upper }| json!({ "lower": lower, "upper": upper }));

        let description = json!({
            "type": "chart",
            "title": format!("${}$", report.formula()),
            "axis": {
                "x": [0.0, CHART_X_MAX],
                "y": [0.0, y_max + 1.0],
            },
            "series": [{
                "name": "a_n sequence",
                "kind": "scatter",
                "x": x,
                "y": y,
            }],
            "limit": report.limit.value(),
            "band": band,
            "convergence": report.convergence,
            "annotation": report.annotation(),
        });

        self.encode(&description)
    }

    fn render_surface(&self, surface: &SurfaceData) -> GeoplotResult<Vec<u8>> {
        let z: Vec<Vec<Option<f64>>> = surface
            .z
            .iter_rows()
            .map(|row| row.iter().copied().map(finite).collect())
            .collect();

        let description = json!({
            "data": [{
                "type": "surface",
                "x": surface.axis,
                "y": surface.axis,
                "z": z,
            }],
            "layout": {
                "title": surface.equation,
                "autosize": true,
                "scene": {
                    "xaxis": { "title": "x" },
                    "yaxis": { "title": "y" },
                    "zaxis": { "title": "z" },
                },
            },
        });

        self.encode(&description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Grid;
    use crate::types::requests::SequenceParameters;
    use serde_json::Value;

    fn chart_json(first: f64, ratio: f64) -> Value {
        let params = SequenceParameters::new(first, ratio).unwrap();
        let report = SequenceReport::compute(&params);
        let bytes = DescriptionRenderer::new().render_chart(&report).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_chart_description() {
        let chart = chart_json(1.0, 0.5);

        assert_eq!(chart["type"], "chart");
        assert_eq!(chart["series"][0]["x"].as_array().unwrap().len(), 29);
        assert_eq!(chart["series"][0]["y"][1], 1.5);
        assert_eq!(chart["convergence"], "converges");
        assert!(chart["band"]["lower"].is_number());
        assert!(chart["title"].as_str().unwrap().contains("(1/2)"));
    }

    #[test]
    fn test_chart_overflow_is_null() {
        let chart = chart_json(1e300, 1e300);

        assert!(chart["series"][0]["y"][5].is_null());
        assert!(chart["limit"].is_null());
        assert!(chart["band"].is_null());
        assert_eq!(chart["convergence"], "diverges");
    }

    #[test]
    fn test_surface_description() {
        let values = vec![1.0, f64::NAN, 3.0, 4.0];
        let surface = SurfaceData {
            equation: "x".to_string(),
            axis: vec![0.0, 1.0],
            z: Grid::new(2, 2, values).unwrap(),
            non_finite: 1,
        };

        let bytes = DescriptionRenderer::new().pretty().render_surface(&surface).unwrap();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(doc["data"][0]["type"], "surface");
        assert_eq!(doc["data"][0]["z"][0][0], 1.0);
        assert!(doc["data"][0]["z"][0][1].is_null());
        assert_eq!(doc["layout"]["title"], "x");
    }
}
