//! Tipos de resposta do geoplot.

use serde::{Deserialize, Serialize};

use crate::sequence::SequenceReport;

/// Artefato gerado (e guardado em cache) pelo serviço.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Impressão digital da chave que gerou o artefato.
    pub fingerprint: String,

    /// Momento da geração.
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Conteúdo.
    pub body: ArtifactBody,
}

impl Artifact {
    /// Cria um artefato com timestamp atual.
    pub fn new(fingerprint: impl Into<String>, body: ArtifactBody) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            created_at: chrono::Utc::now(),
            body,
        }
    }

    /// Tipo do artefato.
    pub fn kind(&self) -> &'static str {
        match self.body {
            ArtifactBody::Chart { .. } => "chart",
            ArtifactBody::Surface { .. } => "surface",
            ArtifactBody::Document { .. } => "document",
        }
    }

    /// Bytes entregáveis.
    pub fn bytes(&self) -> &[u8] {
        match &self.body {
            ArtifactBody::Chart { rendered, .. } => rendered,
            ArtifactBody::Surface { rendered, .. } => rendered,
            ArtifactBody::Document { latex } => latex.as_bytes(),
        }
    }

    /// Tipo MIME dos bytes.
    pub fn content_type(&self) -> &str {
        match &self.body {
            ArtifactBody::Chart { content_type, .. } => content_type,
            ArtifactBody::Surface { content_type, .. } => content_type,
            ArtifactBody::Document { .. } => "application/x-latex",
        }
    }
}

/// Conteúdo de um artefato.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactBody {
    /// Gráfico de somas parciais.
    Chart {
        report: SequenceReport,
        rendered: Vec<u8>,
        content_type: String,
    },

    /// Superfície 3D.
    Surface {
        equation: String,
        shape: (usize, usize),
        non_finite: usize,
        rendered: Vec<u8>,
        content_type: String,
    },

    /// Documento LaTeX.
    Document { latex: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_artifact() {
        let artifact = Artifact::new(
            "abc",
            ArtifactBody::Document {
                latex: "\\documentclass{article}".to_string(),
            },
        );

        assert_eq!(artifact.kind(), "document");
        assert_eq!(artifact.content_type(), "application/x-latex");
        assert_eq!(artifact.bytes(), b"\\documentclass{article}");
    }

    #[test]
    fn test_surface_artifact() {
        let artifact = Artifact::new(
            "def",
            ArtifactBody::Surface {
                equation: "x".to_string(),
                shape: (2, 2),
                non_finite: 0,
                rendered: b"{}".to_vec(),
                content_type: "application/json".to_string(),
            },
        );

        assert_eq!(artifact.kind(), "surface");
        assert_eq!(artifact.bytes(), b"{}");
        assert_eq!(artifact.content_type(), "application/json");
    }
}
