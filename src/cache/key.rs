//! Chaves do cache de artefatos.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::requests::{SequenceParameters, SurfaceRequest};

/// `f64` comparado por igualdade exata.
///
/// Guarda o padrão de bits, com `-0.0` normalizado para `0.0`, de modo que
/// `Eq`, `Hash` e `Ord` sejam consistentes entre si. NaN nunca chega aqui:
/// os parâmetros são validados antes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExactF64(u64);

impl ExactF64 {
    /// Valor original.
    pub fn get(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for ExactF64 {
    fn from(value: f64) -> Self {
        // 0.0 == -0.0 numericamente, mas os bits diferem
        let value = if value == 0.0 { 0.0 } else { value };
        Self(value.to_bits())
    }
}

impl fmt::Display for ExactF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Identifica uma requisição de computação.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactKey {
    /// Gráfico de somas parciais.
    Chart { first_term: ExactF64, ratio: ExactF64 },
    /// Documento LaTeX da série.
    Document { first_term: ExactF64, ratio: ExactF64 },
    /// Superfície 3D de uma equação.
    Surface { expression: String, strict: bool },
}

impl ArtifactKey {
    /// Chave de um gráfico.
    pub fn chart(params: &SequenceParameters) -> Self {
        Self::Chart {
            first_term: params.first_term.into(),
            ratio: params.ratio.into(),
        }
    }

    /// Chave de um documento LaTeX.
    pub fn document(params: &SequenceParameters) -> Self {
        Self::Document {
            first_term: params.first_term.into(),
            ratio: params.ratio.into(),
        }
    }

    /// Chave de uma superfície.
    pub fn surface(request: &SurfaceRequest) -> Self {
        Self::Surface {
            expression: request.equation.clone(),
            strict: request.strict,
        }
    }

    /// Nome curto do tipo de artefato.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Chart { .. } => "chart",
            Self::Document { .. } => "document",
            Self::Surface { .. } => "surface",
        }
    }

    /// Hash SHA256 (hex) da chave, usado como endereço do artefato.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind().as_bytes());

        match self {
            Self::Chart { first_term, ratio } | Self::Document { first_term, ratio } => {
                hasher.update(first_term.0.to_le_bytes());
                hasher.update(ratio.0.to_le_bytes());
            }
            Self::Surface { expression, strict } => {
                hasher.update(expression.as_bytes());
                hasher.update([*strict as u8]);
            }
        }

        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chart { first_term, ratio } => write!(f, "chart(a={}, r={})", first_term, ratio),
            Self::Document { first_term, ratio } => {
                write!(f, "document(a={}, r={})", first_term, ratio)
            }
            Self::Surface { expression, .. } => write!(f, "surface({})", expression),
        }
    }
}
