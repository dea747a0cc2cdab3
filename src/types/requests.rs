//! Tipos de requisição do geoplot.

use serde::{Deserialize, Serialize};

use crate::types::errors::{GeoplotError, GeoplotResult};

/// Número fixo de termos calculados por série.
pub const TERM_COUNT: usize = 29;

/// Parâmetros de uma série geométrica.
///
/// Construídos a partir de entrada já validada; nunca são alterados.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceParameters {
    /// Primeiro termo (a).
    pub first_term: f64,

    /// Razão (r).
    pub ratio: f64,

    /// Número de somas parciais.
    pub term_count: usize,
}

impl SequenceParameters {
    /// Cria parâmetros com o número padrão de termos.
    ///
    /// Falha se algum valor não for finito.
    pub fn new(first_term: f64, ratio: f64) -> GeoplotResult<Self> {
        if !first_term.is_finite() {
            return Err(GeoplotError::invalid_input(
                "first_term",
                format!("valor não finito: {}", first_term),
            ));
        }
        if !ratio.is_finite() {
            return Err(GeoplotError::invalid_input(
                "ratio",
                format!("valor não finito: {}", ratio),
            ));
        }

        Ok(Self {
            first_term,
            ratio,
            term_count: TERM_COUNT,
        })
    }
}

/// Requisição de superfície 3D.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRequest {
    /// Equação em x e y, sem espaços nas pontas.
    pub equation: String,

    /// Rejeita pontos não finitos em vez de marcá-los como NaN.
    #[serde(default)]
    pub strict: bool,
}

impl SurfaceRequest {
    /// Cria uma nova requisição.
    pub fn new(equation: impl AsRef<str>) -> Self {
        Self {
            equation: equation.as_ref().trim().to_string(),
            strict: false,
        }
    }

    /// Define o modo estrito.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_parameters_default_term_count() {
        let params = SequenceParameters::new(1.0, 0.5).unwrap();
        assert_eq!(params.term_count, 29);
    }

    #[test]
    fn test_sequence_parameters_reject_non_finite() {
        assert!(SequenceParameters::new(f64::NAN, 0.5).is_err());
        assert!(SequenceParameters::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_sequence_parameters_accept_divergent_ratios() {
        assert!(SequenceParameters::new(1.0, 0.0).is_ok());
        assert!(SequenceParameters::new(1.0, -3.0).is_ok());
        assert!(SequenceParameters::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_surface_request_trims() {
        let request = SurfaceRequest::new("  x**2 + y  \n");
        assert_eq!(request.equation, "x**2 + y");
        assert!(!request.strict);
        assert!(request.with_strict(true).strict);
    }
}
