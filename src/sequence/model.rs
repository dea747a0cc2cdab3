//! Somas parciais de séries geométricas.

use serde::{Deserialize, Serialize};

use crate::types::requests::SequenceParameters;

use super::fraction::{approximate_fraction, Fraction};

/// Denominador máximo usado para exibir a razão.
pub const RATIO_MAX_DENOMINATOR: u64 = 10;

/// Meia largura relativa da faixa em torno do limite.
pub const BAND_FRACTION: f64 = 0.08;

/// Uma soma parcial.
///
/// `Overflow` marca somas que saíram do intervalo representável; nunca é
/// confundido com um valor finito.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialSum {
    Finite(f64),
    Overflow,
}

impl PartialSum {
    /// Valor finito, se houver.
    pub fn value(self) -> Option<f64> {
        match self {
            PartialSum::Finite(v) => Some(v),
            PartialSum::Overflow => None,
        }
    }

    /// Verifica se é o marcador de overflow.
    pub fn is_overflow(self) -> bool {
        matches!(self, PartialSum::Overflow)
    }
}

/// Classificação da série.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// |r| < 1.
    Converges,
    /// |r| >= 1.
    Diverges,
}

impl Convergence {
    /// Classifica pela razão.
    pub fn classify(ratio: f64) -> Self {
        if ratio.abs() < 1.0 {
            Convergence::Converges
        } else {
            Convergence::Diverges
        }
    }
}

impl std::fmt::Display for Convergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Convergence::Converges => write!(f, "converges"),
            Convergence::Diverges => write!(f, "diverges"),
        }
    }
}

/// Faixa de confiança em torno do limite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub lower: f64,
    pub upper: f64,
}

/// Calcula as `n` primeiras somas parciais de `a · r^(j-1)`.
///
/// Aceita r = 0, r negativo e |r| >= 1. Depois que uma soma estoura, todas
/// as seguintes são `Overflow`.
pub fn compute_partial_sums(first_term: f64, ratio: f64, n: usize) -> Vec<PartialSum> {
    let mut sums = Vec::with_capacity(n);
    let mut term = first_term;
    let mut total = 0.0_f64;
    let mut overflowed = false;

    for _ in 0..n {
        if !overflowed {
            total += term;
            overflowed = !total.is_finite();
        }

        if overflowed {
            sums.push(PartialSum::Overflow);
        } else {
            sums.push(PartialSum::Finite(total));
            term *= ratio;
        }
    }

    sums
}

/// Sequência de somas parciais com os dados derivados para exibição.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    /// Parâmetros de origem.
    pub params: SequenceParameters,

    /// Somas parciais, índice 1..=n.
    pub partial_sums: Vec<PartialSum>,

    /// Classificação pela razão.
    pub convergence: Convergence,

    /// Última soma parcial (linha de limite).
    pub limit: PartialSum,

    /// ±8% em torno do limite; ausente em overflow.
    pub band: Option<ConfidenceBand>,

    /// Razão aproximada por fração; ausente para inteiros fora de `i64`.
    pub ratio_fraction: Option<Fraction>,
}

impl SequenceReport {
    /// Calcula somas, classificação, limite e faixa.
    pub fn compute(params: &SequenceParameters) -> Self {
        let partial_sums = compute_partial_sums(params.first_term, params.ratio, params.term_count);
        let limit = partial_sums.last().copied().unwrap_or(PartialSum::Finite(0.0));

        let band = limit.value().map(|s| {
            let half = s.abs() * BAND_FRACTION;
            ConfidenceBand {
                lower: s - half,
                upper: s + half,
            }
        });

        Self {
            params: *params,
            partial_sums,
            convergence: Convergence::classify(params.ratio),
            limit,
            band,
            ratio_fraction: approximate_fraction(params.ratio, RATIO_MAX_DENOMINATOR),
        }
    }

    /// Maior soma finita (escala do eixo y).
    pub fn max_finite(&self) -> Option<f64> {
        self.partial_sums
            .iter()
            .filter_map(|s| s.value())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Fórmula da série em LaTeX.
    pub fn formula(&self) -> String {
        let ratio = match self.ratio_fraction {
            Some(f) if f.denominator == 1 && f.numerator >= 0 => f.to_string(),
            Some(f) => format!("({})", f),
            // inteiro grande demais: dígitos exatos da própria razão
            None if self.params.ratio >= 0.0 => format!("{:.0}", self.params.ratio),
            None => format!("({:.0})", self.params.ratio),
        };

        format!(
            r"\sum_{{i=1}}^\infty {} \cdot {}^{{i-1}}",
            self.params.first_term, ratio
        )
    }

    /// Texto de anotação do gráfico.
    pub fn annotation(&self) -> String {
        let limit = match self.limit {
            PartialSum::Finite(s) => format!("{:.4}", s),
            PartialSum::Overflow => "overflow".to_string(),
        };

        match self.convergence {
            Convergence::Converges => format!(
                "Since chosen r, |{}| < 1:\n The sequence converges to {} for the first {} terms",
                self.params.ratio, limit, self.params.term_count
            ),
            Convergence::Diverges => format!(
                "Since chosen r, 1 ≤ |{}|:\n The sequence diverges to {} for the first {} terms",
                self.params.ratio, limit, self.params.term_count
            ),
        }
    }
}
