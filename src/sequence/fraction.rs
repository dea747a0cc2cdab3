//! Aproximação racional com denominador limitado.

use std::fmt;

use serde::{Deserialize, Serialize};

// 2^63: a partir daqui um inteiro f64 não cabe em i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

// Denominadores 2^k acima disso não cabem em i128. Valores tão pequenos
// ficam abaixo de 1/(2 · u64::MAX) e arredondam para zero.
const MAX_SHIFT: u32 = 120;

/// Fração em termos mínimos, com sinal no numerador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: u64,
}

impl Fraction {
    const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };

    /// Valor em ponto flutuante.
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn signed(numerator: i128, denominator: i128, negative: bool) -> Option<Self> {
        let numerator = i64::try_from(if negative { -numerator } else { numerator }).ok()?;
        let denominator = u64::try_from(denominator).ok()?;
        Some(Self {
            numerator,
            denominator,
        })
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Valor exato de um f64 não inteiro como `n / 2^shift`, já reduzido.
///
/// `None` quando o denominador passaria de `2^MAX_SHIFT`.
fn exact_ratio(x: f64) -> Option<(i128, i128)> {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);

    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    // não inteiro: expoente sempre negativo
    let scale = exponent.unsigned_abs();
    let zeros = mantissa.trailing_zeros().min(scale);
    let shift = scale - zeros;
    if shift > MAX_SHIFT {
        return None;
    }

    Some((i128::from(mantissa >> zeros), 1i128 << shift))
}

/// Fração mais próxima de `value` com denominador até `max_denominator`.
///
/// Trabalha sobre o valor racional exato do f64, com frações contínuas,
/// e compara o último convergente com o melhor semiconvergente. Empates
/// ficam com o convergente.
///
/// Retorna `None` para valores não finitos e para inteiros fora de `i64`.
pub fn approximate_fraction(value: f64, max_denominator: u64) -> Option<Fraction> {
    if !value.is_finite() {
        return None;
    }

    let negative = value < 0.0;
    let x = value.abs();

    if x.fract() == 0.0 {
        if x >= I64_BOUND {
            return None;
        }
        return Fraction::signed(x as i128, 1, negative);
    }

    let Some((numerator, denominator)) = exact_ratio(x) else {
        return Some(Fraction::ZERO);
    };

    let max_den = i128::from(max_denominator.max(1));
    if denominator <= max_den {
        return Fraction::signed(numerator, denominator, negative);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0i128, 1i128, 1i128, 0i128);
    let (mut n, mut d) = (numerator, denominator);

    loop {
        let a = n / d;
        let q2 = match a.checked_mul(q1).and_then(|v| v.checked_add(q0)) {
            Some(q2) if q2 <= max_den => q2,
            _ => break,
        };

        let p2 = p0 + a * p1;
        (p0, q0, p1, q1) = (p1, q1, p2, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_den - q0) / q1;
    let semi_den = q0 + k * q1;

    // |x - p1/q1| = d / (q1 · denominator) e a distância entre os candidatos
    // é 1 / (q1 · semi_den): o convergente ganha se 2 · d · semi_den <= denominator.
    let convergent_wins = d
        .checked_mul(2 * semi_den)
        .is_some_and(|lhs| lhs <= denominator);

    if convergent_wins {
        Fraction::signed(p1, q1, negative)
    } else {
        Fraction::signed(p0 + k * p1, semi_den, negative)
    }
}
