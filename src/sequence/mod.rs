//! Modelo de séries geométricas.
//!
//! Calcula as somas parciais `Σ a · r^(j-1)` e, na mesma passada, a
//! classificação (converge/diverge), o limite exibido e a faixa de ±8%.
//!
//! ## Exemplo
//!
//! ```rust
//! use geoplot::sequence::{compute_partial_sums, PartialSum};
//!
//! let sums = compute_partial_sums(2.0, 2.0, 3);
//! assert_eq!(sums, vec![
//!     PartialSum::Finite(2.0),
//!     PartialSum::Finite(6.0),
//!     PartialSum::Finite(14.0),
//! ]);
//! ```

mod fraction;
mod model;

pub use fraction::{approximate_fraction, Fraction};
pub use model::{
    compute_partial_sums, ConfidenceBand, Convergence, PartialSum, SequenceReport,
    BAND_FRACTION, RATIO_MAX_DENOMINATOR,
};
