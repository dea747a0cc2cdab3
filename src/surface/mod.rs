//! Avaliador de superfícies 3D.
//!
//! Transforma uma equação em `x` e `y` (texto não confiável) num grid de
//! valores. A gramática é fechada: números, `x`, `y`, `+ - * /`, `**`/`^`,
//! parênteses e as funções `sin cos exp log sqrt abs pow min max`. Nada
//! além disso é analisado, então não há como executar ou importar código.
//!
//! ## Exemplo
//!
//! ```rust
//! use geoplot::surface::{evaluate, mesh};
//!
//! let (x, y) = mesh(&[-1.0, 0.0, 1.0]);
//! let z = evaluate("x**2 + y**2", &x, &y).unwrap();
//! assert_eq!(z.get(0, 0), Some(2.0));
//! ```

mod eval;
mod grid;
mod lexer;
mod parser;

use serde::{Deserialize, Serialize};

use crate::types::errors::EvalError;
use crate::types::requests::SurfaceRequest;

pub use eval::{evaluate, evaluate_with, EvalOptions, Expression};
pub use grid::{
    default_mesh, linspace, mesh, DefaultMesh, Grid, GRID_MAX, GRID_MIN, GRID_RESOLUTION,
};
pub use parser::{parse, BinaryOp, Expr, Function, Variable, MAX_DEPTH, MAX_EXPRESSION_LEN};

/// Superfície calculada sobre a malha padrão.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceData {
    /// Equação avaliada.
    pub equation: String,

    /// Amostras de cada eixo (iguais para x e y).
    pub axis: Vec<f64>,

    /// Valores z, linha = y, coluna = x.
    pub z: Grid,

    /// Pontos marcados como NaN.
    pub non_finite: usize,
}

/// Avalia a requisição sobre a malha padrão 400×400 em [-10, 10].
pub fn evaluate_surface(request: &SurfaceRequest) -> Result<SurfaceData, EvalError> {
    let mesh = default_mesh();
    let options = EvalOptions {
        strict: request.strict,
    };

    let z = evaluate_with(&request.equation, &mesh.x, &mesh.y, options)?;

    Ok(SurfaceData {
        equation: request.equation.clone(),
        axis: mesh.axis.clone(),
        non_finite: z.count_non_finite(),
        z,
    })
}
