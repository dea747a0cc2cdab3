//! Grids de amostragem.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Limite inferior dos eixos x e y.
pub const GRID_MIN: f64 = -10.0;

/// Limite superior dos eixos x e y.
pub const GRID_MAX: f64 = 10.0;

/// Amostras por eixo.
pub const GRID_RESOLUTION: usize = 400;

/// Matriz densa em ordem de linhas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Cria um grid a partir dos valores. Retorna `None` se o tamanho não bate.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        if rows.checked_mul(cols)? != values.len() {
            return None;
        }
        Some(Self { rows, cols, values })
    }

    /// Grid com todos os pontos iguais a `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    /// Grid calculado ponto a ponto a partir de (linha, coluna).
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut values = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                values.push(f(r, c));
            }
        }
        Self { rows, cols, values }
    }

    /// (linhas, colunas).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Valores em ordem de linhas.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consome o grid e devolve os valores.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Valor em (linha, coluna).
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// Uma linha do grid.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    /// Iterador sobre as linhas.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Número de pontos não finitos (NaN ou ±inf).
    pub fn count_non_finite(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}

/// `n` pontos igualmente espaçados em `[start, end]`, com os dois extremos.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Malha (x, y) sobre um eixo: x varia nas colunas e y nas linhas.
pub fn mesh(axis: &[f64]) -> (Grid, Grid) {
    let n = axis.len();
    let x = Grid::from_fn(n, n, |_, c| axis[c]);
    let y = Grid::from_fn(n, n, |r, _| axis[r]);
    (x, y)
}

/// Malha padrão de avaliação.
pub struct DefaultMesh {
    /// Amostras de cada eixo.
    pub axis: Vec<f64>,
    pub x: Grid,
    pub y: Grid,
}

/// Malha padrão 400×400 sobre [-10, 10], criada uma única vez.
pub fn default_mesh() -> &'static DefaultMesh {
    static MESH: OnceLock<DefaultMesh> = OnceLock::new();
    MESH.get_or_init(|| {
        let axis = linspace(GRID_MIN, GRID_MAX, GRID_RESOLUTION);
        let (x, y) = mesh(&axis);
        DefaultMesh { axis, x, y }
    })
}
