//! Avaliação vetorizada das equações sobre os grids.

use crate::types::errors::EvalError;

use super::grid::Grid;
use super::parser::{parse, BinaryOp, Expr, Function, Variable};

/// Opções de avaliação.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Falha com [`EvalError::Domain`] se algum ponto não for finito.
    /// Sem isso, pontos não finitos viram NaN.
    pub strict: bool,
}

impl EvalOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Equação já analisada, pronta para ser avaliada em qualquer grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Analisa o texto.
    pub fn parse(source: &str) -> Result<Self, EvalError> {
        Ok(Self {
            source: source.to_string(),
            root: parse(source)?,
        })
    }

    /// Texto original.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Árvore sintática.
    pub fn ast(&self) -> &Expr {
        &self.root
    }

    /// Avalia ponto a ponto; o resultado tem o formato dos grids.
    pub fn evaluate(
        &self,
        x_grid: &Grid,
        y_grid: &Grid,
        options: EvalOptions,
    ) -> Result<Grid, EvalError> {
        if x_grid.shape() != y_grid.shape() {
            return Err(EvalError::ShapeMismatch {
                left: x_grid.shape(),
                right: y_grid.shape(),
            });
        }

        let (rows, cols) = x_grid.shape();
        let scope = Scope {
            x: x_grid.values(),
            y: y_grid.values(),
        };

        let mut values = match eval(&self.root, &scope) {
            Values::Scalar(v) => vec![v; rows * cols],
            Values::Grid(values) => values,
        };

        let non_finite = values.iter().filter(|v| !v.is_finite()).count();
        if non_finite > 0 {
            if options.strict {
                return Err(EvalError::Domain { count: non_finite });
            }
            for v in values.iter_mut().filter(|v| !v.is_finite()) {
                *v = f64::NAN;
            }
        }

        Grid::new(rows, cols, values).ok_or(EvalError::ShapeMismatch {
            left: x_grid.shape(),
            right: y_grid.shape(),
        })
    }
}

/// Analisa e avalia com as opções padrão.
pub fn evaluate(source: &str, x_grid: &Grid, y_grid: &Grid) -> Result<Grid, EvalError> {
    evaluate_with(source, x_grid, y_grid, EvalOptions::default())
}

/// Analisa e avalia.
pub fn evaluate_with(
    source: &str,
    x_grid: &Grid,
    y_grid: &Grid,
    options: EvalOptions,
) -> Result<Grid, EvalError> {
    Expression::parse(source)?.evaluate(x_grid, y_grid, options)
}

struct Scope<'a> {
    x: &'a [f64],
    y: &'a [f64],
}

/// Escalares só viram grid quando encontram um grid.
enum Values {
    Scalar(f64),
    Grid(Vec<f64>),
}

impl Values {
    fn map(self, f: impl Fn(f64) -> f64) -> Values {
        match self {
            Values::Scalar(v) => Values::Scalar(f(v)),
            Values::Grid(mut values) => {
                for v in values.iter_mut() {
                    *v = f(*v);
                }
                Values::Grid(values)
            }
        }
    }

    fn zip(self, other: Values, f: impl Fn(f64, f64) -> f64) -> Values {
        match (self, other) {
            (Values::Scalar(a), Values::Scalar(b)) => Values::Scalar(f(a, b)),
            (Values::Grid(mut a), Values::Scalar(b)) => {
                for v in a.iter_mut() {
                    *v = f(*v, b);
                }
                Values::Grid(a)
            }
            (Values::Scalar(a), Values::Grid(mut b)) => {
                for v in b.iter_mut() {
                    *v = f(a, *v);
                }
                Values::Grid(b)
            }
            (Values::Grid(mut a), Values::Grid(b)) => {
                for (v, w) in a.iter_mut().zip(b) {
                    *v = f(*v, w);
                }
                Values::Grid(a)
            }
        }
    }

    // NaN é ignorado, como em f64::min/f64::max; todo NaN dá NaN.
    fn reduce(self, f: impl Fn(f64, f64) -> f64) -> Values {
        match self {
            Values::Scalar(v) => Values::Scalar(v),
            Values::Grid(values) => Values::Scalar(values.into_iter().fold(f64::NAN, f)),
        }
    }
}

fn eval(expr: &Expr, scope: &Scope<'_>) -> Values {
    match expr {
        Expr::Number(n) => Values::Scalar(*n),
        Expr::Var(Variable::X) => Values::Grid(scope.x.to_vec()),
        Expr::Var(Variable::Y) => Values::Grid(scope.y.to_vec()),
        Expr::Neg(inner) => eval(inner, scope).map(|v| -v),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, scope);
            let rhs = eval(rhs, scope);
            match op {
                BinaryOp::Add => lhs.zip(rhs, |a, b| a + b),
                BinaryOp::Sub => lhs.zip(rhs, |a, b| a - b),
                BinaryOp::Mul => lhs.zip(rhs, |a, b| a * b),
                BinaryOp::Div => lhs.zip(rhs, |a, b| a / b),
                BinaryOp::Pow => lhs.zip(rhs, f64::powf),
            }
        }
        Expr::Call { func, args } => call(*func, args, scope),
    }
}

fn call(func: Function, args: &[Expr], scope: &Scope<'_>) -> Values {
    let mut values = args.iter().map(|arg| eval(arg, scope));
    // O parser garante a aridade.
    let first = values.next().unwrap_or(Values::Scalar(f64::NAN));
    let second = values.next();

    match (func, second) {
        (Function::Sin, _) => first.map(f64::sin),
        (Function::Cos, _) => first.map(f64::cos),
        (Function::Exp, _) => first.map(f64::exp),
        (Function::Log, _) => first.map(f64::ln),
        (Function::Sqrt, _) => first.map(f64::sqrt),
        (Function::Abs, _) => first.map(f64::abs),
        (Function::Pow, Some(exp)) => first.zip(exp, f64::powf),
        (Function::Pow, None) => first.map(|_| f64::NAN),
        (Function::Min, Some(other)) => first.zip(other, f64::min),
        (Function::Min, None) => first.reduce(f64::min),
        (Function::Max, Some(other)) => first.zip(other, f64::max),
        (Function::Max, None) => first.reduce(f64::max),
    }
}
