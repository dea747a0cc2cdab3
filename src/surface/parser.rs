//! Parser descendente recursivo das equações de superfície.
//!
//! Gramática:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := NUMBER | 'x' | 'y' | FUNC '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! Não existe produção para atribuição, indexação, acesso a atributo,
//! laços ou definições: qualquer coisa fora disso é erro de sintaxe.

use serde::{Deserialize, Serialize};

use crate::types::errors::EvalError;

use super::lexer::{Lexer, Token, TokenKind};

/// Tamanho máximo da equação em bytes.
pub const MAX_EXPRESSION_LEN: usize = 1024;

/// Profundidade máxima de aninhamento.
///
/// Cada parêntese, chamada de função, sinal prefixo ou expoente abre um nível.
pub const MAX_DEPTH: usize = 64;

/// Variável ligada ao grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variable {
    X,
    Y,
}

/// Operador binário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Funções permitidas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Function {
    Sin,
    Cos,
    Exp,
    Log,
    Sqrt,
    Abs,
    Pow,
    /// Com 1 argumento reduz o grid inteiro; com 2 compara ponto a ponto.
    Min,
    Max,
}

impl Function {
    /// Procura uma função pelo nome.
    pub fn lookup(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "exp" => Function::Exp,
            "log" => Function::Log,
            "sqrt" => Function::Sqrt,
            "abs" => Function::Abs,
            "pow" => Function::Pow,
            "min" => Function::Min,
            "max" => Function::Max,
            _ => return None,
        };
        Some(func)
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Pow => "pow",
            Function::Min => "min",
            Function::Max => "max",
        }
    }

    /// Número de argumentos aceito (mínimo, máximo).
    pub fn arity(self) -> (usize, usize) {
        match self {
            Function::Pow => (2, 2),
            Function::Min | Function::Max => (1, 2),
            _ => (1, 1),
        }
    }
}

/// Árvore sintática.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(f64),
    Var(Variable),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Function,
        args: Vec<Expr>,
    },
}

/// Analisa uma equação.
pub fn parse(source: &str) -> Result<Expr, EvalError> {
    if source.len() > MAX_EXPRESSION_LEN {
        return Err(EvalError::parse(
            MAX_EXPRESSION_LEN,
            format!("equação maior que {} bytes", MAX_EXPRESSION_LEN),
        ));
    }

    let mut parser = Parser::new(source)?;
    let expr = parser.expr()?;

    if parser.current.kind != TokenKind::Eof {
        return Err(parser.unexpected());
    }

    Ok(expr)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self, EvalError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, EvalError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn unexpected(&self) -> EvalError {
        EvalError::parse(
            self.current.position,
            format!("token inesperado: {}", self.current.kind.describe()),
        )
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), EvalError> {
        if self.current.kind == kind {
            self.advance()?;
            Ok(())
        } else {
            Err(EvalError::parse(
                self.current.position,
                format!(
                    "esperado {}, encontrado {}",
                    kind.describe(),
                    self.current.kind.describe()
                ),
            ))
        }
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::parse(
                self.current.position,
                format!("aninhamento maior que {} níveis", MAX_DEPTH),
            ));
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance()?;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance()?;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        match self.current.kind {
            TokenKind::Minus => {
                self.advance()?;
                let operand = self.nested(Self::unary)?;
                Ok(Expr::Neg(Box::new(operand)))
            }
            TokenKind::Plus => {
                self.advance()?;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.current.kind != TokenKind::Pow {
            return Ok(base);
        }
        self.advance()?;
        let exponent = self.nested(Self::unary)?;
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            lhs: Box::new(base),
            rhs: Box::new(exponent),
        })
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.advance()?;

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::LParen => {
                let inner = self.nested(Self::expr)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.identifier(name, token.position),
            other => Err(EvalError::parse(
                token.position,
                format!("token inesperado: {}", other.describe()),
            )),
        }
    }

    fn identifier(&mut self, name: String, position: usize) -> Result<Expr, EvalError> {
        let is_call = self.current.kind == TokenKind::LParen;

        match name.as_str() {
            "x" | "y" if is_call => Err(EvalError::parse(
                self.current.position,
                format!("'{}' não é uma função", name),
            )),
            "x" => Ok(Expr::Var(Variable::X)),
            "y" => Ok(Expr::Var(Variable::Y)),
            _ => {
                let func = Function::lookup(&name)
                    .ok_or(EvalError::UnknownSymbol { name, position })?;
                if !is_call {
                    return Err(EvalError::parse(
                        self.current.position,
                        format!("função '{}' usada sem argumentos", func.name()),
                    ));
                }
                self.call(func, position)
            }
        }
    }

    fn call(&mut self, func: Function, position: usize) -> Result<Expr, EvalError> {
        self.expect(TokenKind::LParen)?;

        let args = self.nested(|p| {
            let mut args = vec![p.expr()?];
            while p.current.kind == TokenKind::Comma {
                p.advance()?;
                args.push(p.expr()?);
            }
            Ok(args)
        })?;
        self.expect(TokenKind::RParen)?;

        let (min, max) = func.arity();
        if args.len() < min || args.len() > max {
            return Err(EvalError::parse(
                position,
                format!(
                    "'{}' recebe {} argumento(s), recebeu {}",
                    func.name(),
                    if min == max {
                        min.to_string()
                    } else {
                        format!("{} a {}", min, max)
                    },
                    args.len()
                ),
            ));
        }

        Ok(Expr::Call { func, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    fn var(v: Variable) -> Box<Expr> {
        Box::new(Expr::Var(v))
    }

    #[test]
    fn test_precedence() {
        let expr = parse("1 + 2 * x").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: num(1.0),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: num(2.0),
                    rhs: var(Variable::X),
                }),
            }
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse("2 ** 3 ^ 2").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Pow,
                lhs: num(2.0),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: num(3.0),
                    rhs: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        let expr = parse("-x**2").unwrap();
        assert_eq!(
            expr,
            Expr::Neg(Box::new(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: var(Variable::X),
                rhs: num(2.0),
            }))
        );
    }

    #[test]
    fn test_function_calls() {
        assert!(parse("sin(x) * cos(y)").is_ok());
        assert!(parse("pow(x, 2) + min(x, y) + max(x)").is_ok());
        assert!(parse("sqrt(abs(x)) + log(exp(y))").is_ok());
    }

    #[test]
    fn test_wrong_arity() {
        assert!(matches!(parse("sin(x, y)"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse("pow(x)"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse("max(x, y, 1)"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse("sin()"), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_unknown_symbols() {
        assert_eq!(
            parse("__import__('os')"),
            Err(EvalError::UnknownSymbol {
                name: "__import__".to_string(),
                position: 0
            })
        );
        assert!(matches!(parse("z + 1"), Err(EvalError::UnknownSymbol { .. })));
        assert!(matches!(parse("x + eval(y)"), Err(EvalError::UnknownSymbol { .. })));
        assert!(matches!(parse("pi"), Err(EvalError::UnknownSymbol { .. })));
    }

    #[test]
    fn test_structural_rejections() {
        for source in [
            "x; y",
            "x = 1",
            "x[0]",
            "x.real",
            "x(1)",
            "sin",
            "(x",
            "x)",
            "x y",
            "2x",
            "",
            "lambda: x",
        ] {
            let err = parse(source).unwrap_err();
            assert!(err.is_rejection(), "{} deveria ser rejeitada", source);
        }
    }

    #[test]
    fn test_length_limit() {
        let long = "x+".repeat(MAX_EXPRESSION_LEN) + "x";
        assert!(matches!(parse(&long), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}x{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(parse(&deep), Err(EvalError::Parse { .. })));

        let negations = format!("{}x", "-".repeat(200));
        assert!(matches!(parse(&negations), Err(EvalError::Parse { .. })));

        let shallow = format!("{}x{}", "(".repeat(10), ")".repeat(10));
        assert!(parse(&shallow).is_ok());
    }

    #[test]
    fn test_depth_limit_counts_levels() {
        let parens = |n: usize| format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert!(parse(&parens(MAX_DEPTH)).is_ok());
        assert!(matches!(parse(&parens(MAX_DEPTH + 1)), Err(EvalError::Parse { .. })));

        let calls = |n: usize| format!("{}x{}", "sin(".repeat(n), ")".repeat(n));
        assert!(parse(&calls(MAX_DEPTH)).is_ok());
        assert!(matches!(parse(&calls(MAX_DEPTH + 1)), Err(EvalError::Parse { .. })));

        let negations = |n: usize| format!("{}x", "-".repeat(n));
        assert!(parse(&negations(MAX_DEPTH)).is_ok());
        assert!(parse(&negations(MAX_DEPTH + 1)).is_err());

        let tower = |n: usize| format!("x{}", "**x".repeat(n));
        assert!(parse(&tower(MAX_DEPTH)).is_ok());
        assert!(parse(&tower(MAX_DEPTH + 1)).is_err());
    }
}
