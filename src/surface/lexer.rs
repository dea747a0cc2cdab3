//! Analisador léxico das equações de superfície.

use crate::types::errors::EvalError;

/// Tipo de token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `**` ou `^`.
    Pow,
    LParen,
    RParen,
    Comma,
    Eof,
}

impl TokenKind {
    /// Descrição curta para mensagens de erro.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("número {}", n),
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Pow => "'**'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Eof => "fim da equação".to_string(),
        }
    }
}

/// Token com a posição (em bytes) onde começa.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Lexer sob demanda: o parser pede um token por vez, então um
/// identificador desconhecido é reportado antes de qualquer lixo depois dele.
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Próximo token. Depois do fim retorna sempre `Eof`.
    pub fn next_token(&mut self) -> Result<Token, EvalError> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(&byte) = self.bytes.get(start) else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: start,
            });
        };

        let kind = match byte {
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'/' => self.single(TokenKind::Slash),
            b'^' => self.single(TokenKind::Pow),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b',' => self.single(TokenKind::Comma),
            b'*' => {
                if self.bytes.get(start + 1) == Some(&b'*') {
                    self.pos += 2;
                    TokenKind::Pow
                } else {
                    self.single(TokenKind::Star)
                }
            }
            b'0'..=b'9' | b'.' => self.number()?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.ident(),
            _ => {
                let ch = self.source[start..].chars().next().unwrap_or('?');
                return Err(EvalError::parse(
                    start,
                    format!("caractere inesperado '{}'", ch.escape_debug()),
                ));
            }
        };

        Ok(Token {
            kind,
            position: start,
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<TokenKind, EvalError> {
        let start = self.pos;
        let mut digits = self.eat_digits();

        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            digits += self.eat_digits();
        }

        if digits == 0 {
            return Err(EvalError::parse(start, "número inválido"));
        }

        if matches!(self.bytes.get(self.pos), Some(b'e') | Some(b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                return Err(EvalError::parse(mark, "expoente sem dígitos"));
            }
        }

        let text = &self.source[start..self.pos];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| EvalError::parse(start, format!("número inválido '{}'", text)))
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            self.pos += 1;
        }
        TokenKind::Ident(self.source[start..self.pos].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Result<Vec<TokenKind>, EvalError> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token()?;
            if token.kind == TokenKind::Eof {
                return Ok(out);
            }
            out.push(token.kind);
        }
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("x**2 + y^3 * 4 / 2 - 1").unwrap(),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Pow,
                TokenKind::Number(2.0),
                TokenKind::Plus,
                TokenKind::Ident("y".into()),
                TokenKind::Pow,
                TokenKind::Number(3.0),
                TokenKind::Star,
                TokenKind::Number(4.0),
                TokenKind::Slash,
                TokenKind::Number(2.0),
                TokenKind::Minus,
                TokenKind::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 3. 1e3 2E-2").unwrap(),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.5),
                TokenKind::Number(3.0),
                TokenKind::Number(1000.0),
                TokenKind::Number(0.02),
            ]
        );
    }

    #[test]
    fn test_bad_numbers() {
        assert!(matches!(kinds("."), Err(EvalError::Parse { position: 0, .. })));
        assert!(matches!(kinds("1e"), Err(EvalError::Parse { position: 1, .. })));
    }

    #[test]
    fn test_unexpected_characters() {
        for source in ["x; y", "x = 1", "x[0]", "'os'", "x @ y", "x.real", "é"] {
            assert!(
                matches!(kinds(source), Err(EvalError::Parse { .. })),
                "{} deveria falhar",
                source
            );
        }
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("  sin(x)");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Ident("sin".into()));
        assert_eq!(token.position, 2);
        assert_eq!(lexer.next_token().unwrap().position, 5);
    }
}
